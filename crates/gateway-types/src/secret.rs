//! Commitment/reveal pair for private orders.
//!
//! A private order stores only a `Commitment` in its recipient field. The
//! secret behind it travels as a `Reveal`, which is supplied only at claim
//! time, is zeroed on drop and never shows up in logs or debug output.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use crate::utils::hashing::sha256_to_field;

/// One-way commitment to a secret, as carried in a private order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub B256);

impl Commitment {
	/// Computes the commitment a reveal opens.
	pub fn of(reveal: &Reveal) -> Self {
		reveal.with_exposed(|secret| Self(sha256_to_field(secret)))
	}

	/// Returns true if `reveal` is the secret behind this commitment.
	pub fn is_opened_by(&self, reveal: &Reveal) -> bool {
		Self::of(reveal) == *self
	}

	/// The commitment as the 32-byte value stored in an order.
	pub fn as_b256(&self) -> B256 {
		self.0
	}
}

impl From<Commitment> for B256 {
	fn from(commitment: Commitment) -> Self {
		commitment.0
	}
}

impl From<B256> for Commitment {
	fn from(value: B256) -> Self {
		Self(value)
	}
}

/// The secret behind a commitment.
#[derive(Clone)]
pub struct Reveal(Zeroizing<[u8; 32]>);

impl Reveal {
	/// Wraps a 32-byte secret.
	pub fn new(secret: [u8; 32]) -> Self {
		Self(Zeroizing::new(secret))
	}

	/// Exposes the secret to a closure, limiting the scope where it is visible.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&[u8; 32]) -> R,
	{
		f(&self.0)
	}

	/// The commitment this secret opens.
	pub fn commitment(&self) -> Commitment {
		Commitment::of(self)
	}
}

impl From<B256> for Reveal {
	fn from(secret: B256) -> Self {
		Self::new(secret.0)
	}
}

impl fmt::Debug for Reveal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Reveal(***REDACTED***)")
	}
}

impl fmt::Display for Reveal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "***REDACTED***")
	}
}

impl PartialEq for Reveal {
	fn eq(&self, other: &Self) -> bool {
		*self.0 == *other.0
	}
}

impl Eq for Reveal {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_reveal_is_redacted() {
		let reveal = Reveal::new([0xab; 32]);
		let debug_str = format!("{:?}", reveal);
		assert_eq!(debug_str, "Reveal(***REDACTED***)");
		assert!(!debug_str.contains("ab"));
		assert_eq!(format!("{}", reveal), "***REDACTED***");
	}

	#[test]
	fn test_commitment_opens_only_with_its_secret() {
		let reveal = Reveal::new([7u8; 32]);
		let commitment = reveal.commitment();

		assert!(commitment.is_opened_by(&reveal));
		assert!(!commitment.is_opened_by(&Reveal::new([8u8; 32])));
	}

	#[test]
	fn test_commitment_fits_a_field() {
		let commitment = Reveal::new([1u8; 32]).commitment();
		assert_eq!(commitment.as_b256()[0], 0);
	}
}
