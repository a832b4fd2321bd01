//! Hash primitive pinned to the gateway contracts.

use alloy_primitives::B256;
use sha2::{Digest, Sha256};

/// SHA-256 truncated to fit a 254-bit field element.
///
/// The first 31 bytes of the digest are kept and prefixed with a zero byte,
/// so the result is always a valid field element on the settlement domain.
pub fn sha256_to_field(input: &[u8]) -> B256 {
	let digest = Sha256::digest(input);
	let mut out = [0u8; 32];
	out[1..].copy_from_slice(&digest[..31]);
	B256::from(out)
}

/// Hashes the concatenation of several byte slices with `sha256_to_field`.
pub fn sha256_to_field_concat(parts: &[&[u8]]) -> B256 {
	let mut hasher = Sha256::new();
	for part in parts {
		hasher.update(part);
	}
	let digest = hasher.finalize();
	let mut out = [0u8; 32];
	out[1..].copy_from_slice(&digest[..31]);
	B256::from(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::b256;

	#[test]
	fn test_known_digest() {
		// sha256("") = e3b0c442...b855; the last byte is dropped.
		let hash = sha256_to_field(b"");
		assert_eq!(
			hash,
			b256!("00e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b8")
		);
	}

	#[test]
	fn test_concat_matches_single_buffer() {
		let joined = [b"abc".as_slice(), b"def".as_slice()].concat();
		assert_eq!(
			sha256_to_field(&joined),
			sha256_to_field_concat(&[b"abc", b"def"])
		);
	}
}
