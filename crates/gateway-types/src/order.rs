//! Order types for the gateway.
//!
//! An order is the user's cross-domain trade intent. It is built client side,
//! encoded once and never mutated afterwards; the encoded bytes and the id
//! derived from them are what every later step refers to.

use alloy_primitives::{Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::utils::constants::{NO_DEADLINE, PRIVATE_SENDER};

/// Selects which lifecycle variant an order goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum OrderType {
	/// All parties and fields are visible.
	Public = 0,
	/// The recipient is a commitment, opened later by a secret reveal.
	Private = 1,
}

/// Error returned when a byte does not name a known order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown order type tag: {0}")]
pub struct UnknownOrderType(pub u8);

impl OrderType {
	/// Returns the single-byte tag used in the encoded order.
	pub fn tag(self) -> u8 {
		self as u8
	}

	/// Returns true for private orders.
	pub fn is_private(self) -> bool {
		matches!(self, Self::Private)
	}
}

impl TryFrom<u8> for OrderType {
	type Error = UnknownOrderType;

	fn try_from(tag: u8) -> Result<Self, Self::Error> {
		match tag {
			0 => Ok(Self::Public),
			1 => Ok(Self::Private),
			other => Err(UnknownOrderType(other)),
		}
	}
}

impl fmt::Display for OrderType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Public => write!(f, "public"),
			Self::Private => write!(f, "private"),
		}
	}
}

/// A user's intent to trade an asset on one domain for an asset on another.
///
/// All identities and token identifiers are 32-byte values so that both
/// origin and destination domains can be addressed without loss. Amounts are
/// 256-bit to avoid silent truncation of large token quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
	/// Identity of the order creator on the origin domain.
	/// `PRIVATE_SENDER` for private orders.
	pub sender: B256,
	/// Receiver of the output asset; a commitment for private orders.
	pub recipient: B256,
	/// Asset locked on the origin domain.
	pub input_token: B256,
	/// Asset delivered on the destination domain.
	pub output_token: B256,
	/// Amount of `input_token` the filler is rewarded with.
	pub amount_in: U256,
	/// Amount of `output_token` the recipient must receive.
	pub amount_out: U256,
	/// Caller chosen value making otherwise identical orders distinct.
	pub sender_nonce: U256,
	/// Domain the order is opened on.
	pub origin_domain: u32,
	/// Domain the order is filled on.
	pub destination_domain: u32,
	/// Settlement endpoint on the destination domain.
	pub destination_settler: B256,
	/// Last timestamp at which a fill is valid. `NO_DEADLINE` disables it.
	pub fill_deadline: u32,
	/// Lifecycle variant.
	pub order_type: OrderType,
	/// Opaque auxiliary payload.
	pub data: Bytes,
}

impl OrderData {
	/// Returns true if the order goes through the private lifecycle.
	pub fn is_private(&self) -> bool {
		self.order_type.is_private()
	}

	/// Returns true if the order carries no fill deadline.
	pub fn has_no_deadline(&self) -> bool {
		self.fill_deadline == NO_DEADLINE
	}

	/// Returns true once `now` is past the fill deadline.
	pub fn is_expired_at(&self, now: u64) -> bool {
		!self.has_no_deadline() && now > u64::from(self.fill_deadline)
	}

	/// The identity exposed as the order's user once it is opened.
	///
	/// Private orders never reveal their sender, whatever the field holds.
	pub fn visible_user(&self) -> B256 {
		if self.is_private() {
			PRIVATE_SENDER
		} else {
			self.sender
		}
	}
}
