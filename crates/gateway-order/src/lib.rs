//! Order encoding and identity for the cross-domain gateway.
//!
//! This crate turns an `OrderData` into the canonical bytes submitted to a
//! gateway, decodes those bytes back, and derives the order id that
//! correlates the open, fill, settle and refund calls of one order.

use gateway_types::{Bytes, OrderData, ResolvedCrossChainOrder, B256};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod standards {
		pub mod _7683;
	}
}
pub mod identity;

pub use identity::{order_id, order_id_from_bytes, verify_order_id};
pub use implementations::standards::_7683::{
	decode_order, encode_order, resolve_order, Eip7683Codec, FIXED_PREFIX_LEN, OPEN_DEADLINE,
};

/// Errors that can occur while encoding, decoding or identifying orders.
#[derive(Debug, Error)]
pub enum OrderError {
	/// The buffer is too short or a field is out of bounds.
	#[error("Malformed order: {0}")]
	MalformedOrder(String),
	/// The supplied order bytes do not hash to the claimed id.
	#[error("Order id mismatch: claimed {claimed}, computed {computed}")]
	OrderMismatch { claimed: B256, computed: B256 },
}

/// Trait implemented by each versioned order byte format.
///
/// The format identifier travels next to the encoded bytes on every open
/// call so the destination domain knows how to decode them.
pub trait OrderCodec: Send + Sync {
	/// Identifier of the byte layout this codec produces.
	fn order_data_type(&self) -> B256;

	/// Encodes an order. Every order has exactly one encoding.
	fn encode(&self, order: &OrderData) -> Bytes;

	/// Decodes bytes produced by `encode`.
	fn decode(&self, bytes: &[u8]) -> Result<OrderData, OrderError>;

	/// Projects an order into the resolved view a gateway commits to on open.
	fn resolve(&self, order: &OrderData) -> ResolvedCrossChainOrder;
}
