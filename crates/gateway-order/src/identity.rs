//! Order id derivation.
//!
//! The id is `sha256_to_field` of the canonical order bytes. Every gateway
//! operation refers to an order by this value, so the id a caller computes
//! locally must always match the one the gateway emits.

use crate::{encode_order, OrderError};
use gateway_types::{sha256_to_field, OrderData, B256};

/// Derives the id of an order from its canonical encoding.
pub fn order_id(order: &OrderData) -> B256 {
	order_id_from_bytes(&encode_order(order))
}

/// Derives the id of an already encoded order.
pub fn order_id_from_bytes(encoded: &[u8]) -> B256 {
	sha256_to_field(encoded)
}

/// Checks that `encoded` hashes to `claimed`.
///
/// # Errors
///
/// Returns `OrderError::OrderMismatch` carrying both ids when they differ.
pub fn verify_order_id(claimed: B256, encoded: &[u8]) -> Result<(), OrderError> {
	let computed = order_id_from_bytes(encoded);
	if computed != claimed {
		tracing::debug!(%claimed, %computed, "Order id does not match order bytes");
		return Err(OrderError::OrderMismatch { claimed, computed });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_types::{Bytes, OrderType, NO_DEADLINE, U256};

	fn order(sender_nonce: u64) -> OrderData {
		OrderData {
			sender: B256::repeat_byte(0x01),
			recipient: B256::repeat_byte(0x02),
			input_token: B256::repeat_byte(0x03),
			output_token: B256::repeat_byte(0x04),
			amount_in: U256::from(100u64),
			amount_out: U256::from(100u64),
			sender_nonce: U256::from(sender_nonce),
			origin_domain: 999_999,
			destination_domain: 11_155_420,
			destination_settler: B256::repeat_byte(0x05),
			fill_deadline: NO_DEADLINE,
			order_type: OrderType::Public,
			data: Bytes::from(vec![0u8; 32]),
		}
	}

	#[test]
	fn test_id_is_deterministic_and_fits_a_field() {
		let id = order_id(&order(1));
		assert_eq!(id, order_id(&order(1)));
		assert_eq!(id[0], 0);
	}

	#[test]
	fn test_nonce_distinguishes_orders() {
		assert_ne!(order_id(&order(1)), order_id(&order(2)));
	}

	#[test]
	fn test_id_matches_hash_of_encoding() {
		let encoded = encode_order(&order(1));
		let digest = hex::encode(order_id_from_bytes(&encoded));
		assert!(digest.starts_with("00"));
		assert_eq!(order_id(&order(1)), sha256_to_field(&encoded));
	}

	#[test]
	fn test_verify_order_id() {
		let encoded = encode_order(&order(1));
		let id = order_id(&order(1));
		assert!(verify_order_id(id, &encoded).is_ok());

		let other = order_id(&order(2));
		match verify_order_id(other, &encoded) {
			Err(OrderError::OrderMismatch { claimed, computed }) => {
				assert_eq!(claimed, other);
				assert_eq!(computed, id);
			}
			other => panic!("expected OrderMismatch, got {:?}", other),
		}
	}
}
