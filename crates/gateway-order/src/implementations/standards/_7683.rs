//! EIP-7683 gateway order format.
//!
//! Orders are encoded as a fixed-field concatenation in declaration order,
//! each field at its native width, followed by the opaque `data` payload:
//!
//! ```text
//! offset  len  field
//!      0   32  sender
//!     32   32  recipient
//!     64   32  input_token
//!     96   32  output_token
//!    128   32  amount_in             (big-endian)
//!    160   32  amount_out            (big-endian)
//!    192   32  sender_nonce          (big-endian)
//!    224    4  origin_domain         (big-endian)
//!    228    4  destination_domain    (big-endian)
//!    232   32  destination_settler
//!    264    4  fill_deadline         (big-endian)
//!    268    1  order_type
//!    269    n  data
//! ```
//!
//! `data` is the only variable-length field; its length is whatever follows
//! the fixed prefix, which keeps the encoding injective without a length
//! prefix.

use crate::{identity::order_id, OrderCodec, OrderError};
use alloy_primitives::{Bytes, B256, U256};
use gateway_types::{
	FillInstruction, OrderData, OrderType, Output, ResolvedCrossChainOrder, ORDER_DATA_TYPE,
};

const SENDER: usize = 0;
const RECIPIENT: usize = 32;
const INPUT_TOKEN: usize = 64;
const OUTPUT_TOKEN: usize = 96;
const AMOUNT_IN: usize = 128;
const AMOUNT_OUT: usize = 160;
const SENDER_NONCE: usize = 192;
const ORIGIN_DOMAIN: usize = 224;
const DESTINATION_DOMAIN: usize = 228;
const DESTINATION_SETTLER: usize = 232;
const FILL_DEADLINE: usize = 264;
const ORDER_TYPE: usize = 268;

/// Length of the fixed-width part of an encoded order.
pub const FIXED_PREFIX_LEN: usize = 269;

/// Open deadline reported for orders opened directly on the gateway.
pub const OPEN_DEADLINE: u32 = u32::MAX;

/// Codec for the order layout identified by `ORDER_DATA_TYPE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eip7683Codec;

impl OrderCodec for Eip7683Codec {
	fn order_data_type(&self) -> B256 {
		ORDER_DATA_TYPE
	}

	fn encode(&self, order: &OrderData) -> Bytes {
		encode_order(order)
	}

	fn decode(&self, bytes: &[u8]) -> Result<OrderData, OrderError> {
		decode_order(bytes)
	}

	fn resolve(&self, order: &OrderData) -> ResolvedCrossChainOrder {
		resolve_order(order)
	}
}

/// Encodes an order into its canonical bytes.
pub fn encode_order(order: &OrderData) -> Bytes {
	let mut out = Vec::with_capacity(FIXED_PREFIX_LEN + order.data.len());
	out.extend_from_slice(order.sender.as_slice());
	out.extend_from_slice(order.recipient.as_slice());
	out.extend_from_slice(order.input_token.as_slice());
	out.extend_from_slice(order.output_token.as_slice());
	out.extend_from_slice(&order.amount_in.to_be_bytes::<32>());
	out.extend_from_slice(&order.amount_out.to_be_bytes::<32>());
	out.extend_from_slice(&order.sender_nonce.to_be_bytes::<32>());
	out.extend_from_slice(&order.origin_domain.to_be_bytes());
	out.extend_from_slice(&order.destination_domain.to_be_bytes());
	out.extend_from_slice(order.destination_settler.as_slice());
	out.extend_from_slice(&order.fill_deadline.to_be_bytes());
	out.push(order.order_type.tag());
	out.extend_from_slice(&order.data);
	Bytes::from(out)
}

/// Decodes canonical order bytes.
///
/// # Errors
///
/// Returns `OrderError::MalformedOrder` if the buffer is shorter than the
/// fixed prefix or the order type tag is unknown.
pub fn decode_order(bytes: &[u8]) -> Result<OrderData, OrderError> {
	if bytes.len() < FIXED_PREFIX_LEN {
		return Err(OrderError::MalformedOrder(format!(
			"expected at least {} bytes, got {}",
			FIXED_PREFIX_LEN,
			bytes.len()
		)));
	}

	let order_type = OrderType::try_from(bytes[ORDER_TYPE])
		.map_err(|e| OrderError::MalformedOrder(e.to_string()))?;

	let order = OrderData {
		sender: read_b256(bytes, SENDER),
		recipient: read_b256(bytes, RECIPIENT),
		input_token: read_b256(bytes, INPUT_TOKEN),
		output_token: read_b256(bytes, OUTPUT_TOKEN),
		amount_in: read_u256(bytes, AMOUNT_IN),
		amount_out: read_u256(bytes, AMOUNT_OUT),
		sender_nonce: read_u256(bytes, SENDER_NONCE),
		origin_domain: read_u32(bytes, ORIGIN_DOMAIN),
		destination_domain: read_u32(bytes, DESTINATION_DOMAIN),
		destination_settler: read_b256(bytes, DESTINATION_SETTLER),
		fill_deadline: read_u32(bytes, FILL_DEADLINE),
		order_type,
		data: Bytes::copy_from_slice(&bytes[FIXED_PREFIX_LEN..]),
	};

	tracing::trace!(
		order_type = %order.order_type,
		data_len = order.data.len(),
		"Decoded order"
	);
	Ok(order)
}

/// Builds the resolved view a gateway commits to when the order is opened.
///
/// The filler spends `amount_out` of the output token to the recipient on
/// the destination domain, and receives `amount_in` of the input token on
/// the origin domain. The origin-side recipient is left zero because the
/// filler is only known at settlement time.
pub fn resolve_order(order: &OrderData) -> ResolvedCrossChainOrder {
	let origin_data = encode_order(order);

	ResolvedCrossChainOrder {
		user: order.visible_user(),
		origin_chain_id: order.origin_domain,
		open_deadline: OPEN_DEADLINE,
		fill_deadline: order.fill_deadline,
		order_id: order_id(order),
		max_spent: vec![Output {
			token: order.output_token,
			amount: order.amount_out,
			recipient: order.recipient,
			chain_id: order.destination_domain,
		}],
		min_received: vec![Output {
			token: order.input_token,
			amount: order.amount_in,
			recipient: B256::ZERO,
			chain_id: order.origin_domain,
		}],
		fill_instructions: vec![FillInstruction {
			destination_chain_id: order.destination_domain,
			destination_settler: order.destination_settler,
			origin_data,
		}],
	}
}

fn read_b256(bytes: &[u8], offset: usize) -> B256 {
	B256::from_slice(&bytes[offset..offset + 32])
}

fn read_u256(bytes: &[u8], offset: usize) -> U256 {
	U256::from_be_slice(&bytes[offset..offset + 32])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
	let mut word = [0u8; 4];
	word.copy_from_slice(&bytes[offset..offset + 4]);
	u32::from_be_bytes(word)
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_types::{NO_DEADLINE, PRIVATE_SENDER};

	fn public_order() -> OrderData {
		OrderData {
			sender: B256::repeat_byte(0xaa),
			recipient: B256::repeat_byte(0x11),
			input_token: B256::repeat_byte(0x22),
			output_token: B256::repeat_byte(0x33),
			amount_in: U256::from(100u64),
			amount_out: U256::ZERO,
			sender_nonce: U256::from(42u64),
			origin_domain: 999_999,
			destination_domain: 11_155_420,
			destination_settler: B256::ZERO,
			fill_deadline: NO_DEADLINE,
			order_type: OrderType::Public,
			data: Bytes::from(vec![0x55; 32]),
		}
	}

	#[test]
	fn test_round_trip() {
		let order = public_order();
		let encoded = encode_order(&order);
		assert_eq!(decode_order(&encoded).unwrap(), order);
	}

	#[test]
	fn test_observed_order_length() {
		assert_eq!(encode_order(&public_order()).len(), 301);
	}

	#[test]
	fn test_layout_offsets() {
		let mut order = public_order();
		order.origin_domain = 0x0102_0304;
		order.order_type = OrderType::Private;
		let encoded = encode_order(&order);

		assert_eq!(&encoded[224..228], &[1, 2, 3, 4]);
		assert_eq!(&encoded[264..268], &[0xff; 4]);
		assert_eq!(encoded[268], 1);
		assert_eq!(encoded[159], 100);
		assert_eq!(&encoded[269..], &[0x55; 32]);
	}

	#[test]
	fn test_round_trip_large_amounts_and_empty_data() {
		let mut order = public_order();
		order.amount_in = U256::MAX;
		order.amount_out = U256::from(u128::MAX) + U256::from(1u64);
		order.data = Bytes::new();

		let encoded = encode_order(&order);
		assert_eq!(encoded.len(), FIXED_PREFIX_LEN);
		assert_eq!(decode_order(&encoded).unwrap(), order);
	}

	#[test]
	fn test_every_field_changes_the_encoding() {
		let base = public_order();
		let base_bytes = encode_order(&base);

		let variants: Vec<OrderData> = vec![
			OrderData { sender: B256::repeat_byte(0xab), ..base.clone() },
			OrderData { recipient: B256::repeat_byte(0x12), ..base.clone() },
			OrderData { input_token: B256::repeat_byte(0x23), ..base.clone() },
			OrderData { output_token: B256::repeat_byte(0x34), ..base.clone() },
			OrderData { amount_in: U256::from(101u64), ..base.clone() },
			OrderData { amount_out: U256::from(1u64), ..base.clone() },
			OrderData { sender_nonce: U256::from(43u64), ..base.clone() },
			OrderData { origin_domain: 1, ..base.clone() },
			OrderData { destination_domain: 2, ..base.clone() },
			OrderData { destination_settler: B256::repeat_byte(1), ..base.clone() },
			OrderData { fill_deadline: 1_000, ..base.clone() },
			OrderData { order_type: OrderType::Private, ..base.clone() },
			OrderData { data: Bytes::from(vec![0x55; 31]), ..base.clone() },
		];

		for variant in variants {
			assert_ne!(encode_order(&variant), base_bytes, "{:?}", variant);
		}
	}

	#[test]
	fn test_decode_rejects_short_buffer() {
		let encoded = encode_order(&public_order());
		let err = decode_order(&encoded[..FIXED_PREFIX_LEN - 1]).unwrap_err();
		assert!(matches!(err, OrderError::MalformedOrder(_)));
	}

	#[test]
	fn test_decode_rejects_unknown_order_type() {
		let mut encoded = encode_order(&public_order()).to_vec();
		encoded[ORDER_TYPE] = 7;
		let err = decode_order(&encoded).unwrap_err();
		assert!(matches!(err, OrderError::MalformedOrder(msg) if msg.contains('7')));
	}

	#[test]
	fn test_resolve_public_order() {
		let order = public_order();
		let resolved = resolve_order(&order);

		assert_eq!(resolved.order_id, order_id(&order));
		assert_eq!(resolved.user, order.sender);
		assert_eq!(resolved.origin_chain_id, 999_999);
		assert_eq!(resolved.fill_deadline, NO_DEADLINE);
		assert_eq!(resolved.min_received[0].amount, U256::from(100u64));
		assert_eq!(resolved.min_received[0].recipient, B256::ZERO);
		assert_eq!(resolved.min_received[0].token, order.input_token);
		assert_eq!(resolved.max_spent[0].recipient, order.recipient);
		assert_eq!(resolved.max_spent[0].chain_id, 11_155_420);
		assert_eq!(
			resolved.fill_instructions[0].origin_data,
			encode_order(&order)
		);
	}

	#[test]
	fn test_resolve_private_order_hides_user() {
		let order = OrderData {
			sender: B256::repeat_byte(0xee),
			order_type: OrderType::Private,
			..public_order()
		};
		assert_eq!(resolve_order(&order).user, PRIVATE_SENDER);
	}

	#[test]
	fn test_codec_reports_its_data_type() {
		let codec = Eip7683Codec;
		assert_eq!(codec.order_data_type(), ORDER_DATA_TYPE);
		let order = public_order();
		assert_eq!(codec.decode(&codec.encode(&order)).unwrap(), order);
	}
}
