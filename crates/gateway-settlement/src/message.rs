//! Settlement message hashing.

use alloy_primitives::{Address, B256, U256};
use gateway_types::utils::{address_to_b256, hashing::sha256_to_field_concat};
use serde::{Deserialize, Serialize};

/// Rollup parameters mixed into every cross-domain message hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
	/// Rollup version the message is bound to.
	pub version: u64,
	/// Chain id of the settlement layer the portal lives on.
	pub chain_id: u64,
}

impl MessageContext {
	pub fn new(version: u64, chain_id: u64) -> Self {
		Self { version, chain_id }
	}
}

/// Hashes the content of a settlement message.
///
/// `type_tag` separates message kinds; settlement messages use
/// `SETTLE_ORDER_TYPE`.
pub fn compute_message_content_hash(type_tag: B256, order_id: B256, filler: B256) -> B256 {
	sha256_to_field_concat(&[type_tag.as_slice(), order_id.as_slice(), filler.as_slice()])
}

/// Hashes a message sent from `sender` on the destination domain to
/// `recipient` on the settlement layer.
///
/// Preimage: `sender || version || pad32(recipient) || chain_id || content`.
pub fn compute_message_hash(
	sender: B256,
	recipient: Address,
	content: B256,
	version: U256,
	chain_id: U256,
) -> B256 {
	sha256_to_field_concat(&[
		sender.as_slice(),
		version.to_be_bytes::<32>().as_slice(),
		address_to_b256(&recipient).as_slice(),
		chain_id.to_be_bytes::<32>().as_slice(),
		content.as_slice(),
	])
}

/// Hash of the settlement message a fill emits, tagged with `type_tag`.
pub fn settlement_message_hash(
	ctx: &MessageContext,
	type_tag: B256,
	sender: B256,
	recipient: Address,
	order_id: B256,
	filler: B256,
) -> B256 {
	let content = compute_message_content_hash(type_tag, order_id, filler);
	compute_message_hash(
		sender,
		recipient,
		content,
		U256::from(ctx.version),
		U256::from(ctx.chain_id),
	)
}
