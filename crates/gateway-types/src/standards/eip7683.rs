//! EIP-7683 Cross-Chain Order Types
//!
//! This module defines the records a gateway commits to when an order is
//! opened, filled or settled. They are reconstructed from emitted logs on
//! every query and never cached or mutated.

use alloy_primitives::{Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// The protocol's view of an opened order.
///
/// Exists only after an open event; used to cross-check what the gateway
/// actually committed against what the caller intended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCrossChainOrder {
	/// Identity of the order creator, `PRIVATE_SENDER` for private orders.
	pub user: B256,
	/// Domain the order was opened on.
	pub origin_chain_id: u32,
	/// Deadline for opening the order.
	pub open_deadline: u32,
	/// Deadline for filling the order.
	pub fill_deadline: u32,
	/// Unique 32-byte identifier for the order
	pub order_id: B256,
	/// Maximum outputs the filler sends on the destination domain.
	pub max_spent: Vec<Output>,
	/// Minimum inputs the filler receives on the origin domain.
	pub min_received: Vec<Output>,
	/// Instructions for filling the order on each destination.
	pub fill_instructions: Vec<FillInstruction>,
}

/// Represents a token movement in a resolved order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
	/// The token to be moved
	pub token: B256,
	/// The amount of tokens to be moved
	pub amount: U256,
	/// The identity that should receive the tokens
	pub recipient: B256,
	/// The domain where the movement happens
	pub chain_id: u32,
}

/// Per-destination instruction describing how an order is filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillInstruction {
	/// Domain the fill happens on.
	pub destination_chain_id: u32,
	/// Settlement endpoint receiving the fill.
	pub destination_settler: B256,
	/// Encoded order the filler hands back to the settler.
	pub origin_data: Bytes,
}

/// Emitted when a filler satisfies an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledRecord {
	pub order_id: B256,
	pub origin_data: Bytes,
	/// Where the filler wants to be paid on the origin domain.
	pub filler_data: B256,
}

/// Emitted when settlement funds are released on the origin domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledRecord {
	pub order_id: B256,
	pub receiver: B256,
}
