//! Settlement message verification for the gateway.
//!
//! A fill on the destination domain sends a settlement message to the
//! origin domain. Before releasing funds, the origin gateway checks that the
//! message hash is a member of the destination domain's outbox tree for the
//! block the fill landed in. This crate computes those hashes, builds and
//! verifies membership witnesses, and defines the `MessageSource` seam
//! through which a block's outgoing messages are fetched.

use async_trait::async_trait;
use gateway_types::B256;
use thiserror::Error;

pub mod message;
pub mod outbox;
pub mod tree;

pub use message::{
	compute_message_content_hash, compute_message_hash, settlement_message_hash, MessageContext,
};
pub use outbox::{
	compute_membership_witness, compute_membership_witness_for_block, compute_out_hash,
	verify_membership,
};

/// Errors that can occur during settlement verification.
#[derive(Debug, Error)]
pub enum SettlementError {
	/// The message is not part of the message set searched.
	#[error("Message {0} not found in outbox")]
	MembershipNotFound(B256),
	/// A tree was requested over no leaves.
	#[error("Cannot operate on empty tree")]
	EmptyTree,
	/// Leaf index out of bounds.
	#[error("Leaf index {index} out of bounds (tree has {tree_size} leaves)")]
	IndexOutOfBounds { index: usize, tree_size: usize },
	/// The message source failed to return the block's messages.
	#[error("Message source error: {0}")]
	Source(String),
}

/// Trait implemented by anything able to return the outgoing messages of a
/// destination domain block.
///
/// Messages are grouped per transaction, in block order. Transactions that
/// sent no message may appear as empty groups.
#[async_trait]
pub trait MessageSource: Send + Sync {
	async fn get_block_messages(&self, block_number: u64) -> Result<Vec<Vec<B256>>, SettlementError>;
}
