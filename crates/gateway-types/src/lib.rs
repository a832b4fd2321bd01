//! Common types for the cross-domain intent gateway.
//!
//! This crate defines the data model shared by every gateway component: the
//! order itself, the records reconstructed from emitted logs, the commitment
//! and reveal pair used by private orders, and the membership witness that
//! proves a settlement message left the destination domain.

/// Membership witness types for cross-domain messages.
pub mod messaging;
/// The order a user signs up to and its type tag.
pub mod order;
/// Commitment/reveal pair backing private orders.
pub mod secret;
/// Standard-specific record types (EIP-7683 resolved orders and events).
pub mod standards;
/// Constants, hashing, field packing and formatting helpers.
pub mod utils;

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use messaging::{MembershipWitness, SiblingPath};
pub use order::{OrderData, OrderType, UnknownOrderType};
pub use secret::{Commitment, Reveal};
pub use standards::eip7683::{
	FillInstruction, FilledRecord, Output, ResolvedCrossChainOrder, SettledRecord,
};
pub use utils::{
	constants::{NO_DEADLINE, ORDER_DATA_TYPE, PRIVATE_SENDER, SETTLE_ORDER_TYPE},
	hashing::sha256_to_field,
	truncate_id, without_0x_prefix,
};
