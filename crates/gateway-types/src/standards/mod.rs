//! Standard-specific types for cross-chain order protocols.
//!
//! Currently supports:
//!
//! - **EIP-7683**: resolved cross-chain orders and the fill/settle records
//!   emitted by a gateway.

/// EIP-7683 cross-chain order types
pub mod eip7683;

pub use eip7683::{FillInstruction, FilledRecord, Output, ResolvedCrossChainOrder, SettledRecord};
