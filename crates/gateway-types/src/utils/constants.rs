//! Protocol constants shared by every gateway deployment.
//!
//! These values are pinned by the deployed gateway contracts; changing any of
//! them breaks interoperability with existing deployments.

use alloy_primitives::{b256, B256};

/// Schema identifier of the encoded order, supplied on every open call.
/// Must match the codec's byte layout exactly.
pub const ORDER_DATA_TYPE: B256 =
	b256!("f00c3bf60c73eb97097f1c9835537da014e0b755fe94b25d7ac8401df66716a0");

/// Type tag of settlement messages sent from the destination domain.
pub const SETTLE_ORDER_TYPE: B256 =
	b256!("191ea776bd6e0cd56a6d44ba4aea2fec468b4a0b4c1d880d4025929eeb615d0d");

/// Sender value marking an order whose creator stays anonymous.
pub const PRIVATE_SENDER: B256 = B256::ZERO;

/// Fill deadline meaning "never expires".
pub const NO_DEADLINE: u32 = u32::MAX;
