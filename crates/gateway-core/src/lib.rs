//! Order lifecycle for the cross-domain gateway.
//!
//! `Gateway` is an in-memory reference implementation of the gateway
//! contract. It enforces the lifecycle rules over the order codec, log
//! encoders and membership verifier, mines one block per successful call,
//! and serves its logs and outgoing messages back through the
//! `LogSource` and `MessageSource` traits.

use gateway_config::ConfigError;
use gateway_discovery::LogError;
use gateway_order::OrderError;
use gateway_settlement::SettlementError;
use gateway_types::{OrderType, B256};
use thiserror::Error;

pub mod chain;
pub mod gateway;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use chain::{Receipt, Transfer};
pub use gateway::{Gateway, OpenParams, SettlementProof};
pub use state::{OrderStatus, TrackedOrder};

/// Errors returned by gateway operations.
///
/// A failed call leaves the gateway unchanged and mines no block.
#[derive(Debug, Error)]
pub enum GatewayError {
	#[error("Order id mismatch: claimed {claimed}, computed {computed}")]
	OrderMismatch { claimed: B256, computed: B256 },
	#[error("Fill deadline {supplied} differs from the order's {encoded}")]
	FillDeadlineMismatch { supplied: u32, encoded: u32 },
	#[error("Filler data {0} differs from the fill")]
	FillerDataMismatch(B256),
	#[error("Fill deadline {deadline} passed (now {now})")]
	DeadlineExceeded { deadline: u32, now: u64 },
	#[error("Fill deadline {deadline} not reached (now {now})")]
	DeadlineNotReached { deadline: u32, now: u64 },
	#[error("Order {0} already opened")]
	AlreadyOpened(B256),
	#[error("Order {0} already filled")]
	AlreadyFilled(B256),
	#[error("Order {0} already settled")]
	AlreadySettled(B256),
	#[error("Order {0} already refunded")]
	AlreadyRefunded(B256),
	#[error("Order {0} already claimed")]
	AlreadyClaimed(B256),
	#[error("Reveal does not open the order commitment")]
	InvalidReveal,
	#[error("Unknown order {0}")]
	UnknownOrder(B256),
	#[error("Wrong order type: expected {expected}, got {actual}")]
	WrongOrderType { expected: OrderType, actual: OrderType },
	#[error("Wrong domain: expected {expected}, got {actual}")]
	WrongDomain { expected: u32, actual: u32 },
	#[error("Unsupported order data type {0}")]
	InvalidOrderDataType(B256),
	#[error("Unauthorized: {0}")]
	Unauthorized(String),
	#[error("Invalid settlement proof: {0}")]
	InvalidProof(String),
	#[error("Invalid state transition from {from:?} to {to:?}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error(transparent)]
	Order(OrderError),
	#[error(transparent)]
	Log(#[from] LogError),
	#[error(transparent)]
	Settlement(#[from] SettlementError),
	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl From<OrderError> for GatewayError {
	fn from(err: OrderError) -> Self {
		match err {
			OrderError::OrderMismatch { claimed, computed } => {
				Self::OrderMismatch { claimed, computed }
			},
			other => Self::Order(other),
		}
	}
}
