//! Per-order lifecycle state.
//!
//! Origin side: `Opened -> Settled | Refunded`.
//! Destination side: `Filled -> Claimed`, where claiming only applies to
//! private orders.

use crate::GatewayError;
use gateway_types::{OrderData, B256};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Status of an order as seen by one gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
	/// Opened here; input escrowed.
	Opened,
	/// Input released to the filler.
	Settled,
	/// Input returned after the deadline.
	Refunded,
	/// Filled here; settlement message sent.
	Filled,
	/// Held output released to the revealer.
	Claimed,
}

static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Opened,
		HashSet::from([OrderStatus::Settled, OrderStatus::Refunded]),
	);
	m.insert(OrderStatus::Filled, HashSet::from([OrderStatus::Claimed]));
	m.insert(OrderStatus::Settled, HashSet::new()); // terminal
	m.insert(OrderStatus::Refunded, HashSet::new()); // terminal
	m.insert(OrderStatus::Claimed, HashSet::new()); // terminal
	m
});

impl OrderStatus {
	/// Checks if a transition to `to` is allowed.
	pub fn can_transition_to(self, to: OrderStatus) -> bool {
		TRANSITIONS.get(&self).is_some_and(|set| set.contains(&to))
	}

	/// Error reported when an operation finds the order already in this
	/// terminal status.
	fn already(self, order_id: B256) -> GatewayError {
		match self {
			Self::Settled => GatewayError::AlreadySettled(order_id),
			Self::Refunded => GatewayError::AlreadyRefunded(order_id),
			Self::Claimed => GatewayError::AlreadyClaimed(order_id),
			Self::Filled => GatewayError::AlreadyFilled(order_id),
			Self::Opened => GatewayError::AlreadyOpened(order_id),
		}
	}
}

/// An order tracked by a gateway, with its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedOrder {
	pub order_id: B256,
	pub order: OrderData,
	pub status: OrderStatus,
	/// Payout identity supplied by the filler; set on fill.
	pub filler_data: Option<B256>,
	/// Block the settlement message was sent in; set on fill.
	pub settlement_block: Option<u64>,
}

impl TrackedOrder {
	pub fn opened(order_id: B256, order: OrderData) -> Self {
		Self {
			order_id,
			order,
			status: OrderStatus::Opened,
			filler_data: None,
			settlement_block: None,
		}
	}

	pub fn filled(order_id: B256, order: OrderData, filler_data: B256, block: u64) -> Self {
		Self {
			order_id,
			order,
			status: OrderStatus::Filled,
			filler_data: Some(filler_data),
			settlement_block: Some(block),
		}
	}

	/// Fails unless the order may move to `to`.
	pub fn ensure_transition(&self, to: OrderStatus) -> Result<(), GatewayError> {
		if self.status.can_transition_to(to) {
			return Ok(());
		}
		if self.status == to || TRANSITIONS.get(&self.status).is_some_and(HashSet::is_empty) {
			return Err(self.status.already(self.order_id));
		}
		Err(GatewayError::InvalidTransition {
			from: self.status,
			to,
		})
	}

	/// Moves the order to `to`.
	pub fn transition(&mut self, to: OrderStatus) -> Result<(), GatewayError> {
		self.ensure_transition(to)?;
		tracing::info!(
			order_id = %self.order_id,
			from = ?self.status,
			to = ?to,
			"Order status transition"
		);
		self.status = to;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_types::{Bytes, OrderType, NO_DEADLINE, U256};

	fn tracked() -> TrackedOrder {
		let order = OrderData {
			sender: B256::repeat_byte(1),
			recipient: B256::repeat_byte(2),
			input_token: B256::repeat_byte(3),
			output_token: B256::repeat_byte(4),
			amount_in: U256::from(100u64),
			amount_out: U256::from(100u64),
			sender_nonce: U256::ZERO,
			origin_domain: 999_999,
			destination_domain: 11_155_420,
			destination_settler: B256::repeat_byte(5),
			fill_deadline: NO_DEADLINE,
			order_type: OrderType::Public,
			data: Bytes::new(),
		};
		TrackedOrder::opened(B256::with_last_byte(1), order)
	}

	#[test]
	fn test_transition_table() {
		assert!(OrderStatus::Opened.can_transition_to(OrderStatus::Settled));
		assert!(OrderStatus::Opened.can_transition_to(OrderStatus::Refunded));
		assert!(OrderStatus::Filled.can_transition_to(OrderStatus::Claimed));
		assert!(!OrderStatus::Opened.can_transition_to(OrderStatus::Claimed));
		assert!(!OrderStatus::Settled.can_transition_to(OrderStatus::Refunded));
		assert!(!OrderStatus::Refunded.can_transition_to(OrderStatus::Settled));
		assert!(!OrderStatus::Claimed.can_transition_to(OrderStatus::Claimed));
	}

	#[test]
	fn test_terminal_states_report_already() {
		let mut order = tracked();
		order.transition(OrderStatus::Settled).unwrap();

		assert!(matches!(
			order.transition(OrderStatus::Settled),
			Err(GatewayError::AlreadySettled(_))
		));
		assert!(matches!(
			order.transition(OrderStatus::Refunded),
			Err(GatewayError::AlreadySettled(_))
		));
	}

	#[test]
	fn test_cross_side_transition_is_invalid() {
		let order = tracked();
		assert!(matches!(
			order.ensure_transition(OrderStatus::Claimed),
			Err(GatewayError::InvalidTransition { .. })
		));
	}
}
