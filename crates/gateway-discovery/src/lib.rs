//! Event log resolution for the gateway.
//!
//! Gateways announce every lifecycle step as a public log: a flat array of
//! 32-byte fields. This crate turns those arrays back into typed records,
//! encodes the same layout for gateways that emit them, and defines the
//! `LogSource` seam through which logs are fetched from a node.

use async_trait::async_trait;
use gateway_types::{ResolvedCrossChainOrder, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod standards {
		pub mod _7683;
	}
}
pub mod schema;

pub use implementations::standards::_7683::{
	encode_filled_log, encode_open_log, encode_resolved_log, encode_settled_log,
	parse_filled_log, parse_open_log, parse_resolved_cross_chain_order, parse_settled_log,
};
pub use schema::{LogTag, LEGS_PER_ORDER_V1, LOG_SCHEMA_VERSION};

/// Errors that can occur while fetching or resolving gateway logs.
#[derive(Debug, Error)]
pub enum LogError {
	/// The log does not match the expected record shape.
	#[error("Malformed log: {0}")]
	MalformedLog(String),
	/// The log source failed to return logs.
	#[error("Log source error: {0}")]
	Source(String),
}

/// Block range and emitter to fetch logs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
	/// First block to include.
	pub from_block: u64,
	/// Last block to include.
	pub to_block: u64,
	/// Only logs emitted by this contract; all contracts when `None`.
	pub contract: Option<B256>,
}

impl LogFilter {
	pub fn new(from_block: u64, to_block: u64) -> Self {
		Self {
			from_block,
			to_block,
			contract: None,
		}
	}

	pub fn with_contract(mut self, contract: B256) -> Self {
		self.contract = Some(contract);
		self
	}

	/// Returns true if `log` falls inside this filter.
	pub fn matches(&self, log: &PublicLog) -> bool {
		log.block_number >= self.from_block
			&& log.block_number <= self.to_block
			&& self.contract.is_none_or(|c| c == log.contract)
	}
}

/// A public log as returned by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicLog {
	pub block_number: u64,
	pub tx_hash: B256,
	/// Contract that emitted the log.
	pub contract: B256,
	pub fields: Vec<B256>,
}

impl PublicLog {
	/// The record tag, if the first field holds a known one.
	pub fn tag(&self) -> Option<LogTag> {
		self.fields.first().and_then(LogTag::from_field)
	}
}

/// Trait implemented by anything able to return public logs.
///
/// Implementations only fetch; they never retry, time out or interpret the
/// fields. Logs must come back in emission order.
#[async_trait]
pub trait LogSource: Send + Sync {
	/// Returns the logs matching `filter`, oldest first.
	async fn get_public_logs(&self, filter: &LogFilter) -> Result<Vec<PublicLog>, LogError>;
}

/// Looks up the resolved view of an opened order.
///
/// Scans the logs matching `filter` for an open record carrying `order_id`
/// and resolves it together with the resolved record emitted right after it
/// in the same transaction. Returns `None` if the order was not opened in
/// that range.
pub async fn find_open_order(
	source: &dyn LogSource,
	filter: &LogFilter,
	order_id: B256,
) -> Result<Option<ResolvedCrossChainOrder>, LogError> {
	let logs = source.get_public_logs(filter).await?;
	tracing::debug!(
		from_block = filter.from_block,
		to_block = filter.to_block,
		count = logs.len(),
		"Fetched gateway logs"
	);

	for (index, log) in logs.iter().enumerate() {
		if log.tag() != Some(LogTag::Open) || log.fields.get(1) != Some(&order_id) {
			continue;
		}

		let resolved = logs
			.get(index + 1)
			.filter(|next| next.tx_hash == log.tx_hash && next.tag() == Some(LogTag::Resolved))
			.ok_or_else(|| {
				LogError::MalformedLog(format!(
					"Open log for order {} has no resolved log in the same transaction",
					order_id
				))
			})?;

		return parse_open_log(&log.fields, &resolved.fields).map(Some);
	}

	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_order::{order_id, resolve_order};
	use gateway_types::{Bytes, OrderData, OrderType, NO_DEADLINE, U256};

	struct VecSource(Vec<PublicLog>);

	#[async_trait]
	impl LogSource for VecSource {
		async fn get_public_logs(&self, filter: &LogFilter) -> Result<Vec<PublicLog>, LogError> {
			Ok(self.0.iter().filter(|l| filter.matches(l)).cloned().collect())
		}
	}

	fn order(nonce: u64) -> OrderData {
		OrderData {
			sender: B256::repeat_byte(0xaa),
			recipient: B256::repeat_byte(0xbb),
			input_token: B256::repeat_byte(0x01),
			output_token: B256::repeat_byte(0x02),
			amount_in: U256::from(100u64),
			amount_out: U256::from(100u64),
			sender_nonce: U256::from(nonce),
			origin_domain: 999_999,
			destination_domain: 11_155_420,
			destination_settler: B256::repeat_byte(0x03),
			fill_deadline: NO_DEADLINE,
			order_type: OrderType::Public,
			data: Bytes::from(vec![0u8; 32]),
		}
	}

	fn open_pair(block: u64, order: &OrderData) -> Vec<PublicLog> {
		let resolved = resolve_order(order);
		let tx_hash = B256::with_last_byte(block as u8);
		vec![
			PublicLog {
				block_number: block,
				tx_hash,
				contract: B256::repeat_byte(0xcc),
				fields: encode_open_log(resolved.order_id, resolved.fill_deadline),
			},
			PublicLog {
				block_number: block,
				tx_hash,
				contract: B256::repeat_byte(0xcc),
				fields: encode_resolved_log(&resolved).unwrap(),
			},
		]
	}

	#[tokio::test]
	async fn test_find_open_order() {
		let first = order(1);
		let second = order(2);
		let mut logs = open_pair(1, &first);
		logs.extend(open_pair(2, &second));
		let source = VecSource(logs);

		let found = find_open_order(&source, &LogFilter::new(0, 10), order_id(&second))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(found, resolve_order(&second));
		assert_eq!(found.min_received[0].amount, U256::from(100u64));
	}

	#[tokio::test]
	async fn test_find_open_order_respects_filter() {
		let source = VecSource(open_pair(5, &order(1)));
		let id = order_id(&order(1));

		let missed = find_open_order(&source, &LogFilter::new(0, 4), id).await.unwrap();
		assert!(missed.is_none());

		let other_contract = LogFilter::new(0, 10).with_contract(B256::repeat_byte(0xdd));
		assert!(find_open_order(&source, &other_contract, id)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_find_open_order_requires_resolved_pair() {
		let mut logs = open_pair(1, &order(1));
		logs.pop();
		let source = VecSource(logs);

		let err = find_open_order(&source, &LogFilter::new(0, 10), order_id(&order(1)))
			.await
			.unwrap_err();
		assert!(matches!(err, LogError::MalformedLog(_)));
	}
}
