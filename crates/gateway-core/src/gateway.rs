//! Reference gateway.
//!
//! One `Gateway` serves one domain. As an origin gateway it opens orders,
//! settles them once the destination proves a fill, and refunds them after
//! the deadline. As a destination gateway it accepts fills, sends the
//! settlement message towards the origin, and releases held output of
//! private fills to whoever reveals the recipient's secret.

use crate::chain::{Chain, PendingTx, Receipt};
use crate::state::{OrderStatus, TrackedOrder};
use crate::GatewayError;
use async_trait::async_trait;
use gateway_config::Config;
use gateway_discovery::{
	encode_filled_log, encode_open_log, encode_resolved_log, encode_settled_log, LogError,
	LogFilter, LogSource, PublicLog,
};
use gateway_order::{encode_order, verify_order_id, Eip7683Codec, OrderCodec};
use gateway_settlement::{
	compute_out_hash, settlement_message_hash, verify_membership, MessageSource, SettlementError,
};
use gateway_types::{
	Bytes, Commitment, MembershipWitness, OrderData, OrderType, Reveal, B256, ORDER_DATA_TYPE,
	PRIVATE_SENDER,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arguments of an open call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenParams {
	pub fill_deadline: u32,
	pub order_data: Bytes,
	pub order_data_type: B256,
}

impl OpenParams {
	/// Open arguments for `order` in the current order format.
	pub fn for_order(order: &OrderData) -> Self {
		Self {
			fill_deadline: order.fill_deadline,
			order_data: encode_order(order),
			order_data_type: ORDER_DATA_TYPE,
		}
	}
}

/// Proof that a fill's settlement message left the destination domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementProof {
	/// Destination block the message was sent in.
	pub block_number: u64,
	pub witness: MembershipWitness,
}

pub struct Gateway {
	config: Config,
	codec: Eip7683Codec,
	chain: Chain,
	now: u64,
	/// Orders opened here, by id.
	opened: HashMap<B256, TrackedOrder>,
	/// Orders filled here, by id.
	filled: HashMap<B256, TrackedOrder>,
	/// Destination outbox roots, by destination block.
	outbox_roots: HashMap<u64, B256>,
}

impl Gateway {
	/// Creates a gateway at time `now` (seconds).
	pub fn new(config: Config, now: u64) -> Result<Self, GatewayError> {
		config.validate()?;
		tracing::info!(
			domain = config.gateway.domain,
			address = %config.gateway.address,
			"Gateway started"
		);
		Ok(Self {
			chain: Chain::new(config.gateway.address),
			config,
			codec: Eip7683Codec,
			now,
			opened: HashMap::new(),
			filled: HashMap::new(),
			outbox_roots: HashMap::new(),
		})
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn address(&self) -> B256 {
		self.config.gateway.address
	}

	pub fn domain(&self) -> u32 {
		self.config.gateway.domain
	}

	pub fn now(&self) -> u64 {
		self.now
	}

	pub fn advance_time(&mut self, seconds: u64) {
		self.now = self.now.saturating_add(seconds);
	}

	/// Latest mined block, 0 before the first call.
	pub fn block_number(&self) -> u64 {
		self.chain.head()
	}

	/// An order opened on this gateway.
	pub fn opened_order(&self, order_id: &B256) -> Option<&TrackedOrder> {
		self.opened.get(order_id)
	}

	/// An order filled on this gateway.
	pub fn filled_order(&self, order_id: &B256) -> Option<&TrackedOrder> {
		self.filled.get(order_id)
	}

	/// Block in which the settlement message for a fill was sent.
	pub fn get_order_settlement_block_number(&self, order_id: &B256) -> Option<u64> {
		self.filled.get(order_id).and_then(|o| o.settlement_block)
	}

	/// Records the destination outbox root published for `block_number`.
	pub fn register_outbox_root(&mut self, block_number: u64, root: B256) {
		tracing::debug!(block = block_number, %root, "Registered outbox root");
		self.outbox_roots.insert(block_number, root);
	}

	/// Root of this gateway's outbox for `block_number`, if it sent any message.
	pub fn out_hash(&self, block_number: u64) -> Option<B256> {
		let block = self.chain.block(block_number)?;
		let batches: Vec<Vec<B256>> = block.txs.iter().map(|tx| tx.messages.clone()).collect();
		compute_out_hash(&batches)
	}

	/// Hash of the settlement message `sender` emits for a fill.
	pub fn settlement_message(&self, sender: B256, order_id: B256, filler_data: B256) -> B256 {
		settlement_message_hash(
			&self.config.message_context(),
			self.config.protocol.settle_order_type,
			sender,
			self.config.rollup.portal,
			order_id,
			filler_data,
		)
	}

	/// Opens a public order; `caller` must be the order's sender.
	pub fn open(&mut self, caller: B256, params: OpenParams) -> Result<Receipt, GatewayError> {
		self.open_order(caller, params, OrderType::Public)
			.inspect_err(|e| tracing::warn!(operation = "open", error = %e, "Call rejected"))
	}

	/// Opens a private order; the order must not name a sender.
	pub fn open_private(
		&mut self,
		caller: B256,
		params: OpenParams,
	) -> Result<Receipt, GatewayError> {
		self.open_order(caller, params, OrderType::Private)
			.inspect_err(|e| tracing::warn!(operation = "open_private", error = %e, "Call rejected"))
	}

	/// Fills a public order; output goes straight to the recipient.
	pub fn fill(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
	) -> Result<Receipt, GatewayError> {
		self.fill_order(caller, order_id, origin_data, filler_data, OrderType::Public)
			.inspect_err(|e| tracing::warn!(operation = "fill", %order_id, error = %e, "Call rejected"))
	}

	/// Fills a private order; output is held until claimed.
	pub fn fill_private(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
	) -> Result<Receipt, GatewayError> {
		self.fill_order(caller, order_id, origin_data, filler_data, OrderType::Private)
			.inspect_err(|e| {
				tracing::warn!(operation = "fill_private", %order_id, error = %e, "Call rejected")
			})
	}

	/// Settles a public order, paying `filler_data`.
	pub fn settle(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
		proof: &SettlementProof,
	) -> Result<Receipt, GatewayError> {
		self.settle_order(caller, order_id, origin_data, filler_data, proof, OrderType::Public)
			.inspect_err(|e| tracing::warn!(operation = "settle", %order_id, error = %e, "Call rejected"))
	}

	/// Settles a private order, paying `filler_data`.
	pub fn settle_private(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
		proof: &SettlementProof,
	) -> Result<Receipt, GatewayError> {
		self.settle_order(caller, order_id, origin_data, filler_data, proof, OrderType::Private)
			.inspect_err(|e| {
				tracing::warn!(operation = "settle_private", %order_id, error = %e, "Call rejected")
			})
	}

	/// Releases the output held for a private fill to `caller`.
	pub fn claim_private(
		&mut self,
		caller: B256,
		reveal: &Reveal,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
	) -> Result<Receipt, GatewayError> {
		self.claim_order(caller, reveal, order_id, origin_data, filler_data)
			.inspect_err(|e| {
				tracing::warn!(operation = "claim_private", %order_id, error = %e, "Call rejected")
			})
	}

	/// Returns the input of an expired public order to its sender.
	pub fn claim_refund(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
	) -> Result<Receipt, GatewayError> {
		self.refund_order(caller, None, order_id, origin_data, OrderType::Public)
			.inspect_err(|e| {
				tracing::warn!(operation = "claim_refund", %order_id, error = %e, "Call rejected")
			})
	}

	/// Returns the input of an expired private order to `caller`, who must
	/// reveal the recipient's secret.
	pub fn claim_refund_private(
		&mut self,
		caller: B256,
		reveal: &Reveal,
		order_id: B256,
		origin_data: &[u8],
	) -> Result<Receipt, GatewayError> {
		self.refund_order(caller, Some(reveal), order_id, origin_data, OrderType::Private)
			.inspect_err(|e| {
				tracing::warn!(
					operation = "claim_refund_private",
					%order_id,
					error = %e,
					"Call rejected"
				)
			})
	}

	fn open_order(
		&mut self,
		caller: B256,
		params: OpenParams,
		variant: OrderType,
	) -> Result<Receipt, GatewayError> {
		if params.order_data_type != self.config.protocol.order_data_type {
			return Err(GatewayError::InvalidOrderDataType(params.order_data_type));
		}
		let order = self.codec.decode(&params.order_data)?;
		expect_type(&order, variant)?;
		if params.fill_deadline != order.fill_deadline {
			return Err(GatewayError::FillDeadlineMismatch {
				supplied: params.fill_deadline,
				encoded: order.fill_deadline,
			});
		}
		self.ensure_not_expired(&order)?;
		if order.origin_domain != self.domain() {
			return Err(GatewayError::WrongDomain {
				expected: self.domain(),
				actual: order.origin_domain,
			});
		}
		match variant {
			OrderType::Public if order.sender != caller => {
				return Err(GatewayError::Unauthorized(format!(
					"order sender {} is not the caller {}",
					order.sender, caller
				)));
			},
			OrderType::Private if order.sender != PRIVATE_SENDER => {
				return Err(GatewayError::Unauthorized(
					"private orders must not name a sender".into(),
				));
			},
			_ => {},
		}

		let resolved = self.codec.resolve(&order);
		let order_id = resolved.order_id;
		if self.opened.contains_key(&order_id) {
			return Err(GatewayError::AlreadyOpened(order_id));
		}

		let mut tx = PendingTx::default();
		tx.logs.push(encode_open_log(order_id, order.fill_deadline));
		tx.logs.push(encode_resolved_log(&resolved)?);
		tx.transfer(order.input_token, caller, self.address(), order.amount_in);

		self.opened
			.insert(order_id, TrackedOrder::opened(order_id, order));
		let receipt = self.chain.mine(tx);
		tracing::info!(
			%order_id,
			order_type = %variant,
			block = receipt.block_number,
			"Order opened"
		);
		Ok(receipt)
	}

	fn fill_order(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
		variant: OrderType,
	) -> Result<Receipt, GatewayError> {
		let order = self.decode_checked(order_id, origin_data)?;
		expect_type(&order, variant)?;
		if order.destination_domain != self.domain() {
			return Err(GatewayError::WrongDomain {
				expected: self.domain(),
				actual: order.destination_domain,
			});
		}
		self.ensure_not_expired(&order)?;
		if self.filled.contains_key(&order_id) {
			return Err(GatewayError::AlreadyFilled(order_id));
		}

		let holder = if order.is_private() {
			self.address()
		} else {
			order.recipient
		};
		let mut tx = PendingTx::default();
		tx.transfer(order.output_token, caller, holder, order.amount_out);
		tx.logs
			.push(encode_filled_log(order_id, origin_data, filler_data));
		tx.messages
			.push(self.settlement_message(self.address(), order_id, filler_data));

		let block = self.chain.head() + 1;
		self.filled.insert(
			order_id,
			TrackedOrder::filled(order_id, order, filler_data, block),
		);
		let receipt = self.chain.mine(tx);
		tracing::info!(%order_id, order_type = %variant, block, "Order filled");
		Ok(receipt)
	}

	fn settle_order(
		&mut self,
		caller: B256,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
		proof: &SettlementProof,
		variant: OrderType,
	) -> Result<Receipt, GatewayError> {
		verify_order_id(order_id, origin_data)?;
		let tracked = self
			.opened
			.get(&order_id)
			.ok_or(GatewayError::UnknownOrder(order_id))?;
		expect_type(&tracked.order, variant)?;
		tracked.ensure_transition(OrderStatus::Settled)?;
		self.ensure_not_expired(&tracked.order)?;

		let root = self
			.outbox_roots
			.get(&proof.block_number)
			.copied()
			.ok_or_else(|| {
				GatewayError::InvalidProof(format!(
					"no outbox root registered for block {}",
					proof.block_number
				))
			})?;
		let leaf = self.settlement_message(tracked.order.destination_settler, order_id, filler_data);
		if !verify_membership(leaf, &proof.witness, root) {
			return Err(GatewayError::InvalidProof(format!(
				"settlement message {} is not in the outbox of block {}",
				leaf, proof.block_number
			)));
		}

		let mut tx = PendingTx::default();
		tx.transfer(
			tracked.order.input_token,
			self.address(),
			filler_data,
			tracked.order.amount_in,
		);
		tx.logs.push(encode_settled_log(order_id, filler_data));

		self.tracked_mut(order_id)?.transition(OrderStatus::Settled)?;
		let receipt = self.chain.mine(tx);
		tracing::info!(%order_id, %caller, receiver = %filler_data, "Order settled");
		Ok(receipt)
	}

	fn claim_order(
		&mut self,
		caller: B256,
		reveal: &Reveal,
		order_id: B256,
		origin_data: &[u8],
		filler_data: B256,
	) -> Result<Receipt, GatewayError> {
		verify_order_id(order_id, origin_data)?;
		let tracked = self
			.filled
			.get(&order_id)
			.ok_or(GatewayError::UnknownOrder(order_id))?;
		expect_type(&tracked.order, OrderType::Private)?;
		if tracked.filler_data != Some(filler_data) {
			return Err(GatewayError::FillerDataMismatch(filler_data));
		}
		tracked.ensure_transition(OrderStatus::Claimed)?;
		if !Commitment::from(tracked.order.recipient).is_opened_by(reveal) {
			return Err(GatewayError::InvalidReveal);
		}

		let mut tx = PendingTx::default();
		tx.transfer(
			tracked.order.output_token,
			self.address(),
			caller,
			tracked.order.amount_out,
		);

		if let Some(tracked) = self.filled.get_mut(&order_id) {
			tracked.transition(OrderStatus::Claimed)?;
		}
		let receipt = self.chain.mine(tx);
		tracing::info!(%order_id, "Private fill claimed");
		Ok(receipt)
	}

	fn refund_order(
		&mut self,
		caller: B256,
		reveal: Option<&Reveal>,
		order_id: B256,
		origin_data: &[u8],
		variant: OrderType,
	) -> Result<Receipt, GatewayError> {
		verify_order_id(order_id, origin_data)?;
		let tracked = self
			.opened
			.get(&order_id)
			.ok_or(GatewayError::UnknownOrder(order_id))?;
		expect_type(&tracked.order, variant)?;
		tracked.ensure_transition(OrderStatus::Refunded)?;
		if !tracked.order.is_expired_at(self.now) {
			return Err(GatewayError::DeadlineNotReached {
				deadline: tracked.order.fill_deadline,
				now: self.now,
			});
		}

		let receiver = match reveal {
			None => tracked.order.sender,
			Some(reveal) => {
				if !Commitment::from(tracked.order.recipient).is_opened_by(reveal) {
					return Err(GatewayError::InvalidReveal);
				}
				caller
			},
		};

		let mut tx = PendingTx::default();
		tx.transfer(
			tracked.order.input_token,
			self.address(),
			receiver,
			tracked.order.amount_in,
		);

		self.tracked_mut(order_id)?.transition(OrderStatus::Refunded)?;
		let receipt = self.chain.mine(tx);
		tracing::info!(%order_id, %receiver, "Order refunded");
		Ok(receipt)
	}

	/// Decodes `origin_data` after checking it hashes to `order_id`.
	fn decode_checked(&self, order_id: B256, origin_data: &[u8]) -> Result<OrderData, GatewayError> {
		verify_order_id(order_id, origin_data)?;
		Ok(self.codec.decode(origin_data)?)
	}

	fn ensure_not_expired(&self, order: &OrderData) -> Result<(), GatewayError> {
		if order.is_expired_at(self.now) {
			return Err(GatewayError::DeadlineExceeded {
				deadline: order.fill_deadline,
				now: self.now,
			});
		}
		Ok(())
	}

	fn tracked_mut(&mut self, order_id: B256) -> Result<&mut TrackedOrder, GatewayError> {
		self.opened
			.get_mut(&order_id)
			.ok_or(GatewayError::UnknownOrder(order_id))
	}
}

fn expect_type(order: &OrderData, expected: OrderType) -> Result<(), GatewayError> {
	if order.order_type != expected {
		return Err(GatewayError::WrongOrderType {
			expected,
			actual: order.order_type,
		});
	}
	Ok(())
}

#[async_trait]
impl LogSource for Gateway {
	async fn get_public_logs(&self, filter: &LogFilter) -> Result<Vec<PublicLog>, LogError> {
		let contract = self.address();
		let logs = self
			.chain
			.blocks()
			.iter()
			.flat_map(move |block| {
				block.txs.iter().flat_map(move |tx| {
					tx.logs.iter().map(move |fields| PublicLog {
						block_number: block.number,
						tx_hash: tx.hash,
						contract,
						fields: fields.clone(),
					})
				})
			})
			.filter(|log| filter.matches(log))
			.collect();
		Ok(logs)
	}
}

#[async_trait]
impl MessageSource for Gateway {
	async fn get_block_messages(&self, block_number: u64) -> Result<Vec<Vec<B256>>, SettlementError> {
		let block = self
			.chain
			.block(block_number)
			.ok_or_else(|| SettlementError::Source(format!("Block {} not mined", block_number)))?;
		Ok(block.txs.iter().map(|tx| tx.messages.clone()).collect())
	}
}
