//! Test fixtures.
//!
//! `GatewayFactory` hands out fresh gateways with distinct addresses, so
//! every test owns its own state. A `GatewayPair` wires an origin and a
//! destination gateway to the same rollup and must be torn down explicitly
//! once the test is done with it.

use crate::gateway::{Gateway, SettlementProof};
use crate::GatewayError;
use gateway_config::{Config, ConfigError};
use gateway_settlement::compute_membership_witness_for_block;
use gateway_types::{Bytes, OrderData, OrderType, B256, NO_DEADLINE, PRIVATE_SENDER, U256};

pub const ORIGIN_DOMAIN: u32 = 999_999;
pub const DESTINATION_DOMAIN: u32 = 11_155_420;
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Creates isolated gateways.
#[derive(Debug, Default)]
pub struct GatewayFactory {
	created: u32,
}

impl GatewayFactory {
	pub fn new() -> Self {
		Self::default()
	}

	/// A fresh gateway for `domain` with an address no other gateway from
	/// this factory uses.
	pub fn gateway(&mut self, domain: u32) -> Result<Gateway, GatewayError> {
		self.created = self.created.checked_add(1).ok_or_else(|| {
			GatewayError::Config(ConfigError::Validation(
				"Gateway factory ran out of addresses".into(),
			))
		})?;
		let mut address = [0u8; 32];
		address[0] = 0x0a;
		address[24..28].copy_from_slice(&self.created.to_be_bytes());
		address[28..].copy_from_slice(&domain.to_be_bytes());
		Gateway::new(Config::for_testing(domain, B256::from(address)), GENESIS_TIME)
	}

	/// An origin and a destination gateway sharing one rollup.
	pub fn pair(&mut self) -> Result<GatewayPair, GatewayError> {
		Ok(GatewayPair {
			origin: self.gateway(ORIGIN_DOMAIN)?,
			destination: self.gateway(DESTINATION_DOMAIN)?,
		})
	}
}

/// Blocks mined by a pair over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
	pub origin_blocks: u64,
	pub destination_blocks: u64,
}

pub struct GatewayPair {
	pub origin: Gateway,
	pub destination: Gateway,
}

impl GatewayPair {
	/// An order routed from the origin to the destination gateway.
	///
	/// Private orders get `PRIVATE_SENDER` as sender; `recipient` is then
	/// expected to be a commitment.
	pub fn order(
		&self,
		sender: B256,
		recipient: B256,
		order_type: OrderType,
		sender_nonce: u64,
	) -> OrderData {
		OrderData {
			sender: if order_type.is_private() {
				PRIVATE_SENDER
			} else {
				sender
			},
			recipient,
			input_token: B256::repeat_byte(0x1a),
			output_token: B256::repeat_byte(0x2b),
			amount_in: U256::from(100u64),
			amount_out: U256::from(100u64),
			sender_nonce: U256::from(sender_nonce),
			origin_domain: self.origin.domain(),
			destination_domain: self.destination.domain(),
			destination_settler: self.destination.address(),
			fill_deadline: NO_DEADLINE,
			order_type,
			data: Bytes::from(vec![0u8; 32]),
		}
	}

	/// Publishes the destination outbox root of `block_number` to the
	/// origin gateway.
	pub fn relay_outbox(&mut self, block_number: u64) -> Result<B256, GatewayError> {
		let root = self.destination.out_hash(block_number).ok_or_else(|| {
			GatewayError::InvalidProof(format!("block {} sent no message", block_number))
		})?;
		self.origin.register_outbox_root(block_number, root);
		Ok(root)
	}

	/// Builds the proof that the destination sent the settlement message of
	/// a fill.
	pub async fn settlement_proof(
		&self,
		order_id: B256,
		filler_data: B256,
	) -> Result<SettlementProof, GatewayError> {
		let block_number = self
			.destination
			.get_order_settlement_block_number(&order_id)
			.ok_or(GatewayError::UnknownOrder(order_id))?;
		let leaf = self
			.destination
			.settlement_message(self.destination.address(), order_id, filler_data);
		let witness =
			compute_membership_witness_for_block(&self.destination, block_number, leaf).await?;
		Ok(SettlementProof {
			block_number,
			witness,
		})
	}

	/// Moves both gateways' clocks forward.
	pub fn advance_time(&mut self, seconds: u64) {
		self.origin.advance_time(seconds);
		self.destination.advance_time(seconds);
	}

	/// Releases the pair.
	pub fn teardown(self) -> FixtureSummary {
		let summary = FixtureSummary {
			origin_blocks: self.origin.block_number(),
			destination_blocks: self.destination.block_number(),
		};
		tracing::debug!(?summary, "Gateway pair torn down");
		summary
	}
}
