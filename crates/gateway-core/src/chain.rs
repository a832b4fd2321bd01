//! Block production for the reference gateway.
//!
//! Every successful gateway call is one transaction mined into its own
//! block. The block keeps the logs and outgoing messages the transaction
//! produced so they can be served back through `LogSource` and
//! `MessageSource`.

use gateway_types::{
	utils::{hashing::sha256_to_field_concat, truncate_id},
	B256, U256,
};
use serde::{Deserialize, Serialize};

/// An asset movement performed by a gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
	pub token: B256,
	pub from: B256,
	pub to: B256,
	pub amount: U256,
}

/// Outcome of a successful gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
	pub tx_hash: B256,
	pub block_number: u64,
	pub transfers: Vec<Transfer>,
}

/// Effects of one transaction, collected before it is mined.
#[derive(Debug, Default)]
pub(crate) struct PendingTx {
	pub logs: Vec<Vec<B256>>,
	pub messages: Vec<B256>,
	pub transfers: Vec<Transfer>,
}

impl PendingTx {
	pub fn transfer(&mut self, token: B256, from: B256, to: B256, amount: U256) {
		self.transfers.push(Transfer {
			token,
			from,
			to,
			amount,
		});
	}
}

#[derive(Debug, Clone)]
pub(crate) struct MinedTx {
	pub hash: B256,
	pub logs: Vec<Vec<B256>>,
	pub messages: Vec<B256>,
}

#[derive(Debug, Clone)]
pub(crate) struct Block {
	pub number: u64,
	pub txs: Vec<MinedTx>,
}

/// Append-only chain of single-transaction blocks.
#[derive(Debug)]
pub(crate) struct Chain {
	producer: B256,
	blocks: Vec<Block>,
}

impl Chain {
	pub fn new(producer: B256) -> Self {
		Self {
			producer,
			blocks: Vec::new(),
		}
	}

	/// Number of the most recent block, 0 before anything is mined.
	pub fn head(&self) -> u64 {
		self.blocks.last().map_or(0, |b| b.number)
	}

	pub fn block(&self, number: u64) -> Option<&Block> {
		number
			.checked_sub(1)
			.and_then(|index| self.blocks.get(index as usize))
	}

	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// Mines `tx` into a new block.
	pub fn mine(&mut self, tx: PendingTx) -> Receipt {
		let number = self.head() + 1;
		let hash = sha256_to_field_concat(&[
			self.producer.as_slice(),
			number.to_be_bytes().as_slice(),
		]);

		self.blocks.push(Block {
			number,
			txs: vec![MinedTx {
				hash,
				logs: tx.logs,
				messages: tx.messages,
			}],
		});
		tracing::debug!(
			block = number,
			tx_hash = %truncate_id(&hash.to_string()),
			"Mined block"
		);

		Receipt {
			tx_hash: hash,
			block_number: number,
			transfers: tx.transfers,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_blocks_are_numbered_from_one() {
		let mut chain = Chain::new(B256::repeat_byte(1));
		assert_eq!(chain.head(), 0);
		assert!(chain.block(0).is_none());

		let first = chain.mine(PendingTx::default());
		let second = chain.mine(PendingTx::default());

		assert_eq!(first.block_number, 1);
		assert_eq!(second.block_number, 2);
		assert_ne!(first.tx_hash, second.tx_hash);
		assert_eq!(chain.block(2).map(|b| b.number), Some(2));
		assert!(chain.block(3).is_none());
	}
}
