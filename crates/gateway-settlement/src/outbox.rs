//! Outbox membership for a destination domain block.
//!
//! Each transaction's messages form a subtree; the block's out hash is the
//! tree over the roots of the transactions that emitted at least one
//! message. A witness for a message is its path inside its transaction's
//! subtree followed by that subtree's path inside the block tree.

use crate::{tree, MessageSource, SettlementError};
use gateway_types::{MembershipWitness, B256};

/// Builds the witness for `target` within a block's messages.
///
/// `batches` holds one message set per transaction, in block order. If the
/// same message appears more than once, the first occurrence is proven.
///
/// # Errors
///
/// Returns `SettlementError::MembershipNotFound` if no transaction carries
/// `target`.
pub fn compute_membership_witness(
	batches: &[Vec<B256>],
	target: B256,
) -> Result<MembershipWitness, SettlementError> {
	let non_empty: Vec<&Vec<B256>> = batches.iter().filter(|b| !b.is_empty()).collect();

	let (tx_position, leaf_position) = non_empty
		.iter()
		.enumerate()
		.find_map(|(tx, messages)| messages.iter().position(|m| *m == target).map(|leaf| (tx, leaf)))
		.ok_or(SettlementError::MembershipNotFound(target))?;

	let inner = tree::witness(non_empty[tx_position], leaf_position)?;
	let tx_roots = non_empty
		.iter()
		.map(|messages| tree::root(messages))
		.collect::<Result<Vec<_>, _>>()?;
	let outer = tree::witness(&tx_roots, tx_position)?;

	let witness = inner.lift(outer);
	tracing::debug!(
		message = %target,
		tx = tx_position,
		leaf_index = witness.leaf_index,
		path_size = witness.sibling_path.path_size(),
		"Computed membership witness"
	);
	Ok(witness)
}

/// Root of a block's outbox, or `None` if no transaction sent a message.
pub fn compute_out_hash(batches: &[Vec<B256>]) -> Option<B256> {
	let tx_roots: Vec<B256> = batches
		.iter()
		.filter_map(|messages| tree::root(messages).ok())
		.collect();
	tree::root(&tx_roots).ok()
}

/// Returns true if `witness` proves `leaf` is included under `root`.
pub fn verify_membership(leaf: B256, witness: &MembershipWitness, root: B256) -> bool {
	let verified = tree::root_from_witness(leaf, witness) == Some(root);
	tracing::trace!(%leaf, %root, verified, "Checked membership witness");
	verified
}

/// Block-scoped variant of `compute_membership_witness`.
///
/// Fetches the per-transaction message sets of `block_number` from `source`
/// and proves `target` against them.
pub async fn compute_membership_witness_for_block(
	source: &dyn MessageSource,
	block_number: u64,
	target: B256,
) -> Result<MembershipWitness, SettlementError> {
	let batches = source.get_block_messages(block_number).await?;
	compute_membership_witness(&batches, target)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::hash_pair;
	use async_trait::async_trait;
	use std::collections::HashMap;

	fn msg(n: u8) -> B256 {
		B256::with_last_byte(n)
	}

	struct MapSource(HashMap<u64, Vec<Vec<B256>>>);

	#[async_trait]
	impl MessageSource for MapSource {
		async fn get_block_messages(
			&self,
			block_number: u64,
		) -> Result<Vec<Vec<B256>>, SettlementError> {
			self.0
				.get(&block_number)
				.cloned()
				.ok_or_else(|| SettlementError::Source(format!("unknown block {}", block_number)))
		}
	}

	#[test]
	fn test_singleton_message_set() {
		let batches = vec![vec![msg(1)]];
		let witness = compute_membership_witness(&batches, msg(1)).unwrap();

		assert_eq!(witness.leaf_index, 0);
		assert_eq!(witness.sibling_path.path_size(), 0);
		assert_eq!(compute_out_hash(&batches), Some(msg(1)));
		assert!(verify_membership(msg(1), &witness, msg(1)));
	}

	#[test]
	fn test_witness_across_transactions() {
		let batches = vec![
			vec![msg(1), msg(2), msg(3)],
			vec![],
			vec![msg(4)],
			vec![msg(5), msg(6)],
		];
		let root = compute_out_hash(&batches).unwrap();

		let tx0 = hash_pair(&hash_pair(&msg(1), &msg(2)), &msg(3));
		let tx2 = hash_pair(&msg(5), &msg(6));
		assert_eq!(root, hash_pair(&hash_pair(&tx0, &msg(4)), &tx2));

		for m in 1..=6 {
			let witness = compute_membership_witness(&batches, msg(m)).unwrap();
			assert!(verify_membership(msg(m), &witness, root), "message {}", m);
		}

		let w = compute_membership_witness(&batches, msg(3)).unwrap();
		// leaf bit 1 inside its tx, tx 0 is a left child twice
		assert_eq!(w.leaf_index, 0b001);
		assert_eq!(w.sibling_path.path_size(), 3);
	}

	#[test]
	fn test_empty_transactions_do_not_change_root() {
		let with_gaps = vec![vec![], vec![msg(1)], vec![], vec![msg(2)]];
		let without = vec![vec![msg(1)], vec![msg(2)]];
		assert_eq!(compute_out_hash(&with_gaps), compute_out_hash(&without));
		assert_eq!(compute_out_hash(&[vec![], vec![]]), None);
	}

	#[test]
	fn test_missing_message() {
		let batches = vec![vec![msg(1), msg(2)]];
		assert!(matches!(
			compute_membership_witness(&batches, msg(9)),
			Err(SettlementError::MembershipNotFound(m)) if m == msg(9)
		));
	}

	#[test]
	fn test_tampered_witness_fails() {
		let batches = vec![vec![msg(1), msg(2)], vec![msg(3)]];
		let root = compute_out_hash(&batches).unwrap();
		let witness = compute_membership_witness(&batches, msg(2)).unwrap();

		assert!(!verify_membership(msg(1), &witness, root));
		assert!(!verify_membership(msg(2), &witness, msg(2)));

		let mut flipped = witness.clone();
		flipped.leaf_index ^= 1;
		assert!(!verify_membership(msg(2), &flipped, root));
	}

	#[tokio::test]
	async fn test_block_scoped_witness_matches_pure() {
		let batches = vec![vec![msg(1)], vec![msg(2), msg(3)]];
		let source = MapSource(HashMap::from([(7u64, batches.clone())]));

		let scoped = compute_membership_witness_for_block(&source, 7, msg(3))
			.await
			.unwrap();
		assert_eq!(scoped, compute_membership_witness(&batches, msg(3)).unwrap());

		let err = compute_membership_witness_for_block(&source, 8, msg(3))
			.await
			.unwrap_err();
		assert!(matches!(err, SettlementError::Source(_)));
	}
}
