//! Unbalanced binary Merkle tree used by the outbox.
//!
//! A set of `n > 1` leaves is split into a balanced left subtree holding the
//! largest power of two strictly below `n` leaves, and a right subtree built
//! the same way over the remainder. A single leaf is its own root. Node
//! hash is `sha256_to_field(left || right)`.

use crate::SettlementError;
use gateway_types::{utils::hashing::sha256_to_field_concat, MembershipWitness, SiblingPath, B256};

/// Hashes two sibling nodes into their parent.
pub fn hash_pair(left: &B256, right: &B256) -> B256 {
	sha256_to_field_concat(&[left.as_slice(), right.as_slice()])
}

/// Number of leaves in the left subtree of a set of `len > 1` leaves.
fn split_point(len: usize) -> usize {
	if len.is_power_of_two() {
		len / 2
	} else {
		1 << (usize::BITS - 1 - len.leading_zeros())
	}
}

/// Root of the unbalanced tree over `leaves`.
pub fn root(leaves: &[B256]) -> Result<B256, SettlementError> {
	match leaves {
		[] => Err(SettlementError::EmptyTree),
		[leaf] => Ok(*leaf),
		_ => {
			let (left, right) = leaves.split_at(split_point(leaves.len()));
			Ok(hash_pair(&root(left)?, &root(right)?))
		}
	}
}

/// Witness for the leaf at `index`, relative to `root(leaves)`.
pub fn witness(leaves: &[B256], index: usize) -> Result<MembershipWitness, SettlementError> {
	if leaves.is_empty() {
		return Err(SettlementError::EmptyTree);
	}
	if index >= leaves.len() {
		return Err(SettlementError::IndexOutOfBounds {
			index,
			tree_size: leaves.len(),
		});
	}
	if leaves.len() == 1 {
		return Ok(MembershipWitness::new(0, SiblingPath::default()));
	}

	let (left, right) = leaves.split_at(split_point(leaves.len()));
	let (inner, step) = if index < left.len() {
		(witness(left, index)?, MembershipWitness::new(0, SiblingPath::new(vec![root(right)?])))
	} else {
		(
			witness(right, index - left.len())?,
			MembershipWitness::new(1, SiblingPath::new(vec![root(left)?])),
		)
	};
	Ok(inner.lift(step))
}

/// Recomputes the root implied by `leaf` and `witness`.
///
/// Returns `None` when the index has bits set above the path length.
pub fn root_from_witness(leaf: B256, witness: &MembershipWitness) -> Option<B256> {
	let depth = witness.sibling_path.path_size();
	if depth < 64 && witness.leaf_index >> depth != 0 {
		return None;
	}

	let root = witness
		.sibling_path
		.nodes()
		.iter()
		.enumerate()
		.fold(leaf, |acc, (level, sibling)| {
			if witness.leaf_index.checked_shr(level as u32).unwrap_or(0) & 1 == 1 {
				hash_pair(sibling, &acc)
			} else {
				hash_pair(&acc, sibling)
			}
		});
	Some(root)
}
