//! Cross-domain message membership types.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Ordered sibling hashes from a leaf up to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingPath {
	nodes: Vec<B256>,
}

impl SiblingPath {
	pub fn new(nodes: Vec<B256>) -> Self {
		Self { nodes }
	}

	/// Number of levels between the leaf and the root.
	/// Zero when the message set holds exactly one message.
	pub fn path_size(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn nodes(&self) -> &[B256] {
		&self.nodes
	}

	pub(crate) fn extend(&mut self, other: SiblingPath) {
		self.nodes.extend(other.nodes);
	}
}

/// Proof that a message hash sits at a given position of a domain's
/// outgoing message tree.
///
/// Bit `i` of `leaf_index` is 1 when the node at level `i` (counting from
/// the leaf) is the right child of its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWitness {
	pub leaf_index: u64,
	pub sibling_path: SiblingPath,
}

impl MembershipWitness {
	pub fn new(leaf_index: u64, sibling_path: SiblingPath) -> Self {
		Self {
			leaf_index,
			sibling_path,
		}
	}

	/// Extends a witness inside a subtree with the path from that subtree's
	/// root up to an enclosing root.
	pub fn lift(self, outer: MembershipWitness) -> Self {
		let depth = self.sibling_path.path_size();
		let mut sibling_path = self.sibling_path;
		sibling_path.extend(outer.sibling_path);
		Self {
			leaf_index: (outer.leaf_index << depth) | self.leaf_index,
			sibling_path,
		}
	}
}
