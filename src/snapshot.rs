//! Serialisable snapshots of a tree for external renderers.
//!
//! A snapshot is a nested copy of every reachable node, tagged by kind:
//!
//! ```json
//! {
//!   "order": 3, "height": 2, "len": 3,
//!   "root": {
//!     "kind": "internal", "id": 2, "keys": [3],
//!     "children": [
//!       { "kind": "leaf", "id": 0, "keys": [1, 2], "next": 1 },
//!       { "kind": "leaf", "id": 1, "keys": [3], "next": null }
//!     ]
//!   }
//! }
//! ```
//!
//! Node ids match the ids reported in search and range-scan paths, so a
//! renderer can highlight a path against a snapshot taken from the same tree.

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::{GenericTree, NodeId};

/// A point-in-time copy of a whole tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot<K> {
	pub order: usize,
	pub height: usize,
	pub len: usize,
	pub root: NodeSnapshot<K>,
}

/// A copied node and, for internal nodes, its whole subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSnapshot<K> {
	Leaf {
		id: NodeId,
		keys: Vec<K>,
		next: Option<NodeId>,
	},
	Internal {
		id: NodeId,
		keys: Vec<K>,
		children: Vec<NodeSnapshot<K>>,
	},
}

impl<K> NodeSnapshot<K> {
	pub fn id(&self) -> NodeId {
		match self {
			NodeSnapshot::Leaf {
				id,
				..
			}
			| NodeSnapshot::Internal {
				id,
				..
			} => *id,
		}
	}

	pub fn keys(&self) -> &[K] {
		match self {
			NodeSnapshot::Leaf {
				keys,
				..
			}
			| NodeSnapshot::Internal {
				keys,
				..
			} => keys,
		}
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self, NodeSnapshot::Leaf { .. })
	}

	/// Leaf snapshots in left-to-right order.
	pub fn leaves(&self) -> Vec<&NodeSnapshot<K>> {
		let mut out = Vec::new();
		let mut stack = vec![self];
		while let Some(node) = stack.pop() {
			match node {
				NodeSnapshot::Leaf {
					..
				} => out.push(node),
				NodeSnapshot::Internal {
					children,
					..
				} => stack.extend(children.iter().rev()),
			}
		}
		out
	}
}

impl<K: Clone + Ord, const ORDER: usize> GenericTree<K, ORDER> {
	/// Copies the reachable tree into a serialisable snapshot.
	pub fn snapshot(&self) -> TreeSnapshot<K> {
		TreeSnapshot {
			order: ORDER,
			height: self.height(),
			len: self.len,
			root: self.snapshot_node(self.root),
		}
	}

	fn snapshot_node(&self, id: NodeId) -> NodeSnapshot<K> {
		let node = self.store.get(id);
		let keys = node.keys().to_vec();
		match node {
			Node::Leaf(leaf) => NodeSnapshot::Leaf {
				id,
				keys,
				next: leaf.next,
			},
			Node::Internal(internal) => NodeSnapshot::Internal {
				id,
				keys,
				children: internal.children.iter().map(|child| self.snapshot_node(*child)).collect(),
			},
		}
	}
}
