//! Node storage for the B+ tree.
//!
//! All nodes live in a single arena ([`NodeStore`]) and refer to each other by
//! [`NodeId`]. Parent and next-leaf links are plain `Option<NodeId>` fields, so
//! walking up to the root or along the leaf chain is an index lookup per step.
//!
//! ```text
//!                 ┌──────────────────┐
//!                 │ Internal #6 [10] │   parent: None (root)
//!                 └───┬──────────┬───┘
//!                     │          │
//!          ┌──────────▼──┐    ┌──▼──────────────┐
//!          │ Internal #2 │    │ Internal #5     │
//!          │    [7]      │    │   [17, 20]      │
//!          └──┬──────┬───┘    └──┬─────┬─────┬──┘
//!             ▼      ▼           ▼     ▼     ▼
//!          [5,6] → [7] ──────→ [10,12] → [17] → [20,30] → None
//!           #0      #4          #3       #7      #1
//! ```
//!
//! Nodes are never freed. A split only ever adds nodes, and a replaced root
//! stays in the tree as a child of its successor.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Stable identifier of a node in the arena.
///
/// Identifiers are assigned in allocation order and never reused, which makes
/// them suitable for recording traversal paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	/// Position of the node in allocation order.
	#[inline]
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// A node in the B+ tree, either a leaf or an internal (routing) node.
#[derive(Debug)]
pub(crate) enum Node<K, const ORDER: usize> {
	Leaf(LeafNode<K, ORDER>),
	Internal(InternalNode<K, ORDER>),
}

impl<K, const ORDER: usize> Node<K, ORDER> {
	#[cfg(any(test, feature = "test-utils"))]
	#[inline]
	pub(crate) fn is_leaf(&self) -> bool {
		matches!(self, Node::Leaf(_))
	}

	#[inline]
	pub(crate) fn keys(&self) -> &[K] {
		match self {
			Node::Leaf(leaf) => &leaf.keys,
			Node::Internal(internal) => &internal.keys,
		}
	}

	#[inline]
	pub(crate) fn parent(&self) -> Option<NodeId> {
		match self {
			Node::Leaf(leaf) => leaf.parent,
			Node::Internal(internal) => internal.parent,
		}
	}

	#[inline]
	fn set_parent(&mut self, parent: Option<NodeId>) {
		match self {
			Node::Leaf(leaf) => leaf.parent = parent,
			Node::Internal(internal) => internal.parent = parent,
		}
	}
}

/// A leaf node holding the indexed keys.
///
/// Keys are kept in ascending order. Equal keys may appear more than once.
#[derive(Debug)]
pub(crate) struct LeafNode<K, const ORDER: usize> {
	pub(crate) keys: SmallVec<[K; ORDER]>,
	/// Next leaf in ascending key order, `None` for the rightmost leaf.
	pub(crate) next: Option<NodeId>,
	pub(crate) parent: Option<NodeId>,
}

impl<K: Ord, const ORDER: usize> LeafNode<K, ORDER> {
	/// Inserts `key` after any keys equal to it, keeping the leaf sorted.
	pub(crate) fn insert(&mut self, key: K) {
		let pos = self.keys.partition_point(|k| k <= &key);
		self.keys.insert(pos, key);
	}

	/// Returns true once the leaf has reached `ORDER` keys and must split.
	#[inline]
	pub(crate) fn is_overfull(&self) -> bool {
		self.keys.len() >= ORDER
	}
}

/// An internal node holding `k` separator keys and `k + 1` children.
///
/// A key routes to child `i` where `i` is the number of separators that are
/// less than or equal to it.
#[derive(Debug)]
pub(crate) struct InternalNode<K, const ORDER: usize> {
	pub(crate) keys: SmallVec<[K; ORDER]>,
	pub(crate) children: SmallVec<[NodeId; ORDER]>,
	pub(crate) parent: Option<NodeId>,
}

impl<K: Ord, const ORDER: usize> InternalNode<K, ORDER> {
	/// Index of the child responsible for `key`.
	///
	/// Scans separators in order and stops at the first one greater than the
	/// key, so a key equal to a separator goes to the right of it.
	#[inline]
	pub(crate) fn route(&self, key: &K) -> usize {
		self.keys.iter().take_while(|sep| key >= *sep).count()
	}

	#[inline]
	pub(crate) fn is_overfull(&self) -> bool {
		self.keys.len() >= ORDER
	}

	/// Position of `child` in this node's child list.
	pub(crate) fn position_of(&self, child: NodeId) -> Option<usize> {
		self.children.iter().position(|c| *c == child)
	}
}

/// Arena owning every node of a tree.
pub(crate) struct NodeStore<K, const ORDER: usize> {
	nodes: Vec<Node<K, ORDER>>,
}

impl<K, const ORDER: usize> NodeStore<K, ORDER> {
	pub(crate) fn new() -> Self {
		NodeStore {
			nodes: Vec::new(),
		}
	}

	fn push(&mut self, node: Node<K, ORDER>) -> NodeId {
		let id = NodeId(u32::try_from(self.nodes.len()).expect("node arena exceeds u32::MAX nodes"));
		self.nodes.push(node);
		id
	}

	/// Allocates an empty leaf with no parent and no next link.
	pub(crate) fn new_leaf(&mut self) -> NodeId {
		self.push(Node::Leaf(LeafNode {
			keys: smallvec![],
			next: None,
			parent: None,
		}))
	}

	/// Allocates an empty internal node with no parent.
	pub(crate) fn new_internal(&mut self) -> NodeId {
		self.push(Node::Internal(InternalNode {
			keys: smallvec![],
			children: smallvec![],
			parent: None,
		}))
	}

	/// Number of nodes ever allocated.
	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.nodes.len()
	}

	#[inline]
	pub(crate) fn get(&self, id: NodeId) -> &Node<K, ORDER> {
		&self.nodes[id.index()]
	}

	#[inline]
	pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<K, ORDER> {
		match self.get(id) {
			Node::Leaf(leaf) => leaf,
			Node::Internal(_) => panic!("expected leaf node at {id}"),
		}
	}

	#[inline]
	pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, ORDER> {
		match &mut self.nodes[id.index()] {
			Node::Leaf(leaf) => leaf,
			Node::Internal(_) => panic!("expected leaf node at {id}"),
		}
	}

	#[inline]
	pub(crate) fn internal(&self, id: NodeId) -> &InternalNode<K, ORDER> {
		match self.get(id) {
			Node::Internal(internal) => internal,
			Node::Leaf(_) => panic!("expected internal node at {id}"),
		}
	}

	#[inline]
	pub(crate) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K, ORDER> {
		match &mut self.nodes[id.index()] {
			Node::Internal(internal) => internal,
			Node::Leaf(_) => panic!("expected internal node at {id}"),
		}
	}

	#[inline]
	pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.get(id).parent()
	}

	#[inline]
	pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
		self.nodes[id.index()].set_parent(parent);
	}

	/// Walks parent links up from `from` and returns the node without a parent.
	///
	/// Splits may replace the root several levels above the node they started
	/// at, so callers recover the authoritative root through this walk after
	/// every structural change.
	pub(crate) fn current_root(&self, from: NodeId) -> NodeId {
		let mut node = from;
		while let Some(parent) = self.parent(node) {
			node = parent;
		}
		node
	}

	/// Iterates over every allocated node with its id.
	#[cfg(any(test, feature = "test-utils"))]
	pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<K, ORDER>)> {
		self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i as u32), node))
	}
}
