//! # Indexviz: A Traceable In-Memory B+ Tree Index
//!
//! This crate provides the index structure behind a query plan visualiser: a
//! small-fanout B+ tree whose searches and range scans report the nodes they
//! visit, so a renderer can replay and highlight them.
//!
//! ## Design Overview
//!
//! **Arena Storage**: Every node lives in a single arena and is addressed by a
//! stable [`NodeId`]. Parent and next-leaf links are ids rather than pointers,
//! which keeps the mutable parent/sibling graph free of shared ownership.
//!
//! **Root Recovery**: A split can cascade all the way up and replace the root.
//! After every insertion the tree walks parent links from the last touched
//! node to find the node without a parent, and adopts it as the root.
//!
//! **Leaf Chain**: Leaves are linked in ascending key order. The chain is
//! patched at every leaf split and range scans walk it instead of
//! re-descending from the root.
//!
//! ### Tree Structure
//!
//! ```text
//!                    ┌─────────────────┐
//!                    │  Internal Node  │  <- separators route searches
//!                    │   keys: [K]     │
//!                    │ children: [id]  │
//!                    └────────┬────────┘
//!                             │
//!              ┌──────────────┼──────────────┐
//!              ▼              ▼              ▼
//!        ┌──────────┐  ┌──────────┐  ┌──────────┐
//!        │   Leaf   │─▶│   Leaf   │─▶│   Leaf   │─▶ None
//!        │ keys:[K] │  │ keys:[K] │  │ keys:[K] │
//!        └──────────┘  └──────────┘  └──────────┘
//! ```
//!
//! A key routes to the child whose index equals the number of separators less
//! than or equal to it. Leaves split at `ORDER` keys and keep their smallest
//! right-half key as a copy in the parent; internal nodes split at `ORDER`
//! separators and move the middle separator up.
//!
//! ## Basic Usage
//!
//! ```
//! use indexviz::Tree;
//!
//! let tree: Tree<i32> = [10, 20, 5, 6, 12, 30, 7, 17].into_iter().collect();
//!
//! assert!(tree.search(&12).found);
//! assert!(!tree.contains(&15));
//!
//! // Lower bound exclusive, upper bound inclusive
//! let keys: Vec<i32> = tree.range_scan(&6, &17).copied().collect();
//! assert_eq!(keys, vec![7, 10, 12, 17]);
//! ```
//!
//! ## Thread Safety
//!
//! [`GenericTree`] is a plain single-owner structure: mutation takes
//! `&mut self` and queries take `&self`. The [`Explorer`] wraps a tree in a
//! `parking_lot::RwLock` for callers that share one index between a loader and
//! concurrent readers.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub mod error;
pub mod explorer;
pub mod iter;
pub mod key;
mod node;
pub mod snapshot;
mod tracing_helpers;

pub use error::{Error, Result};
pub use explorer::{Explorer, GenericExplorer, IndexData, ScanResult};
pub use iter::{Iter, RangeScan};
pub use key::Key;
pub use node::NodeId;
pub use snapshot::{NodeSnapshot, TreeSnapshot};

use node::{Node, NodeStore};
use tracing_helpers::{debug_log, trace_log};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// Default fan-out. A node splits as soon as it holds this many keys, so every
/// node in a settled tree holds at most `DEFAULT_ORDER - 1` keys.
pub const DEFAULT_ORDER: usize = 3;

/// A B+ tree with the default order of 3.
pub type Tree<K> = GenericTree<K, DEFAULT_ORDER>;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An in-memory B+ tree with a configurable order.
///
/// # Type Parameters
///
/// - `K`: The key type. Must implement `Clone + Ord`. Duplicate keys are kept.
/// - `ORDER`: Split threshold. A node that reaches `ORDER` keys is split, so
///   at most `ORDER - 1` keys remain in any node between operations. Must be
///   at least 3.
pub struct GenericTree<K, const ORDER: usize> {
	/// Arena owning every node.
	store: NodeStore<K, ORDER>,
	/// The node without a parent, as last recovered by [`NodeStore::current_root`].
	root: NodeId,
	/// Number of keys inserted, duplicates included.
	len: usize,
}

/// Outcome of a point search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
	/// Whether the key is stored in the leaf it routes to.
	pub found: bool,
	/// Nodes visited from the root down to the leaf, in order.
	pub path: Vec<NodeId>,
}

impl<K: Clone + Ord, const ORDER: usize> Default for GenericTree<K, ORDER> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Clone + Ord, const ORDER: usize> GenericTree<K, ORDER> {
	const VALID_ORDER: () = assert!(ORDER >= 3, "B+ tree ORDER must be at least 3");

	/// Creates an empty tree whose root is a single empty leaf.
	pub fn new() -> Self {
		#[allow(clippy::let_unit_value)]
		let () = Self::VALID_ORDER;
		let mut store = NodeStore::new();
		let root = store.new_leaf();
		GenericTree {
			store,
			root,
			len: 0,
		}
	}

	/// Builds a tree by inserting `keys` one at a time in the given order.
	///
	/// The resulting shape depends on insertion order; the set of stored keys
	/// does not.
	pub fn bulk_load<I>(keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
	{
		let tree: Self = keys.into_iter().collect();
		debug_log!(len = tree.len, height = tree.height(), "bulk load complete");
		tree
	}

	/// The current root node.
	#[inline]
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Number of keys stored, counting duplicates.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if no key has been inserted.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of levels, 1 while the root is a leaf.
	pub fn height(&self) -> usize {
		let mut height = 1;
		let mut node = self.root;
		while let Node::Internal(internal) = self.store.get(node) {
			node = internal.children[0];
			height += 1;
		}
		height
	}

	/// Number of nodes in the tree.
	#[inline]
	pub fn node_count(&self) -> usize {
		self.store.len()
	}

	// -----------------------------------------------------------------------
	// Traversal
	// -----------------------------------------------------------------------

	/// Descends from the root to the leaf `key` routes to, optionally
	/// recording every visited node.
	fn find_leaf(&self, key: &K, mut path: Option<&mut Vec<NodeId>>) -> NodeId {
		let mut node = self.root;
		loop {
			if let Some(path) = path.as_deref_mut() {
				path.push(node);
			}
			match self.store.get(node) {
				Node::Leaf(_) => return node,
				Node::Internal(internal) => {
					let idx = internal.route(key);
					trace_log!(node = %node, child = idx, "descend");
					node = internal.children[idx];
				}
			}
		}
	}

	/// The leftmost leaf, where a full ordered traversal starts.
	fn first_leaf(&self) -> NodeId {
		let mut node = self.root;
		while let Node::Internal(internal) = self.store.get(node) {
			node = internal.children[0];
		}
		node
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts a key and returns the root after the insertion.
	///
	/// Insertion never fails and never checks for an existing equal key. The
	/// returned root is also adopted by the tree; it differs from the previous
	/// root whenever a split cascaded up through the old root.
	pub fn insert(&mut self, key: K) -> NodeId {
		let leaf_id = self.find_leaf(&key, None);
		let leaf = self.store.leaf_mut(leaf_id);
		leaf.insert(key);
		self.len += 1;

		let root = if leaf.is_overfull() {
			self.split_leaf(leaf_id)
		} else {
			self.store.current_root(leaf_id)
		};
		self.root = root;
		root
	}

	/// Splits an overfull leaf and propagates the new separator upwards.
	///
	/// ```text
	/// Before:  left [5, 6, 7] ──▶ next
	/// After:   left [5, 6] ──▶ right [7] ──▶ next     separator 7 goes up
	/// ```
	///
	/// The left node keeps the first `ceil(len / 2)` keys. The separator is a
	/// copy of the right node's first key, which stays in the leaf.
	fn split_leaf(&mut self, left: NodeId) -> NodeId {
		let right = self.store.new_leaf();

		let (right_keys, next, parent) = {
			let leaf = self.store.leaf_mut(left);
			let mid = leaf.keys.len().div_ceil(2);
			let right_keys: SmallVec<[K; ORDER]> = leaf.keys.drain(mid..).collect();
			let next = leaf.next.replace(right);
			(right_keys, next, leaf.parent)
		};
		let separator = right_keys[0].clone();

		let node = self.store.leaf_mut(right);
		node.keys = right_keys;
		node.next = next;
		node.parent = parent;
		debug_log!(left = %left, right = %right, "split leaf");

		match parent {
			None => self.grow_root(left, separator, right),
			Some(parent) => self.insert_into_parent(parent, left, separator, right),
		}
	}

	/// Splits an overfull internal node and returns the promoted separator and
	/// the new right sibling.
	///
	/// ```text
	/// Before:  keys [K0, K1, K2]   children [C0, C1, C2, C3]
	/// After:   left  keys [K0]     children [C0, C1]
	///          right keys [K2]     children [C2, C3]
	///          K1 moves up and is kept by neither half
	/// ```
	fn split_internal(&mut self, id: NodeId) -> (K, NodeId) {
		let right = self.store.new_internal();

		let (separator, keys, children, parent) = {
			let node = self.store.internal_mut(id);
			let mid = node.keys.len() / 2;
			let keys: SmallVec<[K; ORDER]> = node.keys.drain(mid + 1..).collect();
			let children: SmallVec<[NodeId; ORDER]> = node.children.drain(mid + 1..).collect();
			let separator = node.keys.remove(mid);
			(separator, keys, children, node.parent)
		};

		for child in &children {
			self.store.set_parent(*child, Some(right));
		}
		let node = self.store.internal_mut(right);
		node.keys = keys;
		node.children = children;
		node.parent = parent;
		debug_log!(left = %id, right = %right, "split internal node");

		(separator, right)
	}

	/// Inserts `separator` and `right` into `parent` just after `left`,
	/// splitting upwards for as long as nodes overflow.
	///
	/// Returns the root of the tree once propagation stops.
	fn insert_into_parent(
		&mut self,
		mut parent: NodeId,
		mut left: NodeId,
		mut separator: K,
		mut right: NodeId,
	) -> NodeId {
		loop {
			let node = self.store.internal_mut(parent);
			let pos = node.position_of(left).expect("split node must be a child of its parent");
			node.keys.insert(pos, separator);
			node.children.insert(pos + 1, right);
			let overfull = node.is_overfull();
			self.store.set_parent(right, Some(parent));

			if !overfull {
				return self.store.current_root(parent);
			}

			let (promoted, sibling) = self.split_internal(parent);
			match self.store.parent(parent) {
				None => return self.grow_root(parent, promoted, sibling),
				Some(grandparent) => {
					left = parent;
					parent = grandparent;
					separator = promoted;
					right = sibling;
				}
			}
		}
	}

	/// Creates a new root above a split root.
	fn grow_root(&mut self, left: NodeId, separator: K, right: NodeId) -> NodeId {
		let root = self.store.new_internal();
		let node = self.store.internal_mut(root);
		node.keys.push(separator);
		node.children.push(left);
		node.children.push(right);
		self.store.set_parent(left, Some(root));
		self.store.set_parent(right, Some(root));
		debug_log!(root = %root, "grew new root");
		root
	}

	// -----------------------------------------------------------------------
	// Queries
	// -----------------------------------------------------------------------

	/// Looks up `key`, reporting whether it is stored and the nodes visited.
	///
	/// Only exact matches count. A missing key is a normal `found: false`
	/// result.
	pub fn search(&self, key: &K) -> Search {
		let mut path = Vec::new();
		let leaf = self.find_leaf(key, Some(&mut path));
		let found = self.store.leaf(leaf).keys.binary_search(key).is_ok();
		Search {
			found,
			path,
		}
	}

	/// Returns `true` if `key` is stored in the tree.
	pub fn contains(&self, key: &K) -> bool {
		let leaf = self.find_leaf(key, None);
		self.store.leaf(leaf).keys.binary_search(key).is_ok()
	}

	/// Scans keys `k` with `from < k <= to` in ascending order.
	///
	/// The lower bound is exclusive and the upper bound inclusive. The scan
	/// descends once to the leaf `from` routes to, then follows the leaf chain.
	/// An inverted range (`from > to`) yields nothing.
	pub fn range_scan(&self, from: &K, to: &K) -> RangeScan<'_, K, ORDER> {
		if from > to {
			return RangeScan::new(&self.store, None, from.clone(), to.clone(), Vec::new());
		}
		let mut path = Vec::new();
		let leaf = self.find_leaf(from, Some(&mut path));
		RangeScan::new(&self.store, Some(leaf), from.clone(), to.clone(), path)
	}

	/// Iterates over every key in leaf-chain order, starting at the leftmost
	/// leaf.
	pub fn iter(&self) -> Iter<'_, K, ORDER> {
		Iter::new(&self.store, self.first_leaf())
	}
}

impl<K: Clone + Ord, const ORDER: usize> Extend<K> for GenericTree<K, ORDER> {
	fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
		for key in keys {
			self.insert(key);
		}
	}
}

impl<K: Clone + Ord, const ORDER: usize> FromIterator<K> for GenericTree<K, ORDER> {
	fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
		let mut tree = Self::new();
		tree.extend(keys);
		tree
	}
}

impl<'t, K: Clone + Ord, const ORDER: usize> IntoIterator for &'t GenericTree<K, ORDER> {
	type Item = &'t K;
	type IntoIter = Iter<'t, K, ORDER>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K: Clone + Ord + fmt::Debug, const ORDER: usize> fmt::Debug for GenericTree<K, ORDER> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GenericTree")
			.field("order", &ORDER)
			.field("root", &self.root)
			.field("len", &self.len)
			.field("height", &self.height())
			.finish()
	}
}

// ===========================================================================
// Test-Only Validation Module
// ===========================================================================

/// Accumulated state while walking the tree for validation.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
struct Validation {
	leaves: Vec<NodeId>,
	keys: usize,
	nodes: usize,
}

#[cfg(any(test, feature = "test-utils"))]
impl<K: Clone + Ord + fmt::Debug, const ORDER: usize> GenericTree<K, ORDER> {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Single root: the root is the only node without a parent and every
	///    node reaches it by walking parent links
	/// 2. Fan-out: no node holds `ORDER` keys or more
	/// 3. Key ordering: keys are non-decreasing within each node
	/// 4. Routing bounds: keys under child `i` lie between separators `i - 1`
	///    and `i`
	/// 5. Parent links: every child points back at the node that holds it
	/// 6. Balance: all leaves sit at the same depth
	/// 7. Leaf chain: following `next` from the leftmost leaf visits exactly
	///    the leaves in left-to-right order
	/// 8. Length consistency: `len` matches the keys stored in leaves
	pub fn assert_invariants(&self) {
		// Invariant 1: Single root
		let parentless: Vec<NodeId> =
			self.store.iter().filter(|(_, node)| node.parent().is_none()).map(|(id, _)| id).collect();
		assert_eq!(parentless, vec![self.root], "root {} is not the only parentless node", self.root);
		for (id, _) in self.store.iter() {
			assert_eq!(self.store.current_root(id), self.root, "node {} does not reach the root", id);
		}
		assert!(
			!self.store.get(self.root).is_leaf() || self.len < ORDER,
			"root is a leaf but the tree holds {} keys",
			self.len
		);

		let mut state = Validation::default();
		let height = self.height();
		self.validate_node(self.root, 1, height, None, None, &mut state);

		assert_eq!(state.nodes, self.store.len(), "unreachable nodes in the arena");

		// Invariant 8: Length consistency
		assert_eq!(state.keys, self.len, "leaves hold {} keys but len is {}", state.keys, self.len);

		// Invariant 7: Leaf chain
		let mut chain = Vec::with_capacity(state.leaves.len());
		let mut next = state.leaves.first().copied();
		while let Some(id) = next {
			chain.push(id);
			assert!(chain.len() <= state.leaves.len(), "leaf chain is longer than the leaf level");
			next = self.store.leaf(id).next;
		}
		assert_eq!(chain, state.leaves, "leaf chain does not match left-to-right leaf order");
	}

	fn validate_node(
		&self,
		id: NodeId,
		level: usize,
		height: usize,
		lower: Option<&K>,
		upper: Option<&K>,
		state: &mut Validation,
	) {
		state.nodes += 1;
		let node = self.store.get(id);
		let keys = node.keys();

		// Invariant 2: Fan-out
		assert!(keys.len() < ORDER, "node {} holds {} keys with ORDER {}", id, keys.len(), ORDER);

		// Invariant 3: Key ordering
		for pair in keys.windows(2) {
			assert!(pair[0] <= pair[1], "keys not sorted in node {}: {:?} > {:?}", id, pair[0], pair[1]);
		}

		// Invariant 4: Routing bounds
		for key in keys {
			if let Some(lower) = lower {
				assert!(key >= lower, "key {:?} in node {} is below bound {:?}", key, id, lower);
			}
			if let Some(upper) = upper {
				assert!(key <= upper, "key {:?} in node {} is above bound {:?}", key, id, upper);
			}
		}

		match node {
			Node::Leaf(leaf) => {
				// Invariant 6: Balance
				assert_eq!(level, height, "leaf {} at level {} in a tree of height {}", id, level, height);
				state.leaves.push(id);
				state.keys += leaf.keys.len();
			}
			Node::Internal(internal) => {
				assert!(level < height, "internal node {} at leaf level {}", id, level);
				assert!(!internal.keys.is_empty(), "internal node {} has no separators", id);
				assert_eq!(
					internal.children.len(),
					internal.keys.len() + 1,
					"internal node {} has {} keys but {} children",
					id,
					internal.keys.len(),
					internal.children.len()
				);

				let last = internal.children.len() - 1;
				for (i, child) in internal.children.iter().enumerate() {
					// Invariant 5: Parent links
					assert_eq!(
						self.store.parent(*child),
						Some(id),
						"child {} of {} has a stale parent link",
						child,
						id
					);
					let child_lower = if i == 0 {
						lower
					} else {
						Some(&internal.keys[i - 1])
					};
					let child_upper = if i == last {
						upper
					} else {
						Some(&internal.keys[i])
					};
					self.validate_node(*child, level + 1, height, child_lower, child_upper, state);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SCENARIO: [i32; 8] = [10, 20, 5, 6, 12, 30, 7, 17];

	fn ids(raw: &[u32]) -> Vec<NodeId> {
		raw.iter().map(|i| NodeId(*i)).collect()
	}

	// -----------------------------------------------------------------------
	// Basic Tree Operation Tests
	// -----------------------------------------------------------------------

	#[test]
	fn empty_tree() {
		let tree: Tree<i32> = Tree::new();

		tree.assert_invariants();
		assert!(tree.is_empty());
		assert_eq!(tree.height(), 1);
		assert_eq!(tree.node_count(), 1);
		assert_eq!(tree.iter().count(), 0);

		let search = tree.search(&1);
		assert!(!search.found);
		assert_eq!(search.path, vec![tree.root()]);
		assert_eq!(tree.range_scan(&0, &100).count(), 0);
	}

	#[test]
	fn insert_below_order_keeps_leaf_root() {
		let mut tree: Tree<i32> = Tree::new();
		let root = tree.root();

		assert_eq!(tree.insert(20), root);
		assert_eq!(tree.insert(10), root);

		tree.assert_invariants();
		assert_eq!(tree.height(), 1);
		assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 20]);
	}

	#[test]
	fn first_leaf_split_creates_internal_root() {
		let mut tree: Tree<i32> = Tree::new();
		tree.insert(1);
		tree.insert(2);
		let root = tree.insert(3);

		tree.assert_invariants();
		assert_eq!(root, tree.root());
		assert_eq!(tree.height(), 2);

		let internal = tree.store.internal(root);
		assert_eq!(&internal.keys[..], &[3]);
		let left = tree.store.leaf(internal.children[0]);
		let right = tree.store.leaf(internal.children[1]);
		assert_eq!(&left.keys[..], &[1, 2]);
		assert_eq!(&right.keys[..], &[3]);
		assert_eq!(left.next, Some(internal.children[1]));
		assert_eq!(right.next, None);
	}

	#[test]
	fn scenario_structure() {
		let tree: Tree<i32> = SCENARIO.into_iter().collect();
		tree.assert_invariants();

		assert_eq!(tree.root(), NodeId(6));
		assert_eq!(tree.height(), 3);
		assert_eq!(tree.node_count(), 8);

		assert_eq!(&tree.store.internal(NodeId(6)).keys[..], &[10]);
		assert_eq!(&tree.store.internal(NodeId(6)).children[..], &ids(&[2, 5])[..]);
		assert_eq!(&tree.store.internal(NodeId(2)).keys[..], &[7]);
		assert_eq!(&tree.store.internal(NodeId(2)).children[..], &ids(&[0, 4])[..]);
		assert_eq!(&tree.store.internal(NodeId(5)).keys[..], &[17, 20]);
		assert_eq!(&tree.store.internal(NodeId(5)).children[..], &ids(&[3, 7, 1])[..]);
	}

	#[test]
	fn scenario_queries() {
		let tree: Tree<i32> = SCENARIO.into_iter().collect();

		assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![5, 6, 7, 10, 12, 17, 20, 30]);

		let miss = tree.search(&15);
		assert!(!miss.found);
		assert_eq!(miss.path, ids(&[6, 5, 3]));

		let hit = tree.search(&7);
		assert!(hit.found);
		assert_eq!(hit.path, ids(&[6, 2, 4]));

		let scan = tree.range_scan(&6, &17);
		assert_eq!(scan.path(), &ids(&[6, 2, 0])[..]);
		assert_eq!(scan.copied().collect::<Vec<_>>(), vec![7, 10, 12, 17]);
		assert_eq!(tree.range_scan(&30, &6).count(), 0);
	}

	#[test]
	fn insert_returns_current_root() {
		let mut tree: Tree<i32> = Tree::new();
		for key in 0..200 {
			let root = tree.insert(key);
			assert_eq!(root, tree.root());
			for (id, _) in tree.store.iter() {
				assert_eq!(tree.store.current_root(id), root);
			}
		}
		tree.assert_invariants();
	}

	// -----------------------------------------------------------------------
	// Split Cascade Tests
	// -----------------------------------------------------------------------

	#[test]
	fn ascending_inserts_cascade() {
		let mut tree: Tree<i32> = Tree::new();
		let mut heights = Vec::new();
		for key in 1..=64 {
			tree.insert(key);
			tree.assert_invariants();
			heights.push(tree.height());
		}
		assert!(heights.windows(2).all(|w| w[0] <= w[1]), "height must never shrink");
		assert!(tree.height() >= 4);
		assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (1..=64).collect::<Vec<_>>());
	}

	#[test]
	fn descending_inserts_cascade() {
		let mut tree: Tree<i32> = Tree::new();
		for key in (1..=64).rev() {
			tree.insert(key);
			tree.assert_invariants();
		}
		assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (1..=64).collect::<Vec<_>>());
	}

	#[test]
	fn larger_order() {
		let mut tree: GenericTree<i32, 8> = GenericTree::new();
		for key in 0..7 {
			tree.insert(key);
		}
		assert_eq!(tree.height(), 1);
		tree.insert(7);
		assert_eq!(tree.height(), 2);

		tree.extend(8..500);
		tree.assert_invariants();
		assert_eq!(tree.len(), 500);
		assert!(tree.contains(&499));
	}

	// -----------------------------------------------------------------------
	// Duplicate Key Tests
	// -----------------------------------------------------------------------

	#[test]
	fn duplicates_are_kept() {
		let mut tree: Tree<i32> = Tree::new();
		for _ in 0..10 {
			tree.insert(5);
			tree.assert_invariants();
		}
		tree.insert(3);
		tree.insert(4);
		tree.insert(6);
		tree.assert_invariants();

		assert_eq!(tree.len(), 13);
		assert_eq!(tree.iter().filter(|k| **k == 5).count(), 10);
		assert!(tree.contains(&5));
		assert!(tree.contains(&3));
		assert!(!tree.contains(&2));
		assert_eq!(tree.range_scan(&4, &5).count(), 10);
	}

	#[test]
	fn duplicates_split_left_of_equal_separator() {
		// Leaves left of a separator may hold copies of it. Splitting such a
		// leaf must still place the new sibling directly after it.
		let mut tree: Tree<i32> = Tree::new();
		tree.extend([5, 5, 5]);
		tree.insert(3);
		tree.insert(4);
		tree.assert_invariants();
		assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5, 5, 5]);
	}

	// -----------------------------------------------------------------------
	// Query Tests
	// -----------------------------------------------------------------------

	#[test]
	fn range_bounds_are_exclusive_then_inclusive() {
		let tree: Tree<i32> = (1..=20).collect();

		assert_eq!(tree.range_scan(&5, &8).copied().collect::<Vec<_>>(), vec![6, 7, 8]);
		assert_eq!(tree.range_scan(&5, &5).count(), 0);
		assert_eq!(tree.range_scan(&0, &1).copied().collect::<Vec<_>>(), vec![1]);
		assert_eq!(tree.range_scan(&20, &100).count(), 0);
		assert_eq!(tree.range_scan(&19, &100).copied().collect::<Vec<_>>(), vec![20]);
		assert_eq!(tree.range_scan(&-10, &0).count(), 0);
	}

	#[test]
	fn inverted_range_has_no_path() {
		let tree: Tree<i32> = (1..=20).collect();
		let scan = tree.range_scan(&10, &2);
		assert!(scan.path().is_empty());
		assert_eq!(scan.count(), 0);
	}

	#[test]
	fn search_path_ends_at_leaf() {
		let tree: Tree<i32> = (0..100).collect();
		for key in [0, 42, 99, 1000] {
			let search = tree.search(&key);
			assert_eq!(search.found, key < 100);
			assert_eq!(search.path.len(), tree.height());
			assert_eq!(search.path[0], tree.root());
			let leaf = *search.path.last().unwrap();
			assert!(tree.store.get(leaf).is_leaf());
		}
	}

	#[test]
	fn debug_output() {
		let tree: Tree<i32> = (0..3).collect();
		let debug = format!("{:?}", tree);
		assert!(debug.contains("order: 3"));
		assert!(debug.contains("len: 3"));
		assert!(debug.contains("height: 2"));
	}
}
