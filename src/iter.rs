//! Iterators over the leaf chain of a `GenericTree`.
//!
//! Both iterators borrow the tree's node arena and move from leaf to leaf
//! through `next` links. They are lazy: no keys are copied until the caller
//! pulls them.
use std::iter::FusedIterator;

use crate::node::NodeStore;
use crate::NodeId;

/// Iterator over every key of the tree in ascending order.
///
/// Created by [`GenericTree::iter`](crate::GenericTree::iter).
pub struct Iter<'t, K, const ORDER: usize> {
	store: &'t NodeStore<K, ORDER>,
	leaf: Option<NodeId>,
	pos: usize,
}

impl<'t, K, const ORDER: usize> Iter<'t, K, ORDER> {
	pub(crate) fn new(store: &'t NodeStore<K, ORDER>, first: NodeId) -> Iter<'t, K, ORDER> {
		Iter {
			store,
			leaf: Some(first),
			pos: 0,
		}
	}
}

impl<'t, K, const ORDER: usize> Iterator for Iter<'t, K, ORDER> {
	type Item = &'t K;

	fn next(&mut self) -> Option<&'t K> {
		while let Some(id) = self.leaf {
			let leaf = self.store.leaf(id);
			if let Some(key) = leaf.keys.get(self.pos) {
				self.pos += 1;
				return Some(key);
			}
			self.leaf = leaf.next;
			self.pos = 0;
		}
		None
	}
}

impl<K, const ORDER: usize> FusedIterator for Iter<'_, K, ORDER> {}

/// Lazy range scan yielding keys `k` with `from < k <= to`.
///
/// Created by [`GenericTree::range_scan`](crate::GenericTree::range_scan). The
/// scan starts in the leaf `from` routes to and follows the leaf chain until
/// it meets a key above `to` or runs out of leaves. A finished scan stays
/// finished; call `range_scan` again for a fresh one.
pub struct RangeScan<'t, K, const ORDER: usize> {
	store: &'t NodeStore<K, ORDER>,
	leaf: Option<NodeId>,
	pos: usize,
	from: K,
	to: K,
	path: Vec<NodeId>,
}

impl<'t, K, const ORDER: usize> RangeScan<'t, K, ORDER> {
	pub(crate) fn new(
		store: &'t NodeStore<K, ORDER>,
		start: Option<NodeId>,
		from: K,
		to: K,
		path: Vec<NodeId>,
	) -> RangeScan<'t, K, ORDER> {
		RangeScan {
			store,
			leaf: start,
			pos: 0,
			from,
			to,
			path,
		}
	}

	/// Nodes visited while descending to the start leaf, root first.
	///
	/// Empty for an inverted range, which never descends.
	pub fn path(&self) -> &[NodeId] {
		&self.path
	}

	/// Consumes the scan and returns the descent path.
	pub fn into_path(self) -> Vec<NodeId> {
		self.path
	}
}

impl<'t, K: Ord, const ORDER: usize> Iterator for RangeScan<'t, K, ORDER> {
	type Item = &'t K;

	fn next(&mut self) -> Option<&'t K> {
		while let Some(id) = self.leaf {
			let leaf = self.store.leaf(id);
			let Some(key) = leaf.keys.get(self.pos) else {
				self.leaf = leaf.next;
				self.pos = 0;
				continue;
			};
			// Keys ascend across the whole chain, so nothing past `to` can match
			if key > &self.to {
				self.leaf = None;
				return None;
			}
			self.pos += 1;
			if key > &self.from {
				return Some(key);
			}
		}
		None
	}
}

impl<K: Ord, const ORDER: usize> FusedIterator for RangeScan<'_, K, ORDER> {}
