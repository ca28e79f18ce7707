//! The index explorer: the entry points a plan visualiser drives.
//!
//! The explorer owns one numeric index behind a `parking_lot::RwLock`:
//!
//! - `bulk_load` builds a complete replacement tree outside the lock and swaps
//!   it in, so readers see either the old tree or the new one, never a tree
//!   that is half loaded.
//! - `index_search` and `index_range_scan` take the read lock for the length
//!   of one query and return owned results, including the node path a
//!   renderer replays for highlighting.
//!
//! Raw numbers are validated here. The tree underneath never sees NaN.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracing_helpers::{debug_log, warn_log};
use crate::{GenericTree, Key, NodeId, Search, TreeSnapshot, DEFAULT_ORDER};

/// An explorer over a tree of the default order.
pub type Explorer = GenericExplorer<DEFAULT_ORDER>;

/// Owned outcome of a range scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanResult<K> {
	/// Matching keys in ascending order.
	pub keys: Vec<K>,
	/// Nodes visited while descending to the start leaf.
	pub path: Vec<NodeId>,
}

/// Key lists per index, as sent by the plan backend.
///
/// Deserialises from a JSON object such as
/// `{"USERS.AGE": [10, 15, 20, 22, 30, 35, 40]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexData(BTreeMap<String, Vec<f64>>);

impl IndexData {
	/// Parses an index payload from JSON.
	pub fn from_json(json: &str) -> Result<IndexData> {
		Ok(serde_json::from_str(json)?)
	}

	/// Adds or replaces the key list for `index`.
	pub fn insert(&mut self, index: impl Into<String>, keys: Vec<f64>) {
		self.0.insert(index.into(), keys);
	}

	/// The key list for `index`.
	pub fn keys(&self, index: &str) -> Result<&[f64]> {
		self.0.get(index).map(Vec::as_slice).ok_or_else(|| Error::UnknownIndex(index.to_string()))
	}

	/// Names of all indexes in the payload, in sorted order.
	pub fn indexes(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}
}

/// A lock-guarded numeric index with a fixed order.
pub struct GenericExplorer<const ORDER: usize> {
	tree: RwLock<GenericTree<Key, ORDER>>,
}

impl<const ORDER: usize> Default for GenericExplorer<ORDER> {
	fn default() -> Self {
		Self::new()
	}
}

fn validate(keys: &[f64]) -> Result<Vec<Key>> {
	keys.iter()
		.map(|value| {
			Key::new(*value).inspect_err(|_| {
				warn_log!(value = %value, "rejected index key");
			})
		})
		.collect()
}

impl<const ORDER: usize> GenericExplorer<ORDER> {
	/// Creates an explorer over an empty index.
	pub fn new() -> Self {
		GenericExplorer {
			tree: RwLock::new(GenericTree::new()),
		}
	}

	/// Replaces the index with a tree built from `keys`, inserted in order.
	///
	/// Every key is validated before anything is built. On error the current
	/// index is left untouched.
	pub fn bulk_load(&self, keys: &[f64]) -> Result<()> {
		let keys = validate(keys)?;
		let tree = GenericTree::bulk_load(keys);
		debug_log!(len = tree.len(), height = tree.height(), "replacing index");
		*self.tree.write() = tree;
		Ok(())
	}

	/// Bulk-loads the key list named `index` from a backend payload.
	pub fn load_index(&self, data: &IndexData, index: &str) -> Result<()> {
		self.bulk_load(data.keys(index)?)
	}

	/// Inserts a single key and returns the root after the insertion.
	pub fn insert(&self, key: f64) -> Result<NodeId> {
		let key = Key::new(key)?;
		Ok(self.tree.write().insert(key))
	}

	/// Looks up `key` and reports the visited path.
	pub fn index_search(&self, key: f64) -> Result<Search> {
		let key = Key::new(key)?;
		Ok(self.tree.read().search(&key))
	}

	/// Collects keys `k` with `from < k <= to`.
	///
	/// `from > to` is not an error and yields an empty result.
	pub fn index_range_scan(&self, from: f64, to: f64) -> Result<ScanResult<Key>> {
		let from = Key::new(from)?;
		let to = Key::new(to)?;
		let tree = self.tree.read();
		let mut scan = tree.range_scan(&from, &to);
		let keys: Vec<Key> = scan.by_ref().copied().collect();
		Ok(ScanResult {
			keys,
			path: scan.into_path(),
		})
	}

	/// Copies the current index for rendering.
	pub fn snapshot(&self) -> TreeSnapshot<Key> {
		self.tree.read().snapshot()
	}

	/// Number of keys in the current index.
	pub fn len(&self) -> usize {
		self.tree.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tree.read().is_empty()
	}

	/// Runs `f` against the current tree under the read lock.
	pub fn with_tree<R>(&self, f: impl FnOnce(&GenericTree<Key, ORDER>) -> R) -> R {
		f(&self.tree.read())
	}
}
