//! Numeric index keys.
//!
//! Index data arrives as plain JSON numbers, so the explorer stores `f64`
//! values. `f64` is only partially ordered; [`Key`] wraps a non-NaN value and
//! provides the total order the tree needs.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A totally ordered numeric key.
///
/// NaN is rejected at construction and `-0.0` is normalised to `0.0`, so
/// equality and ordering agree with ordinary numeric comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Key(f64);

impl Key {
	/// Creates a key, rejecting NaN.
	pub fn new(value: f64) -> Result<Key> {
		if value.is_nan() {
			return Err(Error::InvalidKey);
		}
		// -0.0 == 0.0 numerically but not under total_cmp
		let value = if value == 0.0 { 0.0 } else { value };
		Ok(Key(value))
	}

	/// Returns the underlying number.
	#[inline]
	pub fn get(self) -> f64 {
		self.0
	}
}

impl Eq for Key {}

impl Ord for Key {
	#[inline]
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

impl PartialOrd for Key {
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl TryFrom<f64> for Key {
	type Error = Error;

	fn try_from(value: f64) -> Result<Key> {
		Key::new(value)
	}
}

impl From<Key> for f64 {
	fn from(key: Key) -> f64 {
		key.0
	}
}

impl From<i32> for Key {
	fn from(value: i32) -> Key {
		Key(f64::from(value))
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}
