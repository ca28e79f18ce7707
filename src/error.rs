//! # Error Types for the Index Explorer
//!
//! The B+ tree itself has no failure modes: insertion, point search and range
//! scans are total over well-formed keys, and a missing key is reported as a
//! normal `found: false` result rather than an error.
//!
//! Errors only arise at the boundary where raw numbers enter the index:
//!
//! ```text
//! caller input (f64, JSON payload)
//!      │
//!      ▼
//! Key::new / IndexData::from_json ──► Err(InvalidKey | Json)
//!      │
//!      ▼
//! Explorer::load_index ─────────────► Err(UnknownIndex)
//!      │
//!      ▼ (Ok)
//! GenericTree (infallible)
//! ```
//!
//! An inverted range (`from > to`) is not an error either. It yields an empty
//! scan.

use thiserror::Error;

/// Errors that can occur when feeding caller data into the index.
#[derive(Error, Debug)]
pub enum Error {
	/// A key was NaN and cannot be ordered against other keys.
	///
	/// The explorer validates every key of a bulk load before touching the
	/// tree, so receiving this error means the index was left unchanged.
	#[error("index keys must be comparable numbers, got NaN")]
	InvalidKey,

	/// The requested index name is not present in the payload.
	#[error("no index data for `{0}`")]
	UnknownIndex(String),

	/// The index payload was not valid JSON or had the wrong shape.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
