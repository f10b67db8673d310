#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// An `i64`-keyed open-addressing map using double hashing.
///
/// This module provides [`Int64Map`] together with its iterator types.
pub mod int64_map;

/// A set of `i64` values built on [`Int64Map`].
pub mod int64_set;

mod probe;

#[cfg(any(test, feature = "stats"))]
mod stats;

pub use int64_map::Int64Map;
pub use int64_set::Int64Set;
pub use probe::LARGE_TABLE_BUCKETS;
pub use probe::MIN_BUCKETS;
pub use probe::REPAIR_HORIZON;
#[cfg(feature = "stats")]
pub use stats::ProbeStats;
