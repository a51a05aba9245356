//! Running aggregates over append-only columns.
//!
//! A [`VersionedAggregate`] records how one aggregate (sum, min, max or
//! count) evolves as records are appended, and answers reads as of any
//! past append position. [`ColumnAggregates`] keeps the aggregates declared
//! on the columns of one schema and feeds them from raw records.

pub mod column;
pub mod kind;
pub mod versioned;

pub use column::ColumnAggregates;
pub use kind::AggregateKind;
pub use versioned::{AggregateEntry, VersionedAggregate};
