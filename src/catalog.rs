//! Column layout metadata.
//!
//! A [`SchemaSnapshot`] is the immutable, ordered set of column descriptors
//! used to interpret raw record bytes. Snapshots are built once and then
//! shared read-only by every evaluator and aggregate of a column family.

pub mod column_snapshot;
pub mod schema_snapshot;

pub use column_snapshot::{ColumnSnapshot, IndexId};
pub use schema_snapshot::{SchemaBuilder, SchemaSnapshot};
