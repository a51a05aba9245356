//! Typed access to raw, fixed-layout records.
//!
//! This module provides the pieces needed to interpret record bytes in place:
//!
//! - **ColumnType**: the column type registry (size, literal parsing, ordering, key transform)
//! - **ImmutableValue**: a borrowed, typed view over one column of a record
//! - **Numeric**: a tagged numeric value used by aggregation
//! - **RecordBuilder**: lays out records for producers and tests
//!
//! Every record starts with an 8-byte little-endian timestamp, followed by
//! columns at the fixed offsets recorded in a schema snapshot.

pub mod key;
pub mod numeric;
pub mod record;
pub mod value;

pub use numeric::{Numeric, NumericKind};
pub use record::{read_timestamp, RecordBuilder, TIMESTAMP_SIZE};
pub use value::{ColumnType, ImmutableValue};
