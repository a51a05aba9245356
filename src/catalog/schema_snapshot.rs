use crate::access::{read_timestamp, ColumnType, ImmutableValue, TIMESTAMP_SIZE};
use crate::catalog::column_snapshot::{ColumnSnapshot, IndexId};
use anyhow::{bail, Context, Result};
use log::debug;
use std::collections::HashMap;

/// Immutable, ordered column layout of a record
///
/// Accessors taking a column index `i` require `i < num_columns()` and a
/// record buffer at least `record_size()` bytes long; violating either is a
/// caller bug and panics.
#[derive(Debug, Clone)]
pub struct SchemaSnapshot {
    columns: Vec<ColumnSnapshot>,
    by_name: HashMap<String, usize>,
    record_size: usize,
}

impl SchemaSnapshot {
    /// Build a snapshot from descriptors, validating the layout
    pub fn new(columns: Vec<ColumnSnapshot>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if column.name.is_empty() {
                bail!("Column {} has an empty name", i);
            }
            if by_name.insert(column.name.clone(), i).is_some() {
                bail!("Duplicate column name: {}", column.name);
            }
            if (column.offset as usize) < TIMESTAMP_SIZE {
                bail!(
                    "Column {} at offset {} overlaps the timestamp prefix",
                    column.name,
                    column.offset
                );
            }
            if column.index_bucket_size == 0 {
                bail!("Column {} has a zero index bucket size", column.name);
            }
        }

        let mut ranges: Vec<_> = columns.iter().map(|c| (c.range(), &c.name)).collect();
        ranges.sort_by_key(|(range, _)| range.start);
        for pair in ranges.windows(2) {
            let (prev, prev_name) = &pair[0];
            let (next, next_name) = &pair[1];
            if prev.end > next.start {
                bail!("Columns {} and {} overlap", prev_name, next_name);
            }
        }

        let record_size = ranges
            .last()
            .map_or(TIMESTAMP_SIZE, |(range, _)| range.end);

        debug!(
            "Built schema snapshot with {} columns ({} byte records)",
            columns.len(),
            record_size
        );

        Ok(Self {
            columns,
            by_name,
            record_size,
        })
    }

    /// Typed view over column `i` of `record`
    pub fn get<'r>(&self, record: &'r [u8], i: usize) -> ImmutableValue<'r> {
        let column = &self.columns[i];
        ImmutableValue::new(column.column_type, &record[column.range()])
    }

    /// Order-preserving index key for column `i` of `record`
    pub fn get_key(&self, record: &[u8], i: usize) -> Vec<u8> {
        let column = &self.columns[i];
        column
            .column_type
            .key(&record[column.range()], column.index_bucket_size)
    }

    pub fn get_timestamp(&self, record: &[u8]) -> i64 {
        read_timestamp(record)
    }

    pub fn is_indexed(&self, i: usize) -> bool {
        self.columns[i].indexed
    }

    pub fn index_id(&self, i: usize) -> IndexId {
        self.columns[i].index_id
    }

    pub fn index_bucket_size(&self, i: usize) -> u64 {
        self.columns[i].index_bucket_size
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, i: usize) -> &ColumnSnapshot {
        &self.columns[i]
    }

    pub fn columns(&self) -> &[ColumnSnapshot] {
        &self.columns
    }

    /// Resolve an attribute name to its column index
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Minimum length of a record laid out by this schema
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Encode the column descriptors for shipping to another component
    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.columns)?)
    }

    /// Decode descriptors written by [`SchemaSnapshot::serialize`] and
    /// validate the layout again
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let columns: Vec<ColumnSnapshot> =
            bincode::deserialize(data).context("Failed to decode schema snapshot")?;
        Self::new(columns)
    }
}

/// Assigns consecutive offsets after the timestamp prefix
#[derive(Debug)]
pub struct SchemaBuilder {
    columns: Vec<ColumnSnapshot>,
    next_offset: u32,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            next_offset: TIMESTAMP_SIZE as u32,
        }
    }

    pub fn column(self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.push(ColumnSnapshot::new(name, column_type, 0))
    }

    pub fn indexed_column(
        self,
        name: impl Into<String>,
        column_type: ColumnType,
        index_id: IndexId,
        index_bucket_size: u64,
    ) -> Self {
        self.push(ColumnSnapshot::new(name, column_type, 0).with_index(index_id, index_bucket_size))
    }

    fn push(mut self, mut column: ColumnSnapshot) -> Self {
        column.offset = self.next_offset;
        self.next_offset += column.column_type.size() as u32;
        self.columns.push(column);
        self
    }

    pub fn build(self) -> Result<SchemaSnapshot> {
        SchemaSnapshot::new(self.columns)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
