use crate::access::numeric::Numeric;
use crate::catalog::SchemaSnapshot;
use anyhow::{bail, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Bytes reserved for the timestamp prefix of every record
pub const TIMESTAMP_SIZE: usize = 8;

/// Read the timestamp prefix of a raw record
pub fn read_timestamp(record: &[u8]) -> i64 {
    LittleEndian::read_i64(&record[..TIMESTAMP_SIZE])
}

/// Lays out a raw record for a schema snapshot
///
/// Columns that are never set stay zeroed.
pub struct RecordBuilder<'s> {
    schema: &'s SchemaSnapshot,
    data: Vec<u8>,
}

impl<'s> RecordBuilder<'s> {
    pub fn new(schema: &'s SchemaSnapshot) -> Self {
        Self {
            schema,
            data: vec![0u8; schema.record_size()],
        }
    }

    pub fn set_timestamp(&mut self, timestamp: i64) -> &mut Self {
        LittleEndian::write_i64(&mut self.data[..TIMESTAMP_SIZE], timestamp);
        self
    }

    /// Set column `i` from literal text
    pub fn set(&mut self, i: usize, literal: &str) -> Result<&mut Self> {
        let column = self.schema.column(i);
        let encoded = column.column_type.parse_literal(literal)?;
        self.data[column.range()].copy_from_slice(&encoded);
        Ok(self)
    }

    /// Set numeric column `i`, converting `value` to the column's kind
    pub fn set_numeric(&mut self, i: usize, value: Numeric) -> Result<&mut Self> {
        let column = self.schema.column(i);
        if column.column_type.numeric_kind().is_none() {
            bail!(
                "Column {} has non-numeric type {}",
                column.name,
                column.column_type
            );
        }
        let range = column.range();
        column
            .column_type
            .write_numeric(&mut self.data[range], value)?;
        Ok(self)
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
