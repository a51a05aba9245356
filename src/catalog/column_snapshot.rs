//! Column descriptors.

use crate::access::ColumnType;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Identifier of the index built over a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IndexId(pub u32);

/// Layout and index metadata of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub name: String,
    pub column_type: ColumnType,
    /// Byte offset of the column inside a record
    pub offset: u32,
    pub indexed: bool,
    pub index_id: IndexId,
    /// Quantization step used when building index keys
    pub index_bucket_size: u64,
}

impl ColumnSnapshot {
    pub fn new(name: impl Into<String>, column_type: ColumnType, offset: u32) -> Self {
        Self {
            name: name.into(),
            column_type,
            offset,
            indexed: false,
            index_id: IndexId::default(),
            index_bucket_size: 1,
        }
    }

    pub fn with_index(mut self, index_id: IndexId, index_bucket_size: u64) -> Self {
        self.indexed = true;
        self.index_id = index_id;
        self.index_bucket_size = index_bucket_size;
        self
    }

    /// Byte range the column occupies inside a record
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.column_type.size()
    }
}
