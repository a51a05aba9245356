use crate::access::{Numeric, NumericKind};
use crate::aggregate::kind::AggregateKind;
use crate::aggregate::versioned::VersionedAggregate;
use crate::catalog::SchemaSnapshot;
use anyhow::{bail, Result};
use log::debug;

/// Aggregates declared on the columns of one schema
///
/// Each declared aggregate occupies a slot, numbered in declaration order.
/// `append` feeds every slot from a single raw record at one version.
#[derive(Debug)]
pub struct ColumnAggregates {
    schema: SchemaSnapshot,
    aggregates: Vec<(usize, VersionedAggregate)>,
}

impl ColumnAggregates {
    pub fn new(schema: SchemaSnapshot) -> Self {
        Self {
            schema,
            aggregates: Vec::new(),
        }
    }

    pub fn schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    /// Declare `kind` on `column` and return its slot.
    ///
    /// Counts accumulate as longs; other aggregates keep the column's kind.
    pub fn add(&mut self, column: usize, kind: AggregateKind) -> Result<usize> {
        if column >= self.schema.num_columns() {
            bail!(
                "Column index {} out of range ({} columns)",
                column,
                self.schema.num_columns()
            );
        }
        if let Some(slot) = self.find(column, kind) {
            return Ok(slot);
        }

        let descriptor = self.schema.column(column);
        let value_kind = match (kind, descriptor.column_type.numeric_kind()) {
            (AggregateKind::Count, _) => NumericKind::Long,
            (_, Some(value_kind)) => value_kind,
            (_, None) => bail!(
                "Cannot aggregate {} over column {} of type {}",
                kind,
                descriptor.name,
                descriptor.column_type
            ),
        };

        debug!("Declared {} aggregate on column {}", kind, descriptor.name);
        self.aggregates
            .push((column, VersionedAggregate::new(value_kind, kind)));
        Ok(self.aggregates.len() - 1)
    }

    /// Slot of the aggregate `kind` on `column`, if declared
    pub fn find(&self, column: usize, kind: AggregateKind) -> Option<usize> {
        self.aggregates
            .iter()
            .position(|(c, agg)| *c == column && agg.kind() == kind)
    }

    /// Fold one raw record into every declared aggregate at `version`.
    ///
    /// # Panics
    ///
    /// Panics if `version` does not exceed the last appended version.
    pub fn append(&self, record: &[u8], version: u64) {
        for (column, aggregate) in &self.aggregates {
            let delta = match aggregate.kind() {
                AggregateKind::Count => Numeric::Long(1),
                _ => match self.schema.get(record, *column).to_numeric() {
                    Some(value) => value,
                    None => unreachable!("aggregates are only declared on numeric columns"),
                },
            };
            aggregate.update(delta, version);
        }
    }

    /// Value of the aggregate in `slot` as of `version`
    pub fn get(&self, slot: usize, version: u64) -> Numeric {
        self.aggregates[slot].1.get(version)
    }

    pub fn aggregate(&self, slot: usize) -> &VersionedAggregate {
        &self.aggregates[slot].1
    }

    pub fn num_aggregates(&self) -> usize {
        self.aggregates.len()
    }
}
