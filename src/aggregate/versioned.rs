//! Point-in-time readable running aggregates.

use crate::access::{Numeric, NumericKind};
use crate::aggregate::kind::AggregateKind;
use crossbeam_skiplist::SkipMap;
use log::trace;
use parking_lot::Mutex;

/// One step in an aggregate's history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateEntry {
    pub version: u64,
    pub value: Numeric,
}

/// Append-only history of one aggregate over a growing version axis.
///
/// The history starts with the aggregate's neutral element at version 0 and
/// gains one entry per update. Versions are strictly increasing, so a read
/// as of any version is the last entry at or before it.
///
/// Entries live in a lock-free skip list. An update publishes its entry with
/// a single insert, and readers never block: a concurrent reader sees the
/// history either before or after the append, never in between. Writers are
/// serialized among themselves so the monotonicity check and the insert act
/// as one step.
#[derive(Debug)]
pub struct VersionedAggregate {
    kind: AggregateKind,
    value_kind: NumericKind,
    history: SkipMap<u64, Numeric>,
    writer: Mutex<()>,
}

impl VersionedAggregate {
    pub fn new(value_kind: NumericKind, kind: AggregateKind) -> Self {
        let history = SkipMap::new();
        history.insert(0, kind.neutral(value_kind));
        Self {
            kind,
            value_kind,
            history,
            writer: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn value_kind(&self) -> NumericKind {
        self.value_kind
    }

    /// Fold `delta` into the aggregate at `version`.
    ///
    /// # Panics
    ///
    /// Panics if `version` is not greater than the last recorded version.
    pub fn update(&self, delta: Numeric, version: u64) {
        let _writer = self.writer.lock();
        let last = self.last_entry();
        assert!(
            version > last.version,
            "Aggregate version {} is not greater than the last recorded version {}",
            version,
            last.version
        );

        let value = self.kind.combine(last.value, delta);
        trace!(
            "{} aggregate: {} + {} -> {} at version {}",
            self.kind,
            last.value,
            delta,
            value,
            version
        );
        self.history.insert(version, value);
    }

    /// Aggregate value as of `version`
    ///
    /// Returns the most recent entry at or before `version`; versions past
    /// the last update read the latest value.
    pub fn get(&self, version: u64) -> Numeric {
        // The seed at version 0 bounds every search from below
        self.history
            .range(..=version)
            .next_back()
            .map_or_else(|| self.neutral(), |entry| *entry.value())
    }

    pub fn latest(&self) -> Numeric {
        self.last_entry().value
    }

    pub fn last_version(&self) -> u64 {
        self.last_entry().version
    }

    /// Number of entries, including the seed
    pub fn num_entries(&self) -> usize {
        self.history.len()
    }

    /// Snapshot of the history in version order
    pub fn entries(&self) -> Vec<AggregateEntry> {
        self.history
            .iter()
            .map(|entry| AggregateEntry {
                version: *entry.key(),
                value: *entry.value(),
            })
            .collect()
    }

    fn last_entry(&self) -> AggregateEntry {
        self.history.back().map_or(
            AggregateEntry {
                version: 0,
                value: self.neutral(),
            },
            |entry| AggregateEntry {
                version: *entry.key(),
                value: *entry.value(),
            },
        )
    }

    fn neutral(&self) -> Numeric {
        self.kind.neutral(self.value_kind)
    }
}
