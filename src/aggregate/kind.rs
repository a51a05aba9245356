use crate::access::{Numeric, NumericKind};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported running aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    Sum,
    Min,
    Max,
    /// Sums deltas like `Sum`; callers feed a delta of one per record
    Count,
}

impl AggregateKind {
    /// Returns the name of the aggregate
    pub fn name(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "SUM",
            AggregateKind::Min => "MIN",
            AggregateKind::Max => "MAX",
            AggregateKind::Count => "COUNT",
        }
    }

    /// Identity value before any update
    pub fn neutral(&self, kind: NumericKind) -> Numeric {
        match self {
            AggregateKind::Sum | AggregateKind::Count => Numeric::zero(kind),
            AggregateKind::Min => Numeric::max_value(kind),
            AggregateKind::Max => Numeric::min_value(kind),
        }
    }

    /// Fold `delta` into `acc`; the result keeps `acc`'s kind
    pub fn combine(&self, acc: Numeric, delta: Numeric) -> Numeric {
        match self {
            AggregateKind::Sum | AggregateKind::Count => acc.add(delta),
            AggregateKind::Min => acc.min(delta),
            AggregateKind::Max => acc.max(delta),
        }
    }
}

impl FromStr for AggregateKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregateKind::Sum),
            "min" => Ok(AggregateKind::Min),
            "max" => Ok(AggregateKind::Max),
            "count" | "cnt" => Ok(AggregateKind::Count),
            _ => bail!("Unknown aggregate: {}", s),
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
