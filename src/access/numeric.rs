//! Numeric values with kind-dispatched arithmetic.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Primitive numeric kinds a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl NumericKind {
    pub fn is_integral(&self) -> bool {
        !matches!(self, NumericKind::Float | NumericKind::Double)
    }
}

/// A numeric value tagged with its kind.
///
/// Arithmetic converts the right-hand operand into the receiver's kind, so
/// an accumulator keeps the kind it was created with. Integer addition wraps.
#[derive(Debug, Clone, Copy)]
pub enum Numeric {
    Char(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Numeric {
    pub fn kind(&self) -> NumericKind {
        match self {
            Numeric::Char(_) => NumericKind::Char,
            Numeric::Short(_) => NumericKind::Short,
            Numeric::Int(_) => NumericKind::Int,
            Numeric::Long(_) => NumericKind::Long,
            Numeric::Float(_) => NumericKind::Float,
            Numeric::Double(_) => NumericKind::Double,
        }
    }

    pub fn zero(kind: NumericKind) -> Self {
        Numeric::Long(0).cast(kind)
    }

    /// Largest representable value of `kind` (finite for floats).
    pub fn max_value(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Char => Numeric::Char(i8::MAX),
            NumericKind::Short => Numeric::Short(i16::MAX),
            NumericKind::Int => Numeric::Int(i32::MAX),
            NumericKind::Long => Numeric::Long(i64::MAX),
            NumericKind::Float => Numeric::Float(f32::MAX),
            NumericKind::Double => Numeric::Double(f64::MAX),
        }
    }

    /// Smallest representable value of `kind` (finite for floats).
    pub fn min_value(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Char => Numeric::Char(i8::MIN),
            NumericKind::Short => Numeric::Short(i16::MIN),
            NumericKind::Int => Numeric::Int(i32::MIN),
            NumericKind::Long => Numeric::Long(i64::MIN),
            NumericKind::Float => Numeric::Float(f32::MIN),
            NumericKind::Double => Numeric::Double(f64::MIN),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match *self {
            Numeric::Char(v) => v as i64,
            Numeric::Short(v) => v as i64,
            Numeric::Int(v) => v as i64,
            Numeric::Long(v) => v,
            Numeric::Float(v) => v as i64,
            Numeric::Double(v) => v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Numeric::Char(v) => v as f64,
            Numeric::Short(v) => v as f64,
            Numeric::Int(v) => v as f64,
            Numeric::Long(v) => v as f64,
            Numeric::Float(v) => v as f64,
            Numeric::Double(v) => v,
        }
    }

    /// Convert into `kind` with `as` semantics (truncating, saturating for floats).
    pub fn cast(self, kind: NumericKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        if self.kind().is_integral() {
            let v = self.as_i64();
            match kind {
                NumericKind::Char => Numeric::Char(v as i8),
                NumericKind::Short => Numeric::Short(v as i16),
                NumericKind::Int => Numeric::Int(v as i32),
                NumericKind::Long => Numeric::Long(v),
                NumericKind::Float => Numeric::Float(v as f32),
                NumericKind::Double => Numeric::Double(v as f64),
            }
        } else {
            let v = self.as_f64();
            match kind {
                NumericKind::Char => Numeric::Char(v as i8),
                NumericKind::Short => Numeric::Short(v as i16),
                NumericKind::Int => Numeric::Int(v as i32),
                NumericKind::Long => Numeric::Long(v as i64),
                NumericKind::Float => Numeric::Float(v as f32),
                NumericKind::Double => Numeric::Double(v),
            }
        }
    }

    pub fn add(self, other: Numeric) -> Numeric {
        match (self, other.cast(self.kind())) {
            (Numeric::Char(a), Numeric::Char(b)) => Numeric::Char(a.wrapping_add(b)),
            (Numeric::Short(a), Numeric::Short(b)) => Numeric::Short(a.wrapping_add(b)),
            (Numeric::Int(a), Numeric::Int(b)) => Numeric::Int(a.wrapping_add(b)),
            (Numeric::Long(a), Numeric::Long(b)) => Numeric::Long(a.wrapping_add(b)),
            (Numeric::Float(a), Numeric::Float(b)) => Numeric::Float(a + b),
            (Numeric::Double(a), Numeric::Double(b)) => Numeric::Double(a + b),
            _ => unreachable!("cast yields the receiver's kind"),
        }
    }

    pub fn min(self, other: Numeric) -> Numeric {
        let other = other.cast(self.kind());
        if other < self {
            other
        } else {
            self
        }
    }

    pub fn max(self, other: Numeric) -> Numeric {
        let other = other.cast(self.kind());
        if other > self {
            other
        } else {
            self
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.kind().is_integral() && other.kind().is_integral() {
            Some(self.as_i64().cmp(&other.as_i64()))
        } else {
            self.as_f64().partial_cmp(&other.as_f64())
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Char(v) => write!(f, "{}", v),
            Numeric::Short(v) => write!(f, "{}", v),
            Numeric::Int(v) => write!(f, "{}", v),
            Numeric::Long(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{}", v),
            Numeric::Double(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Numeric {
                fn from(value: $ty) -> Self {
                    Numeric::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive!(
    i8 => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
);
