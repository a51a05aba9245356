use crate::access::key;
use crate::access::numeric::{Numeric, NumericKind};
use anyhow::{bail, Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Column types supported in a record layout
///
/// Multi-byte values are stored little-endian. `String(n)` is a fixed-width,
/// NUL-padded byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Bool,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    String(u32),
}

impl ColumnType {
    /// Width of the column in bytes
    pub fn size(&self) -> usize {
        match self {
            ColumnType::Bool | ColumnType::Char => 1,
            ColumnType::Short => 2,
            ColumnType::Int | ColumnType::Float => 4,
            ColumnType::Long | ColumnType::Double => 8,
            ColumnType::String(n) => *n as usize,
        }
    }

    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            ColumnType::Char => Some(NumericKind::Char),
            ColumnType::Short => Some(NumericKind::Short),
            ColumnType::Int => Some(NumericKind::Int),
            ColumnType::Long => Some(NumericKind::Long),
            ColumnType::Float => Some(NumericKind::Float),
            ColumnType::Double => Some(NumericKind::Double),
            ColumnType::Bool | ColumnType::String(_) => None,
        }
    }

    /// Encode filter literal text into this type's byte layout
    pub fn parse_literal(&self, text: &str) -> Result<Vec<u8>> {
        let mut data = vec![0u8; self.size()];
        match self {
            ColumnType::Bool => {
                data[0] = match text.to_ascii_lowercase().as_str() {
                    "true" | "1" => 1,
                    "false" | "0" => 0,
                    _ => bail!("Invalid boolean literal '{}'", text),
                };
            }
            ColumnType::Char => {
                let v: i8 = text
                    .parse()
                    .with_context(|| format!("Invalid char literal '{}'", text))?;
                data[0] = v as u8;
            }
            ColumnType::Short => {
                let v: i16 = text
                    .parse()
                    .with_context(|| format!("Invalid short literal '{}'", text))?;
                LittleEndian::write_i16(&mut data, v);
            }
            ColumnType::Int => {
                let v: i32 = text
                    .parse()
                    .with_context(|| format!("Invalid int literal '{}'", text))?;
                LittleEndian::write_i32(&mut data, v);
            }
            ColumnType::Long => {
                let v: i64 = text
                    .parse()
                    .with_context(|| format!("Invalid long literal '{}'", text))?;
                LittleEndian::write_i64(&mut data, v);
            }
            ColumnType::Float => {
                let v: f32 = text
                    .parse()
                    .with_context(|| format!("Invalid float literal '{}'", text))?;
                LittleEndian::write_f32(&mut data, v);
            }
            ColumnType::Double => {
                let v: f64 = text
                    .parse()
                    .with_context(|| format!("Invalid double literal '{}'", text))?;
                LittleEndian::write_f64(&mut data, v);
            }
            ColumnType::String(n) => {
                let bytes = text.as_bytes();
                if bytes.len() > *n as usize {
                    bail!(
                        "String literal '{}' is longer than the column width {}",
                        text,
                        n
                    );
                }
                data[..bytes.len()].copy_from_slice(bytes);
            }
        }
        Ok(data)
    }

    /// Compare two encodings of this type
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            ColumnType::Bool => (a[0] != 0).cmp(&(b[0] != 0)),
            ColumnType::Char => (a[0] as i8).cmp(&(b[0] as i8)),
            ColumnType::Short => LittleEndian::read_i16(a).cmp(&LittleEndian::read_i16(b)),
            ColumnType::Int => LittleEndian::read_i32(a).cmp(&LittleEndian::read_i32(b)),
            ColumnType::Long => LittleEndian::read_i64(a).cmp(&LittleEndian::read_i64(b)),
            ColumnType::Float => {
                compare_floats(LittleEndian::read_f32(a) as f64, LittleEndian::read_f32(b) as f64)
            }
            ColumnType::Double => {
                compare_floats(LittleEndian::read_f64(a), LittleEndian::read_f64(b))
            }
            ColumnType::String(_) => a.cmp(b),
        }
    }

    /// Order-preserving index key for an encoded value
    pub fn key(&self, data: &[u8], bucket_size: u64) -> Vec<u8> {
        match self {
            ColumnType::Bool => key::encode_bool(data[0] != 0),
            ColumnType::String(_) => data.to_vec(),
            ColumnType::Float | ColumnType::Double => {
                let value = self.read_numeric(data).map(|n| n.as_f64()).unwrap_or_default();
                key::encode_float(value, bucket_size)
            }
            _ => {
                let value = self.read_numeric(data).map(|n| n.as_i64()).unwrap_or_default();
                key::encode_signed(value, bucket_size, self.size())
            }
        }
    }

    /// Decode a numeric value, `None` for non-numeric types
    pub fn read_numeric(&self, data: &[u8]) -> Option<Numeric> {
        let value = match self {
            ColumnType::Char => Numeric::Char(data[0] as i8),
            ColumnType::Short => Numeric::Short(LittleEndian::read_i16(data)),
            ColumnType::Int => Numeric::Int(LittleEndian::read_i32(data)),
            ColumnType::Long => Numeric::Long(LittleEndian::read_i64(data)),
            ColumnType::Float => Numeric::Float(LittleEndian::read_f32(data)),
            ColumnType::Double => Numeric::Double(LittleEndian::read_f64(data)),
            ColumnType::Bool | ColumnType::String(_) => return None,
        };
        Some(value)
    }

    /// Encode a numeric value into `data`, converting it to this column's kind
    pub fn write_numeric(&self, data: &mut [u8], value: Numeric) -> Result<()> {
        let Some(kind) = self.numeric_kind() else {
            bail!("Column type {} is not numeric", self);
        };
        match value.cast(kind) {
            Numeric::Char(v) => data[0] = v as u8,
            Numeric::Short(v) => LittleEndian::write_i16(data, v),
            Numeric::Int(v) => LittleEndian::write_i32(data, v),
            Numeric::Long(v) => LittleEndian::write_i64(data, v),
            Numeric::Float(v) => LittleEndian::write_f32(data, v),
            Numeric::Double(v) => LittleEndian::write_f64(data, v),
        }
        Ok(())
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Char => write!(f, "char"),
            ColumnType::Short => write!(f, "short"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Long => write!(f, "long"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::String(n) => write!(f, "string({})", n),
        }
    }
}

/// Read-only typed view over one column of a raw record
///
/// The view borrows the record buffer; nothing is copied until a caller asks
/// for an owned representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmutableValue<'a> {
    column_type: ColumnType,
    data: &'a [u8],
}

impl<'a> ImmutableValue<'a> {
    pub fn new(column_type: ColumnType, data: &'a [u8]) -> Self {
        debug_assert_eq!(data.len(), column_type.size());
        Self { column_type, data }
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn to_numeric(&self) -> Option<Numeric> {
        self.column_type.read_numeric(self.data)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.column_type {
            ColumnType::Bool => Some(self.data[0] != 0),
            _ => None,
        }
    }

    /// String contents without NUL padding
    pub fn as_str(&self) -> Option<&'a str> {
        match self.column_type {
            ColumnType::String(_) => {
                let end = self
                    .data
                    .iter()
                    .rposition(|&b| b != 0)
                    .map_or(0, |i| i + 1);
                std::str::from_utf8(&self.data[..end]).ok()
            }
            _ => None,
        }
    }

    /// Compare against another encoding of the same column type
    pub fn compare_bytes(&self, other: &[u8]) -> Ordering {
        self.column_type.compare(self.data, other)
    }

    pub fn key(&self, bucket_size: u64) -> Vec<u8> {
        self.column_type.key(self.data, bucket_size)
    }
}

impl fmt::Display for ImmutableValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.to_numeric() {
            return write!(f, "{}", n);
        }
        if let Some(b) = self.as_bool() {
            return write!(f, "{}", b);
        }
        match self.as_str() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "{:?}", self.data),
        }
    }
}
