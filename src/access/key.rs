//! Order-preserving key transforms.
//!
//! Index keys compare bytewise, so each transform maps a column value to a
//! big-endian byte string whose lexicographic order matches the value order.
//! Numeric values are first quantized by the column's bucket size so that
//! every value inside one bucket produces the same key.

/// Encode a signed integer quantized by `bucket_size` into `width` bytes.
///
/// `value` must be representable in `width` bytes.
pub fn encode_signed(value: i64, bucket_size: u64, width: usize) -> Vec<u8> {
    debug_assert!((1..=8).contains(&width));
    let bucket = i64::try_from(bucket_size.max(1)).unwrap_or(i64::MAX);
    let quantized = value.div_euclid(bucket);
    let biased = (quantized as u64) ^ (1u64 << (width * 8 - 1));
    biased.to_be_bytes()[8 - width..].to_vec()
}

/// Encode a floating point value quantized by `bucket_size` into 8 bytes.
pub fn encode_float(value: f64, bucket_size: u64) -> Vec<u8> {
    let quantized = (value / bucket_size.max(1) as f64).floor();
    // -0.0 and 0.0 must collate together
    let quantized = if quantized == 0.0 { 0.0 } else { quantized };
    let bits = quantized.to_bits();
    let ordered = if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1u64 << 63)
    };
    ordered.to_be_bytes().to_vec()
}

pub fn encode_bool(value: bool) -> Vec<u8> {
    vec![value as u8]
}
