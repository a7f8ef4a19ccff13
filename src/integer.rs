//! Prefixed-integer codec (RFC 7541 Section 5.1).
//!
//! An HPACK integer shares its first octet with representation flag bits:
//! the low `prefix_bits` carry the integer, the high bits belong to the
//! caller. Values that do not fit the prefix spill into 7-bit continuation
//! octets, least-significant group first.

use crate::error::HpackError;

/// Default cap on a decoded integer value (`2^32 - 1`).
pub const DEFAULT_MAX_INTEGER_VALUE: u64 = (1 << 32) - 1;

/// Default cap on the encoded length of one integer, in octets, counting
/// the prefix octet.
pub const DEFAULT_MAX_INTEGER_ENCODED_LENGTH: usize = 6;

/// A decoded prefixed integer.
///
/// `flags` carries the first octet's bits above the prefix, so a single
/// decode routine serves both plain integers and flag-carrying call sites
/// (most notably the H bit of string literals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixedInt {
    /// Bits of the first octet above the integer prefix.
    pub flags: u8,
    /// The decoded value.
    pub value: u64,
    /// Octets consumed from the input.
    pub consumed: usize,
}

/// Encode `value` under a prefix of `prefix_bits` bits (1..=8), OR-ing
/// `pattern` into the first octet.
pub fn encode_prefix_int(buf: &mut Vec<u8>, value: u64, prefix_bits: u8, pattern: u8) {
    debug_assert!((1..=8).contains(&prefix_bits));
    let max = (1u64 << prefix_bits) - 1;
    if value < max {
        buf.push(pattern | value as u8);
        return;
    }
    buf.push(pattern | max as u8);
    let mut remaining = value - max;
    while remaining >= 128 {
        buf.push(0x80 | (remaining & 0x7f) as u8);
        remaining >>= 7;
    }
    buf.push(remaining as u8);
}

/// Decode a prefixed integer under the default limits.
pub fn decode_prefix_int(buf: &[u8], prefix_bits: u8) -> Result<PrefixedInt, HpackError> {
    decode_prefix_int_bounded(
        buf,
        prefix_bits,
        DEFAULT_MAX_INTEGER_VALUE,
        DEFAULT_MAX_INTEGER_ENCODED_LENGTH,
    )
}

/// Decode a prefixed integer, rejecting values above `max_value` and
/// encodings longer than `max_encoded_len` octets.
pub fn decode_prefix_int_bounded(
    buf: &[u8],
    prefix_bits: u8,
    max_value: u64,
    max_encoded_len: usize,
) -> Result<PrefixedInt, HpackError> {
    debug_assert!((1..=8).contains(&prefix_bits));
    let first = *buf.first().ok_or(HpackError::Truncated)?;
    let mask = ((1u16 << prefix_bits) - 1) as u8;
    let flags = first & !mask;
    let mut value = u64::from(first & mask);
    if value < u64::from(mask) {
        return Ok(PrefixedInt {
            flags,
            value,
            consumed: 1,
        });
    }

    let mut shift = 0u32;
    for (i, &octet) in buf[1..].iter().enumerate() {
        value = u64::from(octet & 0x7f)
            .checked_shl(shift)
            .and_then(|v| value.checked_add(v))
            .ok_or(HpackError::IntegerValueTooLarge)?;
        if octet & 0x80 == 0 {
            if value > max_value {
                return Err(HpackError::IntegerValueTooLarge);
            }
            return Ok(PrefixedInt {
                flags,
                value,
                consumed: i + 2,
            });
        }
        // i + 2 octets consumed so far; a further continuation octet would
        // run past the cap.
        if i + 2 >= max_encoded_len {
            return Err(HpackError::IntegerEncodedLengthTooLong);
        }
        shift += 7;
    }
    Err(HpackError::Truncated)
}
