//! HPACK decoder (RFC 7541 Section 6, decoding side).
//!
//! `decode` consumes one complete, reassembled header block left to right,
//! dispatching each field on the high bits of its first octet. Any error is
//! fatal for the connection: after a failed block the peer's dynamic table
//! can no longer be assumed to match this one.

use bytes::Bytes;

use crate::error::HpackError;
use crate::huffman;
use crate::integer::{
    decode_prefix_int_bounded, PrefixedInt, DEFAULT_MAX_INTEGER_ENCODED_LENGTH,
    DEFAULT_MAX_INTEGER_VALUE,
};
use crate::table::{static_entry, DynamicTable, STATIC_TABLE_LEN};
use crate::Header;

/// Default cap on a string literal's on-wire length (64 KiB).
pub const DEFAULT_MAX_STRING_LITERAL_LENGTH: usize = 64 * 1024;

/// The five wire forms a header field can take (RFC 7541 Section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Representation {
    /// `1xxxxxxx`: fully indexed field.
    Indexed,
    /// `01xxxxxx`: literal, added to the dynamic table.
    LiteralWithIndexing,
    /// `001xxxxx`: dynamic table size update.
    SizeUpdate,
    /// `0001xxxx`: literal that no table anywhere may ever hold.
    LiteralNeverIndexed,
    /// `0000xxxx`: literal, not added to the dynamic table.
    LiteralWithoutIndexing,
}

impl Representation {
    /// Classify a field by its first octet. The masks are tested
    /// most-specific-first; the all-zero pattern is whatever remains.
    fn of(octet: u8) -> Self {
        if octet & 0x80 != 0 {
            Representation::Indexed
        } else if octet & 0x40 != 0 {
            Representation::LiteralWithIndexing
        } else if octet & 0x20 != 0 {
            Representation::SizeUpdate
        } else if octet & 0x10 != 0 {
            Representation::LiteralNeverIndexed
        } else {
            Representation::LiteralWithoutIndexing
        }
    }
}

/// HPACK decoder.
///
/// One decoder per connection direction, living as long as the connection.
/// The parse limits bound attacker-controlled work before rejection; they
/// default to `2^32 - 1` for integer values, six octets per integer, and
/// 64 KiB per string literal (measured on the wire, before Huffman
/// expansion).
pub struct Decoder {
    table: DynamicTable,
    /// Cap negotiated out of band (HTTP/2 SETTINGS); in-band size updates
    /// may not exceed it.
    negotiated_max_size: usize,
    max_integer_value: u64,
    max_integer_encoded_length: usize,
    max_string_literal_length: usize,
}

impl Decoder {
    /// Create a decoder with the negotiated dynamic table size cap.
    pub fn new(max_dynamic_table_size: usize) -> Self {
        Self {
            table: DynamicTable::new(max_dynamic_table_size),
            negotiated_max_size: max_dynamic_table_size,
            max_integer_value: DEFAULT_MAX_INTEGER_VALUE,
            max_integer_encoded_length: DEFAULT_MAX_INTEGER_ENCODED_LENGTH,
            max_string_literal_length: DEFAULT_MAX_STRING_LITERAL_LENGTH,
        }
    }

    /// Decode one complete header block into its header list, field order
    /// preserved.
    pub fn decode(&mut self, block: &[u8]) -> Result<Vec<Header>, HpackError> {
        let mut headers = Vec::new();
        let mut buf = block;
        // Size updates are only valid before the first field of a block
        // (RFC 7541 Section 4.2).
        let mut updates_allowed = true;

        while let Some(&first) = buf.first() {
            match Representation::of(first) {
                Representation::Indexed => {
                    let int = self.read_int(buf, 7)?;
                    buf = &buf[int.consumed..];
                    let (name, value) = self.field_at(int.value)?;
                    headers.push(Header {
                        name,
                        value,
                        sensitive: false,
                    });
                    updates_allowed = false;
                }
                Representation::LiteralWithIndexing => {
                    let (rest, name, value) = self.read_literal(buf, 6)?;
                    buf = rest;
                    self.table.insert(name.clone(), value.clone());
                    headers.push(Header {
                        name,
                        value,
                        sensitive: false,
                    });
                    updates_allowed = false;
                }
                Representation::SizeUpdate => {
                    if !updates_allowed {
                        return Err(HpackError::SizeUpdateOutOfOrder);
                    }
                    let int = self.read_int(buf, 5)?;
                    buf = &buf[int.consumed..];
                    if int.value > self.negotiated_max_size as u64 {
                        return Err(HpackError::SizeUpdateTooLarge(int.value));
                    }
                    self.table.set_max_size(int.value as usize);
                }
                Representation::LiteralNeverIndexed => {
                    let (rest, name, value) = self.read_literal(buf, 4)?;
                    buf = rest;
                    headers.push(Header {
                        name,
                        value,
                        sensitive: true,
                    });
                    updates_allowed = false;
                }
                Representation::LiteralWithoutIndexing => {
                    let (rest, name, value) = self.read_literal(buf, 4)?;
                    buf = rest;
                    headers.push(Header {
                        name,
                        value,
                        sensitive: false,
                    });
                    updates_allowed = false;
                }
            }
        }
        Ok(headers)
    }

    /// Change the negotiated dynamic table cap (a SETTINGS change),
    /// evicting immediately. In-band size updates are validated against
    /// this bound.
    pub fn set_dynamic_table_max_size(&mut self, max_size: usize) {
        self.negotiated_max_size = max_size;
        self.table.set_max_size(max_size);
    }

    /// Cap decoded integer values; larger ones fail the block.
    pub fn set_max_integer_value(&mut self, max: u64) {
        self.max_integer_value = max;
    }

    /// Cap the octet length of a single encoded integer.
    pub fn set_max_integer_encoded_length(&mut self, max: usize) {
        self.max_integer_encoded_length = max;
    }

    /// Cap string literal lengths. Measured against the on-wire octet
    /// count, not the Huffman-decoded size.
    pub fn set_max_string_literal_length(&mut self, max: usize) {
        self.max_string_literal_length = max;
    }

    /// Read-only view of the dynamic table.
    pub fn dynamic_table(&self) -> &DynamicTable {
        &self.table
    }

    fn read_int(&self, buf: &[u8], prefix_bits: u8) -> Result<PrefixedInt, HpackError> {
        decode_prefix_int_bounded(
            buf,
            prefix_bits,
            self.max_integer_value,
            self.max_integer_encoded_length,
        )
    }

    /// Parse a literal field body: name (indexed or literal), then value.
    fn read_literal<'a>(
        &self,
        buf: &'a [u8],
        prefix_bits: u8,
    ) -> Result<(&'a [u8], Bytes, Bytes), HpackError> {
        let int = self.read_int(buf, prefix_bits)?;
        let mut rest = &buf[int.consumed..];
        let name = if int.value == 0 {
            let (name, consumed) = self.read_string(rest)?;
            rest = &rest[consumed..];
            name
        } else {
            self.field_at(int.value)?.0
        };
        let (value, consumed) = self.read_string(rest)?;
        rest = &rest[consumed..];
        Ok((rest, name, value))
    }

    /// Name and value at an index of the joint address space.
    fn field_at(&self, index: u64) -> Result<(Bytes, Bytes), HpackError> {
        if index == 0 {
            return Err(HpackError::InvalidIndex(index));
        }
        if index <= STATIC_TABLE_LEN as u64 {
            // Bound checked above; the static table is total over 1..=61.
            let (name, value) =
                static_entry(index as usize).ok_or(HpackError::InvalidIndex(index))?;
            return Ok((Bytes::from_static(name), Bytes::from_static(value)));
        }
        let position = (index - STATIC_TABLE_LEN as u64 - 1) as usize;
        let entry = self
            .table
            .get(position)
            .ok_or(HpackError::InvalidIndex(index))?;
        Ok((entry.name.clone(), entry.value.clone()))
    }

    /// String literal (Section 5.2): H flag and 7-bit-prefix length, then
    /// the payload octets, Huffman-decoded when the flag is set.
    fn read_string(&self, buf: &[u8]) -> Result<(Bytes, usize), HpackError> {
        let int = self.read_int(buf, 7)?;
        if int.value > self.max_string_literal_length as u64 {
            return Err(HpackError::StringLiteralLengthTooLong);
        }
        let len = int.value as usize;
        let rest = &buf[int.consumed..];
        if rest.len() < len {
            return Err(HpackError::Truncated);
        }
        let payload = &rest[..len];
        let data = if int.flags & 0x80 != 0 {
            Bytes::from(huffman::decode(payload)?)
        } else {
            Bytes::copy_from_slice(payload)
        };
        Ok((data, int.consumed + len))
    }
}
