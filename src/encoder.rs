//! HPACK encoder (RFC 7541 Section 6, encoding side).

use crate::error::HpackError;
use crate::huffman;
use crate::integer::encode_prefix_int;
use crate::table::{find_static_name, find_static_pair, DynamicTable};
use crate::Header;

/// HPACK encoder.
///
/// One encoder per connection direction, living as long as the connection:
/// the dynamic table is compression history shared with the peer's decoder
/// through the wire bytes alone, and must never leak across sessions.
pub struct Encoder {
    table: DynamicTable,
    pending_size_update: bool,
}

impl Encoder {
    /// Create an encoder with the negotiated dynamic table size cap.
    pub fn new(max_dynamic_table_size: usize) -> Self {
        Self {
            table: DynamicTable::new(max_dynamic_table_size),
            pending_size_update: false,
        }
    }

    /// Encode a header list into one header block, with Huffman compression
    /// and incremental indexing. Sensitive headers come out never-indexed.
    ///
    /// Errors are reserved for configured-limit violations; no current
    /// encoding path produces one.
    pub fn encode(&mut self, headers: &[Header]) -> Result<Vec<u8>, HpackError> {
        let mut block = Vec::new();
        for header in headers {
            self.encode_field(header, true, true, &mut block)?;
        }
        Ok(block)
    }

    /// Encode one header with incremental indexing (RFC 7541 Appendix
    /// C.2.1), adding non-sensitive literals to the dynamic table.
    pub fn encode_indexed(
        &mut self,
        header: &Header,
        huffman: bool,
    ) -> Result<Vec<u8>, HpackError> {
        let mut block = Vec::new();
        self.encode_field(header, huffman, true, &mut block)?;
        Ok(block)
    }

    /// Encode one header without touching the dynamic table (RFC 7541
    /// Appendix C.2.2).
    pub fn encode_no_dynamic_indexing(
        &mut self,
        header: &Header,
        huffman: bool,
    ) -> Result<Vec<u8>, HpackError> {
        let mut block = Vec::new();
        self.encode_field(header, huffman, false, &mut block)?;
        Ok(block)
    }

    /// Lower or restore the dynamic table cap, evicting immediately.
    ///
    /// The next encoded field is preceded by an on-wire size update so the
    /// peer's decoder follows along, even when the cap is unchanged.
    pub fn set_dynamic_table_max_size(&mut self, max_size: usize) {
        self.table.set_max_size(max_size);
        self.pending_size_update = true;
    }

    /// Read-only view of the dynamic table.
    pub fn dynamic_table(&self) -> &DynamicTable {
        &self.table
    }

    fn encode_field(
        &mut self,
        header: &Header,
        huffman: bool,
        index: bool,
        block: &mut Vec<u8>,
    ) -> Result<(), HpackError> {
        if self.pending_size_update {
            // Dynamic table size update (Section 6.3): 001xxxxx, 5-bit prefix.
            encode_prefix_int(block, self.table.max_size() as u64, 5, 0x20);
            self.pending_size_update = false;
        }

        if header.sensitive {
            // Literal never indexed (Section 6.2.3): 0001xxxx, 4-bit prefix.
            // Only a static index may stand in for the name; the value is
            // always literal and nothing reaches the dynamic table.
            match find_static_name(&header.name) {
                Some(name_index) => encode_prefix_int(block, name_index as u64, 4, 0x10),
                None => {
                    block.push(0x10);
                    encode_string_literal(block, &header.name, huffman);
                }
            }
            encode_string_literal(block, &header.value, huffman);
            return Ok(());
        }

        if let Some(found) = self.find_pair(&header.name, &header.value) {
            // Indexed header field (Section 6.1): 1xxxxxxx, 7-bit prefix.
            encode_prefix_int(block, found as u64, 7, 0x80);
            return Ok(());
        }

        let (pattern, prefix_bits) = if index {
            // Literal with incremental indexing (Section 6.2.1): 01xxxxxx.
            (0x40, 6)
        } else {
            // Literal without indexing (Section 6.2.2): 0000xxxx.
            (0x00, 4)
        };
        match self.find_name(&header.name) {
            Some(name_index) => encode_prefix_int(block, name_index as u64, prefix_bits, pattern),
            None => {
                block.push(pattern);
                encode_string_literal(block, &header.name, huffman);
            }
        }
        encode_string_literal(block, &header.value, huffman);
        if index {
            self.table.insert(header.name.clone(), header.value.clone());
        }
        Ok(())
    }

    /// Smallest wire index carrying both name and value, static table first.
    fn find_pair(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        find_static_pair(name, value).or_else(|| self.table.find_pair(name, value))
    }

    /// Smallest wire index carrying the name, static table first.
    fn find_name(&self, name: &[u8]) -> Option<usize> {
        find_static_name(name).or_else(|| self.table.find_name(name))
    }
}

/// String literal (Section 5.2): H flag in the top bit of the 7-bit-prefix
/// length, then the payload octets.
fn encode_string_literal(block: &mut Vec<u8>, data: &[u8], huffman: bool) {
    if huffman {
        let encoded = huffman::encode(data);
        encode_prefix_int(block, encoded.len() as u64, 7, 0x80);
        block.extend_from_slice(&encoded);
    } else {
        encode_prefix_int(block, data.len() as u64, 7, 0x00);
        block.extend_from_slice(data);
    }
}
