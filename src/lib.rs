//! Sans-IO HPACK (RFC 7541) header compression codec.
//!
//! This crate translates between logical header lists and the HPACK octet
//! stream used by HTTP/2. It is a pure codec: the caller feeds complete,
//! reassembled header blocks in and takes encoded blocks out. Frame-layer
//! reassembly (CONTINUATION), flow control, and I/O belong to the host.
//!
//! An [`Encoder`] and a [`Decoder`] each hold one dynamic table, the
//! stateful compression context of one connection direction. HTTP/2 pairs
//! exactly one of each per direction; create them when the connection is
//! set up and keep them for its lifetime. Any decode error means the two
//! endpoints' tables may have diverged, so the connection must be torn
//! down rather than decoded further.
//!
//! # Example
//!
//! ```
//! use protocol_hpack::{Decoder, Encoder, Header};
//!
//! let mut encoder = Encoder::new(4096);
//! let mut decoder = Decoder::new(4096);
//!
//! let headers = vec![
//!     Header::new(b":method", b"GET"),
//!     Header::new(b":path", b"/"),
//!     Header::new(b":authority", b"www.example.com"),
//!     Header::sensitive(b"authorization", b"Basic dG9rZW4="),
//! ];
//!
//! let block = encoder.encode(&headers)?;
//! let decoded = decoder.decode(&block)?;
//! assert_eq!(decoded, headers);
//! # Ok::<(), protocol_hpack::HpackError>(())
//! ```
//!
//! # Per-field control
//!
//! ```
//! use protocol_hpack::{Encoder, Header};
//!
//! let mut encoder = Encoder::new(4096);
//! let mut wire = Vec::new();
//!
//! // Cacheable header: incremental indexing, caller-chosen Huffman.
//! wire.extend(encoder.encode_indexed(&Header::new(b"x-request-id", b"abc123"), true)?);
//!
//! // One-off header: leave the dynamic table untouched.
//! wire.extend(encoder.encode_no_dynamic_indexing(&Header::new(b":path", b"/one-off"), false)?);
//! # let _ = wire;
//! # Ok::<(), protocol_hpack::HpackError>(())
//! ```

mod decoder;
mod encoder;
mod error;
pub mod huffman;
mod integer;
mod table;

use bytes::Bytes;

pub use decoder::{Decoder, DEFAULT_MAX_STRING_LITERAL_LENGTH};
pub use encoder::Encoder;
pub use error::HpackError;
pub use integer::{
    decode_prefix_int, decode_prefix_int_bounded, encode_prefix_int, PrefixedInt,
    DEFAULT_MAX_INTEGER_ENCODED_LENGTH, DEFAULT_MAX_INTEGER_VALUE,
};
pub use table::{DynamicTable, TableEntry, STATIC_TABLE_LEN};

/// A single header field: name, value, and a sensitivity marker.
///
/// `sensitive` is an out-of-band instruction that the field must never
/// enter a dynamic table on either side of the connection, nor be reindexed
/// by an intermediary. The encoder turns it into the never-indexed wire
/// form; the decoder sets it when that form arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: Bytes,
    pub value: Bytes,
    pub sensitive: bool,
}

impl Header {
    /// Create a regular header field.
    pub fn new(name: &[u8], value: &[u8]) -> Self {
        Self {
            name: Bytes::copy_from_slice(name),
            value: Bytes::copy_from_slice(value),
            sensitive: false,
        }
    }

    /// Create a header field that must never be indexed.
    pub fn sensitive(name: &[u8], value: &[u8]) -> Self {
        Self {
            sensitive: true,
            ..Self::new(name, value)
        }
    }
}
