//! Error types for HPACK encoding and decoding.

/// Error type for HPACK codec operations.
///
/// Every decode error is fatal for the connection: once a block fails to
/// parse, the dynamic tables on the two endpoints can no longer be assumed
/// to match, so the caller is expected to treat the connection as suffering
/// a COMPRESSION_ERROR and tear it down rather than decode further blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HpackError {
    /// A prefixed integer decoded to a value above the configured maximum.
    #[error("integer value larger than the configured maximum")]
    IntegerValueTooLarge,

    /// A prefixed integer used more octets than allowed.
    #[error("integer encoded length is too long")]
    IntegerEncodedLengthTooLong,

    /// A string literal's on-wire length exceeds the configured maximum.
    #[error("string literal length is too long")]
    StringLiteralLengthTooLong,

    /// The input ended in the middle of a representation.
    #[error("truncated header block")]
    Truncated,

    /// A Huffman-coded string contained a bit pattern outside the code
    /// table, or the EOS code itself.
    #[error("invalid huffman code encountered")]
    HuffmanDecodeFailure,

    /// An index of zero, or one past the end of the joint static+dynamic
    /// address space.
    #[error("index {0} not found in the static or dynamic table")]
    InvalidIndex(u64),

    /// A dynamic table size update above the connection-negotiated maximum.
    #[error("size update to {0} exceeds the negotiated table maximum")]
    SizeUpdateTooLarge(u64),

    /// A dynamic table size update after the first header field of a block.
    #[error("size update not at the start of the header block")]
    SizeUpdateOutOfOrder,

    /// First-octet bit pattern matching no representation type. The five
    /// mask tests cover all 256 octet values, so this is unreachable unless
    /// the dispatch itself regresses.
    #[error("unknown representation type")]
    UnknownRepresentation,
}
