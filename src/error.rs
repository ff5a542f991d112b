#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Not enough bytes")]
    NotEnoughData { actual: usize, minimum: usize },

    /// EOF before the packet boundary promised by the primary header.
    #[error("file truncated inside a packet at offset {offset}")]
    TruncatedFile { offset: u64 },

    /// The payload bit stream ran out mid-field or mid-symbol.
    #[error("payload exhausted at bit {position}")]
    TruncatedPayload { position: usize },

    /// BAQ 3/4/5-bit payloads are reserved and cannot be decoded.
    #[error("BAQ mode {0} is not supported for sample decoding")]
    UnsupportedBaq(u8),

    #[error("reserved code {value} in field {field}")]
    ReservedEnumValue { field: &'static str, value: u8 },

    /// A decode selection must share a single `num_quads` value.
    #[error("selection mixes num_quads {first} and {other}")]
    InconsistentChunk { first: u16, other: u16 },

    /// No Huffman leaf matches the next bits within the maximum code length.
    #[error("bit pattern {pattern:#b} matches no code for BRC {brc}")]
    HuffmanOverflow { brc: u8, pattern: u32 },

    /// A block bit-rate code outside 0..=4 was read from the payload.
    #[error("invalid BRC value {0}")]
    InvalidBrc(u8),

    #[error("row {index} out of bounds for table of {len} packets")]
    RowOutOfBounds { index: usize, len: usize },

    /// Sample decoding was requested for a packet without a secondary header.
    #[error("packet {index} has no secondary header")]
    MissingSecondaryHeader { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
