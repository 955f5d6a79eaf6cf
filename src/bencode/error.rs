use thiserror::Error;

/// Errors that can occur while decoding or encoding bencode.
///
/// # Examples
///
/// ```
/// use bitcheck::bencode::{decode, decode_exact, DecodeError};
///
/// // Truncated input
/// let result = decode(b"i42");
/// assert!(matches!(result, Err(DecodeError::Truncated)));
///
/// // Length header without the `:` separator
/// let result = decode(b"5hello");
/// assert!(matches!(result, Err(DecodeError::StringFormat)));
///
/// // Trailing data under exact decode
/// let result = decode_exact(b"i42eextra");
/// assert!(matches!(result, Err(DecodeError::TrailingBytes(5))));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A value began with a byte that opens no production.
    #[error("unrecognized leading byte 0x{0:02x}")]
    Format(u8),

    /// A string length header was malformed or not followed by `:`.
    #[error("malformed string length header")]
    StringFormat,

    /// An integer body did not parse as a signed 64-bit number.
    #[error("malformed integer: {0:?}")]
    IntegerFormat(String),

    /// Input ended before a complete value was parsed.
    #[error("unexpected end of input")]
    Truncated,

    /// Extra data remained after the value under exact decoding.
    #[error("{0} trailing byte(s) after value")]
    TrailingBytes(usize),

    /// Recursion limit (64 levels) exceeded to prevent stack overflow.
    #[error("nesting too deep")]
    NestingTooDeep,

    /// I/O error during encoding.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
