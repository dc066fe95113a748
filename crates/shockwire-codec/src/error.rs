//! Error types for the codec layer.
//!
//! A `CodecError` always means one frame failed to decode. It is
//! recoverable at the frame boundary: the transport drops the frame and
//! keeps the connection.

/// Errors raised while decoding a single frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer ended before the current value was complete.
    ///
    /// A truncated frame fails fast with this; nothing at this layer
    /// blocks or waits for more bytes.
    #[error("buffer underrun: needed {needed} more byte(s), {remaining} left")]
    BufferUnderrun {
        /// How many further bytes the current value required.
        needed: usize,
        /// How many bytes were actually left in the buffer.
        remaining: usize,
    },

    /// The bytes were present but not a valid encoding.
    ///
    /// Raised for non-base64 length digits, invalid UTF-8 in string
    /// payloads, and unpaired UTF-16 surrogates.
    #[error("format error: {0}")]
    FormatError(String),

    /// A value exceeded the range its encoding can represent.
    ///
    /// Raised for varints that run past five chunks, overflow 32 bits,
    /// or use a non-minimal encoding.
    #[error("value out of range: {0}")]
    OutOfRange(String),
}
