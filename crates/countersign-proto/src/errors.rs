//! Protocol error types.

use thiserror::Error;

/// Convenience result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors from parsing or building wire frames and payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer is too short to contain a frame header.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },

    /// Header claims more payload bytes than the buffer contains.
    #[error("frame truncated: header claims {expected} payload bytes, got {actual}")]
    FrameTruncated {
        /// Payload size claimed by the header.
        expected: usize,
        /// Payload bytes actually available.
        actual: usize,
    },

    /// Magic number does not identify a Countersign frame.
    #[error("invalid magic number")]
    InvalidMagic,

    /// Protocol version is not supported by this implementation.
    #[error("unsupported protocol version: {0:#04x}")]
    UnsupportedVersion(u8),

    /// Opcode does not map to a known payload type.
    #[error("unknown opcode: {0:#06x}")]
    UnknownOpcode(u16),

    /// Payload exceeds the protocol size limit.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Offending payload size in bytes.
        size: usize,
        /// Maximum allowed payload size in bytes.
        max: usize,
    },

    /// CBOR serialization or deserialization failed.
    #[error("codec error: {detail}")]
    Codec {
        /// Underlying codec failure, stringified.
        detail: String,
    },
}
