//! MAVLink error types

use thiserror::Error;

use super::FieldType;

/// MAVLink protocol errors
///
/// Frame-level variants are produced by [`Codec::decode`](super::Codec::decode)
/// and by the stream resync; the connection turns every one of them into a
/// bad-data sentinel instead of surfacing it. The remaining variants come from
/// schema, registry and message construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Frame too short to hold a header
    #[error("unable to unpack MAVLink header: need {needed} bytes, got {got}")]
    HeaderUnpack {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// First byte is not the frame marker
    #[error("bad prefix ({found:#04x})")]
    BadPrefix {
        /// Offending byte
        found: u8,
    },

    /// Header length field disagrees with the frame size
    #[error("invalid MAVLink message length: got {actual}, expected {declared}, msgId={message_id}")]
    LengthMismatch {
        /// Payload length declared in the header
        declared: usize,
        /// Payload bytes actually present
        actual: usize,
        /// Message id from the header
        message_id: u8,
    },

    /// Message id absent from the registry
    #[error("unknown MAVLink message id ({message_id})")]
    UnknownMessage {
        /// Message id
        message_id: u8,
    },

    /// Frame too short to hold the checksum trailer
    #[error("unable to unpack MAVLink CRC: frame is {got} bytes")]
    ChecksumUnpack {
        /// Frame size
        got: usize,
    },

    /// Checksum mismatch
    #[error("invalid MAVLink CRC in msgId {message_id}: got {found:#06x}, calculated {expected:#06x}")]
    ChecksumMismatch {
        /// Message id from the header
        message_id: u8,
        /// Checksum computed over the received bytes
        expected: u16,
        /// Checksum carried by the frame
        found: u16,
    },

    /// Payload does not match the schema wire format
    #[error("unable to unpack MAVLink payload for {message}: expected {expected} bytes, got {got}")]
    PayloadUnpack {
        /// Message name
        message: String,
        /// Payload width from the schema
        expected: usize,
        /// Payload bytes present
        got: usize,
    },

    /// Two schemas share an id
    #[error("duplicate message id {message_id}")]
    DuplicateMessageId {
        /// Message id
        message_id: u8,
    },

    /// Two schemas share a name
    #[error("duplicate message name {name}")]
    DuplicateMessageName {
        /// Message name
        name: String,
    },

    /// Two fields of one schema share a name
    #[error("duplicate field {field} in message {message}")]
    DuplicateFieldName {
        /// Message name
        message: String,
        /// Field name
        field: String,
    },

    /// Schema payload does not fit in a frame
    #[error("payload too large for {message}: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Message name
        message: String,
        /// Payload size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Message name absent from the registry
    #[error("unknown MAVLink message name {name}")]
    UnknownMessageName {
        /// Message name
        name: String,
    },

    /// Wrong number of field values for a message
    #[error("message {message} takes {expected} fields, got {got}")]
    FieldCount {
        /// Message name
        message: String,
        /// Declared field count
        expected: usize,
        /// Supplied value count
        got: usize,
    },

    /// Field value does not match its declared type
    #[error("field {field} of {message} expects {expected}")]
    FieldMismatch {
        /// Message name
        message: String,
        /// Field name
        field: String,
        /// Declared field type
        expected: FieldType,
    },

    /// Field name absent from a message
    #[error("message {message} has no field {field}")]
    UnknownField {
        /// Message name
        message: String,
        /// Field name
        field: String,
    },

    /// Unrecognized primitive type name
    #[error("unknown field type {0}")]
    UnknownFieldType(String),
}

impl Error {
    /// Whether this error is a frame-level decode failure.
    #[must_use]
    pub const fn is_frame_error(&self) -> bool {
        matches!(
            self,
            Self::HeaderUnpack { .. }
                | Self::BadPrefix { .. }
                | Self::LengthMismatch { .. }
                | Self::UnknownMessage { .. }
                | Self::ChecksumUnpack { .. }
                | Self::ChecksumMismatch { .. }
                | Self::PayloadUnpack { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
