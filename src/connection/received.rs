//! Items yielded by the stream reassembler

use bytes::Bytes;

use crate::protocol::{DecodedMessage, Error};

/// Name reported for bad-data sentinels
pub const BAD_DATA_NAME: &str = "BAD_DATA";

/// Bytes that could not be decoded, kept for diagnostics.
///
/// Not a protocol message: it stands in for one so a caller can count and
/// log corruption while the stream keeps flowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadData {
    data: Bytes,
    error: Error,
}

impl BadData {
    pub(crate) fn new(data: Bytes, error: Error) -> Self {
        Self { data, error }
    }

    /// Offending raw bytes
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Failure that produced this sentinel
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.error
    }

    /// Human-readable failure reason
    #[must_use]
    pub fn reason(&self) -> String {
        self.error.to_string()
    }
}

/// One result of feeding bytes to a connection
#[derive(Debug, Clone)]
pub enum Received {
    /// A frame decoded successfully
    Message(DecodedMessage),
    /// Bytes were discarded
    BadData(BadData),
}

impl Received {
    /// Message name, or `BAD_DATA` for the sentinel
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Message(decoded) => decoded.name(),
            Self::BadData(_) => BAD_DATA_NAME,
        }
    }

    /// Decoded message, if any
    #[must_use]
    pub const fn message(&self) -> Option<&DecodedMessage> {
        match self {
            Self::Message(decoded) => Some(decoded),
            Self::BadData(_) => None,
        }
    }

    /// Take the decoded message, if any
    #[must_use]
    pub fn into_message(self) -> Option<DecodedMessage> {
        match self {
            Self::Message(decoded) => Some(decoded),
            Self::BadData(_) => None,
        }
    }

    /// Bad-data sentinel, if any
    #[must_use]
    pub const fn bad_data(&self) -> Option<&BadData> {
        match self {
            Self::Message(_) => None,
            Self::BadData(bad) => Some(bad),
        }
    }

    /// Whether this is a bad-data sentinel
    #[must_use]
    pub const fn is_bad_data(&self) -> bool {
        matches!(self, Self::BadData(_))
    }
}

impl From<DecodedMessage> for Received {
    fn from(value: DecodedMessage) -> Self {
        Self::Message(value)
    }
}

impl From<BadData> for Received {
    fn from(value: BadData) -> Self {
        Self::BadData(value)
    }
}
