//! Error taxonomy for chunk header encoding and decoding.

use std::io;

/// Errors produced while writing or reading a chunk header.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// The underlying stream could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended before the named part of the header was complete.
    #[error("truncated chunk header: stream ended inside the {what}")]
    Truncated {
        /// Which part of the header was cut short.
        what: &'static str,
    },

    /// The descriptor record could not be decoded into the expected fields.
    #[error("malformed chunk header: {0}")]
    Malformed(String),

    /// The version tag is present but not one this reader accepts.
    #[error("unsupported chunk format version {found}, this reader supports version {supported}")]
    UnsupportedVersion {
        /// Version found at the start of the stream.
        found: u32,
        /// Version this reader supports.
        supported: u32,
    },

    /// The encoder technique code is outside the known enumeration.
    #[error("unknown encoder technique code {0}")]
    UnknownTechnique(u8),

    /// A field decoded (or was supplied) with a semantically invalid value.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Record name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ChunkError {
    /// True for errors that mean the header bytes themselves are unreadable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ChunkError::Truncated { .. } | ChunkError::Malformed(_))
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ChunkError::InvalidField { field, reason: reason.into() }
    }

    /// Map a read-side io error, treating a short stream as truncation of `what`.
    pub(crate) fn from_read(err: io::Error, what: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ChunkError::Truncated { what }
        } else {
            ChunkError::Io(err)
        }
    }

    /// Map a bincode decode failure on the descriptor record.
    pub(crate) fn from_bincode(err: bincode::Error) -> Self {
        match *err {
            bincode::ErrorKind::Io(e) => ChunkError::from_read(e, "descriptor record"),
            bincode::ErrorKind::SizeLimit => {
                ChunkError::Malformed("descriptor record exceeds the size limit".into())
            }
            other => ChunkError::Malformed(other.to_string()),
        }
    }
}
