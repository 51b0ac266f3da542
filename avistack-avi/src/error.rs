//! Error types for AVI reading.

use crate::chunks::FourCC;
use std::io;
use thiserror::Error;

/// Result type for AVI operations.
pub type Result<T> = std::result::Result<T, AviError>;

/// Errors that can occur while parsing or decoding an AVI file.
#[derive(Debug, Error)]
pub enum AviError {
    /// File does not start with the expected RIFF/AVI signature.
    #[error("not an AVI file: missing '{0}' signature")]
    NotAnAvi(&'static str),

    /// A required chunk was not found.
    #[error("required chunk '{0}' not found")]
    MissingChunk(FourCC),

    /// Compression tag not in the supported set.
    #[error("unsupported compression '{0}'")]
    UnsupportedCompression(FourCC),

    /// Bit depth not allowed for the given compression tag.
    #[error("unsupported bit depth {bits} for compression '{compression}'")]
    UnsupportedBitCount { bits: u16, compression: FourCC },

    /// Streams packing several samples per chunk cannot be read.
    #[error("video stream with {0} samples per chunk not supported")]
    UnsupportedSampleSize(u32),

    /// The `strf` chunk ends before the declared palette.
    #[error("not enough data for palette: need {needed} bytes, have {available}")]
    TruncatedPalette { needed: u64, available: u64 },

    /// A frame chunk is smaller than one full image.
    #[error("frame data too short: need {expected} bytes, have {got}")]
    TruncatedFrame { expected: u64, got: u64 },

    /// The source ended in the middle of a declared structure.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// Frame index outside a virtual stack's range. This is caller misuse,
    /// not a property of the file.
    #[error("frame index {index} out of range 1..={len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Allocation failure while building frame buffers.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl AviError {
    /// Whether eager reading may keep the frames decoded so far.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AviError::ResourceExhausted(_))
    }
}

impl From<io::Error> for AviError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            AviError::UnexpectedEof
        } else {
            AviError::Io(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::chunk_ids;

    #[test]
    fn test_error_display() {
        let err = AviError::MissingChunk(chunk_ids::MOVI);
        assert_eq!(err.to_string(), "required chunk 'movi' not found");

        let err = AviError::UnsupportedBitCount {
            bits: 16,
            compression: FourCC::new(*b"RGB "),
        };
        assert!(err.to_string().contains("16"));
        assert!(err.to_string().contains("RGB"));
    }

    #[test]
    fn test_eof_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(AviError::from(io_err), AviError::UnexpectedEof));

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(AviError::from(io_err), AviError::Io(_)));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AviError::ResourceExhausted("buffer".into()).is_recoverable());
        assert!(!AviError::UnexpectedEof.is_recoverable());
    }
}
