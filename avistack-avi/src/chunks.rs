//! FourCC tags and RIFF chunk identifiers.

/// FourCC (Four Character Code) identifier.
///
/// Stored in source byte order; on the wire this is a little-endian 32-bit
/// integer whose bytes spell the tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create from bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }

    /// The all-zero tag, used by BITMAPINFO for uncompressed RGB.
    pub const ZERO: FourCC = FourCC([0; 4]);

    /// Get as string, with non-ASCII bytes replaced.
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FourCC(\"{}\")", self.as_str())
    }
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

/// Well-known chunk IDs.
pub mod chunk_ids {
    use super::FourCC;

    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const AVI: FourCC = FourCC(*b"AVI ");
    pub const LIST: FourCC = FourCC(*b"LIST");
    pub const HDRL: FourCC = FourCC(*b"hdrl");
    pub const AVIH: FourCC = FourCC(*b"avih");
    pub const STRL: FourCC = FourCC(*b"strl");
    pub const STRH: FourCC = FourCC(*b"strh");
    pub const STRF: FourCC = FourCC(*b"strf");
    pub const MOVI: FourCC = FourCC(*b"movi");
    pub const JUNK: FourCC = FourCC(*b"JUNK");
    pub const VIDS: FourCC = FourCC(*b"vids");
}

/// Movie-data chunk ids for a stream: `NNdb` (uncompressed) and `NNdc`
/// (compressed), where `NN` are the two ASCII digits of the stream number.
pub fn stream_data_ids(stream_number: u16) -> (FourCC, FourCC) {
    let tens = b'0' + (stream_number / 10 % 10) as u8;
    let ones = b'0' + (stream_number % 10) as u8;
    (
        FourCC([tens, ones, b'd', b'b']),
        FourCC([tens, ones, b'd', b'c']),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_display() {
        let fourcc = FourCC::new(*b"RIFF");
        assert_eq!(fourcc.as_str(), "RIFF");
        assert_eq!(fourcc.as_bytes(), b"RIFF");
        assert_eq!(format!("{fourcc}"), "RIFF");
    }

    #[test]
    fn test_chunk_ids() {
        assert_eq!(chunk_ids::RIFF.as_str(), "RIFF");
        assert_eq!(chunk_ids::AVI.as_str(), "AVI ");
        assert_eq!(chunk_ids::MOVI.as_str(), "movi");
    }

    #[test]
    fn test_stream_data_ids() {
        let (db, dc) = stream_data_ids(0);
        assert_eq!(db.as_str(), "00db");
        assert_eq!(dc.as_str(), "00dc");

        let (db, dc) = stream_data_ids(1);
        assert_eq!(db.as_str(), "01db");
        assert_eq!(dc.as_str(), "01dc");

        let (db, _) = stream_data_ids(12);
        assert_eq!(db.as_str(), "12db");
    }
}
