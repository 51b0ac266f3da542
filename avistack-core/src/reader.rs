//! Little-endian reading over a seekable byte source.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

/// Reader for little-endian wire formats over any seekable source.
///
/// The total length is measured once at construction and the current
/// position is tracked internally, so `position()` and `len()` never touch
/// the underlying handle. Reads are unbuffered: a short read of a declared
/// size fails with `io::ErrorKind::UnexpectedEof` rather than being hidden
/// by buffering across seeks.
pub struct ByteReader<R> {
    inner: R,
    len: u64,
    pos: u64,
}

impl<R: Read + Seek> ByteReader<R> {
    /// Wrap a source, measuring its total length.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(ByteReader { inner, len, pos: 0 })
    }

    /// Total length of the source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the source is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current read position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Seek to an absolute offset.
    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    /// Advance to the next multiple of `granularity`, if not already on one.
    pub fn align(&mut self, granularity: u64) -> io::Result<()> {
        let rem = self.pos % granularity;
        if rem != 0 {
            self.seek_to(self.pos + (granularity - rem))?;
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let value = self.inner.read_u8()?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let value = self.inner.read_u16::<LittleEndian>()?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> io::Result<i16> {
        let value = self.inner.read_i16::<LittleEndian>()?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let value = self.inner.read_u32::<LittleEndian>()?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let value = self.inner.read_i32::<LittleEndian>()?;
        self.pos += 4;
        Ok(value)
    }

    /// Fill `buf` completely or fail with `UnexpectedEof`.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Consume the wrapper, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
