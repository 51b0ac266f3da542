//! AVI demuxer: RIFF scanning, header parsing, and movie-data iteration.
//!
//! The RIFF tree is shallow, so the scanner is a recursive find-and-read
//! rather than a state machine. Every per-chunk parser is bounded by its
//! chunk's end offset; trailing bytes inside a chunk are ignored.

use crate::chunks::{chunk_ids, stream_data_ids, FourCC};
use crate::decode;
use crate::error::{AviError, Result};
use crate::options::ReadOptions;
use crate::plan::DecodePlan;
use crate::stack::{frame_label, FrameRecord, FrameStack, VirtualStack};
use crate::types::{AviFlags, AviHeader, BitmapInfo, StreamHeader};
use avistack_core::{ByteReader, Palette};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

/// Some encoders emit sizes with the high bit set; sizes are unsigned.
const SIZE_MASK: u64 = 0xffff_ffff;
/// Chunks start at even offsets.
const ALIGNMENT: u64 = 2;

/// Progress callback, invoked with a fraction in `[0, 1]`.
type ProgressFn = Box<dyn FnMut(f64)>;

/// Reader for one AVI file, bound to its first video stream.
///
/// Opening parses the headers and freezes a [`DecodePlan`]; the movie data
/// is then consumed either eagerly ([`read_stack`](AviReader::read_stack))
/// or lazily ([`read_virtual`](AviReader::read_virtual)).
pub struct AviReader<R> {
    reader: ByteReader<R>,
    header: AviHeader,
    stream: StreamHeader,
    bitmap: BitmapInfo,
    plan: DecodePlan,
    stream_number: u16,
    progress: Option<ProgressFn>,
}

impl AviReader<File> {
    /// Open an AVI file from a path and read its headers.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(File::open(path)?)
    }
}

impl<R: Read + Seek> AviReader<R> {
    /// Open a seekable source and read its headers.
    pub fn open(source: R) -> Result<Self> {
        let mut reader = ByteReader::new(source)?;
        let file_len = reader.len();

        if read_fourcc(&mut reader)? != chunk_ids::RIFF {
            return Err(AviError::NotAnAvi("RIFF"));
        }
        let declared_size = u64::from(reader.read_u32()?);
        if read_fourcc(&mut reader)? != chunk_ids::AVI {
            return Err(AviError::NotAnAvi("AVI "));
        }
        log::debug!("RIFF/AVI file, declared size {declared_size}, actual {file_len}");

        let mut parser = HeaderParser {
            reader: &mut reader,
            state: HeaderState::default(),
        };
        parser.find_and_read(chunk_ids::HDRL, true, file_len, true)?;
        let state = parser.state;

        let header = state.header.ok_or(AviError::MissingChunk(chunk_ids::AVIH))?;
        let stream = state.stream.ok_or(AviError::MissingChunk(chunk_ids::STRH))?;
        let bitmap = state.bitmap.ok_or(AviError::MissingChunk(chunk_ids::STRF))?;
        let plan = state.plan.ok_or(AviError::MissingChunk(chunk_ids::STRF))?;

        Ok(AviReader {
            reader,
            header,
            stream,
            bitmap,
            plan,
            stream_number: state.stream_number,
            progress: None,
        })
    }

    /// Register a progress callback, invoked with a fraction in `[0, 1]`
    /// while the movie data is scanned.
    #[must_use]
    pub fn on_progress(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Main AVI header.
    pub fn header(&self) -> &AviHeader {
        &self.header
    }

    /// Header of the selected video stream.
    pub fn stream_header(&self) -> &StreamHeader {
        &self.stream
    }

    /// BITMAPINFO of the selected video stream.
    pub fn bitmap_info(&self) -> &BitmapInfo {
        &self.bitmap
    }

    /// The frozen decode plan.
    pub fn plan(&self) -> &DecodePlan {
        &self.plan
    }

    /// Number of the selected video stream; equals the count of non-video
    /// streams that preceded it.
    pub fn stream_number(&self) -> u16 {
        self.stream_number
    }

    pub fn width(&self) -> u32 {
        self.plan.width
    }

    pub fn height(&self) -> u32 {
        self.plan.height
    }

    /// Read and decode all frames in range into a stack.
    ///
    /// On allocation failure the stack is trimmed to the frames decoded so
    /// far and returned; any other error is fatal.
    pub fn read_stack(mut self, options: &ReadOptions) -> Result<FrameStack> {
        let movi_end = self.find_movi()?;
        let mut stack = FrameStack::new(self.plan.width, self.plan.height, self.plan.palette.clone());
        let convert_to_gray = options.convert_to_gray;
        let flip_vertical = options.flip_vertical;

        let scan = self.scan_movi(movi_end, options, |reader, plan, record| {
            let pixels = decode::read_frame(reader, plan, convert_to_gray, flip_vertical, &record)?;
            stack.push(frame_label(record.timestamp_micros), pixels);
            Ok(())
        });
        match scan {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                log::warn!("stopping early ({e}); keeping {} decoded frames", stack.len());
            }
            Err(e) => return Err(e),
        }

        if let Some(callback) = self.progress.as_mut() {
            callback(1.0);
        }
        Ok(stack)
    }

    /// Index all frames in range without decoding them, returning a stack
    /// that decodes on demand and owns the source.
    pub fn read_virtual(mut self, options: &ReadOptions) -> Result<VirtualStack<R>> {
        let movi_end = self.find_movi()?;
        let mut records = Vec::new();
        self.scan_movi(movi_end, options, |_, _, record| {
            records.push(record);
            Ok(())
        })?;

        if let Some(callback) = self.progress.as_mut() {
            callback(1.0);
        }
        log::debug!("virtual stack: {} frames indexed", records.len());
        Ok(VirtualStack::new(
            self.reader,
            self.plan,
            records,
            options.convert_to_gray,
            options.flip_vertical,
        ))
    }

    /// Locate the `LIST movi` chunk from the current position, leaving the
    /// reader at its payload. Returns the payload end offset.
    fn find_movi(&mut self) -> Result<u64> {
        let end = self.reader.len();
        loop {
            let Some(ty) = next_chunk_type(&mut self.reader, end)? else {
                return Err(AviError::MissingChunk(chunk_ids::MOVI));
            };
            let size = u64::from(self.reader.read_u32()?) & SIZE_MASK;
            let next_pos = self.reader.position() + size;
            if ty == chunk_ids::LIST && read_fourcc(&mut self.reader)? == chunk_ids::MOVI {
                log::debug!(
                    "movie data at 0x{:x} ({} bytes)",
                    self.reader.position(),
                    next_pos - self.reader.position()
                );
                return Ok(next_pos);
            }
            log::debug!("skipping '{ty}' ({size} bytes)");
            self.reader.seek_to(next_pos)?;
        }
    }

    /// Walk the movie data, invoking `on_frame` for every data chunk of the
    /// selected stream that falls inside the configured frame range.
    fn scan_movi<F>(&mut self, end: u64, options: &ReadOptions, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&mut ByteReader<R>, &DecodePlan, FrameRecord) -> Result<()>,
    {
        let (id_db, id_dc) = stream_data_ids(self.stream_number);
        let first_frame = options.first_frame.max(1);
        let last_frame = options.resolve_last_frame(self.header.total_frames);
        let micros = u64::from(self.header.micros_per_frame);
        let file_len = self.reader.len() as f64;
        log::debug!(
            "scanning for '{id_db}'/'{id_dc}' chunks, frames {first_frame}..={last_frame}"
        );

        let mut frame_number: u32 = 1;
        loop {
            let Some(ty) = next_chunk_type(&mut self.reader, end)? else {
                break;
            };
            let size = u64::from(self.reader.read_u32()?) & SIZE_MASK;
            let position = self.reader.position();
            let next_pos = position + size;

            if ty == id_db || ty == id_dc {
                if let Some(callback) = self.progress.as_mut() {
                    callback(position as f64 / file_len);
                }
                if frame_number >= first_frame {
                    let record = FrameRecord {
                        offset: position,
                        size: size as u32,
                        timestamp_micros: u64::from(frame_number - 1) * micros,
                    };
                    on_frame(&mut self.reader, &self.plan, record)?;
                }
                frame_number += 1;
                if frame_number > last_frame {
                    break;
                }
            } else {
                log::debug!("skipping '{ty}' ({size} bytes)");
            }

            if next_pos > end {
                break;
            }
            self.reader.seek_to(next_pos)?;
        }
        Ok(())
    }
}

/// Header fields collected while scanning `hdrl`.
#[derive(Default)]
struct HeaderState {
    header: Option<AviHeader>,
    stream: Option<StreamHeader>,
    bitmap: Option<BitmapInfo>,
    plan: Option<DecodePlan>,
    stream_number: u16,
}

struct HeaderParser<'a, R> {
    reader: &'a mut ByteReader<R>,
    state: HeaderState,
}

impl<R: Read + Seek> HeaderParser<'_, R> {
    /// Advance through chunks until `target` is found and its contents
    /// parse, then leave the reader at the chunk end and return that offset.
    /// With `is_list`, a `LIST` chunk matches on its inner type.
    fn find_and_read(
        &mut self,
        target: FourCC,
        is_list: bool,
        end: u64,
        required: bool,
    ) -> Result<Option<u64>> {
        loop {
            let Some(mut ty) = next_chunk_type(self.reader, end)? else {
                return if required {
                    Err(AviError::MissingChunk(target))
                } else {
                    Ok(None)
                };
            };
            let size = u64::from(self.reader.read_u32()?) & SIZE_MASK;
            let next_pos = self.reader.position() + size;
            let mut found_list = false;
            if is_list && ty == chunk_ids::LIST {
                found_list = true;
                ty = read_fourcc(self.reader)?;
            }
            log::debug!(
                "searching for '{target}', found {}'{ty}' at 0x{:x} ({size} bytes)",
                if found_list { "LIST " } else { "" },
                next_pos - size,
            );

            let content_ok = ty == target && self.read_contents(target, next_pos)?;
            self.reader.seek_to(next_pos)?;
            if content_ok {
                return Ok(Some(next_pos));
            }
        }
    }

    /// Parse the contents of a matched chunk, bounded by `end`. Returns
    /// false when the chunk turns out not to be the one wanted (a `strl`
    /// for a non-video stream).
    fn read_contents(&mut self, fourcc: FourCC, end: u64) -> Result<bool> {
        match fourcc {
            chunk_ids::HDRL => {
                self.find_and_read(chunk_ids::AVIH, false, end, true)?;
                self.find_and_read(chunk_ids::STRL, true, end, true)?;
                Ok(true)
            }
            chunk_ids::AVIH => {
                self.read_avi_header()?;
                Ok(true)
            }
            chunk_ids::STRL => {
                if self
                    .find_and_read(chunk_ids::STRH, false, end, false)?
                    .is_none()
                {
                    return Ok(false);
                }
                self.find_and_read(chunk_ids::STRF, false, end, true)?;
                Ok(true)
            }
            chunk_ids::STRH => self.read_stream_header(),
            chunk_ids::STRF => {
                self.read_bitmap_info(end)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn read_avi_header(&mut self) -> Result<()> {
        let r = &mut *self.reader;
        let header = AviHeader {
            micros_per_frame: r.read_u32()?,
            max_bytes_per_sec: r.read_u32()?,
            padding_granularity: r.read_u32()?,
            flags: AviFlags::from_bits_retain(r.read_u32()?),
            total_frames: r.read_u32()?,
            initial_frames: r.read_u32()?,
            streams: r.read_u32()?,
            suggested_buffer_size: r.read_u32()?,
            width: r.read_u32()?,
            height: r.read_u32()?,
            scale: r.read_u32()?,
            rate: r.read_u32()?,
            start: r.read_u32()?,
            length: r.read_u32()?,
        };
        log::debug!(
            "avih: {}x{}, {} frames, {:.2} fps, flags 0x{:x}",
            header.width,
            header.height,
            header.total_frames,
            header.frame_rate(),
            header.flags.bits(),
        );
        self.state.header = Some(header);
        Ok(())
    }

    /// Parse `strh`. A non-video stream bumps the stream counter and makes
    /// the enclosing `strl` search move on.
    fn read_stream_header(&mut self) -> Result<bool> {
        let kind = read_fourcc(self.reader)?;
        if kind != chunk_ids::VIDS {
            log::warn!("non-video stream '{kind}' skipped");
            self.state.stream_number += 1;
            return Ok(false);
        }

        let r = &mut *self.reader;
        let stream = StreamHeader {
            kind,
            handler: read_fourcc(r)?,
            flags: r.read_u32()?,
            priority: r.read_u16()?,
            language: r.read_u16()?,
            initial_frames: r.read_u32()?,
            scale: r.read_u32()?,
            rate: r.read_u32()?,
            start: r.read_u32()?,
            length: r.read_u32()?,
            suggested_buffer_size: r.read_u32()?,
            quality: r.read_u32()?,
            sample_size: r.read_u32()?,
        };
        // the trailing rcFrame rectangle is ignored
        log::debug!(
            "strh: handler '{}', {} frames, sample size {}",
            stream.handler,
            stream.length,
            stream.sample_size,
        );
        if stream.sample_size > 1 {
            return Err(AviError::UnsupportedSampleSize(stream.sample_size));
        }
        self.state.stream = Some(stream);
        Ok(true)
    }

    /// Parse `strf`: the 40-byte BITMAPINFO header, then the palette when
    /// the format is indexed.
    fn read_bitmap_info(&mut self, end: u64) -> Result<()> {
        let r = &mut *self.reader;
        let info = BitmapInfo {
            size: r.read_u32()?,
            width: r.read_i32()?,
            height: r.read_i32()?,
            planes: r.read_u16()?,
            bit_count: r.read_u16()?,
            compression: read_fourcc(r)?,
            image_size: r.read_u32()?,
            x_pels_per_meter: r.read_i32()?,
            y_pels_per_meter: r.read_i32()?,
            colors_used: r.read_u32()?,
            colors_important: r.read_u32()?,
        };
        log::debug!(
            "strf: {}x{}, {} bpp, compression '{}'",
            info.width,
            info.height,
            info.bit_count,
            info.compression,
        );

        let mut plan = DecodePlan::from_bitmap_info(&info)?;
        if plan.wants_palette() {
            plan.palette = Some(Arc::new(self.read_palette(&info, end)?));
        }
        log::debug!(
            "plan: {:?}, {} bpp, stride {}, top-down {}",
            plan.layout,
            plan.bits,
            plan.stride,
            plan.top_down,
        );

        self.state.bitmap = Some(info);
        self.state.plan = Some(plan);
        Ok(())
    }

    /// Read the palette that follows BITMAPINFO: `colors_used` entries of
    /// four bytes each in B, G, R, reserved order.
    fn read_palette(&mut self, info: &BitmapInfo, end: u64) -> Result<Palette> {
        let colors = info.palette_colors() as usize;
        let needed = colors as u64 * 4;
        let available = end.saturating_sub(self.reader.position());
        if available < needed {
            return Err(AviError::TruncatedPalette { needed, available });
        }

        let mut entries = vec![0u8; colors * 4];
        self.reader.read_exact(&mut entries)?;
        let mut reds = Vec::with_capacity(colors);
        let mut greens = Vec::with_capacity(colors);
        let mut blues = Vec::with_capacity(colors);
        for entry in entries.chunks_exact(4) {
            blues.push(entry[0]);
            greens.push(entry[1]);
            reds.push(entry[2]);
        }
        log::debug!("palette: {colors} colors");
        Ok(Palette::new(reds, greens, blues))
    }
}

/// Type of the next non-JUNK chunk, or `None` once `end` is reached. The
/// reader is 2-byte aligned before each attempt.
fn next_chunk_type<R: Read + Seek>(reader: &mut ByteReader<R>, end: u64) -> Result<Option<FourCC>> {
    loop {
        reader.align(ALIGNMENT)?;
        if reader.position() >= end {
            return Ok(None);
        }
        let ty = read_fourcc(reader)?;
        if ty != chunk_ids::JUNK {
            return Ok(Some(ty));
        }
        let size = u64::from(reader.read_u32()?) & SIZE_MASK;
        log::debug!("skipping JUNK ({size} bytes)");
        reader.seek_to(reader.position() + size)?;
    }
}

fn read_fourcc<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<FourCC> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(FourCC(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use avistack_core::PixelData;
    use std::io::Cursor;

    fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(id);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 != 0 {
            out.push(0);
        }
        out
    }

    fn list(kind: &[u8; 4], children: &[u8]) -> Vec<u8> {
        let mut payload = kind.to_vec();
        payload.extend_from_slice(children);
        chunk(b"LIST", &payload)
    }

    fn avih(micros_per_frame: u32, total_frames: u32, width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        for value in [
            micros_per_frame,
            1_000_000,
            0,
            0x100,
            total_frames,
            0,
            1,
            0,
            width,
            height,
            0,
            0,
            0,
            0,
        ] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    fn strh(kind: &[u8; 4], sample_size: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(kind);
        out.extend_from_slice(b"DIB ");
        for value in [0u32, 0, 0, 1, 25, 0, 0, 0, 0] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&sample_size.to_le_bytes());
        out.extend_from_slice(&[0u8; 8]); // rcFrame
        out
    }

    fn strf_video(
        width: i32,
        height: i32,
        bit_count: u16,
        compression: &[u8; 4],
        palette: &[[u8; 3]],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&bit_count.to_le_bytes());
        out.extend_from_slice(compression);
        for value in [0u32, 0, 0] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        for [r, g, b] in palette {
            out.extend_from_slice(&[*b, *g, *r, 0]);
        }
        out
    }

    fn riff(children: &[u8]) -> Vec<u8> {
        let mut payload = b"AVI ".to_vec();
        payload.extend_from_slice(children);
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }

    /// 2x2 top-down indexed video with a 4-color palette and two frames.
    fn indexed_avi() -> Vec<u8> {
        let palette = [[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];
        let strl = [
            chunk(b"strh", &strh(b"vids", 0)),
            chunk(b"strf", &strf_video(2, -2, 8, &[0; 4], &palette)),
        ]
        .concat();
        let hdrl = [chunk(b"avih", &avih(40_000, 2, 2, 2)), list(b"strl", &strl)].concat();
        let movi = [
            chunk(b"00db", &[0, 1, 0, 0, 2, 3, 0, 0]),
            chunk(b"00dc", &[3, 2, 0, 0, 1, 0, 0, 0]),
        ]
        .concat();
        riff(&[list(b"hdrl", &hdrl), list(b"movi", &movi)].concat())
    }

    #[test]
    fn test_open_parses_headers() {
        let reader = AviReader::open(Cursor::new(indexed_avi())).unwrap();
        assert_eq!(reader.header().total_frames, 2);
        assert_eq!(reader.header().micros_per_frame, 40_000);
        assert_eq!(reader.width(), 2);
        assert_eq!(reader.height(), 2);
        assert_eq!(reader.stream_number(), 0);
        assert!(reader.plan().top_down);
        assert_eq!(reader.plan().palette.as_ref().unwrap().len(), 4);
        assert!(reader.stream_header().is_video());
        assert_eq!(reader.stream_header().frame_rate(), 25.0);
    }

    #[test]
    fn test_read_stack_decodes_frames() {
        let reader = AviReader::open(Cursor::new(indexed_avi())).unwrap();
        let stack = reader.read_stack(&ReadOptions::default()).unwrap();

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.slice(1).unwrap().pixels, PixelData::Gray8(vec![0, 1, 2, 3]));
        assert_eq!(stack.slice(2).unwrap().pixels, PixelData::Gray8(vec![3, 2, 1, 0]));
        assert_eq!(stack.slice(1).unwrap().label, "0 s");
        assert_eq!(stack.slice(2).unwrap().label, "0.04 s");
        assert_eq!(stack.palette().unwrap().rgb(1), Some((255, 0, 0)));
    }

    #[test]
    fn test_not_an_avi() {
        let result = AviReader::open(Cursor::new(b"NOTARIFFFILE".to_vec()));
        assert!(matches!(result, Err(AviError::NotAnAvi("RIFF"))));

        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(b"WAVE");
        let result = AviReader::open(Cursor::new(data));
        assert!(matches!(result, Err(AviError::NotAnAvi("AVI "))));
    }

    #[test]
    fn test_missing_movi() {
        let strl = [
            chunk(b"strh", &strh(b"vids", 0)),
            chunk(b"strf", &strf_video(2, 2, 24, b"\0\0\0\0", &[])),
        ]
        .concat();
        let hdrl = [chunk(b"avih", &avih(40_000, 0, 2, 2)), list(b"strl", &strl)].concat();
        let data = riff(&list(b"hdrl", &hdrl));

        let reader = AviReader::open(Cursor::new(data)).unwrap();
        let result = reader.read_stack(&ReadOptions::default());
        assert!(matches!(result, Err(AviError::MissingChunk(id)) if id == chunk_ids::MOVI));
    }

    #[test]
    fn test_multisample_stream_rejected() {
        let strl = [
            chunk(b"strh", &strh(b"vids", 2)),
            chunk(b"strf", &strf_video(2, 2, 24, b"\0\0\0\0", &[])),
        ]
        .concat();
        let hdrl = [chunk(b"avih", &avih(40_000, 0, 2, 2)), list(b"strl", &strl)].concat();
        let data = riff(&list(b"hdrl", &hdrl));

        let result = AviReader::open(Cursor::new(data));
        assert!(matches!(result, Err(AviError::UnsupportedSampleSize(2))));
    }

    #[test]
    fn test_junk_chunks_skipped() {
        // JUNK of odd declared size before hdrl and between movie chunks
        let palette = [[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];
        let strl = [
            chunk(b"strh", &strh(b"vids", 0)),
            chunk(b"strf", &strf_video(2, -2, 8, &[0; 4], &palette)),
        ]
        .concat();
        let hdrl = [chunk(b"avih", &avih(40_000, 2, 2, 2)), list(b"strl", &strl)].concat();
        let movi = [
            chunk(b"00db", &[0, 1, 0, 0, 2, 3, 0, 0]),
            chunk(b"JUNK", &[0xaa; 5]),
            chunk(b"00db", &[3, 2, 0, 0, 1, 0, 0, 0]),
        ]
        .concat();
        let body = [
            chunk(b"JUNK", &[0xbb; 7]),
            list(b"hdrl", &hdrl),
            list(b"movi", &movi),
        ]
        .concat();

        let reader = AviReader::open(Cursor::new(riff(&body))).unwrap();
        let stack = reader.read_stack(&ReadOptions::default()).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.slice(2).unwrap().pixels, PixelData::Gray8(vec![3, 2, 1, 0]));
    }

    #[test]
    fn test_preceding_audio_stream_bumps_chunk_ids() {
        let auds_strl = [
            chunk(b"strh", &strh(b"auds", 0)),
            chunk(b"strf", &[0u8; 16]),
        ]
        .concat();
        let vids_strl = [
            chunk(b"strh", &strh(b"vids", 0)),
            chunk(b"strf", &strf_video(2, -2, 8, &[0; 4], &[[0, 0, 0], [9, 9, 9]])),
        ]
        .concat();
        let hdrl = [
            chunk(b"avih", &avih(40_000, 1, 2, 2)),
            list(b"strl", &auds_strl),
            list(b"strl", &vids_strl),
        ]
        .concat();
        let movi = [
            chunk(b"00wb", &[0u8; 12]),
            chunk(b"01db", &[0, 1, 0, 0, 1, 0, 0, 0]),
        ]
        .concat();
        let data = riff(&[list(b"hdrl", &hdrl), list(b"movi", &movi)].concat());

        let reader = AviReader::open(Cursor::new(data)).unwrap();
        assert_eq!(reader.stream_number(), 1);

        let stack = reader.read_stack(&ReadOptions::default()).unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.slice(1).unwrap().pixels, PixelData::Gray8(vec![0, 1, 1, 0]));
    }

    #[test]
    fn test_truncated_palette() {
        // colors_used = 4 but only two entries present in the chunk
        let mut strf = strf_video(2, -2, 8, &[0; 4], &[[0, 0, 0], [1, 1, 1]]);
        strf[32..36].copy_from_slice(&4u32.to_le_bytes());
        let strl = [chunk(b"strh", &strh(b"vids", 0)), chunk(b"strf", &strf)].concat();
        let hdrl = [chunk(b"avih", &avih(40_000, 0, 2, 2)), list(b"strl", &strl)].concat();
        let data = riff(&list(b"hdrl", &hdrl));

        let result = AviReader::open(Cursor::new(data));
        assert!(matches!(result, Err(AviError::TruncatedPalette { .. })));
    }

    #[test]
    fn test_truncated_frame() {
        let palette = [[0, 0, 0], [255, 0, 0], [0, 255, 0], [0, 0, 255]];
        let strl = [
            chunk(b"strh", &strh(b"vids", 0)),
            chunk(b"strf", &strf_video(2, -2, 8, &[0; 4], &palette)),
        ]
        .concat();
        let hdrl = [chunk(b"avih", &avih(40_000, 1, 2, 2)), list(b"strl", &strl)].concat();
        // frame chunk shorter than stride * height
        let movi = chunk(b"00db", &[0, 1, 0, 0]);
        let data = riff(&[list(b"hdrl", &hdrl), list(b"movi", &movi)].concat());

        let reader = AviReader::open(Cursor::new(data)).unwrap();
        let result = reader.read_stack(&ReadOptions::default());
        assert!(matches!(
            result,
            Err(AviError::TruncatedFrame { expected: 8, got: 4 })
        ));
    }
}
