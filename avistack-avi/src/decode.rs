//! Frame decoding: raw chunk bytes to pixel buffers.
//!
//! One frame chunk holds `height` scan lines of `stride` bytes. Depending on
//! the plan and the requested conversion, a frame decodes to palette index
//! bytes, 8-bit grayscale, 16-bit grayscale, or packed 32-bit RGBA.

use crate::error::{AviError, Result};
use crate::plan::{DecodePlan, PixelLayout};
use crate::stack::FrameRecord;
use avistack_core::{ByteReader, PixelData};
use std::io::{Read, Seek};

/// Read and decode the frame at `record`.
pub(crate) fn read_frame<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    plan: &DecodePlan,
    convert_to_gray: bool,
    flip_vertical: bool,
    record: &FrameRecord,
) -> Result<PixelData> {
    let needed = plan.frame_len();
    if u64::from(record.size) < needed {
        return Err(AviError::TruncatedFrame {
            expected: needed,
            got: u64::from(record.size),
        });
    }
    reader.seek_to(record.offset)?;
    let mut raw: Vec<u8> = try_buffer(record.size as usize)?;
    reader.read_exact(&mut raw)?;
    unpack_frame(&raw, plan, convert_to_gray, flip_vertical)
}

/// Unpack one frame's raw bytes into pixels.
///
/// Source line `i` lands on destination row `i` when the effective
/// orientation (`top_down` XOR `flip_vertical`) is top-down, and on row
/// `height - 1 - i` otherwise.
pub(crate) fn unpack_frame(
    raw: &[u8],
    plan: &DecodePlan,
    convert_to_gray: bool,
    flip_vertical: bool,
) -> Result<PixelData> {
    let w = plan.width as usize;
    let h = plan.height as usize;
    let top_down = plan.top_down ^ flip_vertical;
    let dst_row = |i: usize| if top_down { i } else { h - 1 - i };
    let row_bytes = w * plan.bits as usize / 8;

    if plan.bits <= 8 {
        // palette indices and 8-bit grayscale pass through untouched
        let mut pixels: Vec<u8> = try_buffer(w * h)?;
        for i in 0..h {
            let src = &raw[i * plan.stride..][..row_bytes];
            pixels[dst_row(i) * w..][..w].copy_from_slice(src);
        }
        Ok(PixelData::Gray8(pixels))
    } else if plan.layout == PixelLayout::Gray16 {
        let mut pixels: Vec<u16> = try_buffer(w * h)?;
        for i in 0..h {
            let src = &raw[i * plan.stride..][..row_bytes];
            let dst = &mut pixels[dst_row(i) * w..][..w];
            for (d, s) in dst.iter_mut().zip(src.chunks_exact(2)) {
                *d = u16::from_le_bytes([s[0], s[1]]);
            }
        }
        Ok(PixelData::Gray16(pixels))
    } else if convert_to_gray {
        let mut pixels: Vec<u8> = try_buffer(w * h)?;
        for i in 0..h {
            let src = &raw[i * plan.stride..][..row_bytes];
            unpack_gray_row(plan, src, &mut pixels[dst_row(i) * w..][..w]);
        }
        Ok(PixelData::Gray8(pixels))
    } else {
        let mut pixels: Vec<u32> = try_buffer(w * h)?;
        for i in 0..h {
            let src = &raw[i * plan.stride..][..row_bytes];
            unpack_color_row(plan, src, &mut pixels[dst_row(i) * w..][..w]);
        }
        Ok(PixelData::Rgba32(pixels))
    }
}

/// One line of RGB or YUV data reduced to 8-bit luma.
fn unpack_gray_row(plan: &DecodePlan, src: &[u8], dst: &mut [u8]) {
    match plan.layout {
        PixelLayout::Rgb => {
            let step = if plan.bits == 32 { 4 } else { 3 };
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(step)) {
                let b = i32::from(px[0]);
                let g = i32::from(px[1]);
                let r = i32::from(px[2]);
                // 0.299*R + 0.587*G + 0.114*B
                *d = ((b * 934 + g * 4809 + r * 2449 + 4096) >> 13) as u8;
            }
        }
        _ => {
            // luma passthrough without 16-235 rescaling; UYVY and AYUV lead
            // with a chroma byte before the first Y
            let start = match plan.layout {
                PixelLayout::Uyvy | PixelLayout::Ayuv => 1,
                _ => 0,
            };
            let step = if plan.layout == PixelLayout::Ayuv { 4 } else { 2 };
            for (d, y) in dst.iter_mut().zip(src[start..].iter().step_by(step)) {
                *d = *y;
            }
        }
    }
}

/// One line of RGB or YUV data expanded to packed RGBA.
fn unpack_color_row(plan: &DecodePlan, src: &[u8], dst: &mut [u32]) {
    match plan.layout {
        PixelLayout::Rgb => {
            let step = if plan.bits == 32 { 4 } else { 3 };
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(step)) {
                let b = u32::from(px[0]);
                let g = u32::from(px[1]);
                let r = u32::from(px[2]);
                *d = 0xff00_0000 | b | g << 8 | r << 16;
            }
        }
        PixelLayout::Yuy2 => {
            for (pair, px) in dst.chunks_exact_mut(2).zip(src.chunks_exact(4)) {
                let y0 = i32::from(px[0]);
                let u = chroma(px[1]);
                let y1 = i32::from(px[2]);
                let v = chroma(px[3]);
                pair[0] = yuv_to_rgb(y0, u, v);
                pair[1] = yuv_to_rgb(y1, u, v);
            }
        }
        PixelLayout::Uyvy => {
            for (pair, px) in dst.chunks_exact_mut(2).zip(src.chunks_exact(4)) {
                let u = chroma(px[0]);
                let y0 = i32::from(px[1]);
                let v = chroma(px[2]);
                let y1 = i32::from(px[3]);
                pair[0] = yuv_to_rgb(y0, u, v);
                pair[1] = yuv_to_rgb(y1, u, v);
            }
        }
        PixelLayout::Yvyu => {
            for (pair, px) in dst.chunks_exact_mut(2).zip(src.chunks_exact(4)) {
                let y0 = i32::from(px[0]);
                let v = chroma(px[1]);
                let y1 = i32::from(px[2]);
                let u = chroma(px[3]);
                pair[0] = yuv_to_rgb(y0, u, v);
                pair[1] = yuv_to_rgb(y1, u, v);
            }
        }
        PixelLayout::Ayuv => {
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
                // px[0] is the alpha channel, discarded
                let y = i32::from(px[1]);
                let v = chroma(px[2]);
                let u = chroma(px[3]);
                *d = yuv_to_rgb(y, u, v);
            }
        }
        PixelLayout::Indexed | PixelLayout::Gray8 | PixelLayout::Gray16 => {
            debug_assert!(false, "grayscale layouts never reach the color path");
        }
    }
}

/// Bias a chroma byte from 0..=255 to the signed range -128..=127.
fn chroma(byte: u8) -> i32 {
    i32::from((byte ^ 0x80) as i8)
}

/// Fixed-point YUV to RGB, the 16..=235 luma range mapping to 0..=255 with
/// the black level folded into the bias constant. Outputs are clamped.
fn yuv_to_rgb(y: i32, u: i32, v: i32) -> u32 {
    // r = 1.164*(y-16) + 1.596*v
    // g = 1.164*(y-16) - 0.391*u - 0.813*v
    // b = 1.164*(y-16) + 2.018*u
    let r = (9535 * y + 13074 * v - 148_464) >> 13;
    let g = (9535 * y - 6660 * v - 3203 * u - 148_464) >> 13;
    let b = (9535 * y + 16531 * u - 148_464) >> 13;
    0xff00_0000 | clamp(b) | clamp(g) << 8 | clamp(r) << 16
}

fn clamp(value: i32) -> u32 {
    value.clamp(0, 255) as u32
}

/// Allocate a zeroed buffer, turning allocation failure into a recoverable
/// error instead of aborting.
fn try_buffer<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| AviError::ResourceExhausted(format!("buffer of {len} elements")))?;
    buffer.resize(len, T::default());
    Ok(buffer)
}
