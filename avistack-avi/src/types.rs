//! AVI header type definitions.

use crate::chunks::{chunk_ids, FourCC};
use bitflags::bitflags;

bitflags! {
    /// Flag word from the `avih` chunk. Unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AviFlags: u32 {
        const HAS_INDEX = 0x10;
        const MUST_USE_INDEX = 0x20;
        const IS_INTERLEAVED = 0x100;
        const TRUST_CHUNK_TYPE = 0x800;
        const WAS_CAPTURED = 0x1_0000;
        const COPYRIGHTED = 0x2_0000;

        const _ = !0;
    }
}

/// AVI main header (`avih` chunk).
///
/// All fourteen 32-bit words are kept for reporting; frame timing comes from
/// `micros_per_frame`, while decode geometry comes from the stream's
/// BITMAPINFO rather than the `width`/`height` here.
#[derive(Debug, Clone, Default)]
pub struct AviHeader {
    /// Microseconds per frame.
    pub micros_per_frame: u32,
    /// Maximum bytes per second.
    pub max_bytes_per_sec: u32,
    /// Padding granularity (reserved in older files).
    pub padding_granularity: u32,
    /// AVI flags.
    pub flags: AviFlags,
    /// Total number of frames.
    pub total_frames: u32,
    /// Initial frames (for interleaved files).
    pub initial_frames: u32,
    /// Number of streams.
    pub streams: u32,
    /// Suggested buffer size.
    pub suggested_buffer_size: u32,
    /// Video width.
    pub width: u32,
    /// Video height.
    pub height: u32,
    /// Time scale.
    pub scale: u32,
    /// Rate (frames per second = rate/scale).
    pub rate: u32,
    /// Start time.
    pub start: u32,
    /// Stream length.
    pub length: u32,
}

impl AviHeader {
    /// Frame rate in fps, derived from the frame interval.
    pub fn frame_rate(&self) -> f64 {
        if self.micros_per_frame > 0 {
            1_000_000.0 / f64::from(self.micros_per_frame)
        } else {
            0.0
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        f64::from(self.total_frames) * f64::from(self.micros_per_frame) / 1_000_000.0
    }
}

/// Stream header (`strh` chunk).
#[derive(Debug, Clone)]
pub struct StreamHeader {
    /// Stream type FourCC (`vids`, `auds`, ...).
    pub kind: FourCC,
    /// FourCC handler/codec.
    pub handler: FourCC,
    /// Stream flags.
    pub flags: u32,
    /// Priority.
    pub priority: u16,
    /// Language.
    pub language: u16,
    /// Initial frames.
    pub initial_frames: u32,
    /// Time scale.
    pub scale: u32,
    /// Rate (samples per second = rate/scale).
    pub rate: u32,
    /// Start time.
    pub start: u32,
    /// Length in frames or samples.
    pub length: u32,
    /// Suggested buffer size.
    pub suggested_buffer_size: u32,
    /// Quality (0-10000).
    pub quality: u32,
    /// Sample size; anything above 1 packs several samples per chunk.
    pub sample_size: u32,
}

impl StreamHeader {
    /// Whether this is a video stream.
    pub fn is_video(&self) -> bool {
        self.kind == chunk_ids::VIDS
    }

    /// Frame rate in fps for video streams.
    pub fn frame_rate(&self) -> f64 {
        if self.scale > 0 {
            f64::from(self.rate) / f64::from(self.scale)
        } else {
            0.0
        }
    }
}

/// Video format descriptor (BITMAPINFOHEADER, start of `strf`).
#[derive(Debug, Clone)]
pub struct BitmapInfo {
    /// Structure size (40).
    pub size: u32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels; negative means top-down.
    pub height: i32,
    /// Number of color planes (always 1 for the formats decoded here).
    pub planes: u16,
    /// Bits per pixel.
    pub bit_count: u16,
    /// Compression FourCC, or all zero for uncompressed RGB.
    pub compression: FourCC,
    /// Image size in bytes (may be 0).
    pub image_size: u32,
    /// Horizontal resolution, pixels per meter.
    pub x_pels_per_meter: i32,
    /// Vertical resolution, pixels per meter.
    pub y_pels_per_meter: i32,
    /// Colors in the palette; 0 means `1 << bit_count`.
    pub colors_used: u32,
    /// Important colors.
    pub colors_important: u32,
}

impl BitmapInfo {
    /// Absolute height (negative heights signal top-down data).
    pub fn abs_height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Check if the data is stored top-down.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Palette entry count, applying the `colors_used == 0` default.
    pub fn palette_colors(&self) -> u32 {
        if self.colors_used == 0 {
            1u32 << self.bit_count
        } else {
            self.colors_used
        }
    }
}
