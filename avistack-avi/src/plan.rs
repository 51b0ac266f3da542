//! Normalized decode plans derived from BITMAPINFO.

use crate::chunks::FourCC;
use crate::error::{AviError, Result};
use crate::types::BitmapInfo;
use avistack_core::Palette;
use std::sync::Arc;

/// Compression tags accepted by the decoder. Several tags are aliases for
/// the same byte layout and fold into one [`PixelLayout`].
pub mod compression {
    use super::FourCC;

    /// A name for uncompressed RGB.
    pub const RGB: FourCC = FourCC(*b"RGB ");
    /// Another name for uncompressed RGB.
    pub const RAW: FourCC = FourCC(*b"RAW ");
    /// 8-bit grayscale.
    pub const Y800: FourCC = FourCC(*b"Y800");
    /// Another name for Y800.
    pub const Y8: FourCC = FourCC(*b"Y8  ");
    /// Another name for Y800.
    pub const GREY: FourCC = FourCC(*b"GREY");
    /// 16-bit uncompressed grayscale.
    pub const Y16: FourCC = FourCC(*b"Y16 ");
    /// Packed 4:4:4 with alpha, Y, V, U bytes.
    pub const AYUV: FourCC = FourCC(*b"AYUV");
    /// 4:2:2 with byte order `u y0 v y1`.
    pub const UYVY: FourCC = FourCC(*b"UYVY");
    /// Another name for UYVY.
    pub const UYNV: FourCC = FourCC(*b"UYNV");
    /// Another name for UYVY.
    pub const Y422: FourCC = FourCC(*b"Y422");
    /// As UYVY but not top-down.
    pub const CYUV: FourCC = FourCC(*b"cyuv");
    /// As UYVY but not top-down.
    pub const V422: FourCC = FourCC(*b"V422");
    /// 4:2:2 with byte order `y0 u y1 v`.
    pub const YUY2: FourCC = FourCC(*b"YUY2");
    /// Another name for YUY2.
    pub const YUNV: FourCC = FourCC(*b"YUNV");
    /// Another name for YUY2.
    pub const YUYV: FourCC = FourCC(*b"YUYV");
    /// 4:2:2 with byte order `y0 v y1 u`.
    pub const YVYU: FourCC = FourCC(*b"YVYU");
}

/// Byte layout of the pixel data within one frame chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// Packed B,G,R (24-bit) or B,G,R,alpha (32-bit).
    Rgb,
    /// 8-bit palette indices.
    Indexed,
    /// 8-bit grayscale.
    Gray8,
    /// 16-bit little-endian grayscale.
    Gray16,
    /// 4:4:4 packed `A Y V U`, alpha discarded.
    Ayuv,
    /// 4:2:2 packed `U Y0 V Y1`.
    Uyvy,
    /// 4:2:2 packed `Y0 U Y1 V`.
    Yuy2,
    /// 4:2:2 packed `Y0 V Y1 U`.
    Yvyu,
}

/// Everything the frame decoder needs to know, frozen once the stream
/// format has been parsed.
#[derive(Debug, Clone)]
pub struct DecodePlan {
    /// Source byte layout.
    pub layout: PixelLayout,
    /// Bits per pixel.
    pub bits: u16,
    /// Whether source row 0 is the top of the image.
    pub top_down: bool,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels, always positive.
    pub height: u32,
    /// Bytes per source row, rounded up to a 4-byte multiple.
    pub stride: usize,
    /// Color table, present for indexed sources only.
    pub palette: Option<Arc<Palette>>,
}

impl DecodePlan {
    /// Resolve a BITMAPINFO descriptor into a decode plan.
    ///
    /// The palette, if any, is attached afterwards by the `strf` parser;
    /// [`DecodePlan::wants_palette`] says whether one follows the header.
    pub fn from_bitmap_info(info: &BitmapInfo) -> Result<Self> {
        use compression as c;

        let comp = info.compression;
        let (layout, allowed_bits, top_down): (PixelLayout, &[u16], bool) = match comp {
            FourCC::ZERO | c::RGB | c::RAW => {
                let layout = if info.bit_count <= 8 {
                    PixelLayout::Indexed
                } else {
                    PixelLayout::Rgb
                };
                // RGB is usually bottom-up; negative height signals top-down
                (layout, &[8, 24, 32], info.is_top_down())
            }
            c::Y800 | c::Y8 | c::GREY => (PixelLayout::Gray8, &[8], true),
            c::Y16 => (PixelLayout::Gray16, &[16], false),
            c::AYUV => (PixelLayout::Ayuv, &[32], false),
            c::UYVY | c::UYNV | c::Y422 => (PixelLayout::Uyvy, &[16], true),
            c::CYUV | c::V422 => (PixelLayout::Uyvy, &[16], false),
            c::YUY2 | c::YUNV | c::YUYV => (PixelLayout::Yuy2, &[16], true),
            c::YVYU => (PixelLayout::Yvyu, &[16], true),
            _ => return Err(AviError::UnsupportedCompression(comp)),
        };

        if !allowed_bits.contains(&info.bit_count) {
            return Err(AviError::UnsupportedBitCount {
                bits: info.bit_count,
                compression: comp,
            });
        }

        let width = info.width.unsigned_abs();
        let height = info.abs_height();
        // scan lines are zero-padded to a multiple of four bytes
        let stride = (width as usize * info.bit_count as usize + 31) / 32 * 4;

        Ok(DecodePlan {
            layout,
            bits: info.bit_count,
            top_down,
            width,
            height,
            stride,
            palette: None,
        })
    }

    /// Whether a palette follows the BITMAPINFO header in `strf`.
    pub fn wants_palette(&self) -> bool {
        self.layout == PixelLayout::Indexed
    }

    /// Source bytes required for one full frame.
    pub fn frame_len(&self) -> u64 {
        self.stride as u64 * u64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(width: i32, height: i32, bit_count: u16, compression: FourCC) -> BitmapInfo {
        BitmapInfo {
            size: 40,
            width,
            height,
            planes: 1,
            bit_count,
            compression,
            image_size: 0,
            x_pels_per_meter: 0,
            y_pels_per_meter: 0,
            colors_used: 0,
            colors_important: 0,
        }
    }

    #[test]
    fn test_rgb_plan() {
        let plan = DecodePlan::from_bitmap_info(&bitmap(640, 480, 24, FourCC::ZERO)).unwrap();
        assert_eq!(plan.layout, PixelLayout::Rgb);
        assert!(!plan.top_down);
        assert_eq!(plan.stride, 1920);

        let plan = DecodePlan::from_bitmap_info(&bitmap(640, -480, 32, compression::RGB)).unwrap();
        assert!(plan.top_down);
        assert_eq!(plan.height, 480);
    }

    #[test]
    fn test_indexed_plan() {
        let plan = DecodePlan::from_bitmap_info(&bitmap(2, -2, 8, FourCC::ZERO)).unwrap();
        assert_eq!(plan.layout, PixelLayout::Indexed);
        assert!(plan.wants_palette());
        assert!(plan.top_down);
        // 2 pixels at 8 bits round up to a 4-byte scan line
        assert_eq!(plan.stride, 4);
        assert_eq!(plan.frame_len(), 8);
    }

    #[test]
    fn test_grayscale_plans() {
        let plan = DecodePlan::from_bitmap_info(&bitmap(4, 4, 8, compression::GREY)).unwrap();
        assert_eq!(plan.layout, PixelLayout::Gray8);
        assert!(plan.top_down);

        let plan = DecodePlan::from_bitmap_info(&bitmap(4, 4, 16, compression::Y16)).unwrap();
        assert_eq!(plan.layout, PixelLayout::Gray16);
        assert!(!plan.top_down);
        assert_eq!(plan.stride, 8);
    }

    #[test]
    fn test_yuv_folds() {
        for comp in [compression::UYVY, compression::UYNV, compression::Y422] {
            let plan = DecodePlan::from_bitmap_info(&bitmap(4, 4, 16, comp)).unwrap();
            assert_eq!(plan.layout, PixelLayout::Uyvy);
            assert!(plan.top_down, "{comp} should be top-down");
        }

        for comp in [compression::CYUV, compression::V422] {
            let plan = DecodePlan::from_bitmap_info(&bitmap(4, 4, 16, comp)).unwrap();
            assert_eq!(plan.layout, PixelLayout::Uyvy);
            assert!(!plan.top_down, "{comp} should not be top-down");
        }

        for comp in [compression::YUY2, compression::YUNV, compression::YUYV] {
            let plan = DecodePlan::from_bitmap_info(&bitmap(4, 4, 16, comp)).unwrap();
            assert_eq!(plan.layout, PixelLayout::Yuy2);
            assert!(plan.top_down);
        }

        let plan = DecodePlan::from_bitmap_info(&bitmap(4, 4, 16, compression::YVYU)).unwrap();
        assert_eq!(plan.layout, PixelLayout::Yvyu);
    }

    #[test]
    fn test_unsupported_compression() {
        let err = DecodePlan::from_bitmap_info(&bitmap(4, 4, 24, FourCC(*b"MJPG"))).unwrap_err();
        assert!(matches!(err, AviError::UnsupportedCompression(_)));
    }

    #[test]
    fn test_unsupported_bit_count() {
        let err = DecodePlan::from_bitmap_info(&bitmap(4, 4, 16, FourCC::ZERO)).unwrap_err();
        assert!(matches!(err, AviError::UnsupportedBitCount { bits: 16, .. }));

        let err = DecodePlan::from_bitmap_info(&bitmap(4, 4, 24, compression::Y800)).unwrap_err();
        assert!(matches!(err, AviError::UnsupportedBitCount { bits: 24, .. }));

        let err = DecodePlan::from_bitmap_info(&bitmap(4, 4, 8, compression::AYUV)).unwrap_err();
        assert!(matches!(err, AviError::UnsupportedBitCount { bits: 8, .. }));
    }

    #[test]
    fn test_stride_rounding() {
        // 3 pixels at 8 bits: 3 bytes rounds up to 4
        let plan = DecodePlan::from_bitmap_info(&bitmap(3, 1, 8, compression::GREY)).unwrap();
        assert_eq!(plan.stride, 4);

        // 1 pixel at 24 bits: 3 bytes rounds up to 4
        let plan = DecodePlan::from_bitmap_info(&bitmap(1, 1, 24, FourCC::ZERO)).unwrap();
        assert_eq!(plan.stride, 4);

        // 5 pixels at 16 bits: 10 bytes rounds up to 12
        let plan = DecodePlan::from_bitmap_info(&bitmap(5, 1, 16, compression::YUY2)).unwrap();
        assert_eq!(plan.stride, 12);
    }
}
