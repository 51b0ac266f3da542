//! AVI Container Reader
//!
//! This crate reads AVI (Audio Video Interleave) files, which are based on
//! the RIFF (Resource Interchange File Format) structure, and decodes their
//! uncompressed and packed-YUV video frames into pixel buffers.
//!
//! # Features
//!
//! - RIFF chunk scanning with JUNK skipping and LIST recursion
//! - Uncompressed 8-bit indexed (with palette), 8/16-bit grayscale and
//!   24/32-bit RGB frames
//! - Packed YUV 4:2:2 (YUY2, UYVY, YVYU and their aliases) and AYUV frames
//! - Optional grayscale conversion and vertical flipping
//! - Frame ranges, eager decoding into a stack, or a lazy virtual stack
//!   that decodes frames on demand
//!
//! # Example
//!
//! ```no_run
//! use avistack_avi::{AviReader, ReadOptions};
//!
//! let reader = AviReader::open_path("video.avi").unwrap();
//! println!("{} frames declared", reader.header().total_frames);
//!
//! let stack = reader.read_stack(&ReadOptions::default()).unwrap();
//! println!("decoded {} frames of {}x{}", stack.len(), stack.width(), stack.height());
//! ```

mod chunks;
mod decode;
mod demuxer;
mod error;
mod options;
mod plan;
mod stack;
mod types;

pub use chunks::{stream_data_ids, FourCC};
pub use demuxer::AviReader;
pub use error::{AviError, Result};
pub use options::ReadOptions;
pub use plan::{compression, DecodePlan, PixelLayout};
pub use stack::{frame_label, FrameRecord, FrameStack, Slice, VirtualStack};
pub use types::{AviFlags, AviHeader, BitmapInfo, StreamHeader};

pub use avistack_core::{ByteReader, FrameBuffer, Palette, PixelData};
