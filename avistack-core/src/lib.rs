//! # Avistack Core
//!
//! Core building blocks shared by the avistack crates:
//! - A little-endian byte reader over any seekable source
//! - Frame buffer and palette abstractions for decoded video

pub mod frame;
pub mod reader;

pub use frame::{FrameBuffer, Palette, PixelData};
pub use reader::ByteReader;
