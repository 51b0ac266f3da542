//! Read configuration.

/// Options controlling which frames are read and how they are converted.
///
/// Built once and passed to the reader; nothing here is retained between
/// invocations.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// 1-based number of the first frame to read.
    pub first_frame: u32,
    /// Last frame to read: `> 0` is a 1-based inclusive end, `0` reads to
    /// the end of the movie, `< 0` counts back from the declared total
    /// (`-1` stops one frame before the end).
    pub last_frame: i32,
    /// Convert RGB and YUV color sources to 8-bit grayscale. Indexed 8-bit
    /// and 16-bit grayscale sources are unaffected.
    pub convert_to_gray: bool,
    /// Flip the image vertically.
    pub flip_vertical: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            first_frame: 1,
            last_frame: 0,
            convert_to_gray: false,
            flip_vertical: false,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first frame to read (1-based; values below 1 clamp to 1).
    #[must_use]
    pub fn first_frame(mut self, n: u32) -> Self {
        self.first_frame = n.max(1);
        self
    }

    /// Set the last frame to read (0 for all, negative for "end minus").
    #[must_use]
    pub fn last_frame(mut self, n: i32) -> Self {
        self.last_frame = n;
        self
    }

    /// Request grayscale output for color sources.
    #[must_use]
    pub fn convert_to_gray(mut self, convert: bool) -> Self {
        self.convert_to_gray = convert;
        self
    }

    /// Request vertical flipping.
    #[must_use]
    pub fn flip_vertical(mut self, flip: bool) -> Self {
        self.flip_vertical = flip;
        self
    }

    /// Resolve `last_frame` against the declared frame count. A negative
    /// value without a declared total falls back to reading everything.
    pub(crate) fn resolve_last_frame(&self, total_frames: u32) -> u32 {
        if self.last_frame > 0 {
            self.last_frame as u32
        } else if self.last_frame < 0 && total_frames > 0 {
            (i64::from(total_frames) + i64::from(self.last_frame)).max(0) as u32
        } else {
            u32::MAX
        }
    }
}
