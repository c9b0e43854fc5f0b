use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{ImprepError, Result};

/// Numeric representation of the pixels stored in a [`Frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelDepth {
    /// 8-bit unsigned, values in [0, 255].
    U8,
    /// 16-bit unsigned, values in [0, 65535].
    U16,
    /// Normalized float, nominally in [0.0, 1.0].
    F32,
}

impl PixelDepth {
    /// Clamp and round a value into the representable range of this depth.
    pub fn saturate(self, value: f32) -> f32 {
        match self {
            PixelDepth::U8 => value.round_ties_even().clamp(0.0, 255.0),
            PixelDepth::U16 => value.round_ties_even().clamp(0.0, 65535.0),
            PixelDepth::F32 => value,
        }
    }

    /// Divisor that maps stored values into [0, 1) when flattening for a network.
    pub fn format_scale(self) -> f32 {
        match self {
            PixelDepth::U8 => 256.0,
            PixelDepth::U16 => 65536.0,
            PixelDepth::F32 => 1.0,
        }
    }

    /// Offset added to color-difference planes so they stay non-negative.
    pub fn chroma_delta(self) -> f32 {
        match self {
            PixelDepth::U8 => 128.0,
            PixelDepth::U16 => 32768.0,
            PixelDepth::F32 => 0.5,
        }
    }
}

impl std::fmt::Display for PixelDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelDepth::U8 => write!(f, "8-bit"),
            PixelDepth::U16 => write!(f, "16-bit"),
            PixelDepth::F32 => write!(f, "float"),
        }
    }
}

/// A decoded image matrix.
///
/// Pixel data is stored as f32 regardless of depth; for integer depths the
/// values are integral and within range. Three-channel frames are ordered
/// B, G, R along the channel axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Shape = (height, width, channels)
    pub data: Array3<f32>,
    pub depth: PixelDepth,
}

impl Frame {
    pub fn new(data: Array3<f32>, depth: PixelDepth) -> Self {
        Self { data, depth }
    }

    /// Wrap a single plane as a 1-channel frame.
    pub fn from_plane(plane: Array2<f32>, depth: PixelDepth) -> Self {
        Self {
            data: plane.insert_axis(Axis(2)),
            depth,
        }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// Pixel count (height * width), independent of channel count.
    pub fn total(&self) -> usize {
        self.height() * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View of a single channel.
    pub fn plane(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(2), channel)
    }

    /// BT.601 luminance of a BGR frame. Single-channel frames are cloned.
    pub fn to_gray(&self) -> Result<Frame> {
        match self.channels() {
            1 => Ok(self.clone()),
            COLOR_CHANNEL_COUNT => {
                let depth = self.depth;
                let gray = Array2::from_shape_fn((self.height(), self.width()), |(row, col)| {
                    let b = self.data[[row, col, 0]];
                    let g = self.data[[row, col, 1]];
                    let r = self.data[[row, col, 2]];
                    depth.saturate(LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b)
                });
                Ok(Frame::from_plane(gray, depth))
            }
            n => Err(ImprepError::InvalidInput(format!(
                "cannot convert a {n}-channel frame to grayscale"
            ))),
        }
    }

    /// Row-major flattening of all values (channels interleaved per pixel).
    pub fn to_row(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }
}
