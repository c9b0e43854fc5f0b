pub mod gaussian_blur;
pub mod levels;
pub mod median;
pub mod sobel;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{ImprepError, Result};
use crate::frame::Frame;

/// Spatial filter applied to the luminance plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Gaussian,
    Median,
    Sobel,
}

impl FilterKind {
    /// Parse a single filter token: `g`/`m`/`s` or the full lowercase name.
    pub fn parse(token: &str) -> Result<Self> {
        match token.trim() {
            "g" | "gaussian" => Ok(FilterKind::Gaussian),
            "m" | "median" => Ok(FilterKind::Median),
            "s" | "sobel" => Ok(FilterKind::Sobel),
            other => Err(ImprepError::InvalidInput(format!(
                "unknown filter kind '{other}' (expected gaussian(g), median(m) or sobel(s))"
            ))),
        }
    }

    /// Parse a compact sequence such as `"mgs"` or `"m g s"`.
    ///
    /// Comma-separated full names (`"median,gaussian"`) are accepted too.
    pub fn parse_sequence(spec: &str) -> Result<Vec<Self>> {
        if spec.contains(',') {
            return spec
                .split(',')
                .filter(|t| !t.trim().is_empty())
                .map(Self::parse)
                .collect();
        }
        spec.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Self::parse(&c.to_string()))
            .collect()
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Gaussian => write!(f, "Gaussian"),
            FilterKind::Median => write!(f, "Median"),
            FilterKind::Sobel => write!(f, "Sobel"),
        }
    }
}

impl std::str::FromStr for FilterKind {
    type Err = ImprepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Filter a frame in place.
///
/// Multi-channel frames are reduced to luminance first, so the result is
/// always single-channel with the same height and width.
pub fn apply_filter(frame: &mut Frame, kind: FilterKind) -> Result<()> {
    if frame.channels() != 1 {
        *frame = frame.to_gray()?;
    }
    let filtered = match kind {
        FilterKind::Gaussian => gaussian_blur::gaussian_blur(frame),
        FilterKind::Median => median::median_blur(frame),
        FilterKind::Sobel => sobel::sobel_magnitude(frame),
    };
    *frame = filtered;
    Ok(())
}

/// Mirror an out-of-range index without repeating the edge sample
/// (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// Clamp an out-of-range index to the nearest edge sample.
pub(crate) fn replicate(index: isize, len: usize) -> usize {
    index.clamp(0, len as isize - 1) as usize
}

/// Evaluate `f(row, col)` for every pixel of an `h x w` plane.
///
/// Switches to row-level parallelism above [`PARALLEL_PIXEL_THRESHOLD`].
pub(crate) fn build_plane<F>(h: usize, w: usize, f: F) -> Array2<f32>
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| f(row, col)).collect())
            .collect();

        let mut result = Array2::<f32>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        Array2::from_shape_fn((h, w), |(row, col)| f(row, col))
    }
}
