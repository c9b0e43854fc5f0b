use ndarray::{Axis, Zip};

use crate::consts::EPSILON;
use crate::error::{ImprepError, Result};
use crate::frame::{Frame, PixelDepth};

/// Subtract the per-channel mean from every pixel.
///
/// Works for any channel count and depth. Integer depths saturate, so
/// below-mean pixels of an 8-bit frame clamp to 0.
pub fn subtract_mean(frame: &mut Frame) {
    let depth = frame.depth;
    for mut channel in frame.data.axis_iter_mut(Axis(2)) {
        let mean = channel.iter().map(|&v| v as f64).sum::<f64>() / channel.len().max(1) as f64;
        let mean = mean as f32;
        channel.mapv_inplace(|v| depth.saturate(v - mean));
    }
}

/// Invert pixel values (negative image).
///
/// Multi-channel frames are reduced to luminance first. 8-bit frames map to
/// `255 - x`, float frames to `1 - x`; other depths are rejected.
pub fn negate(frame: &mut Frame) -> Result<()> {
    if frame.channels() != 1 {
        *frame = frame.to_gray()?;
    }
    match frame.depth {
        PixelDepth::U8 => frame.data.mapv_inplace(|v| 255.0 - v),
        PixelDepth::F32 => frame.data.mapv_inplace(|v| 1.0 - v),
        other => {
            return Err(ImprepError::InvalidInput(format!(
                "cannot negate a {other} frame (only 8-bit and float are supported)"
            )))
        }
    }
    Ok(())
}

/// Linearly rescale all values to span [0, 255] and convert to 8-bit.
///
/// A constant frame has no range to stretch and maps to all zeros.
pub fn normalize_8bit(frame: &Frame) -> Frame {
    let (min, max) = frame
        .data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let delta = (max - min) as f64;

    let mut data = frame.data.clone();
    if delta <= EPSILON || !delta.is_finite() {
        data.fill(0.0);
    } else {
        let scale = (255.0 / delta) as f32;
        Zip::from(&mut data).for_each(|v| *v = PixelDepth::U8.saturate((*v - min) * scale));
    }
    Frame::new(data, PixelDepth::U8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn normalize_stretches_to_full_range() {
        let plane = Array2::from_shape_vec((1, 3), vec![0.25, 0.5, 0.75]).unwrap();
        let out = normalize_8bit(&Frame::from_plane(plane, PixelDepth::F32));
        assert_eq!(out.depth, PixelDepth::U8);
        assert_eq!(out.to_row(), vec![0.0, 128.0, 255.0]);
    }

    #[test]
    fn subtract_mean_saturates_8bit() {
        let plane = Array2::from_shape_vec((1, 4), vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let mut frame = Frame::from_plane(plane, PixelDepth::U8);
        subtract_mean(&mut frame);
        assert_eq!(frame.to_row(), vec![0.0, 0.0, 5.0, 15.0]);
    }
}
