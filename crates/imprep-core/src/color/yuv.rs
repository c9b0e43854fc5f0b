use ndarray::{Array2, ArrayView2};

use crate::consts::{
    CHROMA_U_SCALE, CHROMA_V_SCALE, COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R,
};
use crate::error::{ImprepError, Result};
use crate::frame::{Frame, PixelDepth};

/// The two color-difference planes, each decimated 2x2.
#[derive(Clone, Debug, PartialEq)]
pub struct Chrominances {
    pub u: Frame,
    pub v: Frame,
}

/// Full-resolution luminance plus decimated chrominances.
#[derive(Clone, Debug, PartialEq)]
pub struct YuvImage {
    pub luminance: Frame,
    pub chrominances: Chrominances,
}

/// Convert a BGR frame to YUV with chrominance decimated by 2 on both axes.
///
/// Y = 0.299R + 0.587G + 0.114B, U = 0.492(B - Y) + delta, V = 0.877(R - Y) + delta,
/// where delta is the mid-point of the frame's depth. Each chrominance plane
/// has `(height / 2) x (width / 2)` pixels.
pub fn to_yuv(frame: &Frame) -> Result<YuvImage> {
    if frame.channels() != COLOR_CHANNEL_COUNT {
        return Err(ImprepError::InvalidInput(format!(
            "YUV conversion needs a 3-channel frame, got {} channel(s)",
            frame.channels()
        )));
    }

    let depth = frame.depth;
    let delta = depth.chroma_delta();
    let (h, w) = (frame.height(), frame.width());

    let mut y = Array2::<f32>::zeros((h, w));
    let mut u = Array2::<f32>::zeros((h, w));
    let mut v = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let b = frame.data[[row, col, 0]];
            let g = frame.data[[row, col, 1]];
            let r = frame.data[[row, col, 2]];
            let luma = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
            y[[row, col]] = depth.saturate(luma);
            u[[row, col]] = depth.saturate((b - luma) * CHROMA_U_SCALE + delta);
            v[[row, col]] = depth.saturate((r - luma) * CHROMA_V_SCALE + delta);
        }
    }

    Ok(YuvImage {
        luminance: Frame::from_plane(y, depth),
        chrominances: Chrominances {
            u: Frame::from_plane(decimate_2x2(&u.view(), depth), depth),
            v: Frame::from_plane(decimate_2x2(&v.view(), depth), depth),
        },
    })
}

/// Halve both dimensions by averaging each 2x2 block.
///
/// A trailing odd row or column is dropped.
pub fn decimate_2x2(data: &ArrayView2<f32>, depth: PixelDepth) -> Array2<f32> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h / 2, w / 2), |(row, col)| {
        let r = row * 2;
        let c = col * 2;
        let sum = data[[r, c]] + data[[r, c + 1]] + data[[r + 1, c]] + data[[r + 1, c + 1]];
        depth.saturate(sum * 0.25)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn gray_pixels_have_neutral_chroma() {
        let data = Array3::<f32>::from_elem((4, 4, 3), 100.0);
        let yuv = to_yuv(&Frame::new(data, PixelDepth::U8)).unwrap();
        assert!(yuv.luminance.data.iter().all(|&v| v == 100.0));
        assert!(yuv.chrominances.u.data.iter().all(|&v| v == 128.0));
        assert!(yuv.chrominances.v.data.iter().all(|&v| v == 128.0));
    }

    #[test]
    fn decimation_averages_blocks() {
        let data = Array2::from_shape_vec((2, 4), vec![0.0, 4.0, 10.0, 10.0, 8.0, 4.0, 20.0, 20.0])
            .unwrap();
        let out = decimate_2x2(&data.view(), PixelDepth::F32);
        assert_eq!(out.dim(), (1, 2));
        assert_eq!(out[[0, 0]], 4.0);
        assert_eq!(out[[0, 1]], 15.0);
    }
}
