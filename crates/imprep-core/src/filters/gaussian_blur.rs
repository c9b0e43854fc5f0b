use ndarray::{Array2, ArrayView2};

use crate::consts::GAUSSIAN_KERNEL_5;
use crate::filters::{build_plane, reflect_101};
use crate::frame::Frame;

/// Apply a 5x5 Gaussian blur to a single-channel frame using separable 1D
/// convolution. The result is saturated to the frame's depth.
pub fn gaussian_blur(frame: &Frame) -> Frame {
    let depth = frame.depth;
    let blurred = gaussian_blur_array(&frame.plane(0)).mapv(|v| depth.saturate(v));
    Frame::from_plane(blurred, depth)
}

/// Apply the 5-tap Gaussian kernel to a raw plane (no saturation).
pub fn gaussian_blur_array(data: &ArrayView2<f32>) -> Array2<f32> {
    let row_pass = convolve_rows(data, &GAUSSIAN_KERNEL_5);
    convolve_cols(&row_pass.view(), &GAUSSIAN_KERNEL_5)
}

fn convolve_rows(data: &ArrayView2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (kernel.len() / 2) as isize;

    build_plane(h, w, |row, col| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let src_col = reflect_101(col as isize + ki as isize - radius, w);
            sum += data[[row, src_col]] * kv;
        }
        sum
    })
}

fn convolve_cols(data: &ArrayView2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (kernel.len() / 2) as isize;

    build_plane(h, w, |row, col| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let src_row = reflect_101(row as isize + ki as isize - radius, h);
            sum += data[[src_row, col]] * kv;
        }
        sum
    })
}
