use ndarray::{Array2, ArrayView2};

use crate::consts::MEDIAN_WINDOW;
use crate::filters::{build_plane, replicate};
use crate::frame::Frame;

/// Apply a 5x5 median filter to a single-channel frame.
///
/// Border pixels use replicated edges. Uses `select_nth_unstable` for O(n)
/// median without a full sort.
pub fn median_blur(frame: &Frame) -> Frame {
    let filtered = median_blur_array(&frame.plane(0), MEDIAN_WINDOW);
    Frame::from_plane(filtered, frame.depth)
}

/// Median filter with an odd square window over a raw plane.
pub fn median_blur_array(data: &ArrayView2<f32>, window: usize) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (window / 2) as isize;
    let n = window * window;

    build_plane(h, w, |row, col| {
        let mut values = Vec::with_capacity(n);
        for dy in -radius..=radius {
            let src_row = replicate(row as isize + dy, h);
            for dx in -radius..=radius {
                let src_col = replicate(col as isize + dx, w);
                values.push(data[[src_row, src_col]]);
            }
        }
        compute_median(&mut values)
    })
}

fn compute_median(values: &mut [f32]) -> f32 {
    let mid = values.len() / 2;
    *values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b)).1
}
