use ndarray::{Array2, ArrayView2};

use crate::filters::{build_plane, reflect_101};
use crate::frame::{Frame, PixelDepth};

/// Sobel edge magnitude of a single-channel frame.
///
/// Sobel kernels:
///   Gx = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]
///   Gy = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]]
///
/// |Gx| and |Gy| are each saturated to 8 bits, then blended 0.5/0.5. The
/// output is always an 8-bit frame of the same size as the input.
pub fn sobel_magnitude(frame: &Frame) -> Frame {
    let plane = frame.plane(0);
    let gx = sobel_array(&plane, Direction::Horizontal);
    let gy = sobel_array(&plane, Direction::Vertical);

    let (h, w) = gx.dim();
    let blended = Array2::from_shape_fn((h, w), |(row, col)| {
        let ax = PixelDepth::U8.saturate(gx[[row, col]].abs());
        let ay = PixelDepth::U8.saturate(gy[[row, col]].abs());
        PixelDepth::U8.saturate(0.5 * ax + 0.5 * ay)
    });
    Frame::from_plane(blended, PixelDepth::U8)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// First-order Sobel derivative with reflect-101 borders (signed, unscaled).
pub fn sobel_array(data: &ArrayView2<f32>, direction: Direction) -> Array2<f32> {
    let (h, w) = data.dim();

    build_plane(h, w, |row, col| {
        let px = |dy: isize, dx: isize| {
            let r = reflect_101(row as isize + dy, h);
            let c = reflect_101(col as isize + dx, w);
            data[[r, c]]
        };
        match direction {
            Direction::Horizontal => {
                -px(-1, -1) + px(-1, 1) - 2.0 * px(0, -1) + 2.0 * px(0, 1) - px(1, -1) + px(1, 1)
            }
            Direction::Vertical => {
                -px(-1, -1) - 2.0 * px(-1, 0) - px(-1, 1) + px(1, -1) + 2.0 * px(1, 0) + px(1, 1)
            }
        }
    })
}
