mod common;

use ndarray::Array3;

use imprep_core::color::yuv::{decimate_2x2, to_yuv};
use imprep_core::error::ImprepError;
use imprep_core::frame::{Frame, PixelDepth};

use common::{color_frame, gray_frame};

#[test]
fn test_yuv_plane_sizes() {
    let yuv = to_yuv(&color_frame(64, 64, 11)).unwrap();
    assert_eq!(yuv.luminance.total(), 4096);
    assert_eq!(yuv.chrominances.u.total(), 1024);
    assert_eq!(yuv.chrominances.v.total(), 1024);
    assert_eq!(yuv.chrominances.u.height(), 32);
    assert_eq!(yuv.chrominances.v.width(), 32);
}

#[test]
fn test_yuv_odd_dimensions_drop_last_row_and_column() {
    let yuv = to_yuv(&color_frame(5, 7, 12)).unwrap();
    assert_eq!(yuv.luminance.height(), 5);
    assert_eq!(yuv.luminance.width(), 7);
    assert_eq!(yuv.chrominances.u.height(), 2);
    assert_eq!(yuv.chrominances.u.width(), 3);
}

#[test]
fn test_yuv_pure_red_pushes_v_up() {
    let mut data = Array3::<f32>::zeros((2, 2, 3));
    data.slice_mut(ndarray::s![.., .., 2]).fill(255.0);
    let yuv = to_yuv(&Frame::new(data, PixelDepth::U8)).unwrap();

    // Y = 0.299 * 255 = 76.2 -> 76
    assert_eq!(yuv.luminance.data[[0, 0, 0]], 76.0);
    assert!(yuv.chrominances.v.data[[0, 0, 0]] > 200.0);
    assert!(yuv.chrominances.u.data[[0, 0, 0]] < 128.0);
}

#[test]
fn test_yuv_rejects_single_channel() {
    let result = to_yuv(&gray_frame(8, 8, 13));
    assert!(matches!(result, Err(ImprepError::InvalidInput(_))));
}

#[test]
fn test_decimate_averages_blocks() {
    let plane = ndarray::array![[0.0f32, 2.0, 9.0], [4.0, 6.0, 9.0], [9.0, 9.0, 9.0]];
    let out = decimate_2x2(&plane.view(), PixelDepth::F32);
    assert_eq!(out.dim(), (1, 1));
    assert_eq!(out[[0, 0]], 3.0);
}

#[test]
fn test_to_gray_matches_luminance_plane() {
    let frame = color_frame(10, 10, 14);
    let gray = frame.to_gray().unwrap();
    let yuv = to_yuv(&frame).unwrap();
    assert_eq!(gray, yuv.luminance);
}
