use std::path::Path;

use image::{GrayImage, Luma, RgbImage};
use ndarray::Array3;

use crate::error::{ImprepError, Result};
use crate::frame::{Frame, PixelDepth};
use crate::pipeline::config::ColorMode;

/// Decode an image file into a Frame.
///
/// Grayscale mode yields a 1-channel 8-bit frame (BT.601 luminance of the
/// decoded RGB). Color mode yields a 3-channel 8-bit frame ordered B, G, R.
/// Missing, unreadable or empty files are reported as invalid input.
pub fn load_image(path: &Path, mode: ColorMode) -> Result<Frame> {
    let img = image::open(path).map_err(|e| {
        ImprepError::InvalidInput(format!("image {} could not be read: {e}", path.display()))
    })?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(ImprepError::InvalidInput(format!(
            "image {} is empty",
            path.display()
        )));
    }

    let bgr = Array3::from_shape_fn((h as usize, w as usize, 3), |(row, col, ch)| {
        let pixel = rgb.get_pixel(col as u32, row as u32);
        f32::from(pixel.0[2 - ch])
    });
    let frame = Frame::new(bgr, PixelDepth::U8);

    match mode {
        ColorMode::Color => Ok(frame),
        ColorMode::Grayscale => frame.to_gray(),
    }
}

/// Save a 1- or 3-channel frame as an 8-bit PNG (values saturated to 8 bits).
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    let h = frame.height();
    let w = frame.width();
    let scale = match frame.depth {
        PixelDepth::U8 => 1.0,
        PixelDepth::U16 => 255.0 / 65535.0,
        PixelDepth::F32 => 255.0,
    };
    let to_u8 = |v: f32| PixelDepth::U8.saturate(v * scale) as u8;

    let result = match frame.channels() {
        1 => {
            let mut img = GrayImage::new(w as u32, h as u32);
            for row in 0..h {
                for col in 0..w {
                    img.put_pixel(col as u32, row as u32, Luma([to_u8(frame.data[[row, col, 0]])]));
                }
            }
            img.save(path)
        }
        3 => {
            let mut img = RgbImage::new(w as u32, h as u32);
            for row in 0..h {
                for col in 0..w {
                    let b = to_u8(frame.data[[row, col, 0]]);
                    let g = to_u8(frame.data[[row, col, 1]]);
                    let r = to_u8(frame.data[[row, col, 2]]);
                    img.put_pixel(col as u32, row as u32, image::Rgb([r, g, b]));
                }
            }
            img.save(path)
        }
        n => {
            return Err(ImprepError::InvalidInput(format!(
                "cannot save a {n}-channel frame"
            )))
        }
    };
    result.map_err(|e| match e {
        image::ImageError::IoError(io) => ImprepError::Io(io),
        other => ImprepError::InvalidInput(format!("{}: {other}", path.display())),
    })
}
