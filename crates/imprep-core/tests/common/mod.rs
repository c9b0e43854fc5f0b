#![allow(dead_code)]

use std::path::Path;

use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use imprep_core::frame::{Frame, PixelDepth};
use imprep_core::io::image_io::save_png;

/// Deterministic noisy 8-bit grayscale frame.
pub fn gray_frame(h: usize, w: usize, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let plane = Array2::from_shape_fn((h, w), |_| rng.gen_range(0..=255u8) as f32);
    Frame::from_plane(plane, PixelDepth::U8)
}

/// Deterministic noisy 8-bit BGR frame.
pub fn color_frame(h: usize, w: usize, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = Array3::from_shape_fn((h, w, 3), |_| rng.gen_range(0..=255u8) as f32);
    Frame::new(data, PixelDepth::U8)
}

/// Smooth 8-bit BGR frame (gradients rather than noise).
pub fn gradient_color_frame(h: usize, w: usize) -> Frame {
    let data = Array3::from_shape_fn((h, w, 3), |(row, col, ch)| match ch {
        0 => (col * 255 / w.max(1)) as f32,
        1 => (row * 255 / h.max(1)) as f32,
        _ => ((row + col) * 127 / (h + w).max(1)) as f32,
    });
    Frame::new(data, PixelDepth::U8)
}

/// Write a noisy color PNG to `path`.
pub fn write_image(path: &Path, h: usize, w: usize, seed: u64) {
    save_png(&color_frame(h, w, seed), path).expect("write test image");
}

/// Build `root/0 .. root/{categories-1}` with `per_category` PNGs each.
pub fn build_corpus(root: &Path, categories: usize, per_category: usize, h: usize, w: usize) {
    for category in 0..categories {
        let dir = root.join(category.to_string());
        std::fs::create_dir_all(&dir).expect("create category dir");
        for i in 0..per_category {
            let seed = (category * 1000 + i) as u64;
            write_image(&dir.join(format!("img_{i:03}.png")), h, w, seed);
        }
    }
}

/// Build a corpus where every image is the same gradient PNG.
pub fn build_uniform_corpus(root: &Path, categories: usize, per_category: usize, h: usize, w: usize) {
    let frame = gradient_color_frame(h, w);
    for category in 0..categories {
        let dir = root.join(category.to_string());
        std::fs::create_dir_all(&dir).expect("create category dir");
        for i in 0..per_category {
            save_png(&frame, &dir.join(format!("img_{i:03}.png"))).expect("write test image");
        }
    }
}
