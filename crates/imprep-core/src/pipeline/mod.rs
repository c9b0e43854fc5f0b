pub mod config;
pub mod image;

pub use image::{Image, Processed};
