pub mod feature_file;
pub mod image_io;
