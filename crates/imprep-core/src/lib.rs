pub mod color;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pca;
pub mod pipeline;
pub mod quality;
