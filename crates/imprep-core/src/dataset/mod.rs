pub mod loader;
pub mod scan;

pub use loader::{DataLoader, Sample};
