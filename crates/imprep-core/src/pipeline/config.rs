use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_EXTENSIONS;
use crate::error::{ImprepError, Result};
use crate::pca::PcaTarget;

pub use crate::filters::FilterKind;

/// How images are decoded and decomposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Single luminance plane.
    #[default]
    Grayscale,
    /// Luminance plus 2x2-decimated chrominance planes.
    Color,
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grayscale => write!(f, "Grayscale"),
            Self::Color => write!(f, "Color"),
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = ImprepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grayscale" | "gray" | "mono" => Ok(Self::Grayscale),
            "color" | "colour" => Ok(Self::Color),
            other => Err(ImprepError::InvalidInput(format!(
                "invalid color mode '{other}', only grayscale or color are available"
            ))),
        }
    }
}

/// Per-image processing options, shared read-only by every image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub color_mode: ColorMode,
    /// Enables `filters`; the list is ignored when false.
    #[serde(default)]
    pub apply_filters: bool,
    /// Filters applied to the luminance plane, in order.
    #[serde(default)]
    pub filters: Vec<FilterKind>,
    #[serde(default)]
    pub subtract_mean: bool,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub use_pca: bool,
    #[serde(default)]
    pub pca_target: PcaTarget,
}

impl ProcessingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.use_pca {
            self.pca_target.validate()?;
        }
        Ok(())
    }

    /// Filters that will actually run.
    pub fn active_filters(&self) -> &[FilterKind] {
        if self.apply_filters {
            &self.filters
        } else {
            &[]
        }
    }
}

/// A complete corpus description: where to read, what to produce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Folder containing one numbered sub-folder per category.
    pub root: PathBuf,
    pub num_categories: usize,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Fixed shuffle seed for reproducible ordering.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub shuffle: bool,
    /// Feature file to write after the scan.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            num_categories: 2,
            extensions: default_extensions(),
            seed: None,
            shuffle: false,
            output: None,
            processing: ProcessingConfig::default(),
        }
    }
}

pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}
