use std::path::Path;
use std::sync::Arc;

use ndarray::ArrayView1;

use crate::color::yuv::{to_yuv, Chrominances};
use crate::error::{ImprepError, Result};
use crate::filters::apply_filter;
use crate::filters::levels::{negate, subtract_mean};
use crate::frame::Frame;
use crate::io::image_io::load_image;
use crate::pca::PcaBasis;
use crate::pipeline::config::{ColorMode, ProcessingConfig};

/// Output of [`Image::process`]: the processed luminance plane and, in
/// color mode, the untouched chrominance planes.
#[derive(Clone, Debug)]
pub struct Processed {
    pub luminance: Frame,
    pub chrominances: Option<Chrominances>,
}

/// One labeled sample.
///
/// The original frame never changes. The pre-PCA row and the formatted
/// vector are computed on first request and cached.
#[derive(Clone, Debug)]
pub struct Image {
    original: Frame,
    label: u32,
    config: Arc<ProcessingConfig>,
    pca_row: Option<Vec<f32>>,
    formatted: Option<Vec<f32>>,
}

impl Image {
    /// Decode an image file according to the configured color mode.
    pub fn open(path: &Path, label: u32, config: Arc<ProcessingConfig>) -> Result<Self> {
        let frame = load_image(path, config.color_mode)?;
        Self::from_frame(frame, label, config)
    }

    /// Wrap an already decoded frame.
    pub fn from_frame(frame: Frame, label: u32, config: Arc<ProcessingConfig>) -> Result<Self> {
        if frame.is_empty() {
            return Err(ImprepError::InvalidInput("image frame is empty".into()));
        }
        Ok(Self {
            original: frame,
            label,
            config,
            pca_row: None,
            formatted: None,
        })
    }

    pub fn original(&self) -> &Frame {
        &self.original
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Pixel count of the original frame.
    pub fn size(&self) -> usize {
        self.original.total()
    }

    /// Whether the formatted vector is already cached.
    pub fn is_formatted(&self) -> bool {
        self.formatted.is_some()
    }

    /// Run the configured transform chain on the original frame.
    ///
    /// Order: color decomposition, mean subtraction, filters, negation.
    /// Only luminance is transformed.
    pub fn process(&self) -> Result<Processed> {
        let (mut luminance, chrominances) = match self.config.color_mode {
            ColorMode::Color => {
                let yuv = to_yuv(&self.original)?;
                (yuv.luminance, Some(yuv.chrominances))
            }
            ColorMode::Grayscale => (self.original.clone(), None),
        };

        if self.config.subtract_mean {
            subtract_mean(&mut luminance);
        }
        for &kind in self.config.active_filters() {
            apply_filter(&mut luminance, kind)?;
        }
        if self.config.negate {
            negate(&mut luminance)?;
        }

        Ok(Processed {
            luminance,
            chrominances,
        })
    }

    /// Processed and flattened network input: luminance, then U and V.
    pub fn format_for_nn(&mut self) -> Result<&[f32]> {
        let formatted = match self.formatted.take() {
            Some(cached) => cached,
            None => {
                let processed = self.process()?;
                let mut out = Vec::with_capacity(formatted_len(&processed));
                append_plane(&mut out, &processed.luminance);
                if let Some(chroma) = &processed.chrominances {
                    append_plane(&mut out, &chroma.u);
                    append_plane(&mut out, &chroma.v);
                }
                out
            }
        };
        Ok(self.formatted.insert(formatted).as_slice())
    }

    /// Process without chrominance and cache the flattened luminance row
    /// used for PCA fitting and projection.
    pub fn prepare_for_pca(&mut self) -> Result<&[f32]> {
        let processed = self.process()?;
        Ok(self.pca_row.insert(processed.luminance.to_row()).as_slice())
    }

    /// The row cached by [`Image::prepare_for_pca`], if any.
    pub fn pca_row(&self) -> Option<&[f32]> {
        self.pca_row.as_deref()
    }

    /// Project the cached pre-PCA row through `basis` and cache the result
    /// as the formatted vector.
    pub fn format_for_nn_with_pca(&mut self, basis: &PcaBasis) -> Result<&[f32]> {
        let formatted = match self.formatted.take() {
            Some(cached) => cached,
            None => {
                let row = self.pca_row.as_deref().ok_or_else(|| {
                    ImprepError::InvalidInput(
                        "prepare_for_pca must run before projecting an image".into(),
                    )
                })?;
                basis.project(&ArrayView1::from(row))?.to_vec()
            }
        };
        Ok(self.formatted.insert(formatted).as_slice())
    }

    /// Drop cached vectors (used when the PCA basis is refit).
    pub(crate) fn clear_formatted(&mut self) {
        self.formatted = None;
    }
}

fn formatted_len(processed: &Processed) -> usize {
    processed.luminance.data.len()
        + processed
            .chrominances
            .as_ref()
            .map(|c| c.u.data.len() + c.v.data.len())
            .unwrap_or(0)
}

/// Append a plane row-major, scaling integer depths into [0, 1).
fn append_plane(out: &mut Vec<f32>, frame: &Frame) {
    let scale = frame.depth.format_scale();
    out.extend(frame.data.iter().map(|&v| v / scale));
}
