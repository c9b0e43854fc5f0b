use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::dataset::scan::{category_dir, list_image_files};
use crate::error::{ImprepError, Result};
use crate::io::feature_file::{load_feature_set, FeatureSet, FeatureSetWriter};
use crate::pca::PcaBasis;
use crate::pipeline::config::{default_extensions, DatasetConfig, ProcessingConfig};
use crate::pipeline::Image;

/// A formatted feature vector with its category label.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub features: Vec<f32>,
    pub label: u32,
}

/// Reads a categorized image corpus, formats it for network input and
/// serves it sample by sample.
///
/// Expected layout: `root/0/`, `root/1/`, ... `root/{num_categories - 1}/`,
/// each holding same-sized image files. File names are irrelevant; any
/// file with an allowed extension is read.
pub struct DataLoader {
    root: PathBuf,
    num_categories: usize,
    config: Arc<ProcessingConfig>,
    extensions: Vec<String>,
    images: Vec<Image>,
    cursor: usize,
    pca: Option<PcaBasis>,
    rng: StdRng,
}

impl DataLoader {
    pub fn new(
        root: impl Into<PathBuf>,
        num_categories: usize,
        config: ProcessingConfig,
    ) -> Result<Self> {
        if num_categories < 2 {
            return Err(ImprepError::InvalidInput(format!(
                "at least 2 categories are needed for classification, got {num_categories}"
            )));
        }
        config.validate()?;

        Ok(Self {
            root: root.into(),
            num_categories,
            config: Arc::new(config),
            extensions: default_extensions(),
            images: Vec::new(),
            cursor: 0,
            pca: None,
            rng: StdRng::from_entropy(),
        })
    }

    /// Build a loader from a full dataset description.
    pub fn from_config(dataset: &DatasetConfig) -> Result<Self> {
        let loader = Self::new(
            dataset.root.clone(),
            dataset.num_categories,
            dataset.processing.clone(),
        )?
        .with_extensions(dataset.extensions.clone());
        Ok(match dataset.seed {
            Some(seed) => loader.with_seed(seed),
            None => loader,
        })
    }

    /// Replace the allowed extension list (matched case-sensitively).
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Seed the shuffle RNG for reproducible ordering.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Scan all category folders and decode every image.
    ///
    /// Any previously loaded images, cursor and PCA basis are discarded.
    /// Returns the number of images read.
    pub fn read_data(&mut self, shuffle: bool) -> Result<usize> {
        self.read_data_with_progress(shuffle, |_| {})
    }

    /// Like [`DataLoader::read_data`], calling `on_progress(images_decoded)`
    /// as each file is decoded.
    pub fn read_data_with_progress(
        &mut self,
        shuffle: bool,
        on_progress: impl Fn(usize) + Send + Sync,
    ) -> Result<usize> {
        self.images.clear();
        self.cursor = 0;
        self.pca = None;

        let mut jobs: Vec<(PathBuf, u32)> = Vec::new();
        for category in 0..self.num_categories {
            let dir = category_dir(&self.root, category);
            let files = list_image_files(&dir, &self.extensions)?;
            debug!(category, files = files.len(), dir = %dir.display(), "Category listed");
            let label = u32::try_from(category)
                .map_err(|_| ImprepError::InvalidInput(format!("category {category} too large")))?;
            jobs.extend(files.into_iter().map(|path| (path, label)));
        }

        info!(
            files = jobs.len(),
            categories = self.num_categories,
            mode = %self.config.color_mode,
            "Decoding images"
        );

        let done = AtomicUsize::new(0);
        let config = &self.config;
        let images = jobs
            .par_iter()
            .map(|(path, label)| {
                let image = Image::open(path, *label, Arc::clone(config));
                let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
                on_progress(completed);
                image
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = images.first() {
            let expected = first.size();
            if let Some(bad) = images.iter().find(|img| img.size() != expected) {
                return Err(ImprepError::DimensionMismatch {
                    expected,
                    actual: bad.size(),
                });
            }
        }
        self.images = images;

        if self.config.use_pca {
            self.fit_pca()?;
        }
        if shuffle {
            self.shuffle_images();
        }

        info!(images = self.images.len(), "Images read");
        Ok(self.images.len())
    }

    /// Formatted vector and label of the image at the cursor.
    ///
    /// The cursor advances after every call; after the last image it wraps
    /// to 0 and the images are reshuffled, so the loader behaves as an
    /// endless sequence of epochs.
    pub fn load_next(&mut self) -> Result<Sample> {
        if self.images.is_empty() {
            return Err(ImprepError::InvalidInput(
                "no images loaded, call read_data first".into(),
            ));
        }
        if self.config.use_pca && self.pca.is_none() {
            self.fit_pca()?;
        }

        let basis = if self.config.use_pca { self.pca.as_ref() } else { None };
        let image = &mut self.images[self.cursor];
        let features = format_image(image, basis)?.to_vec();
        let label = image.label();

        self.cursor += 1;
        if self.cursor == self.images.len() {
            self.cursor = 0;
            self.shuffle_images();
            debug!("Epoch complete, images reshuffled");
        }

        Ok(Sample { features, label })
    }

    /// Write every formatted vector, then every label, in stored order.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if self.config.use_pca && self.pca.is_none() {
            self.fit_pca()?;
        }

        let basis = if self.config.use_pca { self.pca.as_ref() } else { None };
        self.images
            .par_iter_mut()
            .try_for_each(|image| format_image(image, basis).map(|_| ()))?;

        let labels = self
            .images
            .iter()
            .map(|image| {
                i32::try_from(image.label()).map_err(|_| {
                    ImprepError::InvalidInput(format!("label {} does not fit in i32", image.label()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut writer = FeatureSetWriter::create(path, self.images.len())?;
        for image in &mut self.images {
            writer.write_record(format_image(image, basis)?)?;
        }
        writer.write_labels(&labels)?;
        writer.finalize()?;

        info!(path = %path.display(), records = self.images.len(), "Feature file saved");
        Ok(())
    }

    /// Read a feature file written by [`DataLoader::save`].
    pub fn load(path: &Path) -> Result<FeatureSet> {
        let set = load_feature_set(path)?;
        info!(path = %path.display(), records = set.len(), "Feature file loaded");
        Ok(set)
    }

    pub fn num_images(&self) -> usize {
        self.images.len()
    }

    pub fn num_categories(&self) -> usize {
        self.num_categories
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn pca_basis(&self) -> Option<&PcaBasis> {
        self.pca.as_ref()
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fit_pca(&mut self) -> Result<()> {
        let rows = self
            .images
            .par_iter_mut()
            .map(|image| image.prepare_for_pca().map(<[f32]>::to_vec))
            .collect::<Result<Vec<_>>>()?;

        let basis = PcaBasis::fit_rows(&rows, self.config.pca_target)?;
        for image in &mut self.images {
            image.clear_formatted();
        }
        info!(
            components = basis.n_components(),
            dim = basis.dim(),
            target = %self.config.pca_target,
            "PCA basis fitted"
        );
        self.pca = Some(basis);
        Ok(())
    }

    fn shuffle_images(&mut self) {
        self.images.shuffle(&mut self.rng);
    }
}

fn format_image<'a>(image: &'a mut Image, basis: Option<&PcaBasis>) -> Result<&'a [f32]> {
    match basis {
        Some(basis) => image.format_for_nn_with_pca(basis),
        None => image.format_for_nn(),
    }
}
