use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use imprep_core::dataset::scan::{category_dir, list_image_files};
use imprep_core::dataset::DataLoader;
use imprep_core::pca::PcaTarget;
use imprep_core::pipeline::config::{default_extensions, ColorMode, DatasetConfig, FilterKind};

use crate::summary::print_dataset_summary;

#[derive(Args)]
pub struct ProcessArgs {
    /// Folder holding one numbered sub-folder per category
    #[arg(required_unless_present = "config")]
    pub dir: Option<PathBuf>,

    /// Number of categories (sub-folders 0..N-1)
    #[arg(short = 'l', long = "labels", required_unless_present = "config")]
    pub labels: Option<usize>,

    /// Dataset config file (TOML); flags given alongside it override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Filters applied in order: m = median, g = gaussian, s = sobel
    #[arg(short, long)]
    pub filters: Option<String>,

    /// Subtract the mean of each image
    #[arg(short = 'm', long)]
    pub mean: bool,

    /// Negate the processed image
    #[arg(short = 'n', long)]
    pub negative: bool,

    /// Keep color information (YUV with decimated chrominance)
    #[arg(short = 'c', long)]
    pub color: bool,

    /// Reduce vectors to this many principal components (0 keeps all)
    #[arg(long, conflicts_with = "pca_variance")]
    pub pca_components: Option<usize>,

    /// Reduce vectors to the components retaining this variance fraction
    #[arg(long)]
    pub pca_variance: Option<f64>,

    /// Save formatted vectors and labels to this file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Shuffle images after reading
    #[arg(long)]
    pub shuffle: bool,

    /// Fixed shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &ProcessArgs) -> Result<()> {
    let mut dataset = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str::<DatasetConfig>(&contents).context("Invalid dataset config")?
    } else {
        base_config_from_args(args)?
    };
    apply_overrides(&mut dataset, args)?;

    print_dataset_summary(&dataset);

    let total = count_files(&dataset)?;
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Reading images");

    let mut loader = DataLoader::from_config(&dataset)?;
    let read = loader
        .read_data_with_progress(dataset.shuffle, |done| pb.set_position(done as u64))
        .with_context(|| format!("Failed to read dataset {}", dataset.root.display()))?;
    pb.finish_with_message("Images read");

    println!();
    println!("Images:      {}", read);
    if let Some(basis) = loader.pca_basis() {
        println!(
            "PCA:         {} of {} dimensions",
            basis.n_components(),
            basis.dim()
        );
    }

    if let Some(ref output) = dataset.output {
        loader
            .save(output)
            .with_context(|| format!("Failed to save features to {}", output.display()))?;

        let set = DataLoader::load(output)?;
        if set.len() != read || set.labels.len() != read {
            bail!(
                "feature file {} holds {} vectors and {} labels, expected {}",
                output.display(),
                set.len(),
                set.labels.len(),
                read
            );
        }
        println!("Saved:       {} ({} vectors)", output.display(), set.len());
    }

    Ok(())
}

fn base_config_from_args(args: &ProcessArgs) -> Result<DatasetConfig> {
    let Some(ref root) = args.dir else {
        bail!("an image folder is required without --config");
    };
    let Some(num_categories) = args.labels else {
        bail!("--labels is required without --config");
    };
    Ok(DatasetConfig {
        root: root.clone(),
        num_categories,
        extensions: default_extensions(),
        ..DatasetConfig::default()
    })
}

/// Layer every flag given on the command line over `dataset`.
/// Flags left unset keep the config file's values.
fn apply_overrides(dataset: &mut DatasetConfig, args: &ProcessArgs) -> Result<()> {
    if let Some(ref dir) = args.dir {
        dataset.root = dir.clone();
    }
    if let Some(labels) = args.labels {
        dataset.num_categories = labels;
    }
    if args.seed.is_some() {
        dataset.seed = args.seed;
    }
    if args.shuffle {
        dataset.shuffle = true;
    }
    if args.save.is_some() {
        dataset.output = args.save.clone();
    }

    let processing = &mut dataset.processing;
    if let Some(ref spec) = args.filters {
        processing.filters = FilterKind::parse_sequence(spec)?;
        processing.apply_filters = !processing.filters.is_empty();
    }
    if args.color {
        processing.color_mode = ColorMode::Color;
    }
    if args.mean {
        processing.subtract_mean = true;
    }
    if args.negative {
        processing.negate = true;
    }
    let pca_target = match (args.pca_components, args.pca_variance) {
        (Some(k), _) => Some(PcaTarget::Components(k)),
        (None, Some(f)) => Some(PcaTarget::RetainedVariance(f)),
        (None, None) => None,
    };
    if let Some(target) = pca_target {
        processing.use_pca = true;
        processing.pca_target = target;
    }
    Ok(())
}

fn count_files(dataset: &DatasetConfig) -> Result<usize> {
    let mut total = 0;
    for category in 0..dataset.num_categories {
        let dir = category_dir(&dataset.root, category);
        total += list_image_files(&dir, &dataset.extensions)?.len();
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use imprep_core::pipeline::config::ProcessingConfig;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: ProcessArgs,
    }

    fn parse(argv: &[&str]) -> ProcessArgs {
        Cli::try_parse_from(argv.iter().copied()).unwrap().args
    }

    fn file_config() -> DatasetConfig {
        DatasetConfig {
            root: PathBuf::from("from_file"),
            num_categories: 3,
            seed: Some(1),
            processing: ProcessingConfig {
                apply_filters: true,
                filters: vec![FilterKind::Median],
                ..ProcessingConfig::default()
            },
            ..DatasetConfig::default()
        }
    }

    #[test]
    fn flags_override_config_file() {
        let args = parse(&[
            "imprep", "--config", "dataset.toml", "-f", "gs", "-m", "-n", "-c",
            "--pca-variance", "0.9", "-s", "out.bin", "--shuffle", "--seed", "7",
        ]);
        let mut dataset = file_config();
        apply_overrides(&mut dataset, &args).unwrap();

        assert_eq!(dataset.root, PathBuf::from("from_file"));
        assert_eq!(dataset.num_categories, 3);
        assert_eq!(dataset.seed, Some(7));
        assert!(dataset.shuffle);
        assert_eq!(dataset.output, Some(PathBuf::from("out.bin")));
        let p = &dataset.processing;
        assert_eq!(p.active_filters(), &[FilterKind::Gaussian, FilterKind::Sobel]);
        assert_eq!(p.color_mode, ColorMode::Color);
        assert!(p.subtract_mean && p.negate && p.use_pca);
        assert_eq!(p.pca_target, PcaTarget::RetainedVariance(0.9));
    }

    #[test]
    fn unset_flags_keep_config_values() {
        let args = parse(&["imprep", "--config", "dataset.toml"]);
        let mut dataset = file_config();
        apply_overrides(&mut dataset, &args).unwrap();
        assert_eq!(dataset, file_config());
    }

    #[test]
    fn flags_alone_build_a_config() {
        let args = parse(&["imprep", "images", "-l", "5", "--pca-components", "10"]);
        let mut dataset = base_config_from_args(&args).unwrap();
        apply_overrides(&mut dataset, &args).unwrap();
        assert_eq!(dataset.root, PathBuf::from("images"));
        assert_eq!(dataset.num_categories, 5);
        assert!(!dataset.shuffle);
        assert!(dataset.processing.use_pca);
        assert_eq!(dataset.processing.pca_target, PcaTarget::Components(10));
        assert!(dataset.processing.active_filters().is_empty());
    }
}
