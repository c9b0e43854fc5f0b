use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use imprep_core::dataset::DataLoader;

#[derive(Args)]
pub struct InspectArgs {
    /// Feature file written by `imprep process --save`
    pub file: PathBuf,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let set = DataLoader::load(&args.file)
        .with_context(|| format!("Failed to read feature file {}", args.file.display()))?;

    let min_len = set.vectors.iter().map(Vec::len).min().unwrap_or(0);
    let max_len = set.vectors.iter().map(Vec::len).max().unwrap_or(0);

    let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
    for &label in &set.labels {
        *histogram.entry(label).or_default() += 1;
    }

    println!("File:        {}", args.file.display());
    println!("Vectors:     {}", set.len());
    if min_len == max_len {
        println!("Length:      {}", min_len);
    } else {
        println!("Length:      {}..{}", min_len, max_len);
    }
    println!("Categories:  {}", histogram.len());
    for (label, count) in &histogram {
        println!("  {:>6}  {}", label, count);
    }

    Ok(())
}
