//! Command-line front end: correct every RTI normal map in a folder against
//! the matching photogrammetry normal map.

mod log_setup;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use relief::{BatchConfig, BatchResult};

#[derive(Parser, Debug)]
#[command(
    name = "relief-cli",
    version,
    about = "Correct low-frequency distortions in RTI normal maps using photogrammetry normal maps",
    after_help = "Example: relief-cli RTI_normals PG_normals output --blur-radius 8 --alpha 0.99"
)]
struct Args {
    /// Folder of RTI-derived normal maps (high-frequency detail)
    detailed_dir: PathBuf,

    /// Folder of photogrammetry-derived normal maps (accurate low frequencies)
    less_detailed_dir: PathBuf,

    /// Folder receiving the corrected 16-bit TIFF normal maps
    output_dir: PathBuf,

    /// Gaussian sigma separating low from high frequencies [default: 8.0]
    #[arg(short = 'b', long)]
    blur_radius: Option<f32>,

    /// Blend factor: alpha * PG_low + (1 - alpha) * RTI_low [default: 0.99]
    #[arg(short = 'a', long)]
    alpha: Option<f32>,

    /// Maximum number of pairs processed at once [default: CPU threads]
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// YAML file with blur_radius, alpha and max_concurrent_pairs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write rotating log files into this folder
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log_setup::setup_logging(&args.log_level, args.log_dir.as_deref())?;

    let config = resolve_config(&args)?;
    config.validate().context("Invalid parameters")?;

    for dir in [&args.detailed_dir, &args.less_detailed_dir] {
        if !dir.is_dir() {
            bail!("Input folder not found: {}", dir.display());
        }
    }

    let result = relief::run(
        &args.detailed_dir,
        &args.less_detailed_dir,
        &args.output_dir,
        &config,
    )
    .context("Batch failed")?;

    report(&result, &args.output_dir);
    Ok(())
}

/// File config first, then command-line overrides.
fn resolve_config(args: &Args) -> anyhow::Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => BatchConfig::default(),
    };

    if let Some(blur_radius) = args.blur_radius {
        config.params.blur_radius = blur_radius;
    }
    if let Some(alpha) = args.alpha {
        config.params.alpha = alpha;
    }
    if let Some(jobs) = args.jobs {
        config.max_concurrent_pairs = jobs;
    }
    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<BatchConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_yml::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn report(result: &BatchResult, output_dir: &Path) {
    if result.is_complete_success() {
        tracing::info!(
            "All {} pairs corrected into {}",
            result.succeeded,
            output_dir.display()
        );
        return;
    }

    tracing::warn!(
        "{} of {} pairs failed, {} corrected into {}",
        result.failed,
        result.processed,
        result.succeeded,
        output_dir.display()
    );
    for err in &result.errors {
        tracing::warn!("  [{}] {}", err.kind.label(), err);
    }
}
