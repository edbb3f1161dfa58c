//! Batch correction of matched normal-map pairs.
//!
//! Every pair is independent: it is loaded, corrected and written on its
//! own, and a failure is recorded for that pair only. Only problems found
//! before the first pair starts (bad config, empty or unequal listings,
//! colliding output names, unwritable output directory) fail the whole batch.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::blend;
use crate::codec;
use crate::config::{BatchConfig, BlendParams};
use crate::error::{BatchError, PairError, PairErrorKind};
use crate::field::NormalField;
use crate::io::{self, OUTPUT_EXTENSION};
use crate::pairing::{MatchedPair, discover_pairs};

/// Suffix appended to the detailed map's file stem.
pub const OUTPUT_SUFFIX: &str = "_corrected";

/// Outcome of one pair: the written file or the tagged failure.
pub type PairOutcome = Result<PathBuf, PairError>;

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Written files, in listing order.
    pub outputs: Vec<PathBuf>,
    /// Failed pairs, in listing order.
    pub errors: Vec<PairError>,
}

impl BatchResult {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = PairOutcome>,
    {
        outcomes
            .into_iter()
            .fold(BatchResult::default(), |mut result, outcome| {
                result.processed += 1;
                match outcome {
                    Ok(path) => {
                        result.succeeded += 1;
                        result.outputs.push(path);
                    }
                    Err(err) => {
                        result.failed += 1;
                        result.errors.push(err);
                    }
                }
                result
            })
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

/// Output location for a detailed map: `<output_dir>/<stem>_corrected.tif`.
pub fn output_path_for(output_dir: &Path, detailed: &Path) -> PathBuf {
    let stem = detailed
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}"))
}

/// Reject listings where two detailed maps share a stem (`a.png`, `a.jpg`),
/// since both would be written to the same output file.
fn ensure_unique_outputs(pairs: &[MatchedPair], output_dir: &Path) -> Result<(), BatchError> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        let output = output_path_for(output_dir, &pair.detailed);
        if let Some(first) = seen.get(&output) {
            return Err(BatchError::DuplicateOutput {
                first: first.to_path_buf(),
                second: pair.detailed.clone(),
                output,
            });
        }
        seen.insert(output, &pair.detailed);
    }
    Ok(())
}

/// Load and decode a normal map.
pub fn load_field(path: &Path) -> Result<NormalField, PairErrorKind> {
    let raw = io::load_raw(path)?;
    Ok(codec::decode(&raw)?)
}

/// Correct one explicit pair of files and write the 16-bit result to `output`.
pub fn correct_files(
    detailed: &Path,
    less_detailed: &Path,
    output: &Path,
    params: &BlendParams,
) -> Result<(), PairErrorKind> {
    let rti = load_field(detailed)?;
    let pg = load_field(less_detailed)?;

    if (rti.width(), rti.height()) != (pg.width(), pg.height()) {
        return Err(PairErrorKind::ShapeMismatch {
            detailed_width: rti.width(),
            detailed_height: rti.height(),
            less_detailed_width: pg.width(),
            less_detailed_height: pg.height(),
        });
    }

    let corrected = blend::correct(rti, pg, params)?;
    io::save_tiff16(&codec::encode(&corrected), output)?;
    Ok(())
}

/// Correct one matched pair into `output_dir`.
pub fn process_pair(pair: &MatchedPair, params: &BlendParams, output_dir: &Path) -> PairOutcome {
    let output = output_path_for(output_dir, &pair.detailed);
    let started = Instant::now();

    correct_files(&pair.detailed, &pair.less_detailed, &output, params).map_err(|kind| {
        PairError {
            detailed: pair.detailed.clone(),
            less_detailed: pair.less_detailed.clone(),
            kind,
        }
    })?;

    tracing::debug!(
        index = pair.index,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Pair corrected"
    );
    Ok(output)
}

/// Discover, correct and write every pair of the two directories.
///
/// # Errors
///
/// Returns a [`BatchError`] only for batch-fatal conditions; per-pair
/// failures end up in [`BatchResult::errors`].
///
/// # Examples
///
/// ```ignore
/// use relief::{BatchConfig, run};
///
/// let result = run("rti".as_ref(), "pg".as_ref(), "out".as_ref(), &BatchConfig::default())?;
/// for err in &result.errors {
///     eprintln!("{}: {err}", err.kind.label());
/// }
/// ```
pub fn run(
    detailed_dir: &Path,
    less_detailed_dir: &Path,
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<BatchResult, BatchError> {
    config.validate()?;

    let pairs = discover_pairs(detailed_dir, less_detailed_dir)?;
    ensure_unique_outputs(&pairs, output_dir)?;

    fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let total = pairs.len();
    tracing::info!(
        pairs = total,
        blur_radius = config.params.blur_radius,
        alpha = config.params.alpha,
        max_concurrent = config.max_concurrent_pairs,
        "Processing image pairs"
    );

    let started = Instant::now();
    let outcomes = map_bounded(&pairs, config.max_concurrent_pairs, |pair| {
        tracing::info!(
            "[{}/{}] Processing: {}",
            pair.index + 1,
            total,
            pair.detailed.display()
        );
        let outcome = process_pair(pair, &config.params, output_dir);
        match &outcome {
            Ok(output) => tracing::info!("    Saved: {}", output.display()),
            Err(err) => tracing::warn!(kind = err.kind.label(), "{err}"),
        }
        outcome
    });

    let result = BatchResult::from_outcomes(outcomes);
    tracing::info!(
        succeeded = result.succeeded,
        failed = result.failed,
        elapsed_s = started.elapsed().as_secs_f32(),
        "Processing complete, results saved to {}",
        output_dir.display()
    );

    Ok(result)
}

/// Map `f` over `items` in parallel with at most `max_in_flight` items alive at
/// once. Results keep input order.
fn map_bounded<T, R, F>(items: &[T], max_in_flight: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    debug_assert!(max_in_flight > 0);

    let mut results = Vec::with_capacity(items.len());
    for chunk in items.chunks(max_in_flight.max(1)) {
        results.par_extend(chunk.par_iter().map(&f));
    }
    results
}
