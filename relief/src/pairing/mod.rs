//! Positional matching of normal maps across two directories.
//!
//! Both listings are sorted by file name and zipped by index. There is no
//! name or content matching: the n-th detailed map pairs with the n-th less
//! detailed map.


use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BatchError;
use crate::io::ImageFileFormat;

/// One detailed (RTI) map and its less detailed (photogrammetry) partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    /// Rank in the sorted listings.
    pub index: usize,
    pub detailed: PathBuf,
    pub less_detailed: PathBuf,
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let read_dir_err = |source| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if path.is_file() && ImageFileFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Match the images of two directories by sorted position.
pub fn discover_pairs(
    detailed_dir: &Path,
    less_detailed_dir: &Path,
) -> Result<Vec<MatchedPair>, BatchError> {
    let detailed = list_images(detailed_dir)?;
    if detailed.is_empty() {
        return Err(BatchError::EmptyInput {
            dir: detailed_dir.to_path_buf(),
        });
    }

    let less_detailed = list_images(less_detailed_dir)?;
    if less_detailed.is_empty() {
        return Err(BatchError::EmptyInput {
            dir: less_detailed_dir.to_path_buf(),
        });
    }

    if detailed.len() != less_detailed.len() {
        return Err(BatchError::CountMismatch {
            detailed: detailed.len(),
            less_detailed: less_detailed.len(),
        });
    }

    Ok(detailed
        .into_iter()
        .zip(less_detailed)
        .enumerate()
        .map(|(index, (detailed, less_detailed))| MatchedPair {
            index,
            detailed,
            less_detailed,
        })
        .collect())
}
