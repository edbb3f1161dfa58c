//! Error types for decoding, blending and batch processing.
//!
//! Errors are split by scope: [`BatchError`] aborts a whole run before any
//! pair is touched, while [`PairError`] is recorded for one pair and the run
//! moves on to the next.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::field::FieldShape;

/// Invalid blend or batch parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Alpha must be between 0 and 1, got {0}")]
    InvalidAlpha(f32),

    #[error("Blur radius must be positive, got {0}")]
    InvalidBlurRadius(f32),

    #[error("At least one pair must be allowed in flight")]
    ZeroConcurrency,
}

/// Failure to interpret a pixel buffer as a normal map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error(
        "Sample buffer holds {actual} values, expected {expected} for {width}x{height} with {channels} channel(s)"
    )]
    SampleCount {
        width: usize,
        height: usize,
        channels: u32,
        expected: usize,
        actual: usize,
    },
}

/// Failure to read or write an image file.
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to process TIFF '{path}': {source}")]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    #[error("Unsupported file extension: '{extension}'")]
    UnsupportedExtension { extension: String },

    #[error("Unsupported pixel format in '{path}': {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },
}

/// Shape or parameter violation inside the frequency blender.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlendError {
    #[error("Field shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: FieldShape,
        actual: FieldShape,
    },

    #[error(transparent)]
    InvalidParams(#[from] ConfigError),
}

/// What went wrong while processing a single pair.
#[derive(Debug, Error)]
pub enum PairErrorKind {
    #[error(transparent)]
    Io(#[from] ImageIoError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(
        "Image dimensions differ: detailed map is {detailed_width}x{detailed_height}, less detailed map is {less_detailed_width}x{less_detailed_height}"
    )]
    ShapeMismatch {
        detailed_width: usize,
        detailed_height: usize,
        less_detailed_width: usize,
        less_detailed_height: usize,
    },

    #[error(transparent)]
    Blend(#[from] BlendError),
}

impl PairErrorKind {
    /// Short stable label used in batch reports.
    pub fn label(&self) -> &'static str {
        match self {
            PairErrorKind::Io(ImageIoError::UnsupportedExtension { .. })
            | PairErrorKind::Io(ImageIoError::UnsupportedFormat { .. })
            | PairErrorKind::Codec(CodecError::UnsupportedFormat(_)) => "unsupported-format",
            PairErrorKind::Io(_) => "io",
            PairErrorKind::Codec(CodecError::SampleCount { .. }) => "codec",
            PairErrorKind::ShapeMismatch { .. } => "shape-mismatch",
            PairErrorKind::Blend(_) => "blend",
        }
    }

    pub fn is_unsupported_format(&self) -> bool {
        self.label() == "unsupported-format"
    }
}

/// A per-pair failure tagged with the files that produced it.
#[derive(Debug, Error)]
#[error("Pair ('{}', '{}') failed: {kind}", .detailed.display(), .less_detailed.display())]
pub struct PairError {
    pub detailed: PathBuf,
    pub less_detailed: PathBuf,
    #[source]
    pub kind: PairErrorKind,
}

/// Errors that stop a batch before any pair is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No image files found in '{dir}'")]
    EmptyInput { dir: PathBuf },

    #[error(
        "Number of images must be equal: found {detailed} detailed and {less_detailed} less detailed images"
    )]
    CountMismatch { detailed: usize, less_detailed: usize },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "'{}' and '{}' would both be written to '{}'",
        .first.display(),
        .second.display(),
        .output.display()
    )]
    DuplicateOutput {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to create output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = BatchError> = std::result::Result<T, E>;
