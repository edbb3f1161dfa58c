//! Relief - low-frequency correction of RTI normal maps.
//!
//! RTI normal maps carry fine surface detail but drift at large scales;
//! photogrammetry normal maps get the large-scale geometry right but lose the
//! detail. This library keeps the RTI high band, replaces most of its low
//! band with the photogrammetry one and renormalizes the result:
//! - Decoding 8/16-bit gray or RGB maps into signed unit-vector fields
//! - Per-channel Gaussian frequency split, blending and reconstruction
//! - Batch processing of two directories matched by sorted file name
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use relief::{BatchConfig, BlendParams, run};
//!
//! let config = BatchConfig::with_params(BlendParams { blur_radius: 8.0, alpha: 0.99 });
//! let result = run("rti".as_ref(), "photogrammetry".as_ref(), "out".as_ref(), &config)?;
//!
//! println!("{} corrected, {} failed", result.succeeded, result.failed);
//! ```

pub mod blend;
pub(crate) mod buffer2;
pub mod codec;
pub mod config;
pub mod convolution;
pub mod error;
pub mod field;
pub mod io;
pub mod pairing;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_utils;

pub mod prelude;

// ============================================================================
// Core types
// ============================================================================

pub use buffer2::Buffer2;
pub use codec::{RawImage, Samples};
pub use field::{CANONICAL_NORMAL, ChannelCount, FieldShape, NormalField};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{BatchConfig, BlendParams, DEFAULT_ALPHA, DEFAULT_BLUR_RADIUS};

// ============================================================================
// Errors
// ============================================================================

pub use error::{
    BatchError, BlendError, CodecError, ConfigError, ImageIoError, PairError, PairErrorKind,
    Result,
};

// ============================================================================
// Codec and blending
// ============================================================================

pub use blend::{blend_low_freq, correct, low_pass, reconstruct, renormalize};
pub use codec::{decode, encode};

// ============================================================================
// Batch pipeline
// ============================================================================

pub use pairing::{MatchedPair, discover_pairs};
pub use pipeline::{BatchResult, PairOutcome, correct_files, process_pair, run};
