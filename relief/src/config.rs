//! Blend and batch configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BLUR_RADIUS: f32 = 8.0;
pub const DEFAULT_ALPHA: f32 = 0.99;

/// Parameters of the low-frequency correction, fixed for a whole run.
///
/// # Examples
///
/// ```ignore
/// use relief::BlendParams;
///
/// // Large paintings: wider low band, photogrammetry geometry dominates.
/// let params = BlendParams { blur_radius: 12.0, ..Default::default() };
/// params.validate()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendParams {
    /// Standard deviation (pixels) of the Gaussian separating low from high frequencies.
    pub blur_radius: f32,
    /// Weight of the photogrammetry low band: `alpha * pg + (1 - alpha) * rti`.
    pub alpha: f32,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl BlendParams {
    pub fn new(blur_radius: f32, alpha: f32) -> Self {
        Self { blur_radius, alpha }
    }

    /// Keeps the RTI low band untouched. Output equals the renormalized input.
    pub fn no_correction() -> Self {
        Self {
            alpha: 0.0,
            ..Default::default()
        }
    }

    /// Replaces the RTI low band entirely.
    pub fn full_replacement() -> Self {
        Self {
            alpha: 1.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if !(self.blur_radius.is_finite() && self.blur_radius > 0.0) {
            return Err(ConfigError::InvalidBlurRadius(self.blur_radius));
        }
        Ok(())
    }
}

/// Settings for a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    #[serde(flatten)]
    pub params: BlendParams,
    /// Upper bound on pairs held in memory at once. Each pair keeps two
    /// full-resolution images plus several float planes alive.
    pub max_concurrent_pairs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            params: BlendParams::default(),
            max_concurrent_pairs: rayon::current_num_threads().max(1),
        }
    }
}

impl BatchConfig {
    pub fn with_params(params: BlendParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Process one pair at a time.
    pub fn sequential(params: BlendParams) -> Self {
        Self {
            params,
            max_concurrent_pairs: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.max_concurrent_pairs == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
