//! Search configuration.
//!
//! [`SearchOptions`] holds a fully resolved configuration. The two presets
//! ([`SearchOptions::image`] and [`SearchOptions::raster`]) carry the defaults
//! for the single-parameter and scale-augmented searches. User configuration
//! arrives as [`SearchOverrides`], where every field is optional and is laid
//! over one of the presets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for option combinations the search cannot run with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    /// Quality bounds are outside `[0, 1]` or not strictly increasing.
    #[error("quality bounds must satisfy 0 <= low < high <= 1, got [{low}, {high}]")]
    InvalidBounds { low: f32, high: f32 },

    /// The first probe would fall outside the bracket.
    #[error("initial quality {quality} lies outside the bounds [{low}, {high}]")]
    InitialQualityOutOfBounds { quality: f32, low: f32, high: f32 },

    /// The search would never probe.
    #[error("max iterations must be at least 1")]
    ZeroIterations,

    /// Convergence epsilon must be a positive, finite number.
    #[error("convergence epsilon must be positive, got {0}")]
    InvalidEpsilon(f32),

    /// Scale decay must shrink the scale on every pass.
    #[error("scale decay factor must be in (0, 1), got {0}")]
    InvalidScaleDecay(f32),

    /// Minimum scale must be a positive, finite number.
    #[error("minimum scale must be positive, got {0}")]
    InvalidMinScale(f32),

    /// The scale-augmented search would never run a pass.
    #[error("max scale passes must be at least 1")]
    ZeroScalePasses,
}

/// Inclusive quality interval the search is allowed to probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBounds {
    pub low: f32,
    pub high: f32,
}

impl QualityBounds {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Midpoint of the interval.
    #[inline]
    pub fn midpoint(&self) -> f32 {
        (self.low + self.high) / 2.0
    }

    /// Check whether `quality` lies within the interval.
    #[inline]
    pub fn contains(&self, quality: f32) -> bool {
        quality >= self.low && quality <= self.high
    }

    fn validate(&self) -> Result<(), OptionsError> {
        let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.low) || !in_unit(self.high) || self.low >= self.high {
            return Err(OptionsError::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Outer loop of the scale-augmented search.
///
/// After every pass that fails to fit the target, the scale is multiplied by
/// `decay_factor`. The search stops once the scale drops below `min_scale` or
/// `max_passes` passes have run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleSchedule {
    pub decay_factor: f32,
    pub min_scale: f32,
    pub max_passes: u32,
}

impl Default for ScaleSchedule {
    fn default() -> Self {
        Self {
            decay_factor: 0.8,
            min_scale: 0.2,
            max_passes: 6,
        }
    }
}

impl ScaleSchedule {
    fn validate(&self) -> Result<(), OptionsError> {
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(OptionsError::InvalidScaleDecay(self.decay_factor));
        }
        if !(self.min_scale > 0.0 && self.min_scale.is_finite()) {
            return Err(OptionsError::InvalidMinScale(self.min_scale));
        }
        if self.max_passes == 0 {
            return Err(OptionsError::ZeroScalePasses);
        }
        Ok(())
    }
}

/// Which parameters the search varies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SearchStrategy {
    /// Vary quality only, at scale 1.0.
    SingleParameter,
    /// Vary quality, and shrink the scale between passes that fail to fit.
    ScaleAugmented(ScaleSchedule),
}

/// Resolved search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Quality of the first probe in each pass. `None` starts at the
    /// bracket midpoint.
    pub initial_quality: Option<f32>,
    pub quality_bounds: QualityBounds,
    /// Probe budget for one pass.
    pub max_iterations: u32,
    /// A pass stops refining once `high - low` falls below this.
    pub convergence_epsilon: f32,
    pub strategy: SearchStrategy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::image()
    }
}

impl SearchOptions {
    /// Defaults for quality-only searches over a single image.
    pub fn image() -> Self {
        Self {
            initial_quality: Some(0.8),
            quality_bounds: QualityBounds::new(0.05, 1.0),
            max_iterations: 9,
            convergence_epsilon: 0.02,
            strategy: SearchStrategy::SingleParameter,
        }
    }

    /// Defaults for rasterized documents, where the scale shrinks between passes.
    pub fn raster() -> Self {
        Self {
            initial_quality: None,
            quality_bounds: QualityBounds::new(0.1, 0.95),
            max_iterations: 9,
            convergence_epsilon: 0.015,
            strategy: SearchStrategy::ScaleAugmented(ScaleSchedule::default()),
        }
    }

    /// Upper bound on encoder calls for one search with these options.
    pub fn max_probes(&self) -> u32 {
        match self.strategy {
            SearchStrategy::SingleParameter => self.max_iterations,
            SearchStrategy::ScaleAugmented(schedule) => {
                self.max_iterations.saturating_mul(schedule.max_passes)
            }
        }
    }

    /// Check that a search can run with these options.
    pub fn validate(&self) -> Result<(), OptionsError> {
        self.quality_bounds.validate()?;

        if let Some(quality) = self.initial_quality {
            if !self.quality_bounds.contains(quality) {
                return Err(OptionsError::InitialQualityOutOfBounds {
                    quality,
                    low: self.quality_bounds.low,
                    high: self.quality_bounds.high,
                });
            }
        }

        if self.max_iterations == 0 {
            return Err(OptionsError::ZeroIterations);
        }

        if !(self.convergence_epsilon > 0.0 && self.convergence_epsilon.is_finite()) {
            return Err(OptionsError::InvalidEpsilon(self.convergence_epsilon));
        }

        if let SearchStrategy::ScaleAugmented(schedule) = self.strategy {
            schedule.validate()?;
        }

        Ok(())
    }
}

/// Partial configuration supplied by a caller.
///
/// Fields left as `None` keep the value of the preset the overrides are
/// applied to. Scale fields only affect scale-augmented presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOverrides {
    pub initial_quality: Option<f32>,
    pub quality_bounds: Option<QualityBounds>,
    pub max_iterations: Option<u32>,
    pub convergence_epsilon: Option<f32>,
    pub scale_decay_factor: Option<f32>,
    pub min_scale: Option<f32>,
    pub max_scale_passes: Option<u32>,
}

impl SearchOverrides {
    /// Lay these overrides over `base`.
    pub fn apply_to(&self, base: SearchOptions) -> SearchOptions {
        let mut options = base;

        if let Some(quality) = self.initial_quality {
            options.initial_quality = Some(quality);
        }
        if let Some(bounds) = self.quality_bounds {
            options.quality_bounds = bounds;
        }
        if let Some(iterations) = self.max_iterations {
            options.max_iterations = iterations;
        }
        if let Some(epsilon) = self.convergence_epsilon {
            options.convergence_epsilon = epsilon;
        }

        if let SearchStrategy::ScaleAugmented(ref mut schedule) = options.strategy {
            if let Some(decay) = self.scale_decay_factor {
                schedule.decay_factor = decay;
            }
            if let Some(min_scale) = self.min_scale {
                schedule.min_scale = min_scale;
            }
            if let Some(passes) = self.max_scale_passes {
                schedule.max_passes = passes;
            }
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_defaults() {
        let opts = SearchOptions::image();
        assert_eq!(opts.initial_quality, Some(0.8));
        assert_eq!(opts.quality_bounds, QualityBounds::new(0.05, 1.0));
        assert_eq!(opts.max_iterations, 9);
        assert_eq!(opts.convergence_epsilon, 0.02);
        assert_eq!(opts.strategy, SearchStrategy::SingleParameter);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_raster_defaults() {
        let opts = SearchOptions::raster();
        assert_eq!(opts.initial_quality, None);
        assert_eq!(opts.quality_bounds, QualityBounds::new(0.1, 0.95));
        assert_eq!(opts.convergence_epsilon, 0.015);
        assert_eq!(
            opts.strategy,
            SearchStrategy::ScaleAugmented(ScaleSchedule {
                decay_factor: 0.8,
                min_scale: 0.2,
                max_passes: 6,
            })
        );
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_max_probes() {
        assert_eq!(SearchOptions::image().max_probes(), 9);
        assert_eq!(SearchOptions::raster().max_probes(), 54);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let mut opts = SearchOptions::image();
        opts.quality_bounds = QualityBounds::new(0.9, 0.1);
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bounds_outside_unit_interval() {
        let mut opts = SearchOptions::image();
        opts.quality_bounds = QualityBounds::new(0.1, 1.5);
        assert!(opts.validate().is_err());

        opts.quality_bounds = QualityBounds::new(f32::NAN, 0.5);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_initial_quality_outside_bracket() {
        let mut opts = SearchOptions::image();
        opts.initial_quality = Some(0.01);
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InitialQualityOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let mut opts = SearchOptions::image();
        opts.max_iterations = 0;
        assert_eq!(opts.validate(), Err(OptionsError::ZeroIterations));
    }

    #[test]
    fn test_validate_rejects_bad_epsilon() {
        let mut opts = SearchOptions::image();
        opts.convergence_epsilon = 0.0;
        assert_eq!(opts.validate(), Err(OptionsError::InvalidEpsilon(0.0)));
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let mut opts = SearchOptions::raster();
        opts.strategy = SearchStrategy::ScaleAugmented(ScaleSchedule {
            decay_factor: 1.0,
            ..ScaleSchedule::default()
        });
        assert_eq!(opts.validate(), Err(OptionsError::InvalidScaleDecay(1.0)));

        opts.strategy = SearchStrategy::ScaleAugmented(ScaleSchedule {
            max_passes: 0,
            ..ScaleSchedule::default()
        });
        assert_eq!(opts.validate(), Err(OptionsError::ZeroScalePasses));
    }

    #[test]
    fn test_overrides_keep_unset_fields() {
        let overrides = SearchOverrides {
            max_iterations: Some(4),
            ..Default::default()
        };
        let opts = overrides.apply_to(SearchOptions::image());
        assert_eq!(opts.max_iterations, 4);
        assert_eq!(opts.initial_quality, Some(0.8));
        assert_eq!(opts.convergence_epsilon, 0.02);
    }

    #[test]
    fn test_overrides_scale_fields_ignored_for_single_parameter() {
        let overrides = SearchOverrides {
            max_scale_passes: Some(2),
            ..Default::default()
        };
        let opts = overrides.apply_to(SearchOptions::image());
        assert_eq!(opts.strategy, SearchStrategy::SingleParameter);
    }

    #[test]
    fn test_overrides_scale_fields_applied_to_raster() {
        let overrides = SearchOverrides {
            scale_decay_factor: Some(0.5),
            min_scale: Some(0.3),
            max_scale_passes: Some(3),
            ..Default::default()
        };
        let opts = overrides.apply_to(SearchOptions::raster());
        assert_eq!(
            opts.strategy,
            SearchStrategy::ScaleAugmented(ScaleSchedule {
                decay_factor: 0.5,
                min_scale: 0.3,
                max_passes: 3,
            })
        );
    }
}
