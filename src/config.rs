// THEORY:
// All tuning parameters of the background model live in a single immutable
// `DetectorConfig`. Every `PixelModel` in the scene reads the same instance by
// reference, so a scene of a million pixels carries the parameters exactly once.

use crate::core_modules::pixel_model::MAX_COMPONENTS;
use crate::error::{DetectorError, Result};

/// Configuration for the foreground detector.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Learning rate applied to matched components and used for decay.
    pub alpha: f64,
    /// Number of standard deviations within which an observation matches a component.
    pub sigma_multiplier: f64,
    /// Maximum intensity distance from the best component's last observation
    /// that is still classified as background.
    pub match_threshold: f64,
    /// Number of components a pixel may hold (`1..=MAX_COMPONENTS`).
    pub max_components: usize,
    /// Weight given to a freshly inserted component before normalization.
    pub initial_weight: f64,
    /// Variance given to a freshly inserted component.
    pub initial_variance: f64,
    /// Lower bound applied after every variance update.
    pub variance_floor: f64,
    /// Split each frame into row bands processed on the rayon pool.
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            sigma_multiplier: 2.5,
            match_threshold: 20.0,
            max_components: 3,
            initial_weight: 0.001,
            initial_variance: 30.0 * 30.0,
            variance_floor: 1.0,
            parallel: true,
        }
    }
}

impl DetectorConfig {
    /// Rejects parameter combinations that would break the model's invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(DetectorError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.sigma_multiplier > 0.0) {
            return Err(DetectorError::InvalidConfig(format!(
                "sigma_multiplier must be positive, got {}",
                self.sigma_multiplier
            )));
        }
        if !(self.match_threshold >= 0.0) {
            return Err(DetectorError::InvalidConfig(format!(
                "match_threshold must be non-negative, got {}",
                self.match_threshold
            )));
        }
        if self.max_components == 0 || self.max_components > MAX_COMPONENTS {
            return Err(DetectorError::InvalidConfig(format!(
                "max_components must be in 1..={}, got {}",
                MAX_COMPONENTS, self.max_components
            )));
        }
        if !(self.initial_weight > 0.0 && self.initial_weight <= 1.0) {
            return Err(DetectorError::InvalidConfig(format!(
                "initial_weight must be in (0, 1], got {}",
                self.initial_weight
            )));
        }
        if !(self.variance_floor > 0.0) {
            return Err(DetectorError::InvalidConfig(format!(
                "variance_floor must be positive, got {}",
                self.variance_floor
            )));
        }
        if !(self.initial_variance >= self.variance_floor) {
            return Err(DetectorError::InvalidConfig(format!(
                "initial_variance ({}) must be at least variance_floor ({})",
                self.initial_variance, self.variance_floor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let cases = [
            DetectorConfig { alpha: 0.0, ..Default::default() },
            DetectorConfig { alpha: 1.0, ..Default::default() },
            DetectorConfig { sigma_multiplier: -1.0, ..Default::default() },
            DetectorConfig { max_components: 0, ..Default::default() },
            DetectorConfig { max_components: MAX_COMPONENTS + 1, ..Default::default() },
            DetectorConfig { initial_weight: 0.0, ..Default::default() },
            DetectorConfig { variance_floor: 0.0, ..Default::default() },
            DetectorConfig { initial_variance: 0.5, ..Default::default() },
            DetectorConfig { match_threshold: f64::NAN, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(DetectorError::InvalidConfig(_))),
                "accepted {config:?}"
            );
        }
    }
}
