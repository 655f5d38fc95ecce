// THEORY:
// The `PixelModel` is the stateful, learning entity of the temporal layer. It owns
// a handful of `Gaussian` hypotheses for one pixel location and, every frame,
// decides which hypothesis the new intensity supports.
//
// Key architectural principles:
// 1.  **Inline Storage**: The components sit in a fixed array sized by
//     `MAX_COMPONENTS`. A scene of pixel models is therefore one flat allocation
//     and can be split into disjoint bands for parallel updates.
// 2.  **Online Learning**: A matched component drifts towards the observation at
//     rate `alpha`; every other component decays. Weights are renormalized and the
//     components re-ranked by confidence after every frame.
// 3.  **Short-Term Classification**: The verdict compares the new intensity with
//     the last intensity the best-ranked component accepted, not with its mean.

use crate::config::DetectorConfig;
use crate::core_modules::gaussian::{Gaussian, Intensity};
use crate::core_modules::mask::Classification;

/// Storage capacity per pixel. `DetectorConfig::max_components` may lower the
/// effective limit but never raise it.
pub const MAX_COMPONENTS: usize = 3;

/// The mixture of Gaussians for a single pixel location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelModel {
    components: [Gaussian; MAX_COMPONENTS],
    len: usize,
}

impl PixelModel {
    /// An empty model; the first `update` inserts its first component.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The live components, most confident first.
    pub fn components(&self) -> &[Gaussian] {
        &self.components[..self.len]
    }

    /// The component currently taken to describe the background.
    pub fn best(&self) -> Option<&Gaussian> {
        self.components().first()
    }

    /// Folds one observation into the model.
    pub fn update(&mut self, observation: Intensity, config: &DetectorConfig) {
        let alpha = config.alpha;
        let retain = 1.0 - alpha;
        let value = observation as f64;
        let mut matched = false;

        for component in &mut self.components[..self.len] {
            if !matched && component.matches(observation, config.sigma_multiplier) {
                matched = true;
                component.last_observation = observation;
                component.mean = retain * component.mean + alpha * value;
                // The deviation is taken against the mean that was just updated.
                let deviation = value - component.mean;
                component.variance = (retain * component.variance + alpha * deviation * deviation)
                    .max(config.variance_floor);
                component.weight = retain * component.weight + alpha;
            } else {
                component.weight *= retain;
            }
        }

        if !matched {
            if self.len >= config.max_components {
                self.evict_least_confident();
            }
            self.components[self.len] =
                Gaussian::new(observation, config.initial_variance, config.initial_weight);
            self.len += 1;
        }

        self.normalize_weights();
        self.sort_by_confidence();
    }

    /// Background when `observation` is close to the last intensity accepted by
    /// the best component. A model that has never been updated reports foreground.
    pub fn classify(&self, observation: Intensity, config: &DetectorConfig) -> Classification {
        match self.best() {
            Some(best)
                if (best.last_observation as f64 - observation as f64).abs()
                    <= config.match_threshold =>
            {
                Classification::Background
            }
            _ => Classification::Foreground,
        }
    }

    /// Mean of the best component, rounded to the intensity scale.
    pub fn background_intensity(&self) -> Option<Intensity> {
        self.best()
            .map(|best| best.mean.round().clamp(0.0, u8::MAX as f64) as Intensity)
    }

    /// Drops the component with the lowest confidence. On ties the one ranked
    /// last goes.
    fn evict_least_confident(&mut self) {
        if self.len == 0 {
            return;
        }
        let mut weakest = 0;
        for i in 1..self.len {
            if !self.components[i].is_more_confident_than(&self.components[weakest]) {
                weakest = i;
            }
        }
        self.components.copy_within(weakest + 1..self.len, weakest);
        self.len -= 1;
        self.components[self.len] = Gaussian::default();
    }

    fn normalize_weights(&mut self) {
        let total: f64 = self.components().iter().map(|c| c.weight).sum();
        if total <= 0.0 {
            return;
        }
        for component in &mut self.components[..self.len] {
            component.weight /= total;
        }
    }

    /// Stable insertion sort; with at most three elements this is a couple of
    /// comparisons.
    fn sort_by_confidence(&mut self) {
        for i in 1..self.len {
            let mut j = i;
            while j > 0 && self.components[j].is_more_confident_than(&self.components[j - 1]) {
                self.components.swap(j, j - 1);
                j -= 1;
            }
        }
    }
}
