// THEORY:
// A `Gaussian` is a "dumb" data container: one hypothesis about the intensity a
// single pixel takes when it shows background. It knows its own statistics and
// how to rank itself, but nothing about the rules that update it; those live in
// `PixelModel`.

pub type Intensity = u8;
pub type Confidence = f64;

/// One weighted normal distribution over a pixel's intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub(crate) weight: f64,
    pub(crate) mean: f64,
    pub(crate) variance: f64,
    pub(crate) last_observation: Intensity,
}

impl Default for Gaussian {
    fn default() -> Self {
        Self {
            weight: 0.0,
            mean: 0.0,
            variance: 1.0,
            last_observation: 0,
        }
    }
}

impl Gaussian {
    /// A component centred on `observation`.
    pub fn new(observation: Intensity, variance: f64, weight: f64) -> Self {
        Self {
            weight,
            mean: observation as f64,
            variance,
            last_observation: observation,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// The intensity that last matched (or created) this component.
    pub fn last_observation(&self) -> Intensity {
        self.last_observation
    }

    /// Ranking score: a heavier, tighter component is a better background candidate.
    pub fn confidence(&self) -> Confidence {
        self.weight / self.std_dev()
    }

    /// Strict ranking used for sorting; never used as equality.
    pub fn is_more_confident_than(&self, other: &Gaussian) -> bool {
        self.confidence() > other.confidence()
    }

    pub fn matches(&self, observation: Intensity, sigma_multiplier: f64) -> bool {
        (observation as f64 - self.mean).abs() <= sigma_multiplier * self.std_dev()
    }
}
