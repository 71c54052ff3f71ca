//! Per-frame translation strategies.
//!
//! Each frame the feedback pass shifts every point along x by one scalar.
//! Two strategies for choosing it are supported: a fresh random draw per
//! frame (the classic drifting-cloud look) and a fixed constant (steady
//! march, handy for tests and accumulation checks). Both are selectable
//! from loose JSON params.

use serde_json::{json, Value};

use crate::error::PipelineError;
use crate::params::{param_f64, param_string};
use crate::prng::Xorshift64;

/// Default magnitude of the per-frame translation, in clip-space units.
/// The random strategy draws from `[-DEFAULT_TRANSLATION, DEFAULT_TRANSLATION)`.
pub const DEFAULT_TRANSLATION: f64 = 0.01;

/// How the per-frame x translation is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranslationStrategy {
    /// The same scalar every frame.
    Fixed(f64),
    /// A fresh uniform draw from `[min, max)` every frame.
    Random { min: f64, max: f64 },
}

impl Default for TranslationStrategy {
    /// Random jitter in `[-0.01, 0.01)`, matching the classic demo.
    fn default() -> Self {
        Self::Random {
            min: -DEFAULT_TRANSLATION,
            max: DEFAULT_TRANSLATION,
        }
    }
}

impl TranslationStrategy {
    /// Parses a strategy from loose JSON params.
    ///
    /// `{"strategy": "random", "min": -0.01, "max": 0.01}` or
    /// `{"strategy": "fixed", "translation": 0.01}`; every key except
    /// `strategy` is optional and defaults to the values above. A missing
    /// `strategy` key means random.
    pub fn from_json(params: &Value) -> Result<Self, PipelineError> {
        let name = param_string(params, "strategy", "random");
        match name.as_str() {
            "random" => Ok(Self::Random {
                min: param_f64(params, "min", -DEFAULT_TRANSLATION),
                max: param_f64(params, "max", DEFAULT_TRANSLATION),
            }),
            "fixed" => Ok(Self::Fixed(param_f64(
                params,
                "translation",
                DEFAULT_TRANSLATION,
            ))),
            _ => Err(PipelineError::UnknownStrategy(name)),
        }
    }

    /// The canonical JSON form, accepted back by [`from_json`].
    ///
    /// [`from_json`]: Self::from_json
    pub fn to_json(&self) -> Value {
        match self {
            Self::Fixed(translation) => json!({
                "strategy": "fixed",
                "translation": translation,
            }),
            Self::Random { min, max } => json!({
                "strategy": "random",
                "min": min,
                "max": max,
            }),
        }
    }

    /// Draws the translation for the next frame.
    ///
    /// Only the random strategy consumes PRNG state; a fixed strategy
    /// leaves `rng` untouched.
    pub fn next(&self, rng: &mut Xorshift64) -> f32 {
        match *self {
            Self::Fixed(translation) => translation as f32,
            Self::Random { min, max } => rng.next_range(min, max) as f32,
        }
    }
}
