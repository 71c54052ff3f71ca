//! Reproducible specification for a demo run.
//!
//! A [`Recipe`] captures everything needed to replay a run exactly:
//! demo name, raster dimensions, parameters, PRNG seed, and frame count.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Reproducible specification for a demo run.
///
/// Contains the demo name, raster dimensions, parameter overrides,
/// PRNG seed, and frame count. Two identical `Recipe` values fed to the
/// same binary produce bit-identical point positions and snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub demo: String,
    pub width: usize,
    pub height: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    pub frames: usize,
}

impl Recipe {
    /// Creates a new Recipe with default params (`{}`) and frames (`0`).
    pub fn new(demo: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            demo: demo.to_string(),
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            frames: 0,
        }
    }

    /// Validates that the recipe has non-zero raster dimensions and that
    /// `width * height` does not overflow.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidRecipe(format!(
                "raster dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        self.width.checked_mul(self.height).ok_or_else(|| {
            PipelineError::InvalidRecipe(format!(
                "raster dimensions {}x{} overflow",
                self.width, self.height
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_recipe_with_default_params_and_frames() {
        let r = Recipe::new("feedback", 512, 512, 42);
        assert_eq!(r.demo, "feedback");
        assert_eq!(r.width, 512);
        assert_eq!(r.height, 512);
        assert_eq!(r.seed, 42);
        assert_eq!(r.frames, 0);
        assert_eq!(r.params, serde_json::json!({}));
    }

    #[test]
    fn json_round_trip_with_defaults() {
        let original = Recipe::new("rotation", 1024, 1024, 8675309);
        let json = serde_json::to_string(&original).unwrap();
        let restored: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn json_round_trip_with_custom_params() {
        let mut r = Recipe::new("feedback", 256, 256, 99);
        r.params = serde_json::json!({
            "strategy": "fixed",
            "translation": 0.01
        });
        r.frames = 120;

        let json = serde_json::to_string_pretty(&r).unwrap();
        let restored: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(r, restored);
    }

    #[test]
    fn json_contains_expected_keys() {
        let r = Recipe::new("feedback", 128, 128, 1);
        let v: serde_json::Value = serde_json::to_value(&r).unwrap();
        assert!(v.get("demo").is_some());
        assert!(v.get("width").is_some());
        assert!(v.get("height").is_some());
        assert!(v.get("params").is_some());
        assert!(v.get("seed").is_some());
        assert!(v.get("frames").is_some());
    }

    #[test]
    fn validate_succeeds_for_valid_recipe() {
        let r = Recipe::new("feedback", 512, 512, 42);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn validate_fails_for_zero_width() {
        let r = Recipe::new("feedback", 0, 512, 42);
        assert!(r.validate().is_err());
    }

    #[test]
    fn validate_fails_for_zero_height() {
        let r = Recipe::new("feedback", 512, 0, 42);
        assert!(r.validate().is_err());
    }

    #[test]
    fn validate_fails_for_overflow() {
        let r = Recipe::new("feedback", usize::MAX, 2, 42);
        let err = r.validate().expect_err("overflowing dimensions must fail");
        assert!(
            err.to_string().contains("overflow"),
            "unexpected message: {err}"
        );
    }
}
