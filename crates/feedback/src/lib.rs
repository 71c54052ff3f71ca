#![deny(unsafe_code)]
//! The transform-feedback point demo: a triangle of points drifting
//! along x, stepped entirely on the GPU.
//!
//! [`Stepper`] runs the capture pass over a double-buffered position
//! store, [`Renderer`] draws the result, and [`FrameLoop`] owns both plus
//! the device and per-frame translation strategy. [`FeedbackDemo`] packs
//! a frame loop over the in-memory reference device behind the
//! [`Demo`] trait for headless runs and the registry.

pub mod frame;
pub mod renderer;
pub mod stepper;

pub use frame::{FrameLoop, FramePhase};
pub use renderer::Renderer;
pub use stepper::Stepper;

use glam::Vec3;
use pointstep_core::{
    Demo, PipelineError, ReferenceDevice, TranslationStrategy, DEFAULT_TRANSLATION,
};
use serde_json::{json, Value};

/// The classic three-point fixture every run starts from.
pub const TRIANGLE_POSITIONS: [Vec3; 3] = [
    Vec3::new(-0.4, -0.4, 0.0),
    Vec3::new(0.4, -0.4, 0.0),
    Vec3::new(0.0, 0.7, 0.0),
];

/// The feedback demo on the CPU reference device.
///
/// Browser embeddings run the same [`FrameLoop`] over the GPU device
/// instead; everything above the device is shared.
#[derive(Debug)]
pub struct FeedbackDemo {
    frame_loop: FrameLoop<ReferenceDevice>,
}

impl FeedbackDemo {
    /// Creates the demo with the default random jitter strategy.
    ///
    /// # Errors
    ///
    /// Propagates setup errors from the device.
    pub fn new(seed: u64) -> Result<Self, PipelineError> {
        Self::from_json(seed, &Value::Object(serde_json::Map::new()))
    }

    /// Creates the demo from loose JSON params.
    ///
    /// Recognized keys are the translation strategy's:
    /// `strategy` (`"random"` or `"fixed"`), `min`/`max` for random,
    /// `translation` for fixed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStrategy` for an unrecognized strategy name, and
    /// propagates setup errors from the device.
    pub fn from_json(seed: u64, params: &Value) -> Result<Self, PipelineError> {
        let strategy = TranslationStrategy::from_json(params)?;
        let frame_loop = FrameLoop::new(
            ReferenceDevice::new(),
            &TRIANGLE_POSITIONS,
            strategy,
            seed,
        )?;
        Ok(Self { frame_loop })
    }

    /// The underlying frame loop, for phase and fault inspection.
    pub fn frame_loop(&self) -> &FrameLoop<ReferenceDevice> {
        &self.frame_loop
    }
}

impl Demo for FeedbackDemo {
    fn advance(&mut self) -> Result<(), PipelineError> {
        self.frame_loop.advance()
    }

    fn positions(&self) -> &[Vec3] {
        self.frame_loop
            .device()
            .buffer_contents(self.frame_loop.current_buffer())
    }

    fn params(&self) -> Value {
        self.frame_loop.strategy().to_json()
    }

    fn param_schema(&self) -> Value {
        json!({
            "strategy": {
                "type": "string",
                "default": "random",
                "description": "Per-frame translation strategy: \"random\" or \"fixed\""
            },
            "min": {
                "type": "number",
                "default": -DEFAULT_TRANSLATION,
                "description": "Lower jitter bound (random strategy)"
            },
            "max": {
                "type": "number",
                "default": DEFAULT_TRANSLATION,
                "description": "Upper jitter bound (random strategy)"
            },
            "translation": {
                "type": "number",
                "default": DEFAULT_TRANSLATION,
                "description": "Per-frame x shift (fixed strategy)"
            }
        })
    }
}
