#![deny(unsafe_code)]
//! Demo registry: maps demo names to implementations and provides CPU-side
//! rasterization of their point positions.
//!
//! This crate sits between `pointstep-core` (which defines the `Demo` trait)
//! and the individual demo crates (`pointstep-feedback`,
//! `pointstep-rotation`). Both the CLI and WASM bindings depend on this
//! crate to avoid duplicating dispatch logic.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use glam::Vec3;
use pointstep_core::error::PipelineError;
use pointstep_core::Demo;
use serde_json::Value;

/// All available demo names.
const DEMO_NAMES: &[&str] = &["feedback", "rotation"];

/// Enumeration of all available point demos.
///
/// Wraps each demo implementation and delegates `Demo` trait methods.
/// Use [`DemoKind::from_name`] for string-based construction (CLI, WASM).
pub enum DemoKind {
    /// Transform-feedback drift on the reference device.
    Feedback(pointstep_feedback::FeedbackDemo),
    /// Precomputed-rotation triangle.
    Rotation(pointstep_rotation::RotationDemo),
}

impl DemoKind {
    /// Constructs a demo by name.
    ///
    /// `seed` drives the feedback demo's random strategy; the rotation
    /// demo has no randomness and ignores it.
    ///
    /// Returns `PipelineError::UnknownDemo` if the name is not recognized.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, PipelineError> {
        match name {
            "feedback" => Ok(DemoKind::Feedback(
                pointstep_feedback::FeedbackDemo::from_json(seed, params)?,
            )),
            "rotation" => Ok(DemoKind::Rotation(
                pointstep_rotation::RotationDemo::from_json(params),
            )),
            _ => Err(PipelineError::UnknownDemo(name.to_string())),
        }
    }

    /// Returns a slice of all recognized demo names.
    pub fn list_demos() -> &'static [&'static str] {
        DEMO_NAMES
    }
}

impl Demo for DemoKind {
    fn advance(&mut self) -> Result<(), PipelineError> {
        match self {
            DemoKind::Feedback(d) => d.advance(),
            DemoKind::Rotation(d) => d.advance(),
        }
    }

    fn positions(&self) -> &[Vec3] {
        match self {
            DemoKind::Feedback(d) => d.positions(),
            DemoKind::Rotation(d) => d.positions(),
        }
    }

    fn params(&self) -> Value {
        match self {
            DemoKind::Feedback(d) => d.params(),
            DemoKind::Rotation(d) => d.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            DemoKind::Feedback(d) => d.param_schema(),
            DemoKind::Rotation(d) => d.param_schema(),
        }
    }

    fn clear_color(&self) -> [f32; 4] {
        match self {
            DemoKind::Feedback(d) => d.clear_color(),
            DemoKind::Rotation(d) => d.clear_color(),
        }
    }
}
