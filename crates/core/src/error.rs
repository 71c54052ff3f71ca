//! Error types for the pointstep pipeline.
//!
//! Every failure in the system is a [`PipelineError`]. The enum is `Clone`
//! because a frame loop that has entered its terminal failed state keeps the
//! original fault and reports it again on every subsequent call.

use std::fmt;
use thiserror::Error;

/// Sub-steps of the feedback pass, used to attribute a device error to the
/// call that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStage {
    /// Selecting the feedback program and setting its translation uniform.
    SelectProgram,
    /// Binding the read buffer as the vertex attribute source.
    BindSource,
    /// Binding the write buffer as the capture target.
    BindCapture,
    /// Disabling rasterization before the capture draw.
    RasterizerOff,
    /// The point-topology draw issued between capture begin/end.
    CaptureDraw,
    /// Re-enabling rasterization after the capture draw.
    RasterizerOn,
    /// Releasing the capture target binding.
    ReleaseCapture,
}

impl fmt::Display for FeedbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedbackStage::SelectProgram => "select feedback program",
            FeedbackStage::BindSource => "bind attribute source",
            FeedbackStage::BindCapture => "bind capture target",
            FeedbackStage::RasterizerOff => "disable rasterization",
            FeedbackStage::CaptureDraw => "capture draw",
            FeedbackStage::RasterizerOn => "re-enable rasterization",
            FeedbackStage::ReleaseCapture => "release capture target",
        };
        f.write_str(name)
    }
}

/// Sub-steps of the draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStage {
    /// Clearing the color target.
    Clear,
    /// Selecting the plain draw program.
    SelectProgram,
    /// Binding the current read buffer via the draw binding.
    BindSource,
    /// The triangle-topology draw.
    Draw,
}

impl fmt::Display for DrawStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawStage::Clear => "clear",
            DrawStage::SelectProgram => "select draw program",
            DrawStage::BindSource => "bind attribute source",
            DrawStage::Draw => "triangle draw",
        };
        f.write_str(name)
    }
}

/// Errors produced by pipeline operations.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The drawing context could not be acquired or lacks required
    /// transform-feedback limits. Fatal; the loop never starts.
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// A shader stage failed to compile. The log carries the driver's
    /// diagnostic with line-numbered source.
    #[error("shader compile error ({stage}):\n{log}")]
    ShaderCompileFailed {
        /// The shader stage that failed (e.g. "vertex", "fragment").
        stage: String,
        /// The driver's info log describing the error.
        log: String,
    },

    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    ProgramLinkFailed(String),

    /// The device could not allocate a buffer or texture at setup.
    #[error("buffer allocation failed: {0}")]
    BufferAllocationFailed(String),

    /// The device reported an error during the feedback pass. Carries the
    /// failing sub-step.
    #[error("feedback pass failed at {stage}: {detail}")]
    FeedbackPassFailed {
        stage: FeedbackStage,
        detail: String,
    },

    /// The device reported an error during the draw pass. Carries the
    /// failing sub-step.
    #[error("draw pass failed at {stage}: {detail}")]
    DrawPassFailed { stage: DrawStage, detail: String },

    /// A requested demo name was not found in the registry.
    #[error("unknown demo: {0}")]
    UnknownDemo(String),

    /// A requested translation strategy name was not recognized.
    #[error("unknown translation strategy: {0}")]
    UnknownStrategy(String),

    /// A recipe failed validation before any device work started.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    /// A file could not be read or written (recipes, snapshots).
    #[error("i/o error: {0}")]
    Io(String),
}
