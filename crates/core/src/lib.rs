#![deny(unsafe_code)]
//! Core types and traits for the pointstep transform-feedback demos.
//!
//! Provides the `Device` abstraction over a WebGL2-class drawing context,
//! the `DoubleBuffer`/`DrawBinding` position-store model, the `Demo` trait,
//! translation strategies, `Xorshift64` PRNG, `Recipe`, the in-memory
//! `ReferenceDevice`, and parameter helpers. GPU-backed pieces live behind
//! the `render` feature.

pub mod binding;
pub mod demo;
pub mod device;
pub mod double_buffer;
pub mod error;
pub mod params;
pub mod prng;
pub mod recipe;
pub mod reference;
pub mod translation;

#[cfg(feature = "render")]
pub mod render;

pub use binding::DrawBinding;
pub use demo::{Demo, DEFAULT_CLEAR_COLOR};
pub use device::{BufferId, Device, ProgramId};
pub use double_buffer::DoubleBuffer;
pub use error::{DrawStage, FeedbackStage, PipelineError};
pub use prng::Xorshift64;
pub use recipe::Recipe;
pub use reference::{DeviceCall, FaultPoint, ReferenceDevice};
pub use translation::{TranslationStrategy, DEFAULT_TRANSLATION};
