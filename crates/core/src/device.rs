//! The `Device` trait: the drawing surface as an opaque capability provider.
//!
//! The stepper and renderer never talk to a GPU API directly. Everything
//! goes through this object-safe trait, so the same pass sequence runs
//! against the CPU [`ReferenceDevice`](crate::reference::ReferenceDevice)
//! in tests and headless runs, and against a `glow`-backed device in the
//! browser (feature `render`).

use crate::error::PipelineError;
use glam::Vec3;
use std::fmt;

/// Opaque handle to a device-resident position buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferId(pub usize);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer #{}", self.0)
    }
}

/// Opaque handle to a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramId(pub usize);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program #{}", self.0)
    }
}

/// Capability provider for the feedback and draw passes.
///
/// Mirrors the error model of the underlying graphics APIs: setup calls
/// (buffer and program creation) return `Result`, while per-frame calls
/// record errors internally and surface them through [`poll_error`]
/// — the caller polls after each sub-step it wants to attribute.
///
/// The trait exposes **no host readback**. The point of the feedback
/// pattern is that position data never crosses back to the host;
/// inspection of results is a reference-device affordance, not a device
/// capability.
///
/// This trait is **object-safe**: `Box<dyn Device>` and `&mut dyn Device`
/// both work.
///
/// [`poll_error`]: Device::poll_error
pub trait Device {
    /// Allocates a position buffer holding a copy of `initial`.
    fn create_buffer(&mut self, initial: &[Vec3]) -> Result<BufferId, PipelineError>;

    /// Builds the feedback-capable program: one captured `vec3` varying,
    /// position attribute at slot 0, translation uniform.
    fn create_feedback_program(&mut self) -> Result<ProgramId, PipelineError>;

    /// Builds the plain draw program: position attribute at slot 0,
    /// constant fragment color.
    fn create_draw_program(&mut self) -> Result<ProgramId, PipelineError>;

    /// Makes `program` current for subsequent draws and uniform updates.
    fn select_program(&mut self, program: ProgramId);

    /// Sets the translation uniform on the currently selected program.
    fn set_translation(&mut self, translation: f32);

    /// Binds `buffer` as the source for vertex attribute slot 0.
    fn bind_attribute_source(&mut self, buffer: BufferId);

    /// Binds `buffer` as the feedback capture target at slot 0, or
    /// releases the binding when `None`.
    fn bind_capture_target(&mut self, buffer: Option<BufferId>);

    /// Toggles rasterizer discard. While enabled, draws produce no
    /// fragments; the vertex stage still runs (and still feeds capture).
    fn set_rasterizer_discard(&mut self, enabled: bool);

    /// Opens a point-topology capture region.
    fn begin_capture(&mut self);

    /// Draws `count` points from the bound attribute source. During an
    /// open capture region, each processed vertex is written to the
    /// capture target. A count of zero is a legal no-op.
    fn draw_points(&mut self, count: usize);

    /// Closes the capture region.
    fn end_capture(&mut self);

    /// Clears the color target to `color` (RGBA).
    fn clear(&mut self, color: [f32; 4]);

    /// Draws `count` vertices as triangles from the bound attribute
    /// source. A count of zero is a legal no-op.
    fn draw_triangles(&mut self, count: usize);

    /// Returns and clears the most recent device diagnostic, if any.
    fn poll_error(&mut self) -> Option<String>;
}
