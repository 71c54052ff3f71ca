//! The visible draw pass.
//!
//! A [`Renderer`] owns the plain draw program and the clear color. Each
//! [`draw`](Renderer::draw) clears the canvas and draws the point store
//! as triangles, reading whatever buffer the [`DrawBinding`] points at --
//! which, because the stepper repoints it after every swap, is always the
//! freshly stepped positions.

use pointstep_core::{Device, DrawBinding, DrawStage, PipelineError, ProgramId, DEFAULT_CLEAR_COLOR};

/// Owns the draw program and renders the current positions each frame.
#[derive(Debug)]
pub struct Renderer {
    program: ProgramId,
    clear_color: [f32; 4],
    vertex_count: usize,
}

impl Renderer {
    /// Builds the plain draw program.
    ///
    /// `vertex_count` must match the stepper's store; the draw covers the
    /// same vertices the feedback pass captures.
    ///
    /// # Errors
    ///
    /// Propagates compile/link errors from the device.
    pub fn new(device: &mut dyn Device, vertex_count: usize) -> Result<Self, PipelineError> {
        let program = device.create_draw_program()?;
        Ok(Self {
            program,
            clear_color: DEFAULT_CLEAR_COLOR,
            vertex_count,
        })
    }

    /// The color the canvas is cleared to before each draw.
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Overrides the clear color.
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    /// Clears the canvas and draws the bound buffer as triangles.
    ///
    /// # Errors
    ///
    /// Returns `DrawPassFailed` naming the first sub-step whose error
    /// poll reported a problem.
    pub fn draw(&self, device: &mut dyn Device, binding: &DrawBinding) -> Result<(), PipelineError> {
        device.clear(self.clear_color);
        checkpoint(device, DrawStage::Clear)?;

        device.select_program(self.program);
        checkpoint(device, DrawStage::SelectProgram)?;

        device.bind_attribute_source(binding.buffer());
        checkpoint(device, DrawStage::BindSource)?;

        device.draw_triangles(self.vertex_count);
        checkpoint(device, DrawStage::Draw)?;

        Ok(())
    }
}

/// Polls the device and converts a pending diagnostic into a
/// `DrawPassFailed` at the given sub-step.
fn checkpoint(device: &mut dyn Device, stage: DrawStage) -> Result<(), PipelineError> {
    match device.poll_error() {
        Some(detail) => Err(PipelineError::DrawPassFailed { stage, detail }),
        None => Ok(()),
    }
}
