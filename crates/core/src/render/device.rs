//! GPU implementation of the [`Device`] trait over glow.
//!
//! `GlDevice` owns the GL context, one VAO, and the buffers and programs
//! it hands out as ids. The trait's command methods translate one-to-one
//! into GL calls; errors the driver raises stay latched in the GL error
//! flag until the caller retrieves them through `poll_error`, which is
//! how the step and draw passes attribute a failure to a sub-step.

use glam::Vec3;

use super::context::GlContext;
use super::programs::{
    CAPTURED_VARYINGS, DRAW_FRAGMENT_SHADER, DRAW_VERTEX_SHADER, FEEDBACK_FRAGMENT_SHADER,
    FEEDBACK_VERTEX_SHADER, POSITION_LOCATION, TRANSLATION_UNIFORM,
};
use super::shader::{compile_capture_program, compile_program};
use crate::device::{BufferId, Device, ProgramId};
use crate::error::PipelineError;

/// Maps a GL error code to its conventional name.
///
/// `poll_error` reports these instead of bare hex codes so a failed pass
/// logs something a human can act on.
pub fn gl_error_name(code: u32) -> &'static str {
    match code {
        glow::INVALID_ENUM => "INVALID_ENUM",
        glow::INVALID_VALUE => "INVALID_VALUE",
        glow::INVALID_OPERATION => "INVALID_OPERATION",
        glow::INVALID_FRAMEBUFFER_OPERATION => "INVALID_FRAMEBUFFER_OPERATION",
        glow::OUT_OF_MEMORY => "OUT_OF_MEMORY",
        _ => "unrecognized error",
    }
}

/// Packs clip-space positions into the byte layout `vertex_attrib_pointer`
/// expects: three consecutive native-endian f32 per vertex, no padding.
fn positions_as_bytes(positions: &[Vec3]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(positions.len() * 12);
    for position in positions {
        for component in position.to_array() {
            bytes.extend_from_slice(&component.to_ne_bytes());
        }
    }
    bytes
}

/// The WebGL2 / OpenGL device.
///
/// Buffers are allocated with `DYNAMIC_COPY` since the GPU both writes
/// them (transform feedback) and reads them (attribute sourcing), with
/// no host traffic after setup. A single VAO carries the one attribute
/// layout every pass uses.
pub struct GlDevice {
    ctx: GlContext,
    vao: glow::VertexArray,
    buffers: Vec<glow::Buffer>,
    programs: Vec<glow::Program>,
    translation_uniforms: Vec<Option<glow::UniformLocation>>,
    selected: Option<ProgramId>,
}

impl GlDevice {
    /// Wraps a capability-checked context and prepares the shared VAO.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::BufferAllocationFailed` if the VAO cannot
    /// be created.
    #[allow(unsafe_code)]
    pub fn new(ctx: GlContext) -> Result<Self, PipelineError> {
        use glow::HasContext;

        // SAFETY: glow wraps raw GL calls as unsafe. Creating and binding
        // a fresh VAO has no preconditions.
        let vao = unsafe {
            let vao = ctx
                .gl()
                .create_vertex_array()
                .map_err(PipelineError::BufferAllocationFailed)?;
            ctx.gl().bind_vertex_array(Some(vao));
            vao
        };

        Ok(Self {
            ctx,
            vao,
            buffers: Vec::new(),
            programs: Vec::new(),
            translation_uniforms: Vec::new(),
            selected: None,
        })
    }

    /// The underlying context, for host-side setup the trait does not
    /// cover (viewport sizing, extra textures, render targets).
    pub fn gl(&self) -> &glow::Context {
        self.ctx.gl()
    }

    /// Deletes every GL object this device created, including the VAO.
    ///
    /// Must be called before dropping the device if you want
    /// deterministic cleanup.
    #[allow(unsafe_code)]
    pub fn destroy(&self) {
        use glow::HasContext;

        // SAFETY: all handles were created by this device and never
        // deleted elsewhere.
        unsafe {
            for &program in &self.programs {
                self.ctx.gl().delete_program(program);
            }
            for &buffer in &self.buffers {
                self.ctx.gl().delete_buffer(buffer);
            }
            self.ctx.gl().delete_vertex_array(self.vao);
        }
    }
}

impl Device for GlDevice {
    #[allow(unsafe_code)]
    fn create_buffer(&mut self, initial: &[Vec3]) -> Result<BufferId, PipelineError> {
        use glow::HasContext;

        let bytes = positions_as_bytes(initial);

        // SAFETY: glow wraps raw GL calls as unsafe. We upload a
        // correctly sized byte slice into a fresh ARRAY_BUFFER binding
        // and restore the binding afterwards.
        let buffer = unsafe {
            let buffer = self
                .ctx
                .gl()
                .create_buffer()
                .map_err(PipelineError::BufferAllocationFailed)?;
            self.ctx.gl().bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.ctx
                .gl()
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, &bytes, glow::DYNAMIC_COPY);
            self.ctx.gl().bind_buffer(glow::ARRAY_BUFFER, None);
            buffer
        };

        self.buffers.push(buffer);
        Ok(BufferId(self.buffers.len() - 1))
    }

    #[allow(unsafe_code)]
    fn create_feedback_program(&mut self) -> Result<ProgramId, PipelineError> {
        use glow::HasContext;

        let program = compile_capture_program(
            self.ctx.gl(),
            FEEDBACK_VERTEX_SHADER,
            FEEDBACK_FRAGMENT_SHADER,
            CAPTURED_VARYINGS,
        )?;

        // SAFETY: program is a valid handle from a successful link.
        let location = unsafe { self.ctx.gl().get_uniform_location(program, TRANSLATION_UNIFORM) };

        self.programs.push(program);
        self.translation_uniforms.push(location);
        Ok(ProgramId(self.programs.len() - 1))
    }

    fn create_draw_program(&mut self) -> Result<ProgramId, PipelineError> {
        let program = compile_program(self.ctx.gl(), DRAW_VERTEX_SHADER, DRAW_FRAGMENT_SHADER)?;
        self.programs.push(program);
        self.translation_uniforms.push(None);
        Ok(ProgramId(self.programs.len() - 1))
    }

    #[allow(unsafe_code)]
    fn select_program(&mut self, program: ProgramId) {
        use glow::HasContext;

        let Some(&handle) = self.programs.get(program.0) else {
            return;
        };
        // SAFETY: handle is a valid program from a successful link.
        unsafe { self.ctx.gl().use_program(Some(handle)) };
        self.selected = Some(program);
    }

    #[allow(unsafe_code)]
    fn set_translation(&mut self, translation: f32) {
        use glow::HasContext;

        let Some(program) = self.selected else {
            return;
        };
        if let Some(location) = &self.translation_uniforms[program.0] {
            // SAFETY: the location belongs to the currently selected
            // program, fetched at link time.
            unsafe { self.ctx.gl().uniform_1_f32(Some(location), translation) };
        }
    }

    #[allow(unsafe_code)]
    fn bind_attribute_source(&mut self, buffer: BufferId) {
        use glow::HasContext;

        let Some(&handle) = self.buffers.get(buffer.0) else {
            return;
        };
        // SAFETY: handle is a valid buffer; the attribute layout matches
        // the tightly packed vec3 upload in create_buffer.
        unsafe {
            self.ctx.gl().bind_buffer(glow::ARRAY_BUFFER, Some(handle));
            self.ctx.gl().vertex_attrib_pointer_f32(
                POSITION_LOCATION,
                3,
                glow::FLOAT,
                false,
                0,
                0,
            );
            self.ctx.gl().enable_vertex_attrib_array(POSITION_LOCATION);
        }
    }

    #[allow(unsafe_code)]
    fn bind_capture_target(&mut self, buffer: Option<BufferId>) {
        use glow::HasContext;

        let handle = buffer.and_then(|b| self.buffers.get(b.0).copied());
        // SAFETY: binding (or unbinding, with None) an indexed
        // TRANSFORM_FEEDBACK_BUFFER slot with a valid handle.
        unsafe {
            self.ctx
                .gl()
                .bind_buffer_base(glow::TRANSFORM_FEEDBACK_BUFFER, 0, handle);
        }
    }

    #[allow(unsafe_code)]
    fn set_rasterizer_discard(&mut self, enabled: bool) {
        use glow::HasContext;

        // SAFETY: toggling a capability flag has no preconditions.
        unsafe {
            if enabled {
                self.ctx.gl().enable(glow::RASTERIZER_DISCARD);
            } else {
                self.ctx.gl().disable(glow::RASTERIZER_DISCARD);
            }
        }
    }

    #[allow(unsafe_code)]
    fn begin_capture(&mut self) {
        use glow::HasContext;

        // SAFETY: opens the transform feedback region; the driver flags
        // INVALID_OPERATION itself if no capture target is bound.
        unsafe { self.ctx.gl().begin_transform_feedback(glow::POINTS) };
    }

    #[allow(unsafe_code)]
    fn draw_points(&mut self, count: usize) {
        use glow::HasContext;

        // SAFETY: draws from the currently bound attribute source; an
        // out-of-range count is the driver's to flag.
        unsafe { self.ctx.gl().draw_arrays(glow::POINTS, 0, count as i32) };
    }

    #[allow(unsafe_code)]
    fn end_capture(&mut self) {
        use glow::HasContext;

        // SAFETY: closes the transform feedback region opened by
        // begin_capture.
        unsafe { self.ctx.gl().end_transform_feedback() };
    }

    #[allow(unsafe_code)]
    fn clear(&mut self, color: [f32; 4]) {
        use glow::HasContext;

        // SAFETY: clearing the bound framebuffer's color attachment.
        unsafe {
            self.ctx
                .gl()
                .clear_color(color[0], color[1], color[2], color[3]);
            self.ctx.gl().clear(glow::COLOR_BUFFER_BIT);
        }
    }

    #[allow(unsafe_code)]
    fn draw_triangles(&mut self, count: usize) {
        use glow::HasContext;

        // SAFETY: draws from the currently bound attribute source.
        unsafe { self.ctx.gl().draw_arrays(glow::TRIANGLES, 0, count as i32) };
    }

    #[allow(unsafe_code)]
    fn poll_error(&mut self) -> Option<String> {
        use glow::HasContext;

        // SAFETY: reading the error flag has no preconditions.
        let code = unsafe { self.ctx.gl().get_error() };
        if code == glow::NO_ERROR {
            None
        } else {
            Some(format!("{} (0x{code:04X})", gl_error_name(code)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- pure helpers ---

    #[test]
    fn positions_as_bytes_packs_three_floats_per_vertex() {
        let bytes = positions_as_bytes(&[Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 0.0)]);
        assert_eq!(bytes.len(), 2 * 3 * 4);

        let x = f32::from_ne_bytes(bytes[0..4].try_into().unwrap());
        let y = f32::from_ne_bytes(bytes[4..8].try_into().unwrap());
        let z = f32::from_ne_bytes(bytes[8..12].try_into().unwrap());
        assert_eq!((x, y, z), (1.0, 2.0, 3.0));

        let x2 = f32::from_ne_bytes(bytes[12..16].try_into().unwrap());
        assert_eq!(x2, -1.0);
    }

    #[test]
    fn positions_as_bytes_handles_empty_input() {
        assert!(positions_as_bytes(&[]).is_empty());
    }

    #[test]
    fn gl_error_name_covers_the_standard_codes() {
        assert_eq!(gl_error_name(glow::INVALID_ENUM), "INVALID_ENUM");
        assert_eq!(gl_error_name(glow::INVALID_VALUE), "INVALID_VALUE");
        assert_eq!(gl_error_name(glow::INVALID_OPERATION), "INVALID_OPERATION");
        assert_eq!(
            gl_error_name(glow::INVALID_FRAMEBUFFER_OPERATION),
            "INVALID_FRAMEBUFFER_OPERATION"
        );
        assert_eq!(gl_error_name(glow::OUT_OF_MEMORY), "OUT_OF_MEMORY");
    }

    #[test]
    fn gl_error_name_falls_back_for_unknown_codes() {
        assert_eq!(gl_error_name(0xFFFF), "unrecognized error");
    }

    // --- GL-dependent paths ---

    // GlDevice requires a live GL context, so integration tests are
    // ignored. Run with `cargo test --features render -- --ignored`
    // when a GL context is available.

    #[test]
    #[ignore = "requires GL context"]
    fn capture_pass_translates_buffer_contents() {
        // Would test: create two buffers, run a capture draw with a fixed
        // translation, read the target back with get_buffer_sub_data, and
        // compare against the CPU reference device.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn poll_error_reports_invalid_operation_for_bad_capture() {
        // Would test: begin_capture with no capture target bound makes
        // the next poll_error return INVALID_OPERATION.
    }
}
