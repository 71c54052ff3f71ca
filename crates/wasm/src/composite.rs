//! The render-to-texture composite: a rotating triangle drawn into an
//! offscreen target, then blitted to the canvas mixed with a checker
//! pattern.
//!
//! Pass 1 depth-tests the triangle into a [`RenderTarget`] using the
//! scene program and the current rotation matrix; pass 2 draws a
//! fullscreen triangle sampling the target's color texture and the
//! pattern texture. The rotation table itself lives in
//! [`pointstep_rotation::RotationDemo`]; this module only uploads the
//! matrix the demo selected for the frame.

use pointstep_core::error::DrawStage;
use pointstep_core::render::{
    checker_pixels, compile_program, create_texture, gl_error_name, RenderTarget, TextureConfig,
    BLIT_FRAGMENT_SHADER, BLIT_VERTEX_SHADER, PATTERN_SAMPLER, POSITION_LOCATION,
    ROTATION_UNIFORM, SCENE_FRAGMENT_SHADER, SCENE_SAMPLER, SCENE_VERTEX_SHADER,
};
use pointstep_core::{Demo, PipelineError, DEFAULT_CLEAR_COLOR};
use pointstep_rotation::{RotationDemo, BASE_POSITIONS};

/// Side length of the offscreen scene target, in pixels.
const TARGET_SIZE: u32 = 256;
/// Cells per side of the checker pattern texture.
const PATTERN_CELLS: u32 = 8;
/// The two checker colors: white and a deep blue.
const PATTERN_EVEN: [u8; 4] = [255, 255, 255, 255];
const PATTERN_ODD: [u8; 4] = [40, 40, 200, 255];

/// Owns the GL state of the two-pass demo and advances it one frame at a
/// time.
///
/// GL objects live for the page's lifetime; setup failures leave any
/// already created objects to the context, the same as a lost device.
pub struct CompositeScene {
    gl: glow::Context,
    demo: RotationDemo,
    target: RenderTarget,
    pattern: glow::Texture,
    scene_program: glow::Program,
    blit_program: glow::Program,
    rotation_uniform: Option<glow::UniformLocation>,
    scene_vao: glow::VertexArray,
    blit_vao: glow::VertexArray,
    canvas_width: i32,
    canvas_height: i32,
}

/// Packs the base triangle into the tightly packed f32 layout the
/// attribute pointer expects.
fn triangle_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(BASE_POSITIONS.len() * 12);
    for position in BASE_POSITIONS {
        for component in position.to_array() {
            bytes.extend_from_slice(&component.to_ne_bytes());
        }
    }
    bytes
}

impl CompositeScene {
    /// Builds both programs, the offscreen target, the pattern texture,
    /// and the vertex state.
    ///
    /// # Errors
    ///
    /// Propagates compile, link, and allocation errors.
    #[allow(unsafe_code)]
    pub fn new(
        gl: glow::Context,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Self, PipelineError> {
        use glow::HasContext;

        let scene_program = compile_program(&gl, SCENE_VERTEX_SHADER, SCENE_FRAGMENT_SHADER)?;
        let blit_program = compile_program(&gl, BLIT_VERTEX_SHADER, BLIT_FRAGMENT_SHADER)?;

        // SAFETY: both programs come from successful links; the uniform
        // lookups and the one-time sampler assignment only touch program
        // state.
        let rotation_uniform =
            unsafe { gl.get_uniform_location(scene_program, ROTATION_UNIFORM) };
        unsafe {
            gl.use_program(Some(blit_program));
            let scene_sampler = gl.get_uniform_location(blit_program, SCENE_SAMPLER);
            gl.uniform_1_i32(scene_sampler.as_ref(), 0);
            let pattern_sampler = gl.get_uniform_location(blit_program, PATTERN_SAMPLER);
            gl.uniform_1_i32(pattern_sampler.as_ref(), 1);
        }

        let target = RenderTarget::new(&gl, TARGET_SIZE, TARGET_SIZE)?;
        let pattern = create_texture(
            &gl,
            &TextureConfig::rgba8(PATTERN_CELLS, PATTERN_CELLS),
            Some(&checker_pixels(
                PATTERN_CELLS,
                PATTERN_CELLS,
                PATTERN_EVEN,
                PATTERN_ODD,
            )),
        )?;

        // SAFETY: fresh VAO/VBO handles; the attribute layout matches the
        // tightly packed vec3 upload. The blit VAO stays empty, its pass
        // reads only gl_VertexID.
        let (scene_vao, blit_vao) = unsafe {
            let scene_vao = gl
                .create_vertex_array()
                .map_err(PipelineError::BufferAllocationFailed)?;
            let triangle = gl
                .create_buffer()
                .map_err(PipelineError::BufferAllocationFailed)?;
            gl.bind_vertex_array(Some(scene_vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(triangle));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, &triangle_bytes(), glow::STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 3, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(POSITION_LOCATION);

            let blit_vao = gl
                .create_vertex_array()
                .map_err(PipelineError::BufferAllocationFailed)?;
            gl.bind_vertex_array(None);
            (scene_vao, blit_vao)
        };

        Ok(Self {
            gl,
            demo: RotationDemo::default(),
            target,
            pattern,
            scene_program,
            blit_program,
            rotation_uniform,
            scene_vao,
            blit_vao,
            canvas_width: canvas_width as i32,
            canvas_height: canvas_height as i32,
        })
    }

    /// Advances the rotation and draws both passes.
    ///
    /// # Errors
    ///
    /// Returns `DrawPassFailed` naming the pass whose error query fired.
    pub fn advance(&mut self) -> Result<(), PipelineError> {
        self.demo.advance()?;
        self.draw_scene_pass()?;
        self.draw_composite_pass()
    }

    #[allow(unsafe_code)]
    fn draw_scene_pass(&self) -> Result<(), PipelineError> {
        use glow::HasContext;

        self.target.bind(&self.gl);
        // SAFETY: every handle was created in new() and stays valid for
        // the scene's lifetime.
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            let [r, g, b, a] = DEFAULT_CLEAR_COLOR;
            self.gl.clear_color(r, g, b, a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            self.gl.use_program(Some(self.scene_program));
            self.gl.uniform_matrix_4_f32_slice(
                self.rotation_uniform.as_ref(),
                false,
                &self.demo.matrix().to_cols_array(),
            );
            self.gl.bind_vertex_array(Some(self.scene_vao));
            self.gl
                .draw_arrays(glow::TRIANGLES, 0, BASE_POSITIONS.len() as i32);
        }
        self.poll("scene pass")
    }

    #[allow(unsafe_code)]
    fn draw_composite_pass(&self) -> Result<(), PipelineError> {
        use glow::HasContext;

        // SAFETY: as above; None rebinds the canvas's default framebuffer.
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            self.gl
                .viewport(0, 0, self.canvas_width, self.canvas_height);
            self.gl.disable(glow::DEPTH_TEST);

            self.gl.use_program(Some(self.blit_program));
            self.gl.active_texture(glow::TEXTURE0);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(self.target.texture()));
            self.gl.active_texture(glow::TEXTURE1);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.pattern));
            self.gl.bind_vertex_array(Some(self.blit_vao));
            self.gl.draw_arrays(glow::TRIANGLES, 0, 3);
        }
        self.poll("composite pass")
    }

    /// Drains the GL error flag after a pass, attributing any error to it.
    #[allow(unsafe_code)]
    fn poll(&self, pass: &str) -> Result<(), PipelineError> {
        use glow::HasContext;

        // SAFETY: reading the error flag has no preconditions.
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            Err(PipelineError::DrawPassFailed {
                stage: DrawStage::Draw,
                detail: format!("{pass}: {} (0x{code:04X})", gl_error_name(code)),
            })
        }
    }
}
