//! WebGL2 rendering infrastructure.
//!
//! This module is only available when the `render` feature is enabled.
//! It provides the GPU-backed [`Device`](crate::device::Device)
//! implementation, shader compilation with transform-feedback capture,
//! the GLSL program sources, texture helpers, and off-screen render
//! targets.
//!
//! # Module overview
//!
//! - [`context`] -- GPU context wrapper with transform-feedback limit checks.
//! - [`shader`] -- Shader compilation, capture-aware linking, error formatting.
//! - [`programs`] -- GLSL sources and attribute/uniform name constants.
//! - [`device`] -- `GlDevice`, the GPU `Device` implementation.
//! - [`texture`] -- Texture configuration, creation, checker pattern pixels.
//! - [`target`] -- FBO + color texture + depth renderbuffer render targets.

pub mod context;
pub mod device;
pub mod programs;
pub mod shader;
pub mod target;
pub mod texture;

// Re-export key types at the render module level for convenience.
pub use context::GlContext;
pub use device::{gl_error_name, GlDevice};
pub use programs::{
    BLIT_FRAGMENT_SHADER, BLIT_VERTEX_SHADER, CAPTURED_VARYINGS, DRAW_FRAGMENT_SHADER,
    DRAW_VERTEX_SHADER, FEEDBACK_FRAGMENT_SHADER, FEEDBACK_VERTEX_SHADER, PATTERN_SAMPLER,
    POSITION_LOCATION, ROTATION_UNIFORM, SCENE_FRAGMENT_SHADER, SCENE_SAMPLER,
    SCENE_VERTEX_SHADER, TRANSLATION_UNIFORM,
};
pub use shader::{
    compile_capture_program, compile_program, compile_shader, format_shader_error,
    link_capture_program, link_program,
};
pub use target::RenderTarget;
pub use texture::{checker_pixels, create_texture, TextureConfig};
