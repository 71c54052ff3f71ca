//! GLSL sources for the feedback, draw, and render-to-texture passes.
//!
//! All programs share one convention: the per-vertex position attribute
//! lives at location 0 (`layout(location = 0)` in the sources, matched by
//! [`POSITION_LOCATION`] on the API side), so a single VAO layout serves
//! every pass. The feedback vertex shader writes no `gl_Position` at all;
//! it runs with rasterization discarded and exists only to produce the
//! captured varying.

/// Attribute location every vertex shader reads positions from.
pub const POSITION_LOCATION: u32 = 0;

/// Uniform name for the per-frame x translation in the feedback program.
pub const TRANSLATION_UNIFORM: &str = "u_translation";

/// Uniform name for the per-frame rotation matrix in the scene program.
pub const ROTATION_UNIFORM: &str = "u_rotation";

/// Sampler uniform names in the composite program: the offscreen scene
/// texture and the tiled pattern texture.
pub const SCENE_SAMPLER: &str = "u_scene";
pub const PATTERN_SAMPLER: &str = "u_pattern";

/// Varyings captured by the feedback program, in buffer binding order.
///
/// Must be passed to
/// [`compile_capture_program`](super::shader::compile_capture_program)
/// when building [`FEEDBACK_VERTEX_SHADER`]; the single entry lands in
/// transform-feedback binding point 0.
pub const CAPTURED_VARYINGS: &[&str] = &["v_next_position"];

/// GLSL ES 3.0 vertex shader for the feedback pass.
///
/// Shifts each point along x by the `u_translation` uniform and emits the
/// result as the captured varying `v_next_position`. Runs under
/// `RASTERIZER_DISCARD`, so it deliberately writes no `gl_Position`.
pub const FEEDBACK_VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 position;
uniform float u_translation;
out vec3 v_next_position;
void main() {
    v_next_position = position + vec3(u_translation, 0.0, 0.0);
}
"#;

/// Fragment stage paired with [`FEEDBACK_VERTEX_SHADER`].
///
/// Never executes (rasterization is discarded during capture), but ES 3.0
/// refuses to link a program without one.
pub const FEEDBACK_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
out vec4 color;
void main() {
    color = vec4(0.0);
}
"#;

/// GLSL ES 3.0 vertex shader for the visible draw pass.
///
/// Passes clip-space positions straight through; all motion happened on
/// the feedback pass.
pub const DRAW_VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 position;
void main() {
    gl_Position = vec4(position, 1.0);
}
"#;

/// Fragment stage for the visible draw pass: flat warm yellow.
pub const DRAW_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
out vec4 color;
void main() {
    color = vec4(1.0, 1.0, 0.66, 1.0);
}
"#;

/// GLSL ES 3.0 vertex shader for the rotating scene pass.
///
/// Applies the `u_rotation` matrix picked on the host for this frame.
pub const SCENE_VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 position;
uniform mat4 u_rotation;
void main() {
    gl_Position = u_rotation * vec4(position, 1.0);
}
"#;

/// Fragment stage for the rotating scene pass.
pub const SCENE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
out vec4 color;
void main() {
    color = vec4(1.0, 1.0, 0.66, 1.0);
}
"#;

/// GLSL ES 3.0 vertex shader for the composite (blit) pass.
///
/// Generates a fullscreen triangle and UVs from `gl_VertexID` alone -- no
/// vertex buffer is needed. Draw with `draw_arrays(TRIANGLES, 0, 3)` and
/// an empty VAO bound; the GPU clips the 2x-oversized triangle for free.
pub const BLIT_VERTEX_SHADER: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    v_uv = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    gl_Position = vec4(v_uv * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Fragment stage for the composite pass.
///
/// Mixes the offscreen scene texture with a tiled pattern texture; the
/// `* 4.0` UV scale pushes the pattern lookup outside [0, 1] so the
/// sampler's wrap mode is actually exercised.
pub const BLIT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
uniform sampler2D u_scene;
uniform sampler2D u_pattern;
out vec4 color;
void main() {
    color = mix(texture(u_scene, v_uv), texture(u_pattern, v_uv * 4.0), 0.35);
}
"#;
