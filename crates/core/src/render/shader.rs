//! Shader compilation and linking helpers for WebGL2 / OpenGL.
//!
//! Provides source formatting for debugging and functions to compile
//! individual shader stages and link them into programs. A feedback
//! program needs its captured varyings registered *before* linking, so
//! linking comes in two flavors: [`link_program`] for plain draw programs
//! and [`link_capture_program`] for transform-feedback programs. The
//! compilation/linking functions require a `glow::Context` and are only
//! usable with a live GPU context; the formatting utility is pure string
//! processing.

use crate::error::PipelineError;

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. This makes it easy to correlate
/// error messages (which reference line numbers) with the actual GLSL.
///
/// Both `source` and `log` may be empty; the function handles all
/// combinations gracefully.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = if source.is_empty() {
        Vec::new()
    } else {
        source.lines().collect()
    };

    let line_count = source_lines.len();
    let width = if line_count == 0 {
        1
    } else {
        line_count.to_string().len()
    };

    let numbered: String = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// Requires a live `glow::Context`. Returns the compiled shader handle
/// or a `ShaderCompileFailed` carrying the numbered source and the
/// driver's info log.
///
/// # Errors
///
/// Returns `PipelineError::ShaderCompileFailed` if the GLSL source fails
/// to compile.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, PipelineError> {
    use glow::HasContext;

    let stage_name = match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    };

    // SAFETY: glow wraps raw GL calls as unsafe. We pass valid shader_type
    // constants and valid source strings. Resource cleanup is handled on
    // all error paths.
    let shader = unsafe {
        gl.create_shader(shader_type)
            .map_err(|e| PipelineError::ShaderCompileFailed {
                stage: stage_name.to_string(),
                log: e,
            })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    let compiled = unsafe { gl.get_shader_compile_status(shader) };

    if compiled {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(PipelineError::ShaderCompileFailed {
            stage: stage_name.to_string(),
            log: format_shader_error(source, &info_log),
        })
    }
}

/// Links a vertex and fragment shader into a plain draw program.
///
/// Requires a live `glow::Context`. Attaches both shaders, links, and
/// detaches them afterward (the program retains its own copies).
///
/// # Errors
///
/// Returns `PipelineError::ProgramLinkFailed` if linking fails.
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, PipelineError> {
    link_configured(gl, vertex, fragment, None)
}

/// Links a vertex and fragment shader into a transform-feedback program,
/// capturing the named varyings into separate buffer binding points.
///
/// The varyings must be registered before the link, so this cannot be
/// retrofitted onto an already linked program.
///
/// # Errors
///
/// Returns `PipelineError::ProgramLinkFailed` if linking fails — including
/// the case where a named varying does not exist in the vertex stage.
pub fn link_capture_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
    varyings: &[&str],
) -> Result<glow::Program, PipelineError> {
    link_configured(gl, vertex, fragment, Some(varyings))
}

#[allow(unsafe_code)]
fn link_configured(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
    varyings: Option<&[&str]>,
) -> Result<glow::Program, PipelineError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. We pass valid shader/program
    // handles obtained from prior glow calls. Resources are cleaned up on error.
    let program = unsafe { gl.create_program().map_err(PipelineError::ProgramLinkFailed)? };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);

        // Capture registration has to precede the link.
        if let Some(varyings) = varyings {
            gl.transform_feedback_varyings(program, varyings, glow::SEPARATE_ATTRIBS);
        }

        gl.link_program(program);

        // Detach shaders regardless of link success -- the program owns copies.
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
    }

    let linked = unsafe { gl.get_program_link_status(program) };

    if linked {
        Ok(program)
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(PipelineError::ProgramLinkFailed(info_log))
    }
}

/// Compiles vertex and fragment sources and links them into a plain
/// draw program.
///
/// This is a convenience wrapper around [`compile_shader`] and
/// [`link_program`]. Shader handles are cleaned up after linking
/// regardless of success or failure.
///
/// # Errors
///
/// Returns `PipelineError::ShaderCompileFailed` if either shader fails to
/// compile, or `PipelineError::ProgramLinkFailed` if linking fails.
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, PipelineError> {
    compile_configured(gl, vertex_src, fragment_src, None)
}

/// Compiles vertex and fragment sources and links them into a
/// transform-feedback program capturing `varyings`.
///
/// # Errors
///
/// Same as [`compile_program`].
pub fn compile_capture_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
    varyings: &[&str],
) -> Result<glow::Program, PipelineError> {
    compile_configured(gl, vertex_src, fragment_src, Some(varyings))
}

#[allow(unsafe_code)]
fn compile_configured(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
    varyings: Option<&[&str]>,
) -> Result<glow::Program, PipelineError> {
    use glow::HasContext;

    let vert = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
    let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid shader handle from a successful compile_shader call.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    let result = link_configured(gl, vert, frag, varyings);

    // SAFETY: vert and frag are valid shader handles. The linked program
    // retains its own copies, so deleting these is correct.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}
