//! GPU context wrapper with capability detection.
//!
//! `GlContext` wraps a `glow::Context` and queries the transform-feedback
//! limits at initialization. The capture pass writes one `vec3` varying
//! into a separate buffer binding, so the context must report at least
//! one separate attrib and three separate components.

use crate::error::PipelineError;

/// Wraps a `glow::Context` with detected transform-feedback limits.
///
/// Created once at initialization. A context that cannot capture a single
/// three-component varying is rejected up front, so the passes never have
/// to re-check.
pub struct GlContext {
    gl: glow::Context,
    max_separate_attribs: i32,
    max_separate_components: i32,
}

impl GlContext {
    /// Creates a new `GlContext` by wrapping the given GL context and
    /// querying its transform-feedback limits.
    ///
    /// Any conforming WebGL2 / ES 3.0 context reports at least 4 separate
    /// attribs and 4 components per attrib; a context answering below the
    /// capture pass's needs (1 attrib, 3 components) is either broken or
    /// not actually ES 3.0 class.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::ContextUnavailable` naming the failing
    /// limit when the context cannot support the capture pass.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, PipelineError> {
        use glow::HasContext;

        // SAFETY: glow wraps raw GL calls as unsafe. Querying integer
        // limits with valid pname constants has no preconditions.
        let (max_separate_attribs, max_separate_components) = unsafe {
            (
                gl.get_parameter_i32(glow::MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS),
                gl.get_parameter_i32(glow::MAX_TRANSFORM_FEEDBACK_SEPARATE_COMPONENTS),
            )
        };

        if max_separate_attribs < 1 {
            return Err(PipelineError::ContextUnavailable(format!(
                "context reports {max_separate_attribs} transform feedback separate attribs, need 1"
            )));
        }
        if max_separate_components < 3 {
            return Err(PipelineError::ContextUnavailable(format!(
                "context reports {max_separate_components} transform feedback separate components, need 3"
            )));
        }

        log::debug!(
            "transform feedback limits: {max_separate_attribs} separate attribs, \
             {max_separate_components} components"
        );

        Ok(Self {
            gl,
            max_separate_attribs,
            max_separate_components,
        })
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consumes this wrapper and returns the underlying `glow::Context`.
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }

    /// The context's `MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS`.
    pub fn max_separate_attribs(&self) -> i32 {
        self.max_separate_attribs
    }

    /// The context's `MAX_TRANSFORM_FEEDBACK_SEPARATE_COMPONENTS`.
    pub fn max_separate_components(&self) -> i32 {
        self.max_separate_components
    }
}
