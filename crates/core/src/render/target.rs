//! Render target (FBO + texture + depth renderbuffer) for off-screen
//! rendering.
//!
//! A `RenderTarget` pairs a framebuffer object with an RGBA8 color
//! attachment and a DEPTH_COMPONENT24 depth renderbuffer. The rotating
//! scene pass draws into one of these; the composite pass then samples
//! its color texture onto the canvas.

use super::texture::{create_texture, TextureConfig};
use crate::error::PipelineError;

/// An off-screen render target: a framebuffer object, its RGBA8 color
/// texture, and a depth renderbuffer.
///
/// The color attachment is a texture (so later passes can sample it)
/// while the depth attachment is a renderbuffer (depth is only tested,
/// never sampled).
pub struct RenderTarget {
    fbo: glow::Framebuffer,
    texture: glow::Texture,
    depth: glow::Renderbuffer,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Creates a new render target at the given dimensions.
    ///
    /// Creates a framebuffer, attaches a fresh RGBA8 texture as
    /// `COLOR_ATTACHMENT0` and a DEPTH_COMPONENT24 renderbuffer as
    /// `DEPTH_ATTACHMENT`, and verifies framebuffer completeness.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::BufferAllocationFailed` if any attachment
    /// cannot be created or the framebuffer is not complete.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, width: u32, height: u32) -> Result<Self, PipelineError> {
        use glow::HasContext;

        let config = TextureConfig::rgba8(width, height);
        let texture = create_texture(gl, &config, None)?;

        // SAFETY: glow wraps raw GL calls as unsafe. We create, configure,
        // and verify framebuffer attachments using valid handles, deleting
        // everything on each error path.
        let depth = unsafe {
            match gl.create_renderbuffer() {
                Ok(rbo) => rbo,
                Err(e) => {
                    gl.delete_texture(texture);
                    return Err(PipelineError::BufferAllocationFailed(e));
                }
            }
        };

        unsafe {
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::DEPTH_COMPONENT24,
                width as i32,
                height as i32,
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }

        let fbo = unsafe {
            match gl.create_framebuffer() {
                Ok(fbo) => fbo,
                Err(e) => {
                    gl.delete_renderbuffer(depth);
                    gl.delete_texture(texture);
                    return Err(PipelineError::BufferAllocationFailed(e));
                }
            }
        };

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.delete_framebuffer(fbo);
                gl.delete_renderbuffer(depth);
                gl.delete_texture(texture);
                return Err(PipelineError::BufferAllocationFailed(format!(
                    "framebuffer incomplete: status 0x{status:04X}"
                )));
            }
        }

        Ok(Self {
            fbo,
            texture,
            depth,
            width,
            height,
        })
    }

    /// Binds this render target's framebuffer as the active draw target
    /// and sets the viewport to match the texture dimensions.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid framebuffer handle created in new().
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    /// Returns the color texture handle for sampling this render target.
    pub fn texture(&self) -> glow::Texture {
        self.texture
    }

    /// Returns the width of this render target in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this render target in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deletes the framebuffer, texture, and depth renderbuffer,
    /// releasing GPU resources.
    ///
    /// Must be called before dropping the `RenderTarget` if you want
    /// deterministic cleanup. The GL context does not have a destructor
    /// that cleans up individual objects.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: all three handles are valid, created in new().
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_renderbuffer(self.depth);
            gl.delete_texture(self.texture);
        }
    }
}
