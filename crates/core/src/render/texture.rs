//! Texture creation helpers for WebGL2 / OpenGL.
//!
//! Provides `TextureConfig` for specifying texture parameters,
//! `create_texture` for allocating GPU textures, and the pure
//! `checker_pixels` generator for the tiled pattern texture. Everything
//! here is RGBA8: the offscreen scene target and the pattern texture both
//! use byte pixels, sampled with NEAREST so the texel grid stays crisp.

use crate::error::PipelineError;

/// Configuration for creating an RGBA8 GPU texture.
///
/// Stores dimensions, filter mode, and per-axis wrap modes. Use
/// [`TextureConfig::rgba8`] for the common NEAREST + REPEAT case and a
/// struct literal when an axis needs `MIRRORED_REPEAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// GL texture filter mode (e.g. `glow::NEAREST`), used for both
    /// minification and magnification.
    pub filter: u32,
    /// Wrap mode along s (e.g. `glow::REPEAT`).
    pub wrap_s: u32,
    /// Wrap mode along t.
    pub wrap_t: u32,
}

impl TextureConfig {
    /// Creates a config for an RGBA8 texture with NEAREST filtering and
    /// REPEAT wrapping on both axes.
    ///
    /// NEAREST keeps the pattern texels as hard squares when the composite
    /// pass magnifies them; REPEAT lets UV lookups outside [0, 1] tile.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: glow::NEAREST,
            wrap_s: glow::REPEAT,
            wrap_t: glow::REPEAT,
        }
    }
}

/// Generates RGBA8 pixels for a `width` x `height` checkerboard.
///
/// Cells where `(x + y)` is even get the `even` color, the rest get
/// `odd`. Rows start at the top; the returned vector is row-major,
/// `width * height * 4` bytes.
pub fn checker_pixels(width: u32, height: u32, even: [u8; 4], odd: [u8; 4]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let color = if (x + y) % 2 == 0 { even } else { odd };
            pixels.extend_from_slice(&color);
        }
    }
    pixels
}

/// Creates an RGBA8 GPU texture from the given configuration.
///
/// Applies the configured wrap modes and filter, then allocates storage
/// at the given size — uploading `pixels` if provided, or leaving the
/// storage uninitialized (`None`) for render-target use.
///
/// # Errors
///
/// Returns `PipelineError::BufferAllocationFailed` if the GL context
/// fails to create the texture, or if `pixels` is present with a length
/// other than `width * height * 4`.
#[allow(unsafe_code)]
pub fn create_texture(
    gl: &glow::Context,
    config: &TextureConfig,
    pixels: Option<&[u8]>,
) -> Result<glow::Texture, PipelineError> {
    use glow::HasContext;

    if let Some(data) = pixels {
        let expected = (config.width * config.height * 4) as usize;
        if data.len() != expected {
            return Err(PipelineError::BufferAllocationFailed(format!(
                "texture upload of {} bytes does not match {}x{} RGBA8 ({expected} bytes)",
                data.len(),
                config.width,
                config.height
            )));
        }
    }

    // SAFETY: glow wraps raw GL calls as unsafe. We create, configure,
    // and allocate a texture using valid parameters derived from
    // TextureConfig, with the upload length checked above.
    let texture = unsafe {
        gl.create_texture()
            .map_err(PipelineError::BufferAllocationFailed)?
    };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, config.wrap_s as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, config.wrap_t as i32);
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            config.filter as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            config.filter as i32,
        );

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            config.width as i32,
            config.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(pixels),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLUE: [u8; 4] = [40, 40, 200, 255];

    #[test]
    fn rgba8_sets_correct_dimensions() {
        let config = TextureConfig::rgba8(1024, 768);
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
    }

    #[test]
    fn rgba8_uses_nearest_filter_and_repeat_wrap() {
        let config = TextureConfig::rgba8(512, 512);
        assert_eq!(config.filter, glow::NEAREST, "expected NEAREST filter");
        assert_eq!(config.wrap_s, glow::REPEAT, "expected REPEAT on s");
        assert_eq!(config.wrap_t, glow::REPEAT, "expected REPEAT on t");
    }

    #[test]
    fn texture_config_supports_mirrored_wrap() {
        let config = TextureConfig {
            wrap_t: glow::MIRRORED_REPEAT,
            ..TextureConfig::rgba8(64, 64)
        };
        assert_eq!(config.wrap_s, glow::REPEAT);
        assert_eq!(config.wrap_t, glow::MIRRORED_REPEAT);
    }

    #[test]
    fn texture_config_is_copy_and_clone() {
        let config = TextureConfig::rgba8(128, 128);
        let copy = config;
        let clone = config.clone();
        assert_eq!(config, copy);
        assert_eq!(config, clone);
    }

    // --- checker_pixels tests ---

    #[test]
    fn checker_pixels_length_matches_dimensions() {
        let pixels = checker_pixels(5, 4, WHITE, BLUE);
        assert_eq!(pixels.len(), 5 * 4 * 4);
    }

    #[test]
    fn checker_pixels_alternates_within_a_row() {
        let pixels = checker_pixels(4, 1, WHITE, BLUE);
        assert_eq!(&pixels[0..4], &WHITE, "(0,0) should be the even color");
        assert_eq!(&pixels[4..8], &BLUE, "(1,0) should be the odd color");
        assert_eq!(&pixels[8..12], &WHITE);
        assert_eq!(&pixels[12..16], &BLUE);
    }

    #[test]
    fn checker_pixels_offsets_alternate_rows() {
        let pixels = checker_pixels(2, 2, WHITE, BLUE);
        // Row 0: even, odd. Row 1: odd, even.
        assert_eq!(&pixels[0..4], &WHITE);
        assert_eq!(&pixels[4..8], &BLUE);
        assert_eq!(&pixels[8..12], &BLUE);
        assert_eq!(&pixels[12..16], &WHITE);
    }

    #[test]
    fn checker_pixels_handles_empty_dimensions() {
        assert!(checker_pixels(0, 3, WHITE, BLUE).is_empty());
        assert!(checker_pixels(3, 0, WHITE, BLUE).is_empty());
    }

    #[test]
    fn texture_config_debug_format_is_readable() {
        let config = TextureConfig::rgba8(100, 200);
        let debug = format!("{config:?}");
        assert!(debug.contains("100"), "missing width in debug: {debug}");
        assert!(debug.contains("200"), "missing height in debug: {debug}");
    }

    // --- GL-dependent paths ---

    #[test]
    #[ignore = "requires GL context"]
    fn create_texture_uploads_checker_pixels() {
        // Would test: create_texture with checker_pixels data succeeds and
        // the texture samples back the two colors.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn create_texture_rejects_short_pixel_slice() {
        // Would test: a 3-byte upload for a 2x2 texture yields
        // BufferAllocationFailed before any GL call.
    }
}
