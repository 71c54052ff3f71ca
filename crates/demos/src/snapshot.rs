//! CPU-side PNG snapshots of a demo's point positions.
//!
//! This module is feature-gated behind `png` (default on) so that WASM
//! builds can depend on the `demos` crate without pulling in the `image`
//! crate. The pixel buffer conversion itself lives in [`crate::raster`]
//! (always available).

use glam::Vec3;
use pointstep_core::error::PipelineError;
use std::path::Path;

use crate::raster::rasterize;

/// Writes clip-space positions as a PNG image over the given clear color.
///
/// # Errors
///
/// Returns `PipelineError::InvalidRecipe` if a dimension overflows `u32`,
/// or `PipelineError::Io` on encode or write failure.
pub fn write_png(
    positions: &[Vec3],
    width: usize,
    height: usize,
    clear_color: [f32; 4],
    path: &Path,
) -> Result<(), PipelineError> {
    let w = u32::try_from(width)
        .map_err(|_| PipelineError::InvalidRecipe(format!("raster width {width} exceeds u32")))?;
    let h = u32::try_from(height)
        .map_err(|_| PipelineError::InvalidRecipe(format!("raster height {height} exceeds u32")))?;
    let rgba = rasterize(positions, width, height, clear_color);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| PipelineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| PipelineError::Io(e.to_string()))
}
