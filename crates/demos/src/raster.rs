//! Pure-computation rasterization of clip-space positions into an RGBA8
//! pixel buffer.
//!
//! This module is always available (no feature gate) so that both the `png`
//! snapshot path and the WASM `ImageData` path can share the same
//! conversion.

use glam::Vec3;

/// The color every demo draws its points in, as RGBA8. This is the flat
/// warm yellow of the draw pass's fragment stage, `(1.0, 1.0, 0.66, 1.0)`,
/// converted to bytes.
pub const DOT_COLOR: [u8; 4] = [255, 255, 168, 255];

/// Half-extent of the square stamped per point, in pixels. 1 gives the
/// 3x3 dot.
const DOT_REACH: i64 = 1;

/// Converts a normalized clear color to its RGBA8 background pixel.
pub fn background_pixel(clear_color: [f32; 4]) -> [u8; 4] {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        byte(clear_color[0]),
        byte(clear_color[1]),
        byte(clear_color[2]),
        byte(clear_color[3]),
    ]
}

/// Rasterizes clip-space positions into a `width * height * 4` RGBA8
/// buffer.
///
/// The buffer is row-major with row 0 at the top. Clip space has +y up,
/// so y = 1 lands on row 0 and y = -1 on the bottom row. Every point
/// inside the [-1, 1] cube stamps a 3x3 dot of [`DOT_COLOR`]; points
/// outside are skipped entirely, the same way the GPU would clip them.
/// The background is `clear_color`.
pub fn rasterize(
    positions: &[Vec3],
    width: usize,
    height: usize,
    clear_color: [f32; 4],
) -> Vec<u8> {
    let background = background_pixel(clear_color);
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        pixels.extend_from_slice(&background);
    }

    for position in positions {
        if position.x.abs() > 1.0 || position.y.abs() > 1.0 || position.z.abs() > 1.0 {
            continue;
        }
        let (col, row) = clip_to_pixel(*position, width, height);
        stamp_dot(&mut pixels, width, height, col, row);
    }

    pixels
}

/// Maps a clip-space position to (column, row) pixel coordinates.
fn clip_to_pixel(position: Vec3, width: usize, height: usize) -> (i64, i64) {
    let col = ((position.x + 1.0) * 0.5 * (width.saturating_sub(1)) as f32).round() as i64;
    let row = ((1.0 - position.y) * 0.5 * (height.saturating_sub(1)) as f32).round() as i64;
    (col, row)
}

/// Stamps a dot centered on (col, row), clipped to the image bounds.
fn stamp_dot(pixels: &mut [u8], width: usize, height: usize, col: i64, row: i64) {
    for dy in -DOT_REACH..=DOT_REACH {
        for dx in -DOT_REACH..=DOT_REACH {
            let x = col + dx;
            let y = row + dy;
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                continue;
            }
            let offset = (y as usize * width + x as usize) * 4;
            pixels[offset..offset + 4].copy_from_slice(&DOT_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointstep_core::DEFAULT_CLEAR_COLOR;

    /// The default clear color as bytes: light sky blue.
    const SKY: [u8; 4] = [153, 204, 255, 255];

    fn pixel(buffer: &[u8], width: usize, col: usize, row: usize) -> &[u8] {
        let offset = (row * width + col) * 4;
        &buffer[offset..offset + 4]
    }

    fn dot_count(buffer: &[u8]) -> usize {
        buffer.chunks_exact(4).filter(|px| *px == DOT_COLOR).count()
    }

    #[test]
    fn rasterize_correct_length() {
        let buf = rasterize(&[], 8, 4, DEFAULT_CLEAR_COLOR);
        assert_eq!(buf.len(), 8 * 4 * 4);
    }

    #[test]
    fn empty_positions_give_pure_background() {
        let buf = rasterize(&[], 16, 16, DEFAULT_CLEAR_COLOR);
        assert!(
            buf.chunks_exact(4).all(|px| px == SKY),
            "expected only background pixels"
        );
    }

    #[test]
    fn background_matches_the_clear_color() {
        assert_eq!(background_pixel(DEFAULT_CLEAR_COLOR), SKY);
        assert_eq!(background_pixel([0.0, 0.0, 0.0, 1.0]), [0, 0, 0, 255]);
        assert_eq!(
            background_pixel([1.0, 1.0, 1.0, 1.0]),
            [255, 255, 255, 255]
        );
    }

    #[test]
    fn origin_point_stamps_the_image_center() {
        // 9x9 with odd dimensions puts the origin exactly on pixel (4, 4).
        let buf = rasterize(&[Vec3::ZERO], 9, 9, DEFAULT_CLEAR_COLOR);
        for row in 3..=5 {
            for col in 3..=5 {
                assert_eq!(
                    pixel(&buf, 9, col, row),
                    DOT_COLOR,
                    "expected dot at ({col}, {row})"
                );
            }
        }
        assert_eq!(dot_count(&buf), 9, "the dot must be exactly 3x3");
    }

    #[test]
    fn clip_y_up_lands_on_row_zero() {
        // y = 1 is the top of clip space and must hit the top image row.
        let buf = rasterize(&[Vec3::new(0.0, 1.0, 0.0)], 9, 9, DEFAULT_CLEAR_COLOR);
        assert_eq!(pixel(&buf, 9, 4, 0), DOT_COLOR, "expected dot on row 0");
        assert_eq!(
            pixel(&buf, 9, 4, 8),
            SKY,
            "the bottom row must stay background"
        );
    }

    #[test]
    fn clip_y_down_lands_on_the_bottom_row() {
        let buf = rasterize(&[Vec3::new(0.0, -1.0, 0.0)], 9, 9, DEFAULT_CLEAR_COLOR);
        assert_eq!(pixel(&buf, 9, 4, 8), DOT_COLOR, "expected dot on row 8");
        assert_eq!(pixel(&buf, 9, 4, 0), SKY, "the top row must stay background");
    }

    #[test]
    fn out_of_range_points_leave_only_background() {
        let strays = [
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        let buf = rasterize(&strays, 16, 16, DEFAULT_CLEAR_COLOR);
        assert_eq!(dot_count(&buf), 0, "clipped points must not stamp");
    }

    #[test]
    fn corner_dot_is_clipped_to_the_image_bounds() {
        // (-1, -1) maps to the bottom-left pixel; only the in-bounds 2x2
        // quarter of the dot survives.
        let buf = rasterize(&[Vec3::new(-1.0, -1.0, 0.0)], 9, 9, DEFAULT_CLEAR_COLOR);
        assert_eq!(dot_count(&buf), 4);
        assert_eq!(pixel(&buf, 9, 0, 8), DOT_COLOR);
        assert_eq!(pixel(&buf, 9, 1, 7), DOT_COLOR);
    }

    #[test]
    fn overlapping_dots_merge() {
        // Two points on the same spot stamp the same nine pixels.
        let twice = [Vec3::ZERO, Vec3::ZERO];
        let buf = rasterize(&twice, 9, 9, DEFAULT_CLEAR_COLOR);
        assert_eq!(dot_count(&buf), 9);
    }

    #[test]
    fn the_triangle_fixture_stamps_three_dots() {
        let buf = rasterize(
            &pointstep_feedback::TRIANGLE_POSITIONS,
            64,
            64,
            DEFAULT_CLEAR_COLOR,
        );
        assert_eq!(dot_count(&buf), 3 * 9, "three separated 3x3 dots expected");
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn buffer_length_is_always_width_height_4(
                width in 1_usize..32,
                height in 1_usize..32,
                x in -2.0_f32..2.0,
                y in -2.0_f32..2.0,
            ) {
                let buf = rasterize(
                    &[Vec3::new(x, y, 0.0)],
                    width,
                    height,
                    DEFAULT_CLEAR_COLOR,
                );
                prop_assert_eq!(buf.len(), width * height * 4);
            }

            #[test]
            fn in_range_point_always_stamps_between_4_and_9_pixels(
                x in -1.0_f32..=1.0,
                y in -1.0_f32..=1.0,
            ) {
                // On an image at least 3 pixels wide the clipped dot keeps
                // at least a 2x2 corner.
                let buf = rasterize(&[Vec3::new(x, y, 0.0)], 16, 16, DEFAULT_CLEAR_COLOR);
                let dots = dot_count(&buf);
                prop_assert!(
                    (4..=9).contains(&dots),
                    "a single point stamped {} pixels",
                    dots
                );
            }
        }
    }
}
