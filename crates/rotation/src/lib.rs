#![deny(unsafe_code)]
//! Precomputed-rotation demo: a triangle spun clockwise about z.
//!
//! All 360 one-degree rotation matrices are built once up front; each
//! frame just advances an index into the table and re-transforms the
//! base triangle. On the GPU the whole table is uploaded as a mat4
//! uniform array once and the per-frame traffic is a single integer —
//! the point of the exercise. The host-side demo mirrors that scheme so
//! positions can be checked without a context.

use glam::{Mat4, Vec3};
use pointstep_core::params::param_usize;
use pointstep_core::{Demo, PipelineError};
use serde_json::{json, Value};

/// Number of precomputed rotation steps in a full turn (one per degree).
pub const MATRIX_COUNT: usize = 360;
/// Default per-frame index advance, in degrees.
const DEFAULT_INCREMENT: usize = 1;

/// The base triangle the rotation is applied to.
pub const BASE_POSITIONS: [Vec3; 3] = [
    Vec3::new(-0.4, -0.4, 0.0),
    Vec3::new(0.4, -0.4, 0.0),
    Vec3::new(0.0, 0.7, 0.0),
];

/// Builds the full table of clockwise z rotations, one per degree.
///
/// Index `i` holds the rotation by `-i` degrees; index 0 is the
/// identity.
fn rotation_table() -> Vec<Mat4> {
    (0..MATRIX_COUNT)
        .map(|i| Mat4::from_rotation_z(-(i as f32).to_radians()))
        .collect()
}

/// The rotating-triangle demo.
///
/// Positions are recomputed from the base triangle every frame, never
/// accumulated, so a full turn lands back on the base exactly.
pub struct RotationDemo {
    matrices: Vec<Mat4>,
    positions: Vec<Vec3>,
    index: usize,
    increment: usize,
}

impl RotationDemo {
    /// Creates the demo advancing `increment` degrees per frame.
    ///
    /// The increment is normalized modulo a full turn, so 360 behaves
    /// like 0 (a frozen triangle).
    pub fn new(increment: usize) -> Self {
        Self {
            matrices: rotation_table(),
            positions: BASE_POSITIONS.to_vec(),
            index: 0,
            increment: increment % MATRIX_COUNT,
        }
    }

    /// Creates the demo from loose JSON params.
    ///
    /// The only recognized key is `increment` (degrees per frame,
    /// default 1).
    pub fn from_json(params: &Value) -> Self {
        Self::new(param_usize(params, "increment", DEFAULT_INCREMENT))
    }

    /// The rotation matrix for the current frame. This is what a GPU
    /// embedding uploads (by index) as the scene pass's uniform.
    pub fn matrix(&self) -> Mat4 {
        self.matrices[self.index]
    }

    /// Current index into the rotation table, in degrees.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for RotationDemo {
    fn default() -> Self {
        Self::new(DEFAULT_INCREMENT)
    }
}

impl Demo for RotationDemo {
    fn advance(&mut self) -> Result<(), PipelineError> {
        self.index = (self.index + self.increment) % MATRIX_COUNT;
        let matrix = self.matrices[self.index];
        for (out, base) in self.positions.iter_mut().zip(BASE_POSITIONS) {
            *out = matrix.transform_point3(base);
        }
        Ok(())
    }

    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn params(&self) -> Value {
        json!({ "increment": self.increment })
    }

    fn param_schema(&self) -> Value {
        json!({
            "increment": {
                "type": "integer",
                "default": DEFAULT_INCREMENT,
                "description": "Degrees to advance per frame (0 freezes the triangle)"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance_n(demo: &mut RotationDemo, n: usize) {
        for _ in 0..n {
            demo.advance().unwrap();
        }
    }

    // ---- Construction ----

    #[test]
    fn fresh_demo_shows_the_base_triangle() {
        let demo = RotationDemo::default();
        assert_eq!(demo.positions(), &BASE_POSITIONS);
        assert_eq!(demo.index(), 0);
    }

    #[test]
    fn index_zero_matrix_is_the_identity() {
        let demo = RotationDemo::default();
        assert_eq!(demo.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn from_json_reads_the_increment() {
        let demo = RotationDemo::from_json(&json!({"increment": 15}));
        assert_eq!(demo.params()["increment"], 15);
    }

    #[test]
    fn increment_normalizes_a_full_turn_to_zero() {
        let demo = RotationDemo::new(360);
        assert_eq!(demo.params()["increment"], 0);
    }

    // ---- Rotation direction and wrap ----

    #[test]
    fn quarter_turn_swings_the_top_vertex_to_positive_x() {
        let mut demo = RotationDemo::default();
        advance_n(&mut demo, 90);

        // Clockwise: the +y apex rotates toward +x.
        let apex = demo.positions()[2];
        assert!(
            (apex.x - 0.7).abs() < 1e-5 && apex.y.abs() < 1e-5,
            "expected apex near (0.7, 0), got {apex}"
        );
    }

    #[test]
    fn full_turn_returns_exactly_to_the_base() {
        let mut demo = RotationDemo::default();
        advance_n(&mut demo, 360);

        // Index arithmetic wraps to 0 and positions are recomputed from
        // the base through the identity, so this is exact.
        assert_eq!(demo.index(), 0);
        assert_eq!(demo.positions(), &BASE_POSITIONS);
    }

    #[test]
    fn zero_increment_freezes_the_triangle() {
        let mut demo = RotationDemo::new(0);
        advance_n(&mut demo, 10);
        assert_eq!(demo.positions(), &BASE_POSITIONS);
    }

    #[test]
    fn coarse_increment_completes_a_turn_in_fewer_frames() {
        let mut demo = RotationDemo::new(45);
        advance_n(&mut demo, 8);
        assert_eq!(demo.index(), 0);
        assert_eq!(demo.positions(), &BASE_POSITIONS);
    }

    #[test]
    fn matrix_accessor_tracks_the_index() {
        let mut demo = RotationDemo::new(30);
        demo.advance().unwrap();
        assert_eq!(demo.index(), 30);
        assert_eq!(demo.matrix(), Mat4::from_rotation_z(-30.0_f32.to_radians()));
    }

    #[test]
    fn param_schema_documents_the_increment() {
        let demo = RotationDemo::default();
        let schema = demo.param_schema();
        assert_eq!(schema["increment"]["type"], "integer");
    }

    #[test]
    fn demo_works_as_a_trait_object() {
        let mut demo: Box<dyn Demo> = Box::new(RotationDemo::default());
        demo.advance().unwrap();
        assert_eq!(demo.positions().len(), 3);
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn index_is_steps_times_increment_mod_turn(
                increment in 0_usize..720,
                steps in 0_usize..100,
            ) {
                let mut demo = RotationDemo::new(increment);
                advance_n(&mut demo, steps);
                prop_assert_eq!(demo.index(), (steps * (increment % 360)) % 360);
            }

            #[test]
            fn rotation_preserves_each_vertex_length(steps in 0_usize..360) {
                let mut demo = RotationDemo::default();
                advance_n(&mut demo, steps);
                for (rotated, base) in demo.positions().iter().zip(BASE_POSITIONS) {
                    prop_assert!(
                        (rotated.length() - base.length()).abs() < 1e-5,
                        "rotation changed a vertex length at step {steps}"
                    );
                }
            }
        }
    }
}
