//! The core `Demo` trait that every point-cloud demo must implement.
//!
//! The trait is object-safe so demos can be used as `dyn Demo` for runtime
//! switching between the registered scenes.

use crate::error::PipelineError;
use glam::Vec3;
use serde_json::Value;

/// Background color shared by the demos: the classic light sky blue.
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.6, 0.8, 1.0, 1.0];

/// Core trait for frame-driven point-cloud demos.
///
/// Each demo advances some notion of per-frame motion and exposes the
/// current vertex positions in clip space, which the host then draws or
/// rasterizes to pixels.
///
/// This trait is **object-safe**: you can use `Box<dyn Demo>` or `&dyn Demo`
/// for runtime polymorphism.
pub trait Demo {
    /// Advance the demo by one frame.
    ///
    /// Returns `Ok(())` on success, or a `PipelineError` if the frame
    /// fails (e.g. a feedback or draw pass reported a device error).
    /// After an error the demo is stopped; further calls return the same
    /// error without doing any work.
    fn advance(&mut self) -> Result<(), PipelineError>;

    /// The current vertex positions in clip space.
    fn positions(&self) -> &[Vec3];

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// Background color used when rasterizing or drawing this demo.
    ///
    /// Defaults to [`DEFAULT_CLEAR_COLOR`].
    fn clear_color(&self) -> [f32; 4] {
        DEFAULT_CLEAR_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal demo implementation used to verify trait object safety.
    struct MockDemo {
        positions: Vec<Vec3>,
        frame_count: usize,
    }

    impl MockDemo {
        fn new() -> Self {
            Self {
                positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                frame_count: 0,
            }
        }
    }

    impl Demo for MockDemo {
        fn advance(&mut self) -> Result<(), PipelineError> {
            self.frame_count += 1;
            Ok(())
        }

        fn positions(&self) -> &[Vec3] {
            &self.positions
        }

        fn params(&self) -> Value {
            json!({"frame_count": self.frame_count})
        }

        fn param_schema(&self) -> Value {
            json!({
                "frame_count": {
                    "type": "integer",
                    "default": 0,
                    "description": "Number of frames advanced"
                }
            })
        }
    }

    #[test]
    fn demo_trait_is_object_safe() {
        // This test verifies that Demo can be used as a trait object.
        // If the trait were not object-safe, this would fail to compile.
        let demo: Box<dyn Demo> = Box::new(MockDemo::new());
        assert_eq!(demo.positions().len(), 3);
    }

    #[test]
    fn mock_demo_advance_counts_frames() {
        let mut demo = MockDemo::new();
        assert_eq!(demo.frame_count, 0);
        demo.advance().unwrap();
        demo.advance().unwrap();
        assert_eq!(demo.frame_count, 2);
    }

    #[test]
    fn mock_demo_params_reflects_state() {
        let mut demo = MockDemo::new();
        demo.advance().unwrap();
        let params = demo.params();
        assert_eq!(params["frame_count"], 1);
    }

    #[test]
    fn mock_demo_param_schema_has_expected_structure() {
        let demo = MockDemo::new();
        let schema = demo.param_schema();
        assert!(schema.get("frame_count").is_some());
        assert_eq!(schema["frame_count"]["type"], "integer");
    }

    #[test]
    fn default_clear_color_is_sky_blue() {
        let demo = MockDemo::new();
        assert_eq!(demo.clear_color(), [0.6, 0.8, 1.0, 1.0]);
    }

    #[test]
    fn dyn_demo_reference_works() {
        let demo = MockDemo::new();
        let demo_ref: &dyn Demo = &demo;
        assert_eq!(demo_ref.positions().len(), 3);
        assert_eq!(demo_ref.clear_color(), DEFAULT_CLEAR_COLOR);
    }

    #[test]
    fn dyn_demo_mut_reference_works() {
        let mut demo = MockDemo::new();
        let demo_ref: &mut dyn Demo = &mut demo;
        demo_ref.advance().unwrap();
        assert_eq!(demo_ref.params()["frame_count"], 1);
    }
}
