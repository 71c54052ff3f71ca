//! The feedback pass: advance the position store one step on the GPU.
//!
//! A [`Stepper`] owns the double-buffered position store and the capture
//! program. Each [`step`](Stepper::step) runs one capture pass -- read
//! the current buffer, write `position + (translation, 0, 0)` into the
//! back buffer through transform feedback -- and then swaps the two, so
//! the freshly written buffer becomes the one the draw pass reads. The
//! positions never travel through host memory.
//!
//! Every sub-step is followed by an error poll. The first sub-step whose
//! poll reports a problem aborts the pass with a
//! [`FeedbackPassFailed`](PipelineError::FeedbackPassFailed) naming that
//! sub-step, and the swap does not happen: the read buffer still holds
//! the last good positions.

use glam::Vec3;
use pointstep_core::{
    BufferId, Device, DoubleBuffer, DrawBinding, FeedbackStage, PipelineError, ProgramId,
};

/// Owns the position double buffer and the feedback program, and advances
/// the positions one capture pass at a time.
#[derive(Debug)]
pub struct Stepper {
    buffers: DoubleBuffer,
    program: ProgramId,
    vertex_count: usize,
}

impl Stepper {
    /// Builds the feedback program and the two position buffers, both
    /// initialized to `initial`, and returns the stepper together with a
    /// [`DrawBinding`] already pointing at the read buffer.
    ///
    /// # Errors
    ///
    /// Propagates compile/link and allocation errors from the device.
    pub fn new(
        device: &mut dyn Device,
        initial: &[Vec3],
    ) -> Result<(Self, DrawBinding), PipelineError> {
        let program = device.create_feedback_program()?;
        let front = device.create_buffer(initial)?;
        let back = device.create_buffer(initial)?;
        let buffers = DoubleBuffer::new(front, back);
        let binding = DrawBinding::new(buffers.current());

        Ok((
            Self {
                buffers,
                program,
                vertex_count: initial.len(),
            },
            binding,
        ))
    }

    /// The buffer currently holding the completed positions.
    pub fn current(&self) -> BufferId {
        self.buffers.current()
    }

    /// Number of points in the store.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Runs one feedback pass with the given x translation, then swaps
    /// the buffers and repoints `binding` at the new read buffer.
    ///
    /// A zero-point store is a legal no-op: the pass still runs (and
    /// still swaps), it just captures nothing.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackPassFailed` naming the first sub-step whose error
    /// poll reported a problem. On failure the swap is skipped; `binding`
    /// and the read buffer are exactly as they were before the call.
    pub fn step(
        &mut self,
        device: &mut dyn Device,
        binding: &mut DrawBinding,
        translation: f32,
    ) -> Result<(), PipelineError> {
        device.select_program(self.program);
        device.set_translation(translation);
        checkpoint(device, FeedbackStage::SelectProgram)?;

        device.bind_attribute_source(self.buffers.current());
        checkpoint(device, FeedbackStage::BindSource)?;

        device.bind_capture_target(Some(self.buffers.back()));
        checkpoint(device, FeedbackStage::BindCapture)?;

        device.set_rasterizer_discard(true);
        checkpoint(device, FeedbackStage::RasterizerOff)?;

        device.begin_capture();
        device.draw_points(self.vertex_count);
        device.end_capture();
        checkpoint(device, FeedbackStage::CaptureDraw)?;

        device.set_rasterizer_discard(false);
        checkpoint(device, FeedbackStage::RasterizerOn)?;

        device.bind_capture_target(None);
        checkpoint(device, FeedbackStage::ReleaseCapture)?;

        // Host-side bookkeeping only from here on; nothing can fail.
        self.buffers.swap();
        binding.repoint(self.buffers.current());
        Ok(())
    }
}

/// Polls the device and converts a pending diagnostic into a
/// `FeedbackPassFailed` at the given sub-step.
fn checkpoint(device: &mut dyn Device, stage: FeedbackStage) -> Result<(), PipelineError> {
    match device.poll_error() {
        Some(detail) => Err(PipelineError::FeedbackPassFailed { stage, detail }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointstep_core::{DeviceCall, FaultPoint, ReferenceDevice};

    fn triangle() -> Vec<Vec3> {
        vec![
            Vec3::new(-0.4, -0.4, 0.0),
            Vec3::new(0.4, -0.4, 0.0),
            Vec3::new(0.0, 0.7, 0.0),
        ]
    }

    fn shifted(points: &[Vec3], translation: f32) -> Vec<Vec3> {
        points
            .iter()
            .map(|p| *p + Vec3::new(translation, 0.0, 0.0))
            .collect()
    }

    // ---- Construction ----

    #[test]
    fn new_builds_program_then_two_buffers() {
        let mut device = ReferenceDevice::new();
        let (stepper, binding) = Stepper::new(&mut device, &triangle()).unwrap();

        assert_eq!(
            device.calls(),
            &[
                DeviceCall::CreateFeedbackProgram,
                DeviceCall::CreateBuffer { len: 3 },
                DeviceCall::CreateBuffer { len: 3 },
            ]
        );
        assert_eq!(stepper.vertex_count(), 3);
        assert_eq!(
            binding.buffer(),
            stepper.current(),
            "the binding should start at the read buffer"
        );
    }

    #[test]
    fn new_seeds_both_buffers_with_the_initial_positions() {
        let mut device = ReferenceDevice::new();
        let _ = Stepper::new(&mut device, &triangle()).unwrap();
        assert_eq!(device.buffer_contents(BufferId(0)), triangle().as_slice());
        assert_eq!(device.buffer_contents(BufferId(1)), triangle().as_slice());
    }

    // ---- Stepping ----

    #[test]
    fn step_translates_points_and_repoints_the_binding() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();
        let before = stepper.current();

        stepper.step(&mut device, &mut binding, 0.01).unwrap();

        assert_ne!(stepper.current(), before, "read buffer should have swapped");
        assert_eq!(binding.buffer(), stepper.current());
        assert_eq!(
            device.buffer_contents(stepper.current()),
            shifted(&triangle(), 0.01).as_slice()
        );
    }

    #[test]
    fn step_moves_the_classic_triangle_by_a_hundredth() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();

        stepper.step(&mut device, &mut binding, 0.01).unwrap();

        let expected = [
            Vec3::new(-0.39, -0.4, 0.0),
            Vec3::new(0.41, -0.4, 0.0),
            Vec3::new(0.01, 0.7, 0.0),
        ];
        for (got, want) in device
            .buffer_contents(stepper.current())
            .iter()
            .zip(expected)
        {
            assert!(
                (*got - want).abs().max_element() < 1e-6,
                "expected {want}, got {got}"
            );
        }
    }

    #[test]
    fn negative_translation_moves_points_left() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();

        stepper.step(&mut device, &mut binding, -0.01).unwrap();

        let first = device.buffer_contents(stepper.current())[0];
        assert!(
            (first.x - (-0.41)).abs() < 1e-6,
            "expected x near -0.41, got {}",
            first.x
        );
    }

    #[test]
    fn step_issues_the_pass_in_order() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();
        device.clear_calls();

        stepper.step(&mut device, &mut binding, 0.5).unwrap();

        // A fresh device hands out ids 0 and 1; the first step reads 0
        // and captures into 1.
        assert_eq!(
            device.calls(),
            &[
                DeviceCall::SelectProgram(ProgramId(0)),
                DeviceCall::SetTranslation(0.5),
                DeviceCall::BindAttributeSource(BufferId(0)),
                DeviceCall::BindCaptureTarget(Some(BufferId(1))),
                DeviceCall::SetRasterizerDiscard(true),
                DeviceCall::BeginCapture,
                DeviceCall::DrawPoints { count: 3 },
                DeviceCall::EndCapture,
                DeviceCall::SetRasterizerDiscard(false),
                DeviceCall::BindCaptureTarget(None),
            ]
        );
    }

    #[test]
    fn source_and_capture_bindings_never_alias() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();

        for _ in 0..10 {
            device.clear_calls();
            stepper.step(&mut device, &mut binding, 0.01).unwrap();

            let source = device.calls().iter().find_map(|c| match c {
                DeviceCall::BindAttributeSource(b) => Some(*b),
                _ => None,
            });
            let target = device.calls().iter().find_map(|c| match c {
                DeviceCall::BindCaptureTarget(Some(b)) => Some(*b),
                _ => None,
            });
            assert_ne!(
                source.expect("source bound"),
                target.expect("target bound"),
                "a step read and wrote the same buffer"
            );
        }
    }

    #[test]
    fn consecutive_steps_accumulate_translation() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();

        let mut expected = triangle();
        for _ in 0..10 {
            stepper.step(&mut device, &mut binding, 0.01).unwrap();
            expected = shifted(&expected, 0.01);
        }
        // Same f32 additions on both sides, so equality is exact.
        assert_eq!(
            device.buffer_contents(stepper.current()),
            expected.as_slice()
        );
    }

    #[test]
    fn zero_point_store_steps_successfully() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &[]).unwrap();
        let before = stepper.current();

        stepper.step(&mut device, &mut binding, 0.01).unwrap();

        assert_ne!(stepper.current(), before, "empty steps still swap");
        assert!(device.buffer_contents(stepper.current()).is_empty());
    }

    // ---- Failure attribution ----

    #[test]
    fn fault_during_capture_draw_names_that_sub_step() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();
        device.inject_fault(FaultPoint::DrawPoints, "GPU reset");

        let err = stepper
            .step(&mut device, &mut binding, 0.01)
            .expect_err("the injected fault must surface");

        match err {
            PipelineError::FeedbackPassFailed { stage, detail } => {
                assert_eq!(stage, FeedbackStage::CaptureDraw);
                assert!(detail.contains("GPU reset"), "unexpected detail: {detail}");
            }
            other => panic!("expected FeedbackPassFailed, got {other:?}"),
        }
    }

    #[test]
    fn fault_at_bind_source_names_that_sub_step() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();
        device.inject_fault(FaultPoint::BindSource, "lost buffer");

        let err = stepper
            .step(&mut device, &mut binding, 0.01)
            .expect_err("the injected fault must surface");

        assert!(matches!(
            err,
            PipelineError::FeedbackPassFailed {
                stage: FeedbackStage::BindSource,
                ..
            }
        ));
    }

    #[test]
    fn failed_step_skips_the_swap_and_keeps_old_positions() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();
        let read_before = stepper.current();
        let binding_before = binding;
        device.inject_fault(FaultPoint::DrawPoints, "boom");

        let _ = stepper.step(&mut device, &mut binding, 0.01);

        assert_eq!(stepper.current(), read_before, "failed step must not swap");
        assert_eq!(binding, binding_before, "failed step must not repoint");
        assert_eq!(
            device.buffer_contents(stepper.current()),
            triangle().as_slice(),
            "read buffer must still hold the last good positions"
        );
    }

    #[test]
    fn step_after_recovered_fault_works_again() {
        let mut device = ReferenceDevice::new();
        let (mut stepper, mut binding) = Stepper::new(&mut device, &triangle()).unwrap();
        device.inject_fault(FaultPoint::DrawPoints, "transient");
        let _ = stepper.step(&mut device, &mut binding, 0.01);

        // The one-shot fault has cleared; the store is still consistent.
        stepper.step(&mut device, &mut binding, 0.01).unwrap();
        assert_eq!(
            device.buffer_contents(stepper.current()),
            shifted(&triangle(), 0.01).as_slice()
        );
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_single_step_is_an_exact_shift(t in -1.0_f32..1.0) {
                let mut device = ReferenceDevice::new();
                let (mut stepper, mut binding) =
                    Stepper::new(&mut device, &triangle()).unwrap();

                stepper.step(&mut device, &mut binding, t).unwrap();

                let expected = shifted(&triangle(), t);
                prop_assert_eq!(
                    device.buffer_contents(stepper.current()),
                    expected.as_slice()
                );
            }

            #[test]
            fn read_buffer_alternates_over_any_step_count(steps in 1_usize..32) {
                let mut device = ReferenceDevice::new();
                let (mut stepper, mut binding) =
                    Stepper::new(&mut device, &triangle()).unwrap();
                let start = stepper.current();

                for i in 0..steps {
                    stepper.step(&mut device, &mut binding, 0.01).unwrap();
                    let expected_flip = (i + 1) % 2 == 1;
                    prop_assert_eq!(
                        stepper.current() != start,
                        expected_flip,
                        "unexpected read buffer after {} steps", i + 1
                    );
                }
            }
        }
    }
}
