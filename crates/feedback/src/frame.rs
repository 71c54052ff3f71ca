//! The owned frame loop: one feedback step, one draw, per frame.
//!
//! [`FrameLoop`] bundles the device, the [`Stepper`], the [`Renderer`],
//! and the draw binding into a single owned object the host drives one
//! [`advance`](FrameLoop::advance) at a time. The host decides the
//! cadence (an animation-frame callback in the browser, a plain loop in
//! the CLI); the frame loop decides what a frame *is*.
//!
//! The first error halts the loop: the failing frame's error is kept and
//! every later call returns a clone of it without touching the device.
//! Stopping is the host's job -- it simply does not schedule another
//! frame.

use glam::Vec3;
use pointstep_core::{
    BufferId, Device, DrawBinding, PipelineError, TranslationStrategy, Xorshift64,
};

use crate::renderer::Renderer;
use crate::stepper::Stepper;

/// Where in the frame the loop currently is.
///
/// `Swapped` is observable between [`FrameLoop::step_frame`] and
/// [`FrameLoop::draw_frame`]; a full [`FrameLoop::advance`] passes
/// through it and ends back at `Idle`. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    FeedbackStep,
    Swapped,
    Drawing,
    Failed,
}

/// Owns everything one animated scene needs between frames.
#[derive(Debug)]
pub struct FrameLoop<D: Device> {
    device: D,
    stepper: Stepper,
    renderer: Renderer,
    binding: DrawBinding,
    strategy: TranslationStrategy,
    rng: Xorshift64,
    phase: FramePhase,
    frames: u64,
    fault: Option<PipelineError>,
}

impl<D: Device> FrameLoop<D> {
    /// Builds the programs and position store on `device` and wires up
    /// the loop. `seed` drives the random translation strategy; a fixed
    /// strategy ignores it.
    ///
    /// # Errors
    ///
    /// Propagates setup errors (compile, link, allocation) from the
    /// device.
    pub fn new(
        mut device: D,
        initial: &[Vec3],
        strategy: TranslationStrategy,
        seed: u64,
    ) -> Result<Self, PipelineError> {
        let (stepper, binding) = Stepper::new(&mut device, initial)?;
        let renderer = Renderer::new(&mut device, initial.len())?;

        Ok(Self {
            device,
            stepper,
            renderer,
            binding,
            strategy,
            rng: Xorshift64::new(seed),
            phase: FramePhase::Idle,
            frames: 0,
            fault: None,
        })
    }

    /// Runs one whole frame: feedback step, swap, draw.
    ///
    /// # Errors
    ///
    /// Returns the step's or draw's error, and every later call returns
    /// the same error without touching the device.
    pub fn advance(&mut self) -> Result<(), PipelineError> {
        self.step_frame()?;
        self.draw_frame()
    }

    /// Runs just the feedback step, leaving the loop in `Swapped`.
    ///
    /// # Errors
    ///
    /// Same halting behavior as [`advance`](Self::advance).
    pub fn step_frame(&mut self) -> Result<(), PipelineError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        self.phase = FramePhase::FeedbackStep;
        let translation = self.strategy.next(&mut self.rng);
        match self
            .stepper
            .step(&mut self.device, &mut self.binding, translation)
        {
            Ok(()) => {
                self.phase = FramePhase::Swapped;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Runs just the draw pass and completes the frame.
    ///
    /// # Errors
    ///
    /// Same halting behavior as [`advance`](Self::advance).
    pub fn draw_frame(&mut self) -> Result<(), PipelineError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        self.phase = FramePhase::Drawing;
        match self.renderer.draw(&mut self.device, &self.binding) {
            Ok(()) => {
                self.phase = FramePhase::Idle;
                self.frames += 1;
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    fn fail(&mut self, error: PipelineError) -> PipelineError {
        log::warn!("frame {} halted: {error}", self.frames);
        self.phase = FramePhase::Failed;
        self.fault = Some(error.clone());
        error
    }

    /// Current phase of the frame state machine.
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The error that halted the loop, if any.
    pub fn fault(&self) -> Option<&PipelineError> {
        self.fault.as_ref()
    }

    /// The buffer holding the latest completed positions.
    pub fn current_buffer(&self) -> BufferId {
        self.stepper.current()
    }

    /// The draw pass's current view of the position store.
    pub fn binding(&self) -> DrawBinding {
        self.binding
    }

    /// The translation strategy driving the loop.
    pub fn strategy(&self) -> TranslationStrategy {
        self.strategy
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
