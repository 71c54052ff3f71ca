//! CPU reference implementation of the [`Device`] trait.
//!
//! `ReferenceDevice` executes the same call sequence the GL device would
//! issue, against `Vec<Vec3>` buffers in host memory. It enforces the
//! binding rules a GL driver enforces (distinct source/capture buffers,
//! in-bounds draw counts, capture draws only inside an open capture region)
//! by flagging a diagnostic and dropping the call's effect, exactly as a
//! driver flags `INVALID_OPERATION` and drops the draw.
//!
//! Every trait call is recorded in order as a [`DeviceCall`], so tests can
//! assert pass structure — not just final buffer contents — and prove, for
//! example, that no draw pass ran after a failed step.

use crate::device::{BufferId, Device, ProgramId};
use crate::error::PipelineError;
use glam::Vec3;

/// What a reference program does when a draw reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ProgramKind {
    /// Writes `position + (translation, 0, 0)` into the capture target.
    Feedback { translation: f32 },
    /// Plain rasterizing program; no captured output.
    Draw,
}

/// Calls at which a one-shot fault can be armed via
/// [`ReferenceDevice::inject_fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
    BindSource,
    BindCapture,
    BeginCapture,
    DrawPoints,
    EndCapture,
    Clear,
    DrawTriangles,
}

/// One recorded device call, in the order received.
///
/// Carries the call's arguments so ordering assertions can also check what
/// was bound or drawn. Error polls are deliberately not recorded; the log
/// reflects pass structure only.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateBuffer { len: usize },
    CreateFeedbackProgram,
    CreateDrawProgram,
    SelectProgram(ProgramId),
    SetTranslation(f32),
    BindAttributeSource(BufferId),
    BindCaptureTarget(Option<BufferId>),
    SetRasterizerDiscard(bool),
    BeginCapture,
    DrawPoints { count: usize },
    EndCapture,
    Clear([f32; 4]),
    DrawTriangles { count: usize },
}

/// CPU device: host-memory buffers, strict binding checks, call log,
/// one-shot fault injection.
#[derive(Debug, Default)]
pub struct ReferenceDevice {
    buffers: Vec<Vec<Vec3>>,
    programs: Vec<ProgramKind>,
    selected: Option<ProgramId>,
    attribute_source: Option<BufferId>,
    capture_target: Option<BufferId>,
    rasterizer_discard: bool,
    capturing: bool,
    pending_error: Option<String>,
    armed_fault: Option<(FaultPoint, String)>,
    calls: Vec<DeviceCall>,
}

impl ReferenceDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a fault that fires on the next call matching `at`: the call is
    /// still recorded, its effect is suppressed, and `detail` becomes the
    /// pending diagnostic. The fault clears after firing once.
    pub fn inject_fault(&mut self, at: FaultPoint, detail: impl Into<String>) {
        self.armed_fault = Some((at, detail.into()));
    }

    /// The ordered log of every trait call received so far.
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Empties the call log. Useful for asserting on one phase in
    /// isolation (e.g. "nothing after the failed step").
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Read access to a buffer's current contents.
    ///
    /// This is a reference-device affordance for tests and headless runs;
    /// it is intentionally absent from the [`Device`] trait.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` was not created by this device.
    pub fn buffer_contents(&self, buffer: BufferId) -> &[Vec3] {
        &self.buffers[buffer.0]
    }

    /// Records a diagnostic. Like the GL error flag, the first diagnostic
    /// is kept until polled; later ones are discarded.
    fn flag(&mut self, detail: impl Into<String>) {
        if self.pending_error.is_none() {
            self.pending_error = Some(detail.into());
        }
    }

    /// Returns true (and flags the armed diagnostic) if a fault armed at
    /// `point` should fire now.
    fn fault_fires(&mut self, point: FaultPoint) -> bool {
        match self.armed_fault.take() {
            Some((at, detail)) if at == point => {
                self.flag(detail);
                true
            }
            other => {
                self.armed_fault = other;
                false
            }
        }
    }

    fn buffer_exists(&self, buffer: BufferId) -> bool {
        buffer.0 < self.buffers.len()
    }
}

impl Device for ReferenceDevice {
    fn create_buffer(&mut self, initial: &[Vec3]) -> Result<BufferId, PipelineError> {
        self.calls.push(DeviceCall::CreateBuffer {
            len: initial.len(),
        });
        self.buffers.push(initial.to_vec());
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn create_feedback_program(&mut self) -> Result<ProgramId, PipelineError> {
        self.calls.push(DeviceCall::CreateFeedbackProgram);
        self.programs.push(ProgramKind::Feedback { translation: 0.0 });
        Ok(ProgramId(self.programs.len() - 1))
    }

    fn create_draw_program(&mut self) -> Result<ProgramId, PipelineError> {
        self.calls.push(DeviceCall::CreateDrawProgram);
        self.programs.push(ProgramKind::Draw);
        Ok(ProgramId(self.programs.len() - 1))
    }

    fn select_program(&mut self, program: ProgramId) {
        self.calls.push(DeviceCall::SelectProgram(program));
        if program.0 >= self.programs.len() {
            self.flag(format!("selected unknown {program}"));
            return;
        }
        self.selected = Some(program);
    }

    fn set_translation(&mut self, translation: f32) {
        self.calls.push(DeviceCall::SetTranslation(translation));
        match self.selected {
            Some(id) => {
                // A draw program has no translation uniform; the update is
                // silently dropped, matching a null uniform location.
                if let ProgramKind::Feedback { translation: t } = &mut self.programs[id.0] {
                    *t = translation;
                }
            }
            None => self.flag("translation uniform set with no program selected"),
        }
    }

    fn bind_attribute_source(&mut self, buffer: BufferId) {
        self.calls.push(DeviceCall::BindAttributeSource(buffer));
        if self.fault_fires(FaultPoint::BindSource) {
            return;
        }
        if !self.buffer_exists(buffer) {
            self.flag(format!("attribute source bound to unknown {buffer}"));
            return;
        }
        self.attribute_source = Some(buffer);
    }

    fn bind_capture_target(&mut self, buffer: Option<BufferId>) {
        self.calls.push(DeviceCall::BindCaptureTarget(buffer));
        if self.fault_fires(FaultPoint::BindCapture) {
            return;
        }
        if let Some(b) = buffer {
            if !self.buffer_exists(b) {
                self.flag(format!("capture target bound to unknown {b}"));
                return;
            }
        }
        self.capture_target = buffer;
    }

    fn set_rasterizer_discard(&mut self, enabled: bool) {
        self.calls.push(DeviceCall::SetRasterizerDiscard(enabled));
        self.rasterizer_discard = enabled;
    }

    fn begin_capture(&mut self) {
        self.calls.push(DeviceCall::BeginCapture);
        if self.fault_fires(FaultPoint::BeginCapture) {
            return;
        }
        if self.capturing {
            self.flag("capture region already open");
            return;
        }
        if self.capture_target.is_none() {
            self.flag("capture begun with no capture target bound");
            return;
        }
        self.capturing = true;
    }

    fn draw_points(&mut self, count: usize) {
        self.calls.push(DeviceCall::DrawPoints { count });
        if self.fault_fires(FaultPoint::DrawPoints) {
            return;
        }
        if count == 0 {
            return;
        }
        let Some(source) = self.attribute_source else {
            self.flag("point draw with no attribute source bound");
            return;
        };
        if count > self.buffers[source.0].len() {
            self.flag(format!(
                "point draw of {count} vertices exceeds {source} length {}",
                self.buffers[source.0].len()
            ));
            return;
        }
        if !self.capturing {
            // Visible point rendering; nothing to model on the CPU.
            return;
        }
        let Some(target) = self.capture_target else {
            self.flag("capture draw with no capture target bound");
            return;
        };
        if source == target {
            self.flag(format!(
                "{source} bound as both attribute source and capture target"
            ));
            return;
        }
        if count > self.buffers[target.0].len() {
            self.flag(format!(
                "capture of {count} vertices exceeds {target} length {}",
                self.buffers[target.0].len()
            ));
            return;
        }
        let delta = match self.selected.map(|id| self.programs[id.0]) {
            Some(ProgramKind::Feedback { translation }) => Vec3::new(translation, 0.0, 0.0),
            _ => {
                self.flag("capture draw without a feedback program selected");
                return;
            }
        };
        for i in 0..count {
            let next = self.buffers[source.0][i] + delta;
            self.buffers[target.0][i] = next;
        }
    }

    fn end_capture(&mut self) {
        self.calls.push(DeviceCall::EndCapture);
        if self.fault_fires(FaultPoint::EndCapture) {
            return;
        }
        if !self.capturing {
            self.flag("capture ended with no capture region open");
            return;
        }
        self.capturing = false;
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(DeviceCall::Clear(color));
        // A clear has no host-visible effect to suppress; a fault here
        // only raises the flag.
        self.fault_fires(FaultPoint::Clear);
    }

    fn draw_triangles(&mut self, count: usize) {
        self.calls.push(DeviceCall::DrawTriangles { count });
        if self.fault_fires(FaultPoint::DrawTriangles) {
            return;
        }
        if count == 0 {
            return;
        }
        if self.capturing {
            self.flag("triangle draw inside a point capture region");
            return;
        }
        let Some(source) = self.attribute_source else {
            self.flag("triangle draw with no attribute source bound");
            return;
        };
        if count > self.buffers[source.0].len() {
            self.flag(format!(
                "triangle draw of {count} vertices exceeds {source} length {}",
                self.buffers[source.0].len()
            ));
        }
    }

    fn poll_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }
}
