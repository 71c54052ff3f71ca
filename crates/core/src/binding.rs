//! The draw pass's view of the position store.

use crate::device::BufferId;

/// Records which buffer the visible draw sources its vertex attribute
/// from (attribute slot 0).
///
/// The binding is repointed to the fresh read buffer after each completed
/// step, so the draw pass never has to know the double buffer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBinding {
    buffer: BufferId,
}

impl DrawBinding {
    pub fn new(buffer: BufferId) -> Self {
        Self { buffer }
    }

    /// The buffer the next draw reads from.
    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// Points the binding at a new read buffer. Called after a swap, with
    /// the buffer the capture pass just finished writing.
    pub fn repoint(&mut self, buffer: BufferId) {
        self.buffer = buffer;
    }
}
