//! Read/write pairing for the double-buffered position store.
//!
//! `DoubleBuffer` owns the two position buffer ids and tracks which one is
//! currently read from (attribute source) and which one is written to
//! (capture target). Calling `swap()` flips the roles. This is pure index
//! math with no GPU dependency; the step logic swaps only after a capture
//! pass completes cleanly, so a failed pass leaves the roles untouched.

use crate::device::BufferId;

/// The pair of position buffers and their current read/write roles.
/// The invariant `current() != back()` always holds.
#[derive(Debug)]
pub struct DoubleBuffer {
    buffers: [BufferId; 2],
    current: usize,
}

impl DoubleBuffer {
    /// Creates a pair with `first` as the current read buffer and `second`
    /// as the write buffer.
    ///
    /// # Panics
    ///
    /// Panics if both ids name the same buffer, which would let a capture
    /// pass read and write the same storage.
    pub fn new(first: BufferId, second: BufferId) -> Self {
        assert_ne!(first, second, "double buffer needs two distinct buffers");
        Self {
            buffers: [first, second],
            current: 0,
        }
    }

    /// The buffer holding the most recently completed positions; reads
    /// (attribute sourcing, drawing) come from here.
    pub fn current(&self) -> BufferId {
        self.buffers[self.current]
    }

    /// The buffer the next capture pass writes into.
    pub fn back(&self) -> BufferId {
        self.buffers[1 - self.current]
    }

    /// Swaps read and write roles. Its own inverse: two swaps restore the
    /// original assignment.
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}
