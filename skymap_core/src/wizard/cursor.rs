//! Bounds-checked position within a fixed, ordered step list.
//!
//! Both the setup wizard and the onboarding tour move through their steps
//! with a `StepCursor`; every move is checked before the index changes.

/// Outcome of [`StepCursor::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward; `left` is the index of the step just left.
    Moved { left: usize },
    /// Already on the last step. The cursor did not move.
    PastEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
    len: usize,
}

impl StepCursor {
    /// A cursor on the first of `len` steps. `len` must be at least one.
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0, "step list must not be empty");
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    pub fn advance(&mut self) -> Advance {
        if self.is_last() {
            return Advance::PastEnd;
        }
        let left = self.index;
        self.index += 1;
        Advance::Moved { left }
    }

    /// Step back one; returns `false` (and stays put) on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Jump to `index`; returns `false` (and stays put) when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.index = index;
        true
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }
}
