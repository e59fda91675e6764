//! Absolute position tracking.
//!
//! Written from the step interrupt, read from the foreground. Each axis is a
//! separate atomic, so a reader racing the interrupt may see a torn
//! three-axis snapshot but never a torn single axis.

use portable_atomic::{AtomicI32, Ordering};

use crate::config::units::{Axis, Steps};

/// Absolute step position of all axes.
#[derive(Debug)]
pub struct Position {
    steps: [AtomicI32; 3],
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// Create a position tracker at the origin.
    pub const fn new() -> Self {
        Self {
            steps: [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)],
        }
    }

    /// Get the position of one axis.
    #[inline]
    pub fn steps(&self, axis: Axis) -> Steps {
        Steps(self.steps[axis.index()].load(Ordering::Relaxed))
    }

    /// Get all axes.
    pub fn snapshot(&self) -> [Steps; 3] {
        Axis::ALL.map(|axis| self.steps(axis))
    }

    /// Set the position of one axis.
    #[inline]
    pub fn set_steps(&self, axis: Axis, steps: Steps) {
        self.steps[axis.index()].store(steps.0, Ordering::Relaxed);
    }

    /// Move one axis by a single step.
    #[inline]
    pub fn step(&self, axis: Axis, reverse: bool) {
        let delta = if reverse { -1 } else { 1 };
        self.steps[axis.index()].fetch_add(delta, Ordering::Relaxed);
    }

    /// Reset the given axes to the origin.
    pub fn reset(&self, axes: impl IntoIterator<Item = Axis>) {
        for axis in axes {
            self.set_steps(axis, Steps(0));
        }
    }
}
