//! Bresenham line tracer.
//!
//! Spreads the steps of every axis evenly over the step events of a block.
//! The axis with the most steps pulses on every event; the others pulse
//! whenever their error accumulator turns positive.

use crate::config::units::Axis;
use crate::hal::OutputBits;

use super::block::LineBlock;
use super::position::Position;

/// Per-axis error accumulators of the line tracer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BresenhamTracer {
    counters: [i32; 3],
}

impl BresenhamTracer {
    /// Create a tracer with cleared accumulators.
    pub const fn new() -> Self {
        Self { counters: [0; 3] }
    }

    /// Seed the accumulators for a new block (midpoint initialization).
    pub fn begin(&mut self, block: &LineBlock) {
        let seed = -((block.step_event_count >> 1) as i32);
        self.counters = [seed; 3];
    }

    /// Run one step event.
    ///
    /// Returns the logical output pattern (the block's direction bits plus a
    /// step bit for every axis that moves) and moves `position` accordingly.
    pub fn trace(&mut self, block: &LineBlock, position: &Position) -> OutputBits {
        let mut bits = block.direction_bits;
        for axis in Axis::ALL {
            let counter = &mut self.counters[axis.index()];
            *counter += block.steps_on(axis) as i32;
            if *counter > 0 {
                bits |= OutputBits::step(axis);
                *counter -= block.step_event_count as i32;
                position.step(axis, block.is_reverse(axis));
            }
        }
        bits
    }

    /// Current accumulator values.
    #[inline]
    pub fn counters(&self) -> [i32; 3] {
        self.counters
    }
}
