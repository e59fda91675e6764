//! Interfaces of the components around the dispatch loop.
//!
//! The planner owns the block queue, the G-code layer tracks logical
//! position, and the sensor board reports faults and drives the actuators.
//! None of them live in this crate; the dispatch loop only sees these traits.

use bitflags::bitflags;

use crate::motion::Block;

use super::state::StopCause;

/// Planner-side block queue.
pub trait BlockQueue {
    /// Oldest unconsumed block, if any.
    fn current_block(&mut self) -> Option<Block>;

    /// Remove the oldest block after it has been executed.
    fn discard_current_block(&mut self);

    /// Drop every queued block.
    fn reset(&mut self);

    /// Resynchronize the planner's position from the stepper position.
    fn request_position_update(&mut self);
}

/// Logical position owner, usually the G-code interpreter.
pub trait PositionTracker {
    /// Resynchronize logical position from the stepper position.
    fn request_position_update(&mut self);
}

bitflags! {
    /// Safety conditions reported by the sensor board.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Sense: u8 {
        /// A limit switch is asserted.
        const LIMIT_HIT = 1 << 0;
        /// The safety interlock (chiller) is off.
        const INTERLOCK_OFF = 1 << 1;
        /// Main power is off.
        const POWER_OFF = 1 << 2;
        /// The enclosure door is open.
        const DOOR_OPEN = 1 << 3;
    }
}

impl Sense {
    /// The stop cause these conditions call for, highest priority first.
    ///
    /// An open door alone is a pause and yields `None`.
    pub fn fault(self) -> Option<StopCause> {
        if self.contains(Sense::LIMIT_HIT) {
            Some(StopCause::LimitHit)
        } else if self.contains(Sense::INTERLOCK_OFF) {
            Some(StopCause::InterlockOff)
        } else if self.contains(Sense::POWER_OFF) {
            Some(StopCause::PowerOff)
        } else {
            None
        }
    }

    /// Whether any condition holds motion back.
    #[inline]
    pub fn any(self) -> bool {
        !self.is_empty()
    }
}

/// Sensor inputs and actuator outputs.
pub trait SenseControl {
    /// Sample the safety sensors.
    fn sense(&mut self) -> Sense;

    /// Set laser power, 0 = off.
    fn set_laser_intensity(&mut self, intensity: u8);

    /// Switch the air assist valve.
    fn set_air(&mut self, on: bool);

    /// Switch the gas assist valve.
    fn set_gas(&mut self, on: bool);
}

impl<T: BlockQueue + ?Sized> BlockQueue for &mut T {
    fn current_block(&mut self) -> Option<Block> {
        (**self).current_block()
    }

    fn discard_current_block(&mut self) {
        (**self).discard_current_block()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn request_position_update(&mut self) {
        (**self).request_position_update()
    }
}

impl<T: PositionTracker + ?Sized> PositionTracker for &mut T {
    fn request_position_update(&mut self) {
        (**self).request_position_update()
    }
}

impl<T: SenseControl + ?Sized> SenseControl for &mut T {
    fn sense(&mut self) -> Sense {
        (**self).sense()
    }

    fn set_laser_intensity(&mut self, intensity: u8) {
        (**self).set_laser_intensity(intensity)
    }

    fn set_air(&mut self, on: bool) {
        (**self).set_air(on)
    }

    fn set_gas(&mut self, on: bool) {
        (**self).set_gas(on)
    }
}
