//! Motion blocks produced by the planner.

use crate::config::units::{Axis, StepsPerMinute};
use crate::hal::OutputBits;

/// One planner command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Straight-line move with a trapezoidal speed profile.
    Line(LineBlock),
    /// Switch the air assist on.
    AirEnable,
    /// Switch the gas assist on.
    GasEnable,
    /// Switch air and gas assist off.
    AirGasDisable,
}

impl Block {
    /// Short name of the block kind, for logging.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Line(_) => BlockKind::Line,
            Block::AirEnable => BlockKind::AirEnable,
            Block::GasEnable => BlockKind::GasEnable,
            Block::AirGasDisable => BlockKind::AirGasDisable,
        }
    }
}

/// Discriminant of [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockKind {
    /// [`Block::Line`].
    Line,
    /// [`Block::AirEnable`].
    AirEnable,
    /// [`Block::GasEnable`].
    GasEnable,
    /// [`Block::AirGasDisable`].
    AirGasDisable,
}

/// A straight-line move.
///
/// The speed profile starts at `initial_rate`, accelerates by `rate_delta`
/// per acceleration tick until `accelerate_until` step events are done,
/// cruises at `nominal_rate`, and from `decelerate_after` decelerates toward
/// `final_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBlock {
    /// Step count per axis.
    pub steps: [u32; 3],
    /// Direction bits; a set bit means negative travel on that axis.
    pub direction_bits: OutputBits,
    /// Largest per-axis step count; the length of the block in step events.
    pub step_event_count: u32,
    /// Entry rate.
    pub initial_rate: StepsPerMinute,
    /// Cruise rate.
    pub nominal_rate: StepsPerMinute,
    /// Exit rate.
    pub final_rate: StepsPerMinute,
    /// Rate change per acceleration tick.
    pub rate_delta: StepsPerMinute,
    /// Step events spent accelerating.
    pub accelerate_until: u32,
    /// Step event at which deceleration begins.
    pub decelerate_after: u32,
    /// Laser intensity held during the block.
    pub nominal_laser_intensity: u8,
}

impl LineBlock {
    /// Build a block from signed per-axis step counts.
    ///
    /// The block cruises at the minimum rate with no acceleration until the
    /// rates and profile are set with [`with_rates`](Self::with_rates) and
    /// [`with_profile`](Self::with_profile).
    pub fn from_steps(steps: [i32; 3]) -> Self {
        let mut direction_bits = OutputBits::empty();
        for axis in Axis::ALL {
            if steps[axis.index()] < 0 {
                direction_bits |= OutputBits::direction(axis);
            }
        }
        let magnitudes = steps.map(i32::unsigned_abs);
        let step_event_count = magnitudes.into_iter().max().unwrap_or(0);

        Self {
            steps: magnitudes,
            direction_bits,
            step_event_count,
            initial_rate: StepsPerMinute(0),
            nominal_rate: StepsPerMinute(0),
            final_rate: StepsPerMinute(0),
            rate_delta: StepsPerMinute(0),
            accelerate_until: 0,
            decelerate_after: step_event_count,
            nominal_laser_intensity: 0,
        }
    }

    /// Set entry, cruise and exit rates and the per-tick rate change.
    pub fn with_rates(
        mut self,
        initial: StepsPerMinute,
        nominal: StepsPerMinute,
        final_rate: StepsPerMinute,
        delta: StepsPerMinute,
    ) -> Self {
        self.initial_rate = initial;
        self.nominal_rate = nominal;
        self.final_rate = final_rate;
        self.rate_delta = delta;
        self
    }

    /// Set the step events bounding the acceleration and deceleration phases.
    pub fn with_profile(mut self, accelerate_until: u32, decelerate_after: u32) -> Self {
        self.accelerate_until = accelerate_until;
        self.decelerate_after = decelerate_after;
        self
    }

    /// Set the laser intensity.
    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.nominal_laser_intensity = intensity;
        self
    }

    /// Step count of one axis.
    #[inline]
    pub fn steps_on(&self, axis: Axis) -> u32 {
        self.steps[axis.index()]
    }

    /// Whether `axis` travels in the negative direction.
    #[inline]
    pub fn is_reverse(&self, axis: Axis) -> bool {
        self.direction_bits.contains(OutputBits::direction(axis))
    }

    /// Check the structural invariants a planner must uphold.
    pub fn is_consistent(&self) -> bool {
        let longest = self.steps.iter().copied().max().unwrap_or(0);
        longest == self.step_event_count
            && self.direction_bits.steps().is_empty()
            && self.accelerate_until <= self.decelerate_after
            && self.decelerate_after <= self.step_event_count
            && self.initial_rate <= self.nominal_rate
            && self.final_rate <= self.nominal_rate
    }
}
