//! Hardware abstraction for the pulse generator.
//!
//! The dispatch loop and the homing cycle never touch registers directly.
//! They talk to a [`PulsePort`] (step, direction and limit pins) and to
//! [`StepTimers`] (the step-rate timer, the pulse-reset one-shot and the
//! interrupt controller). [`PinPort`] implements the port on top of
//! embedded-hal 1.0 pins and [`SimHal`] simulates a whole machine for tests.

mod pins;
mod sim;

use bitflags::bitflags;

use crate::config::units::Axis;
use crate::motion::TimerSetting;

pub use pins::PinPort;
pub use sim::{HalEvent, SimHal, SimSense};

bitflags! {
    /// Step and direction pattern written to the stepping port.
    ///
    /// The layout matches the stepping port of the reference board: step
    /// bits on 2..=4, direction bits on 5..=7.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OutputBits: u8 {
        /// X step.
        const X_STEP = 1 << 2;
        /// Y step.
        const Y_STEP = 1 << 3;
        /// Z step.
        const Z_STEP = 1 << 4;
        /// X direction (set = negative travel).
        const X_DIRECTION = 1 << 5;
        /// Y direction (set = negative travel).
        const Y_DIRECTION = 1 << 6;
        /// Z direction (set = negative travel).
        const Z_DIRECTION = 1 << 7;
    }
}

impl OutputBits {
    /// All step bits.
    pub const STEP_MASK: Self = Self::X_STEP.union(Self::Y_STEP).union(Self::Z_STEP);

    /// All direction bits.
    pub const DIRECTION_MASK: Self = Self::X_DIRECTION
        .union(Self::Y_DIRECTION)
        .union(Self::Z_DIRECTION);

    /// Step bit of `axis`.
    #[inline]
    pub const fn step(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X_STEP,
            Axis::Y => Self::Y_STEP,
            Axis::Z => Self::Z_STEP,
        }
    }

    /// Direction bit of `axis`.
    #[inline]
    pub const fn direction(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X_DIRECTION,
            Axis::Y => Self::Y_DIRECTION,
            Axis::Z => Self::Z_DIRECTION,
        }
    }

    /// Only the step bits of this pattern.
    #[inline]
    pub fn steps(self) -> Self {
        self & Self::STEP_MASK
    }

    /// Only the direction bits of this pattern.
    #[inline]
    pub fn directions(self) -> Self {
        self & Self::DIRECTION_MASK
    }
}

bitflags! {
    /// Limit switch state, one bit per axis. A set bit means the switch is asserted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LimitBits: u8 {
        /// X limit switch.
        const X = 1 << 0;
        /// Y limit switch.
        const Y = 1 << 1;
        /// Z limit switch.
        const Z = 1 << 2;
    }
}

impl LimitBits {
    /// Bit of `axis`.
    #[inline]
    pub const fn of(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X,
            Axis::Y => Self::Y,
            Axis::Z => Self::Z,
        }
    }

    /// Whether the switch of `axis` is asserted.
    #[inline]
    pub fn asserted(self, axis: Axis) -> bool {
        self.contains(Self::of(axis))
    }
}

/// Step, direction and limit pins plus a busy-wait delay.
///
/// Patterns passed in are already polarity-corrected; implementations write
/// them verbatim.
pub trait PulsePort {
    /// Pin error type.
    type Error;

    /// Drive the direction outputs from the direction bits of `bits`.
    fn write_direction(&mut self, bits: OutputBits) -> Result<(), Self::Error>;

    /// Drive the step outputs from the step bits of `bits`.
    fn write_step(&mut self, bits: OutputBits) -> Result<(), Self::Error>;

    /// Sample the limit switches.
    fn read_limits(&mut self) -> Result<LimitBits, Self::Error>;

    /// Busy-wait for `us` microseconds.
    fn delay_us(&mut self, us: u32);
}

/// Timers and interrupt control used by the dispatch loop.
///
/// These are plain register writes and cannot fail.
pub trait StepTimers {
    /// Load prescaler and ceiling of the step-rate timer.
    fn program_step_timer(&mut self, setting: TimerSetting);

    /// Enable or disable the step-rate timer interrupt.
    fn set_step_interrupt(&mut self, enabled: bool);

    /// Arm the pulse-reset one-shot. After `ticks` it must drive the step
    /// outputs to the step bits of `idle` exactly once, independently of the
    /// dispatch loop.
    fn arm_pulse_reset(&mut self, idle: OutputBits, ticks: u8);

    /// Re-enable nested interrupts inside the step interrupt handler.
    fn enable_nested_interrupts(&mut self);
}

/// A port and a timer block bundled into one hardware context.
#[derive(Debug)]
pub struct Board<P, T> {
    /// Pins.
    pub port: P,
    /// Timers.
    pub timers: T,
}

impl<P, T> Board<P, T> {
    /// Bundle a port and timers.
    pub fn new(port: P, timers: T) -> Self {
        Self { port, timers }
    }

    /// Split back into parts.
    pub fn release(self) -> (P, T) {
        (self.port, self.timers)
    }
}

impl<P: PulsePort, T> PulsePort for Board<P, T> {
    type Error = P::Error;

    fn write_direction(&mut self, bits: OutputBits) -> Result<(), Self::Error> {
        self.port.write_direction(bits)
    }

    fn write_step(&mut self, bits: OutputBits) -> Result<(), Self::Error> {
        self.port.write_step(bits)
    }

    fn read_limits(&mut self) -> Result<LimitBits, Self::Error> {
        self.port.read_limits()
    }

    fn delay_us(&mut self, us: u32) {
        self.port.delay_us(us)
    }
}

impl<P, T: StepTimers> StepTimers for Board<P, T> {
    fn program_step_timer(&mut self, setting: TimerSetting) {
        self.timers.program_step_timer(setting)
    }

    fn set_step_interrupt(&mut self, enabled: bool) {
        self.timers.set_step_interrupt(enabled)
    }

    fn arm_pulse_reset(&mut self, idle: OutputBits, ticks: u8) {
        self.timers.arm_pulse_reset(idle, ticks)
    }

    fn enable_nested_interrupts(&mut self) {
        self.timers.enable_nested_interrupts()
    }
}
