//! Simulated hardware backend.
//!
//! Stands in for the stepping port, the timers and the limit switches so the
//! dispatch loop and the homing cycle can run on a host. Each axis drives a
//! simulated carriage that moves one unit per rising step edge; a limit
//! switch placed at `at` is asserted while the carriage is at or below `at`.
//! [`SimSense`] stands in for the sensor board and the actuators.

use core::convert::Infallible;

use heapless::HistoryBuffer;

use crate::config::units::Axis;
use crate::motion::TimerSetting;
use crate::stepper::{Sense, SenseControl};

use super::{LimitBits, OutputBits, PulsePort, StepTimers};

/// Number of events kept in the history.
const HISTORY: usize = 64;

/// Something the simulated hardware was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalEvent {
    /// Direction pins written.
    Direction(OutputBits),
    /// Step pins written.
    Step(OutputBits),
    /// Pulse-reset one-shot armed.
    PulseResetArmed(OutputBits),
    /// Pulse-reset one-shot fired.
    PulseReset(OutputBits),
    /// Step-rate timer reprogrammed.
    TimerProgrammed(TimerSetting),
    /// Step interrupt enabled or disabled.
    StepInterrupt(bool),
    /// Nested interrupts re-enabled.
    NestedInterrupts,
}

/// Simulated stepping port and timer block.
pub struct SimHal {
    polarity: OutputBits,
    levels: OutputBits,
    pending_reset: Option<OutputBits>,
    pulses: [u32; 3],
    carriage: [i32; 3],
    switches: [Option<i32>; 3],
    forced_limits: LimitBits,
    step_interrupt: bool,
    timer: Option<TimerSetting>,
    timer_programs: u32,
    resets_armed: u32,
    resets_fired: u32,
    elapsed_us: u64,
    history: HistoryBuffer<HalEvent, HISTORY>,
}

impl Default for SimHal {
    fn default() -> Self {
        Self::new(OutputBits::empty())
    }
}

impl SimHal {
    /// Create a simulated machine whose outputs use the given polarity mask.
    pub fn new(polarity: OutputBits) -> Self {
        Self {
            polarity,
            levels: polarity,
            pending_reset: None,
            pulses: [0; 3],
            carriage: [0; 3],
            switches: [None; 3],
            forced_limits: LimitBits::empty(),
            step_interrupt: false,
            timer: None,
            timer_programs: 0,
            resets_armed: 0,
            resets_fired: 0,
            elapsed_us: 0,
            history: HistoryBuffer::new(),
        }
    }

    /// Place the limit switch of `axis` at carriage coordinate `at`.
    pub fn place_switch(&mut self, axis: Axis, at: i32) {
        self.switches[axis.index()] = Some(at);
    }

    /// Remove the limit switch of `axis`.
    pub fn remove_switch(&mut self, axis: Axis) {
        self.switches[axis.index()] = None;
    }

    /// Force switches asserted regardless of carriage position.
    pub fn force_limits(&mut self, limits: LimitBits) {
        self.forced_limits = limits;
    }

    /// Move the simulated carriage of `axis` without stepping.
    pub fn set_carriage(&mut self, axis: Axis, at: i32) {
        self.carriage[axis.index()] = at;
    }

    /// Simulated carriage coordinate of `axis`.
    pub fn carriage(&self, axis: Axis) -> i32 {
        self.carriage[axis.index()]
    }

    /// Rising step edges seen on `axis`.
    pub fn pulses(&self, axis: Axis) -> u32 {
        self.pulses[axis.index()]
    }

    /// Forget the step edge counters.
    pub fn clear_pulses(&mut self) {
        self.pulses = [0; 3];
    }

    /// Physical level of the port pins.
    pub fn levels(&self) -> OutputBits {
        self.levels
    }

    /// Whether the step interrupt is enabled.
    pub fn step_interrupt_enabled(&self) -> bool {
        self.step_interrupt
    }

    /// Last setting loaded into the step-rate timer.
    pub fn timer_setting(&self) -> Option<TimerSetting> {
        self.timer
    }

    /// How many times the step-rate timer was reprogrammed.
    pub fn timer_programs(&self) -> u32 {
        self.timer_programs
    }

    /// How many times the pulse-reset one-shot was armed.
    pub fn resets_armed(&self) -> u32 {
        self.resets_armed
    }

    /// How many times the pulse-reset one-shot fired.
    pub fn resets_fired(&self) -> u32 {
        self.resets_fired
    }

    /// Whether an armed pulse reset has not fired yet.
    pub fn reset_pending(&self) -> bool {
        self.pending_reset.is_some()
    }

    /// Microseconds spent in busy-wait delays.
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Recent events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &HalEvent> {
        self.history.oldest_ordered()
    }

    /// Fire the pulse-reset one-shot if it is armed.
    ///
    /// Returns `true` if a reset was pending.
    pub fn fire_pulse_reset(&mut self) -> bool {
        match self.pending_reset.take() {
            Some(idle) => {
                self.levels = self.levels.directions() | idle.steps();
                self.resets_fired += 1;
                self.history.write(HalEvent::PulseReset(idle));
                true
            }
            None => false,
        }
    }

    fn logical(&self, bits: OutputBits) -> OutputBits {
        bits ^ self.polarity
    }
}

impl PulsePort for SimHal {
    type Error = Infallible;

    fn write_direction(&mut self, bits: OutputBits) -> Result<(), Self::Error> {
        self.levels = self.levels.steps() | bits.directions();
        self.history.write(HalEvent::Direction(bits.directions()));
        Ok(())
    }

    fn write_step(&mut self, bits: OutputBits) -> Result<(), Self::Error> {
        // The one-shot is always shorter than a step period.
        self.fire_pulse_reset();

        let before = self.logical(self.levels);
        let after = self.logical(self.levels.directions() | bits.steps());
        for axis in Axis::ALL {
            let step = OutputBits::step(axis);
            if !before.contains(step) && after.contains(step) {
                self.pulses[axis.index()] += 1;
                self.carriage[axis.index()] += if after.contains(OutputBits::direction(axis)) {
                    -1
                } else {
                    1
                };
            }
        }

        self.levels = self.levels.directions() | bits.steps();
        self.history.write(HalEvent::Step(bits.steps()));
        Ok(())
    }

    fn read_limits(&mut self) -> Result<LimitBits, Self::Error> {
        let mut limits = self.forced_limits;
        for axis in Axis::ALL {
            if let Some(at) = self.switches[axis.index()] {
                if self.carriage[axis.index()] <= at {
                    limits |= LimitBits::of(axis);
                }
            }
        }
        Ok(limits)
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed_us += u64::from(us);
    }
}

impl StepTimers for SimHal {
    fn program_step_timer(&mut self, setting: TimerSetting) {
        self.timer = Some(setting);
        self.timer_programs += 1;
        self.history.write(HalEvent::TimerProgrammed(setting));
    }

    fn set_step_interrupt(&mut self, enabled: bool) {
        self.step_interrupt = enabled;
        self.history.write(HalEvent::StepInterrupt(enabled));
    }

    fn arm_pulse_reset(&mut self, idle: OutputBits, _ticks: u8) {
        self.pending_reset = Some(idle.steps());
        self.resets_armed += 1;
        self.history.write(HalEvent::PulseResetArmed(idle.steps()));
    }

    fn enable_nested_interrupts(&mut self) {
        self.history.write(HalEvent::NestedInterrupts);
    }
}

/// Simulated sensor board and actuators.
#[derive(Debug, Default)]
pub struct SimSense {
    sense: Sense,
    intensity: u8,
    intensity_writes: u32,
    air: bool,
    gas: bool,
}

impl SimSense {
    /// Set the conditions reported by [`SenseControl::sense`].
    pub fn set_sense(&mut self, sense: Sense) {
        self.sense = sense;
    }

    /// Current laser intensity.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// How many times the laser intensity was written.
    pub fn intensity_writes(&self) -> u32 {
        self.intensity_writes
    }

    /// Air assist state.
    pub fn air(&self) -> bool {
        self.air
    }

    /// Gas assist state.
    pub fn gas(&self) -> bool {
        self.gas
    }
}

impl SenseControl for SimSense {
    fn sense(&mut self) -> Sense {
        self.sense
    }

    fn set_laser_intensity(&mut self, intensity: u8) {
        self.intensity = intensity;
        self.intensity_writes += 1;
    }

    fn set_air(&mut self, on: bool) {
        self.air = on;
    }

    fn set_gas(&mut self, on: bool) {
        self.gas = on;
    }
}
