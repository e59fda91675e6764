//! Timing configuration for the pulse generator.

use serde::Deserialize;

use super::units::StepsPerMinute;

/// Microseconds between the step interrupt firing and the step pins changing.
///
/// Subtracted from the pulse width when arming the pulse-reset one-shot.
pub const PULSE_RESET_LATENCY_US: u32 = 2;

/// Prescaler of the pulse-reset one-shot, as a shift.
pub const PULSE_RESET_PRESCALE_SHIFT: u32 = 3;

/// Timing constants for step generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Timer clock in Hz.
    pub cpu_frequency_hz: u32,

    /// Width of a step pulse in microseconds.
    pub pulse_microseconds: u32,

    /// Number of speed adjustments per second of wall time.
    pub acceleration_ticks_per_second: u32,

    /// Slowest step rate the rate timer is ever programmed with.
    pub minimum_steps_per_minute: StepsPerMinute,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cpu_frequency_hz: 16_000_000,
            pulse_microseconds: 5,
            acceleration_ticks_per_second: 200,
            minimum_steps_per_minute: StepsPerMinute(1600),
        }
    }
}

impl TimingConfig {
    /// Timer cycles per microsecond.
    #[inline]
    pub fn cycles_per_microsecond(&self) -> u32 {
        self.cpu_frequency_hz / 1_000_000
    }

    /// Timer cycles per minute, the numerator of every rate conversion.
    #[inline]
    pub fn cycles_per_minute(&self) -> u64 {
        u64::from(self.cpu_frequency_hz) * 60
    }

    /// Timer cycles between two speed adjustments.
    #[inline]
    pub fn cycles_per_acceleration_tick(&self) -> u32 {
        self.cpu_frequency_hz / self.acceleration_ticks_per_second.max(1)
    }

    /// Reload count for the 8-bit pulse-reset one-shot, or `None` if the
    /// configured pulse width does not fit.
    pub fn pulse_reset_ticks(&self) -> Option<u8> {
        let width = self.pulse_microseconds.checked_sub(PULSE_RESET_LATENCY_US)?;
        if width == 0 {
            return None;
        }
        let ticks = width.checked_mul(self.cycles_per_microsecond())? >> PULSE_RESET_PRESCALE_SHIFT;
        u8::try_from(ticks).ok().filter(|t| *t > 0)
    }

    /// Timer cycles between step events at the given rate.
    ///
    /// Rates below the configured minimum are raised to it first.
    pub fn cycles_per_step_event(&self, rate: StepsPerMinute) -> u32 {
        let rate = rate.0.max(self.minimum_steps_per_minute.0).max(1);
        let cycles = self.cycles_per_minute() / u64::from(rate);
        u32::try_from(cycles).unwrap_or(u32::MAX)
    }
}
