//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::units::Axis;
use super::{HomingConfig, StepperConfig, TimingConfig};

/// Validate a stepper configuration.
///
/// Checks:
/// - Timer clock, tick rate and minimum rate are usable
/// - The pulse width fits the pulse-reset one-shot
/// - Every axis has a positive steps-per-mm factor
/// - Homing pulse periods leave room for the pulse itself
pub fn validate_config(config: &StepperConfig) -> Result<()> {
    validate_timing(&config.timing)?;

    for axis in Axis::ALL {
        let value = config.axes.axis(axis).steps_per_mm;
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidStepsPerMm { axis, value }));
        }
    }

    validate_homing(&config.homing, config.timing.pulse_microseconds)?;

    Ok(())
}

fn validate_timing(timing: &TimingConfig) -> Result<()> {
    if timing.cpu_frequency_hz == 0 {
        return Err(Error::Config(ConfigError::InvalidCpuFrequency(
            timing.cpu_frequency_hz,
        )));
    }

    let ticks = timing.acceleration_ticks_per_second;
    if ticks == 0 || ticks > timing.cpu_frequency_hz {
        return Err(Error::Config(ConfigError::InvalidTickRate(ticks)));
    }

    if timing.minimum_steps_per_minute.0 == 0 {
        return Err(Error::Config(ConfigError::InvalidMinimumRate(
            timing.minimum_steps_per_minute.0,
        )));
    }

    if timing.pulse_reset_ticks().is_none() {
        return Err(Error::Config(ConfigError::InvalidPulseWidth(
            timing.pulse_microseconds,
        )));
    }

    Ok(())
}

fn validate_homing(homing: &HomingConfig, pulse_us: u32) -> Result<()> {
    for period_us in [homing.approach_us_per_pulse, homing.leave_us_per_pulse] {
        if period_us <= pulse_us {
            return Err(Error::Config(ConfigError::InvalidHomingPeriod { period_us, pulse_us }));
        }
    }
    Ok(())
}
