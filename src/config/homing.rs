//! Homing cycle configuration.

use serde::Deserialize;

/// Pulse rates and overshoot used by the homing cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    /// Pulse period while approaching the limit switches, in microseconds.
    pub approach_us_per_pulse: u32,

    /// Pulse period while backing off the limit switches, in microseconds.
    pub leave_us_per_pulse: u32,

    /// Extra pulses issued after a switch changes state before the axis stops.
    pub overshoot_pulses: u8,

    /// Give up after this many pulses in a single phase.
    #[serde(default)]
    pub max_pulses: Option<u32>,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            approach_us_per_pulse: 1000,
            leave_us_per_pulse: 10_000,
            overshoot_pulses: 6,
            max_pulses: None,
        }
    }
}
