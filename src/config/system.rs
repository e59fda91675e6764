//! System configuration - root configuration structure.

use serde::Deserialize;

use super::axis::AxesConfig;
use super::homing::HomingConfig;
use super::timing::TimingConfig;

/// Root configuration structure from TOML.
///
/// Every section is optional and falls back to the stock machine values.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Pulse and acceleration timing.
    pub timing: TimingConfig,

    /// Per-axis scaling and signal polarity.
    pub axes: AxesConfig,

    /// Homing cycle parameters.
    pub homing: HomingConfig,
}
