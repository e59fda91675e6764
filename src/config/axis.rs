//! Per-axis configuration.

use serde::Deserialize;

use super::units::{Axis, Millimeters, Steps};
use crate::hal::OutputBits;

/// Configuration of a single axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    /// Steps per millimeter of carriage travel.
    pub steps_per_mm: f32,

    /// Step signal is active-low.
    pub invert_step: bool,

    /// Direction signal logic is inverted.
    pub invert_direction: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            steps_per_mm: 32.808_4,
            invert_step: false,
            invert_direction: false,
        }
    }
}

/// Configuration of all three axes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    /// X axis.
    pub x: AxisConfig,
    /// Y axis.
    pub y: AxisConfig,
    /// Z axis.
    pub z: AxisConfig,
}

impl AxesConfig {
    /// Get the configuration of one axis.
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Output polarity mask applied to every pattern written to the port.
    pub fn polarity_mask(&self) -> OutputBits {
        let mut mask = OutputBits::empty();
        for axis in Axis::ALL {
            let config = self.axis(axis);
            if config.invert_step {
                mask |= OutputBits::step(axis);
            }
            if config.invert_direction {
                mask |= OutputBits::direction(axis);
            }
        }
        mask
    }

    /// Convert a position in millimeters to steps on `axis`.
    #[inline]
    pub fn to_steps(&self, axis: Axis, mm: Millimeters) -> Steps {
        Steps::from_mm(mm, self.axis(axis).steps_per_mm)
    }

    /// Convert a position in steps on `axis` to millimeters.
    #[inline]
    pub fn to_mm(&self, axis: Axis, steps: Steps) -> Millimeters {
        steps.to_mm(self.axis(axis).steps_per_mm)
    }
}
