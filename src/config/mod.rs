//! Configuration module for laser-stepper.
//!
//! Provides the timing, axis and homing constants of the pulse generator,
//! loadable from TOML files (with `std` feature) or built in code.

mod axis;
mod homing;
mod system;
mod timing;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxesConfig, AxisConfig};
pub use homing::HomingConfig;
pub use system::StepperConfig;
pub use timing::{TimingConfig, PULSE_RESET_LATENCY_US};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Axis, AxisSet, Millimeters, Steps, StepsPerMinute};
