//! # laser-stepper
//!
//! Interrupt-driven step pulse generation for a three-axis laser cutter.
//!
//! ## Features
//!
//! - **Bresenham tracing**: All axes of a line move in lockstep from one step-event counter
//! - **Trapezoidal profiles**: Acceleration ticks at a fixed wall-clock rate, independent of step rate
//! - **Bounded pulse width**: A one-shot timer ends every step pulse on schedule
//! - **Safety stops**: Limit, interlock and power faults drop the queue; an open door pauses
//! - **Homing**: Per-axis approach and back-off against the limit switches
//! - **no_std compatible**: Shared state is lock-free and fits in a `static`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use laser_stepper::{Block, LineBlock, Stepper, StepperState};
//!
//! static STATE: StepperState = StepperState::new();
//!
//! let config = laser_stepper::load_config("stepper.toml")?;
//! let mut stepper = Stepper::new(&STATE, board, planner, sensors, gcode, &config)?;
//!
//! stepper.wake_up();
//! // From the step-rate timer interrupt:
//! stepper.on_step_interrupt()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the macros are visible in every module.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod motion;
pub mod stepper;

// Re-exports for ergonomic API
pub use config::{validate_config, AxesConfig, AxisConfig, HomingConfig, StepperConfig, TimingConfig};
pub use error::{Error, Result};
pub use hal::{Board, LimitBits, OutputBits, PulsePort, StepTimers};
pub use motion::{Block, LineBlock, MotionPhase, TimerSetting, VelocityProfile};
pub use stepper::{BlockBuffer, Dispatch, Sense, Stepper, StepperState, StopCause};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Axis, AxisSet, Millimeters, Steps, StepsPerMinute};
