//! Error types for laser-stepper.
//!
//! Stop conditions raised by the safety sensors are not errors. They are
//! reported as [`StopCause`](crate::stepper::StopCause) codes on the shared
//! stepper state. The types here cover configuration, pin access and misuse
//! of the foreground API.

use core::convert::Infallible;
use core::fmt;

use crate::config::units::Axis;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all laser-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Output or input port error
    Port(PortError),
    /// Stepper runtime error
    Stepper(StepperError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per millimeter must be finite and > 0
    InvalidStepsPerMm {
        /// Offending axis
        axis: Axis,
        /// Configured value
        value: f32,
    },
    /// CPU frequency must be > 0
    InvalidCpuFrequency(u32),
    /// Acceleration tick rate must be > 0 and not exceed the CPU frequency
    InvalidTickRate(u32),
    /// Minimum step rate must be > 0
    InvalidMinimumRate(u32),
    /// Pulse width does not fit the pulse-reset one-shot
    InvalidPulseWidth(u32),
    /// Homing pulse period must be longer than the step pulse width
    InvalidHomingPeriod {
        /// Configured period in microseconds
        period_us: u32,
        /// Step pulse width in microseconds
        pulse_us: u32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Port access errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// Pin operation failed
    Pin,
}

/// Stepper runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperError {
    /// Blocks are still being processed
    Busy,
    /// Homing exceeded the configured pulse budget without reaching its switch
    HomingRunaway {
        /// Axis that never settled
        axis: Axis,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Port(e) => write!(f, "Port error: {}", e),
            Error::Stepper(e) => write!(f, "Stepper error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerMm { axis, value } => {
                write!(f, "Invalid steps per mm for axis {}: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidCpuFrequency(v) => write!(f, "Invalid CPU frequency: {}. Must be > 0", v),
            ConfigError::InvalidTickRate(v) => {
                write!(f, "Invalid acceleration tick rate: {}. Must be > 0 and below the CPU frequency", v)
            }
            ConfigError::InvalidMinimumRate(v) => write!(f, "Invalid minimum step rate: {}. Must be > 0", v),
            ConfigError::InvalidPulseWidth(v) => {
                write!(f, "Invalid pulse width: {} us. Must be > 2 us and fit the reset timer", v)
            }
            ConfigError::InvalidHomingPeriod { period_us, pulse_us } => {
                write!(
                    f,
                    "Invalid homing period: {} us. Must be longer than the pulse width ({} us)",
                    period_us, pulse_us
                )
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::Pin => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for StepperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepperError::Busy => write!(f, "Blocks are still being processed"),
            StepperError::HomingRunaway { axis } => {
                write!(f, "Homing of axis {} did not settle within the pulse budget", axis)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Error::Port(e)
    }
}

impl From<StepperError> for Error {
    fn from(e: StepperError) -> Self {
        Error::Stepper(e)
    }
}

impl From<Infallible> for Error {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for PortError {}

#[cfg(feature = "std")]
impl std::error::Error for StepperError {}
