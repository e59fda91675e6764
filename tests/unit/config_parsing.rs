//! Unit tests for TOML configuration parsing.

use laser_stepper::config::units::{Axis, Millimeters, Steps, StepsPerMinute};
use laser_stepper::config::{load_config, parse_config, StepperConfig};
use laser_stepper::error::ConfigError;
use laser_stepper::{Error, OutputBits};

const MACHINE_CONFIG: &str = r#"
[timing]
cpu_frequency_hz = 16000000
pulse_microseconds = 5
acceleration_ticks_per_second = 100
minimum_steps_per_minute = 1200

[axes.x]
steps_per_mm = 32.80839895
invert_step = true

[axes.y]
steps_per_mm = 32.80839895
invert_direction = true

[axes.z]
steps_per_mm = 10.0

[homing]
approach_us_per_pulse = 800
leave_us_per_pulse = 4000
overshoot_pulses = 4
max_pulses = 50000
"#;

/// Test parsing a complete machine configuration.
#[test]
fn test_parse_machine_config() {
    let config = parse_config(MACHINE_CONFIG).expect("Failed to parse TOML");

    assert_eq!(config.timing.acceleration_ticks_per_second, 100);
    assert_eq!(config.timing.minimum_steps_per_minute, StepsPerMinute(1200));
    assert_eq!(config.timing.cycles_per_acceleration_tick(), 160_000);
    assert_eq!(config.axes.z.steps_per_mm, 10.0);
    assert_eq!(config.homing.overshoot_pulses, 4);
    assert_eq!(config.homing.max_pulses, Some(50_000));
    assert_eq!(
        config.axes.polarity_mask(),
        OutputBits::X_STEP | OutputBits::Y_DIRECTION
    );
}

/// Test that unit conversion uses the per-axis factor.
#[test]
fn test_axis_conversion() {
    let config = parse_config(MACHINE_CONFIG).unwrap();
    assert_eq!(config.axes.to_steps(Axis::Z, Millimeters(1.25)), Steps(13));
    assert_eq!(config.axes.to_steps(Axis::X, Millimeters(100.0)), Steps(3281));
}

/// Test that missing sections fall back to defaults.
#[test]
fn test_defaults_fill_missing_sections() {
    let config = parse_config("[homing]\novershoot_pulses = 0\n").unwrap();
    assert_eq!(config.timing, StepperConfig::default().timing);
    assert_eq!(config.axes, StepperConfig::default().axes);
    assert_eq!(config.homing.overshoot_pulses, 0);
    assert_eq!(config.homing.approach_us_per_pulse, 1000);
}

/// Test that invalid timing is rejected after parsing.
#[test]
fn test_invalid_timing_rejected() {
    let result = parse_config("[timing]\ncpu_frequency_hz = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidCpuFrequency(0)))
    ));

    let result = parse_config("[timing]\nminimum_steps_per_minute = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidMinimumRate(0)))
    ));

    let result = parse_config("[timing]\npulse_microseconds = 2\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidPulseWidth(2)))
    ));
}

/// Test that unknown value types produce a parse error.
#[test]
fn test_type_mismatch_rejected() {
    let result = parse_config("[axes.x]\ninvert_step = \"yes\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test loading from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("laser-stepper-{}.toml", std::process::id()));
    std::fs::write(&path, MACHINE_CONFIG).unwrap();

    let config = load_config(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(config.unwrap().homing.leave_us_per_pulse, 4000);
}

/// Test that a missing file reports an I/O error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/laser-stepper.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
