//! Unit test harness for laser-stepper.
//!
//! This module organizes unit tests for each component of the library.

mod config_parsing;
mod pin_port;
mod properties;
