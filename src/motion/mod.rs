//! Motion module for laser-stepper.
//!
//! Block model, rate quantization, the trapezoidal velocity profile and the
//! Bresenham line tracer. Everything here is pure state machinery; the
//! dispatch loop in [`crate::stepper`] ties it to hardware.

mod block;
mod position;
mod profile;
mod quantizer;
mod tracer;

pub use block::{Block, BlockKind, LineBlock};
pub use position::Position;
pub use profile::{MotionPhase, VelocityProfile};
pub use quantizer::{Prescaler, TimerSetting, MAX_CEILING};
pub use tracer::BresenhamTracer;
