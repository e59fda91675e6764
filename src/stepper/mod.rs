//! Step pulse generation at runtime.
//!
//! [`Stepper`] owns the hardware and the collaborators and is called from
//! the step-rate timer interrupt. [`StepperState`] holds what the interrupt
//! shares with the foreground: stop flags, the processing flag and the
//! absolute position.

mod buffer;
mod collab;
mod dispatch;
mod homing;
mod state;

pub use buffer::BlockBuffer;
pub use collab::{BlockQueue, PositionTracker, Sense, SenseControl};
pub use dispatch::{Dispatch, Stepper};
pub use homing::{run_homing_cycle, HomingPhase};
pub use state::{BusyGuard, StepperState, StopCause};
