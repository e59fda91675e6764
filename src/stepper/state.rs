//! Runtime state shared between the step interrupt and the foreground.
//!
//! Everything here is atomic so a single [`StepperState`] can sit in a
//! `static` and be touched from both contexts without a critical section.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::units::{Axis, Millimeters, Steps};
use crate::config::AxesConfig;
use crate::motion::Position;

/// Why motion was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StopCause {
    /// The host asked for a stop.
    HostRequest = 1,
    /// The serial receive buffer overflowed.
    RxBufferOverflow = 2,
    /// A limit switch was hit during motion.
    LimitHit = 3,
    /// Main power was lost.
    PowerOff = 4,
    /// The safety interlock (chiller) dropped out.
    InterlockOff = 5,
}

impl StopCause {
    /// Wire code of the cause.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code. Zero and unknown codes yield `None`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(StopCause::HostRequest),
            2 => Some(StopCause::RxBufferOverflow),
            3 => Some(StopCause::LimitHit),
            4 => Some(StopCause::PowerOff),
            5 => Some(StopCause::InterlockOff),
            _ => None,
        }
    }
}

const NO_CAUSE: u8 = 0;

/// Flags and position shared with the step interrupt.
#[derive(Debug)]
pub struct StepperState {
    busy: AtomicBool,
    stop_requested: AtomicBool,
    stop_cause: AtomicU8,
    processing: AtomicBool,
    position: Position,
}

impl Default for StepperState {
    fn default() -> Self {
        Self::new()
    }
}

impl StepperState {
    /// Idle state at the origin with no stop pending.
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            stop_cause: AtomicU8::new(NO_CAUSE),
            processing: AtomicBool::new(false),
            position: Position::new(),
        }
    }

    /// Try to enter the step interrupt body.
    ///
    /// Returns `None` if another invocation is still running. The returned
    /// guard leaves the body when dropped.
    pub fn try_enter(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard { busy: &self.busy })
    }

    /// Whether the step interrupt body is executing.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    /// Ask the dispatch loop to halt and drop all queued blocks.
    pub fn request_stop(&self, cause: StopCause) {
        self.stop_cause.store(cause.code(), Ordering::Relaxed);
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop is pending.
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Cause of the last stop request.
    ///
    /// Survives [`resume`](Self::resume) so the host can still query it.
    pub fn stop_cause(&self) -> Option<StopCause> {
        StopCause::from_code(self.stop_cause.load(Ordering::Relaxed))
    }

    /// Clear a pending stop. Discarded motion is not restored.
    pub fn resume(&self) {
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Whether blocks are being processed.
    #[inline]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub(crate) fn set_processing(&self, processing: bool) {
        self.processing.store(processing, Ordering::Release);
    }

    /// Block until the queue has drained.
    ///
    /// `wait` is called while blocks are being processed; on hardware it is
    /// a low-power wait for the next interrupt.
    pub fn synchronize(&self, mut wait: impl FnMut()) {
        while self.is_processing() {
            wait();
        }
    }

    /// Absolute position of all axes in steps.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Absolute position of one axis in steps.
    #[inline]
    pub fn position_steps(&self, axis: Axis) -> Steps {
        self.position.steps(axis)
    }

    /// Absolute position of one axis in millimeters.
    pub fn position_mm(&self, axis: Axis, axes: &AxesConfig) -> Millimeters {
        axes.to_mm(axis, self.position.steps(axis))
    }

    /// Wait for the queue to drain, then overwrite the absolute position.
    pub fn set_position(&self, mm: [Millimeters; 3], axes: &AxesConfig, wait: impl FnMut()) {
        self.synchronize(wait);
        for axis in Axis::ALL {
            self.position.set_steps(axis, axes.to_steps(axis, mm[axis.index()]));
        }
    }

    /// Clear the stop flags and busy guard. Only valid before the step
    /// interrupt is enabled.
    pub(crate) fn reset_flags(&self) {
        self.busy.store(false, Ordering::Relaxed);
        self.stop_cause.store(NO_CAUSE, Ordering::Relaxed);
        self.stop_requested.store(false, Ordering::Release);
    }
}

/// Marks the step interrupt body as running until dropped.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
