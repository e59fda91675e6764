//! embedded-hal 1.0 implementation of [`PulsePort`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::units::Axis;
use crate::error::PortError;

use super::{LimitBits, OutputBits, PulsePort};

/// Stepping port built from individual pins.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `LIMIT`: limit switch input (must implement `InputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
///
/// Pins of one role share a type, so HALs with typed pins need their
/// erased/degraded pin types here.
pub struct PinPort<STEP, DIR, LIMIT, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    DELAY: DelayNs,
{
    step: [STEP; 3],
    dir: [DIR; 3],
    limit: [LIMIT; 3],
    delay: DELAY,
    /// Switches pull the input low when hit.
    limits_active_low: bool,
}

impl<STEP, DIR, LIMIT, DELAY> PinPort<STEP, DIR, LIMIT, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    DELAY: DelayNs,
{
    /// Create a port. Pins are indexed X, Y, Z.
    ///
    /// Limit switches default to active-low (normally open to ground with pull-ups).
    pub fn new(step: [STEP; 3], dir: [DIR; 3], limit: [LIMIT; 3], delay: DELAY) -> Self {
        Self {
            step,
            dir,
            limit,
            delay,
            limits_active_low: true,
        }
    }

    /// Treat a high limit input as asserted.
    pub fn with_active_high_limits(mut self) -> Self {
        self.limits_active_low = false;
        self
    }

    /// Release the pins and the delay.
    pub fn release(self) -> ([STEP; 3], [DIR; 3], [LIMIT; 3], DELAY) {
        (self.step, self.dir, self.limit, self.delay)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), PortError> {
    if high {
        pin.set_high().map_err(|_| PortError::Pin)
    } else {
        pin.set_low().map_err(|_| PortError::Pin)
    }
}

impl<STEP, DIR, LIMIT, DELAY> PulsePort for PinPort<STEP, DIR, LIMIT, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    DELAY: DelayNs,
{
    type Error = PortError;

    fn write_direction(&mut self, bits: OutputBits) -> Result<(), Self::Error> {
        for axis in Axis::ALL {
            drive(&mut self.dir[axis.index()], bits.contains(OutputBits::direction(axis)))?;
        }
        Ok(())
    }

    fn write_step(&mut self, bits: OutputBits) -> Result<(), Self::Error> {
        for axis in Axis::ALL {
            drive(&mut self.step[axis.index()], bits.contains(OutputBits::step(axis)))?;
        }
        Ok(())
    }

    fn read_limits(&mut self) -> Result<LimitBits, Self::Error> {
        let mut limits = LimitBits::empty();
        for axis in Axis::ALL {
            let pin = &mut self.limit[axis.index()];
            let asserted = if self.limits_active_low {
                pin.is_low().map_err(|_| PortError::Pin)?
            } else {
                pin.is_high().map_err(|_| PortError::Pin)?
            };
            if asserted {
                limits |= LimitBits::of(axis);
            }
        }
        Ok(limits)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
