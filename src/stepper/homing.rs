//! Homing against the limit switches.
//!
//! A blocking busy-wait procedure that drives the port directly. It must
//! only run while the step interrupt is idle.

use crate::config::units::{Axis, AxisSet};
use crate::config::HomingConfig;
use crate::error::{Error, Result, StepperError};
use crate::hal::{OutputBits, PulsePort};

/// Which half of the homing cycle to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Drive toward the switches until they trigger.
    Approach,
    /// Back off the switches until they release.
    Leave,
}

impl HomingPhase {
    /// Pulse period of this phase.
    pub fn us_per_pulse(self, config: &HomingConfig) -> u32 {
        match self {
            HomingPhase::Approach => config.approach_us_per_pulse,
            HomingPhase::Leave => config.leave_us_per_pulse,
        }
    }

    /// Logical direction bits of this phase. Switches sit at the negative end.
    fn direction_bits(self) -> OutputBits {
        match self {
            HomingPhase::Approach => OutputBits::DIRECTION_MASK,
            HomingPhase::Leave => OutputBits::empty(),
        }
    }

    /// Whether the switch state means the axis reached its goal.
    fn settled(self, asserted: bool) -> bool {
        match self {
            HomingPhase::Approach => asserted,
            HomingPhase::Leave => !asserted,
        }
    }
}

/// Run one homing phase on `axes`.
///
/// Each axis stops on its own once its switch has reached the goal state and
/// `overshoot_pulses` further pulses have been issued. `polarity` is the
/// output invert mask and `pulse_us` the step pulse width. Returns the
/// number of pulses issued per axis.
pub fn run_homing_cycle<P>(
    port: &mut P,
    config: &HomingConfig,
    pulse_us: u32,
    polarity: OutputBits,
    axes: AxisSet,
    phase: HomingPhase,
) -> Result<[u32; 3]>
where
    P: PulsePort,
    Error: From<P::Error>,
{
    let step_delay = phase.us_per_pulse(config).saturating_sub(pulse_us);
    let mut active = axes;
    let mut overshoot = [config.overshoot_pulses; 3];
    let mut pulses = [0u32; 3];
    let mut total = 0u32;

    debug!("homing {:?}, axes {}", phase, axes.bits());
    port.write_direction(phase.direction_bits() ^ polarity)?;

    loop {
        let limits = port.read_limits()?;
        for axis in active.axes() {
            if phase.settled(limits.asserted(axis)) {
                let remaining = &mut overshoot[axis.index()];
                if *remaining == 0 {
                    active.remove(AxisSet::of(axis));
                    trace!("homing: {:?} settled after {} pulses", axis, pulses[axis.index()]);
                } else {
                    *remaining -= 1;
                }
            }
        }
        if active.is_empty() {
            break;
        }

        if let Some(max) = config.max_pulses {
            if total >= max {
                let axis = active.axes().next().unwrap_or(Axis::X);
                error!("homing: {:?} did not settle after {} pulses", axis, total);
                return Err(StepperError::HomingRunaway { axis }.into());
            }
        }

        let mut step = OutputBits::empty();
        for axis in active.axes() {
            step |= OutputBits::step(axis);
            pulses[axis.index()] += 1;
        }
        port.write_step(step ^ polarity)?;
        port.delay_us(pulse_us);
        port.write_step(polarity)?;
        port.delay_us(step_delay);
        total += 1;
    }

    Ok(pulses)
}
