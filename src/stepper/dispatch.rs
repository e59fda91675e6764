//! The step interrupt.
//!
//! [`Stepper::on_step_interrupt`] runs once per step event at the rate the
//! velocity profile programs into the step-rate timer. It emits the pulse
//! computed on the previous entry, then computes the next one, so the pulse
//! edge timing does not depend on how long the computation takes.

use crate::config::units::{Axis, AxisSet, Millimeters};
use crate::config::{validate_config, AxesConfig, HomingConfig, StepperConfig};
use crate::error::{ConfigError, Error, Result, StepperError};
use crate::hal::{OutputBits, PulsePort, StepTimers};
use crate::motion::{Block, BlockKind, BresenhamTracer, LineBlock, TimerSetting, VelocityProfile};

use super::collab::{BlockQueue, PositionTracker, SenseControl};
use super::homing::{run_homing_cycle, HomingPhase};
use super::state::{StepperState, StopCause};

/// Outcome of one step interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A previous invocation was still running; nothing happened.
    Busy,
    /// A pending stop was executed: idle, queue dropped.
    Halted,
    /// A fault was detected; the stop executes on the next entry.
    Faulted(StopCause),
    /// A pausing condition holds; no pulse was emitted.
    Paused,
    /// The queue ran empty and the stepper went idle.
    Drained,
    /// One step event of a line block was traced.
    Stepped {
        /// Logical step and direction pattern to emit on the next entry.
        bits: OutputBits,
        /// Whether this was the last step event of the block.
        block_complete: bool,
    },
    /// An actuator block was executed.
    Actuated(BlockKind),
}

/// Step generator driving a [`PulsePort`] and [`StepTimers`] from a block queue.
pub struct Stepper<'a, H, Q, S, G> {
    state: &'a StepperState,
    hal: H,
    queue: Q,
    sense: S,
    gcode: G,
    axes: AxesConfig,
    homing: HomingConfig,
    pulse_us: u32,
    pulse_reset_ticks: u8,
    polarity: OutputBits,
    profile: VelocityProfile,
    tracer: BresenhamTracer,
    current: Option<Block>,
    step_events_completed: u32,
    out_bits: OutputBits,
}

impl<'a, H, Q, S, G> Stepper<'a, H, Q, S, G>
where
    H: PulsePort + StepTimers,
    Error: From<H::Error>,
    Q: BlockQueue,
    S: SenseControl,
    G: PositionTracker,
{
    /// Validate `config`, put the outputs at their idle levels and start idle.
    ///
    /// Clears the position and any pending stop in `state`.
    pub fn new(
        state: &'a StepperState,
        hal: H,
        queue: Q,
        sense: S,
        gcode: G,
        config: &StepperConfig,
    ) -> Result<Self> {
        validate_config(config)?;
        let pulse_reset_ticks = config
            .timing
            .pulse_reset_ticks()
            .ok_or(ConfigError::InvalidPulseWidth(config.timing.pulse_microseconds))?;
        let polarity = config.axes.polarity_mask();
        let profile = VelocityProfile::new(&config.timing);
        let setting = profile.timer_setting();

        let mut stepper = Self {
            state,
            hal,
            queue,
            sense,
            gcode,
            axes: config.axes.clone(),
            homing: config.homing.clone(),
            pulse_us: config.timing.pulse_microseconds,
            pulse_reset_ticks,
            polarity,
            profile,
            tracer: BresenhamTracer::new(),
            current: None,
            step_events_completed: 0,
            out_bits: polarity,
        };

        stepper.hal.write_direction(polarity)?;
        stepper.hal.write_step(polarity)?;
        stepper.hal.program_step_timer(setting);
        state.position().reset(Axis::ALL);
        state.reset_flags();
        stepper.go_idle();

        info!("stepper initialized, polarity {}", polarity.bits());
        Ok(stepper)
    }

    /// Start processing blocks if not already doing so.
    pub fn wake_up(&mut self) {
        if !self.state.is_processing() {
            self.state.set_processing(true);
            self.out_bits = self.polarity;
            self.hal.set_step_interrupt(true);
            debug!("stepper wake up");
        }
    }

    /// Stop processing blocks and switch the laser off.
    pub fn go_idle(&mut self) {
        self.state.set_processing(false);
        self.current = None;
        self.hal.set_step_interrupt(false);
        self.sense.set_laser_intensity(0);
        debug!("stepper idle");
    }

    /// Body of the step-rate timer interrupt.
    pub fn on_step_interrupt(&mut self) -> Result<Dispatch> {
        let state = self.state;
        let Some(_guard) = state.try_enter() else {
            return Ok(Dispatch::Busy);
        };

        if state.stop_requested() {
            self.go_idle();
            self.queue.reset();
            self.queue.request_position_update();
            self.gcode.request_position_update();
            warn!("stepper halted: {:?}", state.stop_cause());
            return Ok(Dispatch::Halted);
        }

        let sense = self.sense.sense();
        if sense.any() {
            return Ok(match sense.fault() {
                Some(cause) => {
                    state.request_stop(cause);
                    error!("stop requested: {:?}", cause);
                    Dispatch::Faulted(cause)
                }
                None => {
                    debug!("stepper paused: {}", sense.bits());
                    Dispatch::Paused
                }
            });
        }

        // Direction first so drivers see it settled before the step edge.
        self.hal.write_direction(self.out_bits)?;
        self.hal.write_step(self.out_bits)?;
        self.hal.arm_pulse_reset(self.polarity, self.pulse_reset_ticks);
        self.hal.enable_nested_interrupts();

        let block = match self.current {
            Some(block) => block,
            None => match self.queue.current_block() {
                Some(block) => {
                    trace!("block acquired: {:?}", block.kind());
                    if let Block::Line(line) = &block {
                        self.begin_line(line);
                    }
                    self.current = Some(block);
                    block
                }
                None => {
                    self.go_idle();
                    return Ok(Dispatch::Drained);
                }
            },
        };

        let outcome = match block {
            Block::Line(line) => {
                let bits = self.tracer.trace(&line, state.position());
                self.step_events_completed += 1;
                self.out_bits = bits ^ self.polarity;

                let block_complete = self.step_events_completed >= line.step_event_count;
                if block_complete {
                    self.finish_block();
                } else if let Some(setting) =
                    self.profile.advance(&line, self.step_events_completed)
                {
                    self.program_rate(setting, line.nominal_laser_intensity);
                }
                Dispatch::Stepped {
                    bits,
                    block_complete,
                }
            }
            Block::AirEnable => {
                self.sense.set_air(true);
                self.finish_block();
                Dispatch::Actuated(BlockKind::AirEnable)
            }
            Block::GasEnable => {
                self.sense.set_gas(true);
                self.finish_block();
                Dispatch::Actuated(BlockKind::GasEnable)
            }
            Block::AirGasDisable => {
                self.sense.set_air(false);
                self.sense.set_gas(false);
                self.finish_block();
                Dispatch::Actuated(BlockKind::AirGasDisable)
            }
        };
        Ok(outcome)
    }

    fn begin_line(&mut self, line: &LineBlock) {
        trace!(
            "line block: {} events, initial rate {}",
            line.step_event_count,
            line.initial_rate.0
        );
        let setting = self.profile.begin(line);
        self.program_rate(setting, line.nominal_laser_intensity);
        self.tracer.begin(line);
        self.step_events_completed = 0;
    }

    fn program_rate(&mut self, setting: TimerSetting, intensity: u8) {
        self.hal.program_step_timer(setting);
        // Constant power per block; rate changes re-assert it.
        self.sense.set_laser_intensity(intensity);
    }

    fn finish_block(&mut self) {
        self.current = None;
        self.queue.discard_current_block();
    }

    /// Home `axes`: approach the switches, back off, then zero their position.
    ///
    /// Fails with [`StepperError::Busy`] while blocks are being processed;
    /// call [`StepperState::synchronize`] first.
    pub fn homing_cycle(&mut self, axes: AxisSet) -> Result<()> {
        if self.state.is_processing() {
            return Err(StepperError::Busy.into());
        }
        for phase in [HomingPhase::Approach, HomingPhase::Leave] {
            run_homing_cycle(
                &mut self.hal,
                &self.homing,
                self.pulse_us,
                self.polarity,
                axes,
                phase,
            )?;
        }
        self.state.position().reset(axes.axes());
        info!("homed axes {}", axes.bits());
        Ok(())
    }

    /// Home X and Y.
    pub fn home(&mut self) -> Result<()> {
        self.homing_cycle(AxisSet::X | AxisSet::Y)
    }
}

impl<'a, H, Q, S, G> Stepper<'a, H, Q, S, G> {
    /// Shared state.
    pub fn state(&self) -> &'a StepperState {
        self.state
    }

    /// Absolute position of `axis` in millimeters.
    pub fn position_mm(&self, axis: Axis) -> Millimeters {
        self.state.position_mm(axis, &self.axes)
    }

    /// Output polarity mask.
    pub fn polarity(&self) -> OutputBits {
        self.polarity
    }

    /// Physical pattern the next entry will emit.
    pub fn out_bits(&self) -> OutputBits {
        self.out_bits
    }

    /// Block being executed.
    pub fn current_block(&self) -> Option<&Block> {
        self.current.as_ref()
    }

    /// Step events done in the current line block.
    pub fn step_events_completed(&self) -> u32 {
        self.step_events_completed
    }

    /// Velocity profile of the current line block.
    pub fn profile(&self) -> &VelocityProfile {
        &self.profile
    }

    /// Hardware context.
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Mutable hardware context.
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Block queue.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Mutable block queue.
    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// Sensors and actuators.
    pub fn sense(&self) -> &S {
        &self.sense
    }

    /// Mutable sensors and actuators.
    pub fn sense_mut(&mut self) -> &mut S {
        &mut self.sense
    }

    /// Position tracker.
    pub fn gcode(&self) -> &G {
        &self.gcode
    }

    /// Give back the collaborators.
    pub fn release(self) -> (H, Q, S, G) {
        (self.hal, self.queue, self.sense, self.gcode)
    }
}
