//! Velocity profile controller.
//!
//! Walks the trapezoid of a [`LineBlock`] one step event at a time. Speed
//! changes happen on acceleration ticks, which are generated at a fixed
//! wall-clock frequency by accumulating the timer cycles spent per step
//! event. No second timer is needed for the ticks.

use crate::config::units::StepsPerMinute;
use crate::config::TimingConfig;

use super::block::LineBlock;
use super::quantizer::TimerSetting;

/// Current phase of a line block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Ramping up toward the nominal rate.
    Accelerating,
    /// Holding the nominal rate.
    Cruising,
    /// Ramping down toward the final rate.
    Decelerating,
    /// All step events done.
    Complete,
}

impl MotionPhase {
    /// Classify a block after `completed` step events.
    pub fn of(block: &LineBlock, completed: u32) -> Self {
        if completed >= block.step_event_count {
            MotionPhase::Complete
        } else if completed < block.accelerate_until {
            MotionPhase::Accelerating
        } else if completed >= block.decelerate_after {
            MotionPhase::Decelerating
        } else {
            MotionPhase::Cruising
        }
    }
}

/// Live rate of the current block plus the acceleration tick generator.
#[derive(Debug, Clone)]
pub struct VelocityProfile {
    timing: TimingConfig,
    cycles_per_tick: u32,
    adjusted_rate: StepsPerMinute,
    cycles_per_step_event: u32,
    setting: TimerSetting,
    tick_counter: u32,
}

impl VelocityProfile {
    /// Create a controller running at the minimum rate.
    pub fn new(timing: &TimingConfig) -> Self {
        let rate = timing.minimum_steps_per_minute;
        let setting = TimerSetting::from_cycles(timing.cycles_per_step_event(rate));
        Self {
            timing: timing.clone(),
            cycles_per_tick: timing.cycles_per_acceleration_tick(),
            adjusted_rate: rate,
            cycles_per_step_event: setting.actual_cycles(),
            setting,
            tick_counter: 0,
        }
    }

    /// Switch to `rate` and return the timer setting that produces it.
    ///
    /// Rates below the configured minimum run at the minimum. The achieved
    /// period, not the requested one, feeds the tick generator.
    pub fn set_rate(&mut self, rate: StepsPerMinute) -> TimerSetting {
        let setting = TimerSetting::from_cycles(self.timing.cycles_per_step_event(rate));
        self.adjusted_rate = rate;
        self.cycles_per_step_event = setting.actual_cycles();
        self.setting = setting;
        setting
    }

    /// Prepare for a new block and return the entry timer setting.
    pub fn begin(&mut self, block: &LineBlock) -> TimerSetting {
        self.tick_counter = self.half_tick();
        self.set_rate(block.initial_rate)
    }

    /// Advance the profile after step event number `completed` of `block`.
    ///
    /// Returns a new timer setting when the rate changed. Must not be called
    /// once the block is complete; in that case nothing happens.
    pub fn advance(&mut self, block: &LineBlock, completed: u32) -> Option<TimerSetting> {
        match MotionPhase::of(block, completed) {
            MotionPhase::Accelerating => {
                if !self.acceleration_tick() {
                    return None;
                }
                let rate = self
                    .adjusted_rate
                    .0
                    .saturating_add(block.rate_delta.0)
                    .min(block.nominal_rate.0);
                Some(self.set_rate(StepsPerMinute(rate)))
            }
            MotionPhase::Decelerating if completed == block.decelerate_after => {
                // Midpoint rule: the ramp down starts half a tick in.
                self.tick_counter = self.half_tick();
                None
            }
            MotionPhase::Decelerating => {
                if !self.acceleration_tick() {
                    return None;
                }
                let rate = self
                    .adjusted_rate
                    .0
                    .saturating_sub(block.rate_delta.0)
                    .max(block.final_rate.0);
                Some(self.set_rate(StepsPerMinute(rate)))
            }
            MotionPhase::Cruising => {
                if self.adjusted_rate == block.nominal_rate {
                    None
                } else {
                    Some(self.set_rate(block.nominal_rate))
                }
            }
            MotionPhase::Complete => None,
        }
    }

    /// Accumulate one step event's worth of cycles. Returns `true` when a
    /// whole acceleration tick has elapsed.
    fn acceleration_tick(&mut self) -> bool {
        self.tick_counter = self.tick_counter.saturating_add(self.cycles_per_step_event);
        if self.tick_counter > self.cycles_per_tick {
            self.tick_counter -= self.cycles_per_tick;
            true
        } else {
            false
        }
    }

    #[inline]
    fn half_tick(&self) -> u32 {
        self.cycles_per_tick / 2
    }

    /// Live step rate.
    #[inline]
    pub fn adjusted_rate(&self) -> StepsPerMinute {
        self.adjusted_rate
    }

    /// Timer setting of the live rate.
    #[inline]
    pub fn timer_setting(&self) -> TimerSetting {
        self.setting
    }

    /// Timer cycles per step event actually achieved by the timer.
    #[inline]
    pub fn cycles_per_step_event(&self) -> u32 {
        self.cycles_per_step_event
    }

    /// Acceleration tick accumulator.
    #[inline]
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }
}
