//! Property tests for the tracer, the velocity profile and the quantizer.

use proptest::prelude::*;

use laser_stepper::config::units::{Axis, StepsPerMinute};
use laser_stepper::hal::OutputBits;
use laser_stepper::motion::{BresenhamTracer, LineBlock, Position, TimerSetting, MAX_CEILING};
use laser_stepper::{MotionPhase, TimingConfig, VelocityProfile};

fn steps() -> impl Strategy<Value = [i32; 3]> {
    [-400i32..=400, -400i32..=400, -400i32..=400]
}

proptest! {
    #[test]
    fn tracer_emits_declared_counts(steps in steps()) {
        let block = LineBlock::from_steps(steps);
        let mut tracer = BresenhamTracer::new();
        let position = Position::new();
        let mut counts = [0u32; 3];

        tracer.begin(&block);
        let seed = tracer.counters();
        for _ in 0..block.step_event_count {
            let bits = tracer.trace(&block, &position);
            for axis in Axis::ALL {
                if bits.contains(OutputBits::step(axis)) {
                    counts[axis.index()] += 1;
                } else if block.steps_on(axis) == block.step_event_count {
                    prop_assert!(false, "dominant axis {:?} skipped an event", axis);
                }
            }
        }

        prop_assert_eq!(counts, block.steps);
        prop_assert_eq!(tracer.counters(), seed);
        for axis in Axis::ALL {
            prop_assert_eq!(position.steps(axis).0, steps[axis.index()]);
        }
    }

    #[test]
    fn profile_stays_within_bounds(
        nominal in 1600u32..200_000,
        initial_frac in 0.0f32..=1.0,
        final_frac in 0.0f32..=1.0,
        delta in 1u32..50_000,
        events in 1u32..2000,
        accel_frac in 0.0f32..=1.0,
        decel_frac in 0.0f32..=1.0,
    ) {
        let initial = (nominal as f32 * initial_frac) as u32;
        let final_rate = (nominal as f32 * final_frac) as u32;
        let accelerate_until = (events as f32 * accel_frac) as u32;
        let decelerate_after = accelerate_until
            + ((events - accelerate_until) as f32 * decel_frac) as u32;
        let block = LineBlock::from_steps([events as i32, 0, 0])
            .with_rates(
                StepsPerMinute(initial),
                StepsPerMinute(nominal),
                StepsPerMinute(final_rate),
                StepsPerMinute(delta),
            )
            .with_profile(accelerate_until, decelerate_after);
        prop_assert!(block.is_consistent());

        let timing = TimingConfig::default();
        let mut profile = VelocityProfile::new(&timing);
        profile.begin(&block);
        for completed in 1..events {
            let changed = profile.advance(&block, completed).is_some();
            let rate = profile.adjusted_rate();
            prop_assert!(rate <= block.nominal_rate);
            if changed && MotionPhase::of(&block, completed) == MotionPhase::Decelerating {
                prop_assert!(rate >= block.final_rate);
            }
        }
    }

    #[test]
    fn quantizer_rounds_down(cycles in 1u32..0x400_0000) {
        let setting = TimerSetting::from_cycles(cycles);
        let actual = setting.actual_cycles();
        prop_assert!(actual <= cycles);
        prop_assert!(cycles - actual < setting.prescaler.divisor());
    }

    #[test]
    fn quantizer_never_exceeds_slowest(cycles in any::<u32>()) {
        let actual = TimerSetting::from_cycles(cycles).actual_cycles();
        prop_assert!(actual <= u32::from(MAX_CEILING) * 1024);
    }
}
