//! Unit tests for the embedded-hal pin port.

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

use laser_stepper::config::units::{Axis, AxisSet};
use laser_stepper::hal::{LimitBits, OutputBits, PinPort, PulsePort};
use laser_stepper::stepper::{run_homing_cycle, HomingPhase};
use laser_stepper::HomingConfig;

fn sets(levels: [PinState; 3]) -> [Vec<PinTransaction>; 3] {
    levels.map(|level| vec![PinTransaction::set(level)])
}

fn pins(transactions: [Vec<PinTransaction>; 3]) -> [PinMock; 3] {
    transactions.map(|t| PinMock::new(&t))
}

fn idle() -> [PinMock; 3] {
    pins([vec![], vec![], vec![]])
}

fn finish(port: PinPort<PinMock, PinMock, PinMock, NoopDelay>) {
    let (step, dir, limit, _) = port.release();
    for mut pin in step.into_iter().chain(dir).chain(limit) {
        pin.done();
    }
}

#[test]
fn test_write_step_drives_each_pin() {
    use PinState::{High, Low};
    let step = pins(sets([High, Low, High]));
    let mut port = PinPort::new(step, idle(), idle(), NoopDelay::new());

    port.write_step(OutputBits::X_STEP | OutputBits::Z_STEP | OutputBits::Y_DIRECTION)
        .unwrap();
    finish(port);
}

#[test]
fn test_write_direction_ignores_step_bits() {
    use PinState::{High, Low};
    let dir = pins(sets([Low, High, Low]));
    let mut port = PinPort::new(idle(), dir, idle(), NoopDelay::new());

    port.write_direction(OutputBits::Y_DIRECTION | OutputBits::X_STEP)
        .unwrap();
    finish(port);
}

#[test]
fn test_limits_active_low() {
    let limit = pins([
        vec![PinTransaction::get(PinState::Low)],
        vec![PinTransaction::get(PinState::High)],
        vec![PinTransaction::get(PinState::Low)],
    ]);
    let mut port = PinPort::new(idle(), idle(), limit, NoopDelay::new());

    let limits = port.read_limits().unwrap();
    assert_eq!(limits, LimitBits::X | LimitBits::Z);
    assert!(!limits.asserted(Axis::Y));
    finish(port);
}

#[test]
fn test_limits_active_high() {
    let limit = pins([
        vec![PinTransaction::get(PinState::Low)],
        vec![PinTransaction::get(PinState::High)],
        vec![PinTransaction::get(PinState::Low)],
    ]);
    let mut port = PinPort::new(idle(), idle(), limit, NoopDelay::new()).with_active_high_limits();

    assert_eq!(port.read_limits().unwrap(), LimitBits::Y);
    finish(port);
}

#[test]
fn test_homing_on_pins() {
    use PinState::{High, Low};

    // One overshoot pulse on X, whose switch is already closed.
    let step = pins([
        vec![PinTransaction::set(High), PinTransaction::set(Low)],
        vec![PinTransaction::set(Low), PinTransaction::set(Low)],
        vec![PinTransaction::set(Low), PinTransaction::set(Low)],
    ]);
    let dir = pins(sets([High, High, High]));
    let limit = pins([
        vec![PinTransaction::get(Low), PinTransaction::get(Low)],
        vec![PinTransaction::get(High), PinTransaction::get(High)],
        vec![PinTransaction::get(High), PinTransaction::get(High)],
    ]);
    let mut port = PinPort::new(step, dir, limit, NoopDelay::new());
    let config = HomingConfig {
        overshoot_pulses: 1,
        ..HomingConfig::default()
    };

    let pulses = run_homing_cycle(
        &mut port,
        &config,
        5,
        OutputBits::empty(),
        AxisSet::X,
        HomingPhase::Approach,
    )
    .unwrap();
    assert_eq!(pulses, [1, 0, 0]);
    finish(port);
}
