//! Pin-level checks against embedded-hal mocks

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use embedded_hal_mock::eh1::MockError;
use morse_core::hal::mock::MockIdlePattern;
use morse_core::test_utils::virtual_time::{VirtualClock, VirtualDelay};
use morse_core::{run_blocking, AccessGate, EmbeddedHalOutputLine, TimingConfig, Transmitter};

fn send(message: &str, expectations: &[PinTransaction], inverted: bool) -> (usize, u64) {
    let gate = AccessGate::new();
    let pin = PinMock::new(expectations);
    let clock = VirtualClock::new();
    let mut tx: Transmitter<'_, _, _> = Transmitter::new(
        &gate,
        EmbeddedHalOutputLine::new(pin, inverted),
        MockIdlePattern::new(),
        TimingConfig::default(),
    );

    tx.submit_str(message).unwrap();
    let steps = run_blocking(&mut tx, &mut VirtualDelay::new(clock.clone()));
    assert!(!gate.is_held());

    tx.into_parts().0.release().done();
    (steps, clock.now_ms())
}

#[test]
fn test_pin_sequence_for_et() {
    let expectations = [
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
    ];

    let (steps, elapsed) = send("et", &expectations, false);
    assert_eq!(steps, 3);
    assert_eq!(elapsed, 500 + 2000 + 1500);
}

#[test]
fn test_inverted_pin_for_s() {
    let expectations = [
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ];

    let (steps, elapsed) = send("s", &expectations, true);
    assert_eq!(steps, 5);
    assert_eq!(elapsed, 3 * 500 + 2 * 250);
}

#[test]
fn test_empty_message_only_rests_the_pin() {
    let (steps, elapsed) = send("", &[PinTransaction::set(State::Low)], false);
    assert_eq!(steps, 0);
    assert_eq!(elapsed, 0);
}

#[test]
fn test_pin_error_does_not_stop_transmission() {
    let expectations = [
        PinTransaction::set(State::High)
            .with_error(MockError::Io(std::io::ErrorKind::NotConnected)),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
    ];

    let (steps, elapsed) = send("i", &expectations, false);
    assert_eq!(steps, 3);
    assert_eq!(elapsed, 500 + 250 + 500);
}
