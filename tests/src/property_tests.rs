//! Property-based checks over arbitrary input

use morse_core::hal::mock::{MockIdlePattern, MockOutputLine};
use morse_core::symbol::{lookup, lookup_char};
use morse_core::{run_blocking, AccessGate, TimingConfig, Transmitter, TxError, MESSAGE_CAPACITY};
use proptest::prelude::*;

use crate::support::capture;

proptest! {
    #[test]
    fn lookup_is_total(c in any::<char>()) {
        let code = lookup_char(c);
        prop_assert!(code.bytes().all(|b| b == b'.' || b == b'-'));
        prop_assert!(code.len() <= 6);
    }

    #[test]
    fn lookup_ignores_case(b in any::<u8>()) {
        prop_assert_eq!(lookup(b), lookup(b.to_ascii_lowercase()));
        prop_assert_eq!(lookup(b), lookup(b.to_ascii_uppercase()));
    }

    #[test]
    fn any_message_completes_on_time(message in prop::collection::vec(any::<u8>(), 0..=MESSAGE_CAPACITY)) {
        let timing = TimingConfig::default();
        let result = capture(&message, timing);

        prop_assert_eq!(result.clock.now_ms(), timing.total_for(&message).as_millis() as u64);
        prop_assert!(!result.gate_held_after);
        prop_assert!(result.idle_after);
        prop_assert!(result.line.events().last().map_or(true, |e| !e.on));
    }

    #[test]
    fn pulses_match_symbol_lengths(message in "[a-zA-Z0-9 ,.?!]{0,64}") {
        let gate = AccessGate::new();
        let mut tx: Transmitter<'_, _, _> =
            Transmitter::new(&gate, MockOutputLine::new(), MockIdlePattern::new(), TimingConfig::default());

        tx.submit_str(&message).unwrap();
        let mut steps = 0;
        while !tx.step().is_done() {
            steps += 1;
        }

        let pulses: usize = message.bytes().map(|b| lookup(b).len()).sum();
        prop_assert_eq!(tx.line().pulse_count(), pulses);
        prop_assert!(steps >= pulses);
    }

    #[test]
    fn oversized_messages_rejected(message in prop::collection::vec(1u8..=255, MESSAGE_CAPACITY + 1..400)) {
        let gate = AccessGate::new();
        let mut tx: Transmitter<'_, _, _> =
            Transmitter::new(&gate, MockOutputLine::new(), MockIdlePattern::new(), TimingConfig::default());

        prop_assert_eq!(
            tx.submit(&message),
            Err(TxError::CapacityExceeded { len: message.len(), capacity: MESSAGE_CAPACITY })
        );
        prop_assert!(!gate.is_held());
        prop_assert_eq!(tx.line().set_count(), 0);
    }

    #[test]
    fn wpm_timing_is_consistent(wpm in 1u32..=60) {
        let timing = TimingConfig::from_wpm(wpm).unwrap();
        prop_assert!(timing.validate().is_ok());
        prop_assert_eq!(timing.dash, timing.dot * 3);
        prop_assert_eq!(timing.inter_char_gap, timing.dot * 4);
    }
}

#[test]
fn test_blocking_driver_matches_total() {
    let timing = TimingConfig::from_wpm(20).unwrap();
    let gate = AccessGate::new();
    let clock = morse_core::test_utils::virtual_time::VirtualClock::new();
    let mut delay = morse_core::test_utils::virtual_time::VirtualDelay::new(clock.clone());
    let mut tx: Transmitter<'_, _, _> =
        Transmitter::new(&gate, MockOutputLine::new(), MockIdlePattern::new(), timing);

    tx.submit_str("cq de test").unwrap();
    run_blocking(&mut tx, &mut delay);
    assert_eq!(clock.now_ms(), timing.total_for(b"cq de test").as_millis() as u64);
}
