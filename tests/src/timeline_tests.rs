//! Line timelines on a virtual clock

use morse_core::test_utils::output_capture::Segment;
use morse_core::{Duration, TimingConfig};

use crate::support::capture;

fn on(ms: u64) -> Segment {
    Segment { on: true, duration_ms: ms }
}

fn off(ms: u64) -> Segment {
    Segment { on: false, duration_ms: ms }
}

#[test]
fn test_sos_end_to_end() {
    let result = capture(b"sos", TimingConfig::default());

    let expected = vec![
        on(500), off(250), on(500), off(250), on(500),
        off(2000),
        on(1500), off(250), on(1500), off(250), on(1500),
        off(2000),
        on(500), off(250), on(500), off(250), on(500),
    ];
    assert_eq!(result.line.timeline(), expected);
    assert_eq!(result.steps, 17);
    assert_eq!(result.clock.now_ms(), 13_000);

    // Line back off, idle restored, gate free
    assert_eq!(result.line.events().last().map(|e| e.on), Some(false));
    assert!(result.idle_after);
    assert!(!result.gate_held_after);
}

#[test]
fn test_space_renders_as_gap_only() {
    let timing = TimingConfig::default();
    let result = capture(b"a b", timing);

    // One gap into the space, one gap out of it, no pulse in between
    let timeline = result.line.timeline();
    assert_eq!(timeline[3], off(4000));
    assert_eq!(timeline.iter().filter(|s| s.on).count(), 6);
    assert_eq!(result.line.to_morse_string(&timing), ".-  -...");
}

#[test]
fn test_hello_world_decodes() {
    let timing = TimingConfig::default();
    let result = capture(b"hello world", timing);

    assert_eq!(
        result.line.to_morse_string(&timing),
        ".... . .-.. .-.. ---  .-- --- .-. .-.. -.."
    );
    assert_eq!(result.clock.now_ms(), timing.total_for(b"hello world").as_millis());
}

#[test]
fn test_mixed_case_and_punctuation() {
    let timing = TimingConfig::default();
    let upper = capture(b"CQ?", timing);
    let lower = capture(b"cq?", timing);

    assert_eq!(upper.line.timeline(), lower.line.timeline());
    assert_eq!(upper.line.to_morse_string(&timing), "-.-. --.- ..--..");
}

#[test]
fn test_empty_message_keeps_line_dark() {
    let result = capture(b"", TimingConfig::default());

    assert_eq!(result.steps, 0);
    assert_eq!(result.clock.now_ms(), 0);
    assert!(result.line.timeline().is_empty());
    assert_eq!(result.line.on_time_ms(), 0);
    assert!(result.idle_after);
    assert!(!result.gate_held_after);
}

#[test]
fn test_terminator_cuts_message() {
    let timing = TimingConfig::default();
    let result = capture(b"e\0sos", timing);

    assert_eq!(result.line.timeline(), vec![on(500)]);
    assert_eq!(result.clock.now_ms(), 500);
}

#[test]
fn test_full_buffer_without_terminator() {
    let timing = TimingConfig::default();
    let message = [b'e'; 256];
    let result = capture(&message, timing);

    assert_eq!(result.line.timeline().iter().filter(|s| s.on).count(), 256);
    assert_eq!(result.clock.now_ms(), 256 * 500 + 255 * 2000);
}

#[test]
fn test_ratios_hold_at_speed() {
    let timing = TimingConfig::from_wpm(25).unwrap();
    let result = capture(b"ab", timing);
    let timeline = result.line.timeline();

    let dot = timeline[0].duration_ms;
    assert_eq!(timeline[1].duration_ms * 2, dot);
    assert_eq!(timeline[2].duration_ms, dot * 3);
    assert_eq!(timeline[3].duration_ms, dot * 4);
}

#[test]
fn test_unit_scaling() {
    let timing = TimingConfig::from_unit(Duration::from_millis(25));
    let result = capture(b"sos", timing);
    // Reference timeline scaled by 1/10
    assert_eq!(result.clock.now_ms(), 1_300);
}
