//! Test utilities for driving transmissions on a virtual clock

#[cfg(feature = "test-utils")]
pub mod virtual_time {
    //! Virtual time simulation for deterministic testing

    use std::sync::{Arc, Mutex};

    /// Virtual clock shared by delays and captured lines
    #[derive(Clone, Default)]
    pub struct VirtualClock {
        inner: Arc<Mutex<u64>>, // nanoseconds since start
    }

    impl VirtualClock {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get current virtual time in milliseconds
        pub fn now_ms(&self) -> u64 {
            *self.inner.lock().unwrap() / 1_000_000
        }

        /// Advance virtual time by `ns` nanoseconds
        pub fn advance_ns(&self, ns: u64) {
            *self.inner.lock().unwrap() += ns;
        }
    }

    /// Blocking delay that advances a virtual clock instead of sleeping
    #[derive(Clone)]
    pub struct VirtualDelay {
        clock: VirtualClock,
    }

    impl VirtualDelay {
        pub fn new(clock: VirtualClock) -> Self {
            Self { clock }
        }
    }

    impl embedded_hal::delay::DelayNs for VirtualDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.clock.advance_ns(ns as u64);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.clock.advance_ns(ms as u64 * 1_000_000);
        }
    }
}

#[cfg(feature = "test-utils")]
pub mod output_capture {
    //! Output capture and analysis for testing

    use super::virtual_time::VirtualClock;
    use crate::hal::{HalError, OutputLine};
    use crate::types::TimingConfig;
    use std::string::String;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    /// One `set` call on the line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineEvent {
        pub at_ms: u64,
        pub on: bool,
    }

    /// Interval during which the line held one level
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Segment {
        pub on: bool,
        pub duration_ms: u64,
    }

    /// Output line recording every write against a virtual clock
    ///
    /// Clones share the same record, so one copy can go into a
    /// transmitter while the test keeps another.
    #[derive(Clone)]
    pub struct CaptureLine {
        clock: VirtualClock,
        events: Arc<Mutex<Vec<LineEvent>>>,
    }

    impl CaptureLine {
        pub fn new(clock: VirtualClock) -> Self {
            Self {
                clock,
                events: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Get all captured events
        pub fn events(&self) -> Vec<LineEvent> {
            self.events.lock().unwrap().clone()
        }

        /// Clear capture buffer
        pub fn clear(&self) {
            self.events.lock().unwrap().clear();
        }

        /// Level changes with the time each level was held
        ///
        /// Repeated writes of the same level merge into one segment. The
        /// final level has no end yet and is left out.
        pub fn timeline(&self) -> Vec<Segment> {
            let events = self.events();
            let mut segments: Vec<Segment> = Vec::new();

            for pair in events.windows(2) {
                let duration_ms = pair[1].at_ms - pair[0].at_ms;
                match segments.last_mut() {
                    Some(last) if last.on == pair[0].on => last.duration_ms += duration_ms,
                    _ => segments.push(Segment { on: pair[0].on, duration_ms }),
                }
            }
            segments.retain(|s| s.duration_ms > 0);
            segments
        }

        /// Decode the timeline back to dots, dashes and spaces
        ///
        /// Pulses shorter than midway between dot and dash read as dots.
        /// Each whole inter-character gap in an OFF stretch adds one space.
        pub fn to_morse_string(&self, timing: &TimingConfig) -> String {
            let threshold = (timing.dot.as_millis() + timing.dash.as_millis()) / 2;
            let gap = timing.inter_char_gap.as_millis().max(1);
            let mut result = String::new();

            for segment in self.timeline() {
                if segment.on {
                    result.push(if segment.duration_ms < threshold { '.' } else { '-' });
                } else {
                    for _ in 0..segment.duration_ms / gap {
                        result.push(' ');
                    }
                }
            }
            result
        }

        /// Total ON time in milliseconds
        pub fn on_time_ms(&self) -> u64 {
            self.timeline().iter().filter(|s| s.on).map(|s| s.duration_ms).sum()
        }
    }

    impl OutputLine for CaptureLine {
        type Error = HalError;

        fn set(&mut self, on: bool) -> Result<(), Self::Error> {
            let at_ms = self.clock.now_ms();
            self.events.lock().unwrap().push(LineEvent { at_ms, on });
            Ok(())
        }
    }
}
