#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Morse Core
//!
//! Text to Morse code transmission for embedded systems.
//! Maps characters to dot/dash symbols and walks a message through a
//! resumable, timer-driven state machine that toggles a single output line.

pub mod types;
pub mod symbol;
pub mod sequencer;
pub mod gate;
pub mod transmitter;
pub mod driver;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use sequencer::Sequencer;
pub use gate::{AccessGate, GateError, GateToken};
pub use transmitter::Transmitter;
pub use driver::*;
pub use hal::{*, Duration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest message accepted in one submission
pub const MESSAGE_CAPACITY: usize = 256;

/// Reference timing: dot 500ms, dash 1500ms, gaps 250ms / 2000ms
pub fn default_config() -> TimingConfig {
    TimingConfig::default()
}
