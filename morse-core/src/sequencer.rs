//! Resumable transmission state machine
//!
//! The sequencer never blocks. Each `step` returns what the line should do
//! next and how long to hold it; whoever drives it must wait that long before
//! calling `step` again.

use heapless::Vec;

use crate::symbol;
use crate::types::{Element, Gap, Phase, Step, TimingConfig, TxError};
use crate::MESSAGE_CAPACITY;

/// Bytes before the first NUL, or all of them
pub(crate) fn significant(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Transmission state for one message
#[derive(Debug)]
pub struct Sequencer<const N: usize = MESSAGE_CAPACITY> {
    message: Vec<u8, N>,
    message_cursor: usize,
    symbol: &'static str,
    symbol_cursor: usize,
    phase: Phase,
    timing: TimingConfig,
}

impl<const N: usize> Sequencer<N> {
    /// Maximum message length in bytes
    pub const CAPACITY: usize = N;

    /// Create an empty sequencer with the given timing
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            message: Vec::new(),
            message_cursor: 0,
            symbol: symbol::DEFAULT_SYMBOL,
            symbol_cursor: 0,
            phase: Phase::Done,
            timing,
        }
    }

    /// Significant part of `bytes` if it fits the buffer
    pub fn check(bytes: &[u8]) -> Result<&[u8], TxError> {
        let message = significant(bytes);
        if message.len() > N {
            return Err(TxError::CapacityExceeded {
                len: message.len(),
                capacity: N,
            });
        }
        Ok(message)
    }

    /// Copy a message in and rewind every cursor
    ///
    /// Nothing is touched when the message is refused.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), TxError> {
        let message = Self::check(bytes)?;

        self.reset();
        self.message
            .extend_from_slice(message)
            .map_err(|_| TxError::CapacityExceeded {
                len: message.len(),
                capacity: N,
            })?;

        self.phase = match self.message.first() {
            None => Phase::Done,
            Some(&first) => {
                self.symbol = symbol::lookup(first);
                if self.symbol.is_empty() {
                    Phase::InterCharGap
                } else {
                    Phase::EmitPulse
                }
            }
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Loaded {} bytes, phase {:?}", self.message.len(), self.phase);

        Ok(())
    }

    /// Advance by one step
    pub fn step(&mut self) -> Step {
        match self.phase {
            Phase::EmitPulse => self.handle_emit_pulse(),
            Phase::IntraGap => self.handle_intra_gap(),
            Phase::InterCharGap => self.handle_inter_char_gap(),
            Phase::Done => Step::Done,
        }
    }

    /// Key the line for the element under the symbol cursor
    fn handle_emit_pulse(&mut self) -> Step {
        let element = self
            .symbol
            .as_bytes()
            .get(self.symbol_cursor)
            .copied()
            .and_then(Element::from_symbol_byte);

        let Some(element) = element else {
            return self.finish();
        };

        self.symbol_cursor += 1;
        self.phase = if self.symbol_cursor < self.symbol.len() {
            Phase::IntraGap
        } else {
            Phase::InterCharGap
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("Pulse {:?}", element);

        Step::Pulse {
            element,
            delay: element.duration(&self.timing),
        }
    }

    /// Release the line between two pulses of the same symbol
    fn handle_intra_gap(&mut self) -> Step {
        if self.symbol_cursor >= self.symbol.len() {
            return self.finish();
        }
        self.phase = Phase::EmitPulse;

        Step::Gap {
            gap: Gap::Intra,
            delay: self.timing.intra_gap,
        }
    }

    /// Move to the next character, holding the line OFF between the two
    fn handle_inter_char_gap(&mut self) -> Step {
        self.message_cursor += 1;
        let Some(&next) = self.message.get(self.message_cursor) else {
            return self.finish();
        };

        self.symbol = symbol::lookup(next);
        self.symbol_cursor = 0;
        // Empty symbols chain straight into another character gap
        self.phase = if self.symbol.is_empty() {
            Phase::InterCharGap
        } else {
            Phase::EmitPulse
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("Character {}/{}", self.message_cursor, self.message.len());

        Step::Gap {
            gap: Gap::InterChar,
            delay: self.timing.inter_char_gap,
        }
    }

    fn finish(&mut self) -> Step {
        #[cfg(feature = "defmt")]
        defmt::debug!("Transmission complete");

        self.reset();
        Step::Done
    }

    /// Drop the message and return to `Done`
    pub fn reset(&mut self) {
        self.message.clear();
        self.message_cursor = 0;
        self.symbol = symbol::DEFAULT_SYMBOL;
        self.symbol_cursor = 0;
        self.phase = Phase::Done;
    }

    /// Get current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Message in flight, empty once done
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    pub fn message_cursor(&self) -> usize {
        self.message_cursor
    }

    /// Symbol of the character under the message cursor
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn symbol_cursor(&self) -> usize {
        self.symbol_cursor
    }

    /// Get current timing
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Update timing, effective from the next step
    pub fn set_timing(&mut self, timing: TimingConfig) {
        self.timing = timing;
    }
}

impl<const N: usize> Default for Sequencer<N> {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}
