//! Core data types for the Morse transmitter

use crate::hal::Duration;
use crate::symbol;

/// Morse code elements
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// Dot (short pulse)
    Dot,
    /// Dash (long pulse)
    Dash,
}

impl Element {
    /// Parse one byte of a symbol string
    pub const fn from_symbol_byte(byte: u8) -> Option<Element> {
        match byte {
            b'.' => Some(Element::Dot),
            b'-' => Some(Element::Dash),
            _ => None,
        }
    }

    /// Symbol character for this element
    pub const fn as_char(&self) -> char {
        match self {
            Element::Dot => '.',
            Element::Dash => '-',
        }
    }

    /// ON time of this element under the given timing
    pub const fn duration(&self, timing: &TimingConfig) -> Duration {
        match self {
            Element::Dot => timing.dot,
            Element::Dash => timing.dash,
        }
    }
}

/// Sequencer phases
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Next step keys the line for the element under the symbol cursor
    EmitPulse,
    /// Next step releases the line between two pulses of one symbol
    IntraGap,
    /// Next step advances to the following character
    InterCharGap,
    /// Message exhausted, nothing left to send
    Done,
}

impl Phase {
    /// Returns true while a transmission still has steps to run
    pub const fn is_active(&self) -> bool {
        !matches!(self, Phase::Done)
    }
}

/// Kind of OFF interval
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gap {
    /// Between pulses of the same character
    Intra,
    /// Between characters, also renders word spaces
    InterChar,
}

/// Outcome of a single sequencer step
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Line ON for `delay`
    Pulse { element: Element, delay: Duration },
    /// Line OFF for `delay`
    Gap { gap: Gap, delay: Duration },
    /// Transmission finished, line goes back to idle
    Done,
}

impl Step {
    /// Requested output level, `None` once done
    pub const fn line_level(&self) -> Option<bool> {
        match self {
            Step::Pulse { .. } => Some(true),
            Step::Gap { .. } => Some(false),
            Step::Done => None,
        }
    }

    /// Time until the next step is due
    pub const fn delay(&self) -> Option<Duration> {
        match self {
            Step::Pulse { delay, .. } | Step::Gap { delay, .. } => Some(*delay),
            Step::Done => None,
        }
    }

    pub const fn is_done(&self) -> bool {
        matches!(self, Step::Done)
    }
}

/// Reasons a submission is refused
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// Message does not fit the transmit buffer
    CapacityExceeded { len: usize, capacity: usize },
    /// Another transmission holds the line
    Busy,
}

#[cfg(feature = "std")]
impl core::fmt::Display for TxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TxError::CapacityExceeded { len, capacity } => {
                write!(f, "Message of {} bytes exceeds capacity of {}", len, capacity)
            }
            TxError::Busy => write!(f, "Transmitter busy"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TxError {}

/// Pulse and gap durations
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Dot ON time
    pub dot: Duration,
    /// Dash ON time
    pub dash: Duration,
    /// OFF time between pulses of one character
    pub intra_gap: Duration,
    /// OFF time between characters
    pub inter_char_gap: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dot: Duration::from_millis(500),
            dash: Duration::from_millis(1500),
            intra_gap: Duration::from_millis(250),
            inter_char_gap: Duration::from_millis(2000),
        }
    }
}

impl TimingConfig {
    /// Scale the reference timing from its base unit (the intra-symbol gap)
    pub fn from_unit(unit: Duration) -> Self {
        Self {
            dot: unit * 2,
            dash: unit * 6,
            intra_gap: unit,
            inter_char_gap: unit * 8,
        }
    }

    /// Create a timing for a given speed with validation
    ///
    /// The dot follows the PARIS standard (1200 / WPM ms); gaps keep the
    /// reference proportions relative to the dot.
    pub fn from_wpm(wpm: u32) -> Result<Self, &'static str> {
        if wpm == 0 || wpm > 60 {
            return Err("WPM must be between 1 and 60");
        }
        let dot = Duration::from_millis(1200 / wpm as u64);
        Ok(Self {
            dot,
            dash: dot * 3,
            intra_gap: dot / 2,
            inter_char_gap: dot * 4,
        })
    }

    /// Check that every interval is usable
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.dot.as_millis() == 0 || self.intra_gap.as_millis() == 0 {
            return Err("Dot and intra gap must be at least 1ms");
        }
        if self.dash.as_millis() <= self.dot.as_millis() {
            return Err("Dash must be longer than dot");
        }
        if self.inter_char_gap.as_millis() <= self.intra_gap.as_millis() {
            return Err("Inter-character gap must be longer than intra gap");
        }
        Ok(())
    }

    /// Exact on-air time of `message`, from first step to `Done`
    ///
    /// Bytes after the first NUL are ignored, as the sequencer does.
    pub fn total_for(&self, message: &[u8]) -> Duration {
        let message = crate::sequencer::significant(message);
        let mut total_ms: u64 = 0;

        for &byte in message {
            let code = symbol::lookup(byte);
            for element in symbol::elements(byte) {
                total_ms += element.duration(self).as_millis();
            }
            if code.len() > 1 {
                total_ms += self.intra_gap.as_millis() * (code.len() as u64 - 1);
            }
        }
        if message.len() > 1 {
            total_ms += self.inter_char_gap.as_millis() * (message.len() as u64 - 1);
        }

        Duration::from_millis(total_ms)
    }

    /// Approximate speed implied by the dot length
    pub fn wpm(&self) -> u32 {
        (1200 / self.dot.as_millis().max(1) as u32).max(1)
    }
}
