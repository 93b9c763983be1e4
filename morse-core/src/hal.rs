//! Hardware Abstraction Layer for the Morse transmitter

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::Duration;

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::Duration;

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Mock duration type for compilation without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Div<u32> for Duration {
        type Output = Duration;

        fn div(self, rhs: u32) -> Duration {
            Duration(self.0 / rhs as u64)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use embedded_hal::digital::OutputPin;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Idle pattern could not be switched
    IdlePatternError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::IdlePatternError => write!(f, "Idle pattern switch failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// The single digital line that carries the Morse signal
///
/// `set` must be idempotent and safe to call from timer context.
pub trait OutputLine {
    type Error: From<HalError>;

    /// Drive the line (true = ON, false = OFF)
    fn set(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// Default pattern shown on the line while nothing is transmitted
pub trait IdlePattern {
    type Error: From<HalError>;

    /// Hand the line back to its idle pattern
    fn enter_idle(&mut self) -> Result<(), Self::Error>;

    /// Take the line away from its idle pattern before transmitting
    fn exit_idle(&mut self) -> Result<(), Self::Error>;
}

/// Complete transmitter HAL interface
pub trait MorseHal {
    type Line: OutputLine;
    type Idle: IdlePattern;
    type Error: From<HalError>;

    /// Initialize hardware
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Access to the output line
    fn output_line(&mut self) -> &mut Self::Line;

    /// Access to the idle pattern control
    fn idle_pattern(&mut self) -> &mut Self::Idle;

    /// Shutdown hardware
    fn shutdown(&mut self) -> Result<(), Self::Error>;
}

impl<T: OutputLine + ?Sized> OutputLine for &mut T {
    type Error = T::Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        (**self).set(on)
    }
}

impl<T: IdlePattern + ?Sized> IdlePattern for &mut T {
    type Error = T::Error;

    fn enter_idle(&mut self) -> Result<(), Self::Error> {
        (**self).enter_idle()
    }

    fn exit_idle(&mut self) -> Result<(), Self::Error> {
        (**self).exit_idle()
    }
}

/// Generic output line over an embedded-hal output pin
pub struct EmbeddedHalOutputLine<P> {
    pin: P,
    inverted: bool,
}

impl<P> EmbeddedHalOutputLine<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> OutputLine for EmbeddedHalOutputLine<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        let level = if self.inverted { !on } else { on };
        if level {
            self.pin.set_high().map_err(|_| HalError::GpioError)
        } else {
            self.pin.set_low().map_err(|_| HalError::GpioError)
        }
    }
}

/// Idle pattern for lines that simply stay OFF between transmissions
pub struct NoIdlePattern;

impl IdlePattern for NoIdlePattern {
    type Error = HalError;

    fn enter_idle(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_idle(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::Cell;

    /// Output line remembering its level and how often it was driven
    #[derive(Default)]
    pub struct MockOutputLine {
        state: Cell<bool>,
        sets: Cell<usize>,
        rising_edges: Cell<usize>,
        fail: Cell<bool>,
    }

    impl MockOutputLine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn is_on(&self) -> bool {
            self.state.get()
        }

        /// Number of `set` calls
        pub fn set_count(&self) -> usize {
            self.sets.get()
        }

        /// Number of OFF -> ON transitions, i.e. pulses started
        pub fn pulse_count(&self) -> usize {
            self.rising_edges.get()
        }

        /// Make every following `set` fail
        pub fn fail_writes(&self, fail: bool) {
            self.fail.set(fail);
        }
    }

    impl OutputLine for MockOutputLine {
        type Error = HalError;

        fn set(&mut self, on: bool) -> Result<(), Self::Error> {
            if self.fail.get() {
                return Err(HalError::GpioError);
            }
            if on && !self.state.get() {
                self.rising_edges.set(self.rising_edges.get() + 1);
            }
            self.state.set(on);
            self.sets.set(self.sets.get() + 1);
            Ok(())
        }
    }

    /// Idle pattern counting its transitions
    #[derive(Default)]
    pub struct MockIdlePattern {
        idle: Cell<bool>,
        entered: Cell<usize>,
        exited: Cell<usize>,
    }

    impl MockIdlePattern {
        /// Starts in idle, like a freshly booted board
        pub fn new() -> Self {
            let idle = Self::default();
            idle.idle.set(true);
            idle
        }

        pub fn is_idle(&self) -> bool {
            self.idle.get()
        }

        pub fn enter_count(&self) -> usize {
            self.entered.get()
        }

        pub fn exit_count(&self) -> usize {
            self.exited.get()
        }
    }

    impl IdlePattern for MockIdlePattern {
        type Error = HalError;

        fn enter_idle(&mut self) -> Result<(), Self::Error> {
            self.idle.set(true);
            self.entered.set(self.entered.get() + 1);
            Ok(())
        }

        fn exit_idle(&mut self) -> Result<(), Self::Error> {
            self.idle.set(false);
            self.exited.set(self.exited.get() + 1);
            Ok(())
        }
    }
}
