//! Transmission session: sequencer plus the collaborators it drives

use crate::gate::{AccessGate, GateError, GateToken};
use crate::hal::{IdlePattern, OutputLine};
use crate::sequencer::Sequencer;
use crate::types::{Phase, Step, TimingConfig, TxError};
use crate::MESSAGE_CAPACITY;

/// Owns the output line and the one transmission allowed on it
///
/// `submit` starts a message, then the timing driver calls `step` until it
/// returns `Step::Done`, sleeping for each returned delay in between.
pub struct Transmitter<'g, L, I, const N: usize = MESSAGE_CAPACITY>
where
    L: OutputLine,
    I: IdlePattern,
{
    sequencer: Sequencer<N>,
    gate: &'g AccessGate,
    token: Option<GateToken<'g>>,
    active: bool,
    line: L,
    idle: I,
}

impl<'g, L, I, const N: usize> Transmitter<'g, L, I, N>
where
    L: OutputLine,
    I: IdlePattern,
{
    /// Create a transmitter guarded by `gate`
    pub fn new(gate: &'g AccessGate, line: L, idle: I, timing: TimingConfig) -> Self {
        Self {
            sequencer: Sequencer::new(timing),
            gate,
            token: None,
            active: false,
            line,
            idle,
        }
    }

    /// Start transmitting `message`
    ///
    /// Refused without side effects if the message does not fit or a
    /// transmission is already running.
    pub fn submit(&mut self, message: &[u8]) -> Result<(), TxError> {
        Sequencer::<N>::check(message)?;
        if self.active {
            return Err(TxError::Busy);
        }
        let token = self.gate.try_acquire().ok_or(TxError::Busy)?;

        if let Err(e) = self.sequencer.load(message) {
            self.gate.release(token).ok();
            return Err(e);
        }
        self.token = Some(token);
        self.active = true;

        if self.idle.exit_idle().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Could not leave idle pattern");
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Transmission started ({} bytes)", self.sequencer.message().len());

        Ok(())
    }

    pub fn submit_str(&mut self, message: &str) -> Result<(), TxError> {
        self.submit(message.as_bytes())
    }

    /// Run one step and apply it to the line
    ///
    /// Never fails; once the sequencer reports `Done` the line is released to
    /// its idle pattern and the gate is freed.
    pub fn step(&mut self) -> Step {
        let step = self.sequencer.step();
        match step.line_level() {
            Some(on) => self.drive(on),
            None if self.active => self.complete(),
            None => {}
        }
        step
    }

    fn drive(&mut self, on: bool) {
        if self.line.set(on).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Output line write failed");
        }
    }

    fn complete(&mut self) {
        self.drive(false);
        if self.idle.enter_idle().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Could not restore idle pattern");
        }
        self.active = false;
        self.release_gate();

        #[cfg(feature = "defmt")]
        defmt::info!("Transmission finished, line idle");
    }

    fn release_gate(&mut self) {
        if let Some(token) = self.token.take() {
            if self.gate.release(token).is_err() {
                #[cfg(feature = "defmt")]
                defmt::error!("Gate was not held at release");
            }
        }
    }

    /// End the caller's session early
    ///
    /// Frees the gate; a running message still completes on its own but
    /// will not release the gate a second time.
    pub fn release_session(&mut self) -> Result<(), GateError> {
        let token = self.token.take().ok_or(GateError::NotHeld)?;
        self.gate.release(token)
    }

    /// Abandon any transmission and return everything to rest
    ///
    /// For teardown paths: the driver must stop scheduling steps first.
    pub fn shutdown(&mut self) {
        let was_active = self.active;
        self.sequencer.reset();
        self.active = false;
        self.drive(false);
        if was_active && self.idle.enter_idle().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Could not restore idle pattern");
        }
        self.release_gate();
    }

    /// True while a message is being transmitted
    pub fn is_busy(&self) -> bool {
        self.active
    }

    /// True while this transmitter holds the gate
    pub fn holds_gate(&self) -> bool {
        self.token.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn sequencer(&self) -> &Sequencer<N> {
        &self.sequencer
    }

    pub fn timing(&self) -> &TimingConfig {
        self.sequencer.timing()
    }

    /// Change timing; refused while transmitting
    pub fn set_timing(&mut self, timing: TimingConfig) -> Result<(), TxError> {
        if self.active {
            return Err(TxError::Busy);
        }
        self.sequencer.set_timing(timing);
        Ok(())
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    pub fn idle(&self) -> &I {
        &self.idle
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (L, I) {
        (self.line, self.idle)
    }
}
