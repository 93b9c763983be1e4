//! Timing drivers: call `step`, wait the returned delay, repeat
//!
//! Each driver keeps at most one step pending and returns the number of
//! timed steps once the transmission reports `Done`.

use embedded_hal::delay::DelayNs;

use crate::hal::{Duration, IdlePattern, OutputLine};
use crate::transmitter::Transmitter;

/// Split a wait into `delay_ms` calls that each fit in a `u32`
fn ms_chunks(wait: Duration) -> impl Iterator<Item = u32> {
    let mut remaining = wait.as_millis();
    core::iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        let chunk = u32::try_from(remaining).unwrap_or(u32::MAX);
        remaining -= chunk as u64;
        Some(chunk)
    })
}

/// Drive a transmission to completion with a blocking delay provider
pub fn run_blocking<L, I, D, const N: usize>(tx: &mut Transmitter<'_, L, I, N>, delay: &mut D) -> usize
where
    L: OutputLine,
    I: IdlePattern,
    D: DelayNs,
{
    let mut steps = 0;
    while let Some(wait) = tx.step().delay() {
        for ms in ms_chunks(wait) {
            delay.delay_ms(ms);
        }
        steps += 1;
    }
    steps
}

/// Drive a transmission to completion with an async delay provider
pub async fn run<L, I, D, const N: usize>(tx: &mut Transmitter<'_, L, I, N>, delay: &mut D) -> usize
where
    L: OutputLine,
    I: IdlePattern,
    D: embedded_hal_async::delay::DelayNs,
{
    let mut steps = 0;
    while let Some(wait) = tx.step().delay() {
        for ms in ms_chunks(wait) {
            delay.delay_ms(ms).await;
        }
        steps += 1;
    }
    steps
}

/// Async task body for running a transmission on the embassy timer
#[cfg(feature = "embassy-time")]
pub async fn transmit_task<L, I, const N: usize>(tx: &mut Transmitter<'_, L, I, N>) -> usize
where
    L: OutputLine,
    I: IdlePattern,
{
    use embassy_time::Timer;

    let mut steps = 0;
    while let Some(wait) = tx.step().delay() {
        #[cfg(feature = "defmt")]
        defmt::trace!("Phase {:?}, next step in {}ms", tx.phase(), wait.as_millis());

        Timer::after(wait).await;
        steps += 1;
    }
    steps
}
