#![no_std]

//! Firmware library: board bindings, message ingress and tasks

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;

pub use morse_core::*;

// Re-export hardware implementations
pub use crate::ch32v203_hardware::*;
pub use crate::ingress::*;
pub use crate::tasks::*;

// Message ingress: the write side of the device
pub mod ingress {
    use core::cell::RefCell;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::blocking_mutex::Mutex;
    use embassy_sync::signal::Signal;
    use morse_core::{AccessGate, GateError, Transmitter, TxError};

    use crate::ch32v203_hardware::{HeartbeatIdle, LedLine};

    pub type BoardTransmitter = Transmitter<'static, LedLine, HeartbeatIdle>;

    /// Errors seen by a message writer
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum IngressError {
        /// Transmitter refused the message
        Tx(TxError),
        /// No transmitter installed yet
        NotInitialized,
    }

    impl From<TxError> for IngressError {
        fn from(e: TxError) -> Self {
            IngressError::Tx(e)
        }
    }

    /// Single-sender gate for the LED
    pub static GATE: AccessGate = AccessGate::new();

    static TRANSMITTER: Mutex<CriticalSectionRawMutex, RefCell<Option<BoardTransmitter>>> =
        Mutex::new(RefCell::new(None));

    pub(crate) static START: Signal<CriticalSectionRawMutex, ()> = Signal::new();
    pub(crate) static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

    /// Make `tx` the board transmitter
    pub fn install(tx: BoardTransmitter) {
        TRANSMITTER.lock(|cell| {
            cell.replace(Some(tx));
        });
    }

    /// Run `f` on the board transmitter, if installed
    pub fn with_transmitter<R>(f: impl FnOnce(&mut BoardTransmitter) -> R) -> Option<R> {
        TRANSMITTER.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    /// Queue `bytes` for transmission and wake the transmit task
    ///
    /// Returns the number of bytes taken, like a device write.
    pub fn submit_message(bytes: &[u8]) -> Result<usize, IngressError> {
        with_transmitter(|tx| tx.submit(bytes)).ok_or(IngressError::NotInitialized)??;
        START.signal(());

        #[cfg(feature = "defmt")]
        defmt::info!("📨 Accepted {} bytes", bytes.len());

        Ok(bytes.len())
    }

    /// Writer went away; frees the gate without cutting the message short
    pub fn close_session() -> Result<(), GateError> {
        with_transmitter(|tx| tx.release_session()).unwrap_or(Err(GateError::NotHeld))
    }

    /// Ask the transmit task to stop and release everything
    pub fn request_shutdown() {
        SHUTDOWN.signal(());
    }
}

// Embassy tasks module
pub mod tasks {
    use embassy_futures::select::{select, Either};
    use embassy_time::{Duration, Timer};

    use crate::ch32v203_hardware::{heartbeat_enabled, LedPin};
    use crate::ingress::{with_transmitter, SHUTDOWN, START};

    /// Heartbeat blink: two short flashes, then a pause
    const HEARTBEAT_PATTERN: [(bool, u64); 4] = [(true, 70), (false, 100), (true, 70), (false, 760)];

    /// Steps the board transmitter whenever a message comes in
    #[embassy_executor::task]
    pub async fn transmitter_task() {
        #[cfg(feature = "defmt")]
        defmt::info!("📤 Transmitter task started");

        loop {
            if let Either::Second(()) = select(START.wait(), SHUTDOWN.wait()).await {
                break;
            }

            match select(drive_transmission(), SHUTDOWN.wait()).await {
                Either::First(_steps) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("📡 Message sent in {} steps", _steps);
                }
                Either::Second(()) => break,
            }
        }

        // Timer is no longer pending; put the line to rest
        with_transmitter(|tx| tx.shutdown());

        #[cfg(feature = "defmt")]
        defmt::info!("🛑 Transmitter task stopped");
    }

    /// Step until done, waiting out each returned delay
    async fn drive_transmission() -> usize {
        let mut steps = 0;
        while let Some(wait) = with_transmitter(|tx| tx.step().delay()).flatten() {
            Timer::after(wait).await;
            steps += 1;
        }
        steps
    }

    /// Blinks the LED while the line is idle
    ///
    /// Runs on the same thread executor as the transmitter, so the flag check
    /// and the pin write cannot interleave with a step.
    #[embassy_executor::task]
    pub async fn heartbeat_task(led: LedPin) {
        loop {
            for (on, ms) in HEARTBEAT_PATTERN {
                if heartbeat_enabled() {
                    led.write(on);
                }
                Timer::after(Duration::from_millis(ms)).await;
            }
        }
    }
}

// CH32V203 hardware module
pub mod ch32v203_hardware;

// Time driver for embassy
mod time_driver;
