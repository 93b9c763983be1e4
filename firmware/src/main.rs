#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
use panic_halt as _;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use morse_firmware::*;

/// Sent once at boot
const BOOT_MESSAGE: &[u8] = b"hello world";

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("🔧 Morse Transmitter Firmware Starting...");

    let mut hal = Ch32v203MorseHal::new();
    if hal.initialize().is_err() {
        #[cfg(feature = "defmt")]
        defmt::error!("❌ Hardware init failed");
        return;
    }
    let Ok((line, idle)) = hal.into_parts() else {
        return;
    };

    let timing = default_config();
    #[cfg(feature = "defmt")]
    defmt::info!("⚙️ Timing: dot {}ms, dash {}ms", timing.dot.as_millis(), timing.dash.as_millis());

    install(Transmitter::new(&GATE, line, idle, timing));

    spawner.must_spawn(transmitter_task());
    spawner.must_spawn(heartbeat_task(LedPin::led()));

    match submit_message(BOOT_MESSAGE) {
        Ok(_len) => {
            #[cfg(feature = "defmt")]
            defmt::info!("✨ Sending boot message ({} bytes)", _len);
        }
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Boot message refused: {:?}", _e);
        }
    }

    // Main supervision loop
    loop {
        Timer::after(Duration::from_secs(1)).await;
        #[cfg(feature = "defmt")]
        defmt::trace!("busy: {}", GATE.is_held());
    }
}
