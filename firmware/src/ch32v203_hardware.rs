//! CH32V203 Hardware Implementation
//!
//! The Morse signal goes out on a single LED pin driven through the GPIO
//! bit set/reset register. While no message is on air the same LED shows a
//! heartbeat.

use portable_atomic::{AtomicBool, Ordering};

use morse_core::{HalError, IdlePattern, MorseHal, OutputLine};

/// Register map (see CH32V203 reference manual)
mod regs {
    pub const RCC_BASE: u32 = 0x4002_1000;
    pub const RCC_APB2PCENR: u32 = 0x18;
    pub const RCC_IOPAEN: u32 = 1 << 2;

    pub const GPIOA_BASE: u32 = 0x4001_0800;
    pub const GPIO_CRL: u32 = 0x00;
    pub const GPIO_BSHR: u32 = 0x10;

    pub const STK_BASE: u32 = 0xE000_F000;
    pub const STK_CTLR: u32 = 0x00;
    pub const STK_SR: u32 = 0x04;
    pub const STK_CMPLR: u32 = 0x10;
    /// STE | STIE | STCLK (HCLK) | STRE
    pub const STK_CTLR_RUN: u32 = 0x0F;
}

/// Core clock after reset configuration
pub const HCLK_HZ: u32 = 96_000_000;

/// Heartbeat enabled while the line sits in its idle pattern
static HEARTBEAT: AtomicBool = AtomicBool::new(true);

/// Returns true while the heartbeat owns the LED
pub fn heartbeat_enabled() -> bool {
    HEARTBEAT.load(Ordering::Acquire)
}

/// Raw handle on one GPIO output pin
#[derive(Copy, Clone, Debug)]
pub struct LedPin {
    port: u32,
    pin: u8,
}

impl LedPin {
    pub const fn new(port: u32, pin: u8) -> Self {
        Self { port, pin }
    }

    /// The board's Morse LED
    pub const fn led() -> Self {
        Self::new(regs::GPIOA_BASE, pins::LED_PIN)
    }

    /// Enable the port clock and make the pin a push-pull output
    fn configure(&self) {
        unsafe {
            let apb2 = (regs::RCC_BASE + regs::RCC_APB2PCENR) as *mut u32;
            core::ptr::write_volatile(apb2, core::ptr::read_volatile(apb2) | regs::RCC_IOPAEN);

            // MODE = 11 (50MHz output), CNF = 00 (push-pull)
            let crl = (self.port + regs::GPIO_CRL) as *mut u32;
            let shift = (self.pin as u32) * 4;
            let value = (core::ptr::read_volatile(crl) & !(0xF << shift)) | (0x3 << shift);
            core::ptr::write_volatile(crl, value);
        }
    }

    /// Drive the pin; atomic through BSHR, no read-modify-write
    pub fn write(&self, high: bool) {
        let bit = if high { 1 << self.pin } else { 1 << (self.pin + 16) };
        unsafe {
            core::ptr::write_volatile((self.port + regs::GPIO_BSHR) as *mut u32, bit);
        }
    }
}

/// Morse output line on the LED pin
pub struct LedLine {
    pin: LedPin,
    state: AtomicBool,
}

impl LedLine {
    fn new(pin: LedPin) -> Self {
        Self {
            pin,
            state: AtomicBool::new(false),
        }
    }

    pub fn is_on(&self) -> bool {
        self.state.load(Ordering::Relaxed)
    }
}

impl OutputLine for LedLine {
    type Error = HalError;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        self.pin.write(on);
        self.state.store(on, Ordering::Relaxed);
        #[cfg(feature = "defmt")]
        defmt::trace!("💡 LED: {}", if on { "ON" } else { "OFF" });
        Ok(())
    }
}

/// Idle pattern: heartbeat blinking, handed off to `heartbeat_task`
pub struct HeartbeatIdle {
    pin: LedPin,
}

impl IdlePattern for HeartbeatIdle {
    type Error = HalError;

    fn enter_idle(&mut self) -> Result<(), Self::Error> {
        HEARTBEAT.store(true, Ordering::Release);
        #[cfg(feature = "defmt")]
        defmt::debug!("💓 Heartbeat resumed");
        Ok(())
    }

    fn exit_idle(&mut self) -> Result<(), Self::Error> {
        HEARTBEAT.store(false, Ordering::Release);
        // Start from a dark LED whatever the heartbeat left behind
        self.pin.write(false);
        #[cfg(feature = "defmt")]
        defmt::debug!("💤 Heartbeat paused");
        Ok(())
    }
}

/// CH32V203 hardware abstraction layer implementation
pub struct Ch32v203MorseHal {
    line: LedLine,
    idle: HeartbeatIdle,
    initialized: bool,
}

impl Ch32v203MorseHal {
    pub fn new() -> Self {
        let pin = LedPin::led();
        Self {
            line: LedLine::new(pin),
            idle: HeartbeatIdle { pin },
            initialized: false,
        }
    }

    /// Hand the line and idle control over to a transmitter
    pub fn into_parts(self) -> Result<(LedLine, HeartbeatIdle), HalError> {
        if !self.initialized {
            return Err(HalError::NotInitialized);
        }
        Ok((self.line, self.idle))
    }
}

impl Default for Ch32v203MorseHal {
    fn default() -> Self {
        Self::new()
    }
}

impl MorseHal for Ch32v203MorseHal {
    type Line = LedLine;
    type Idle = HeartbeatIdle;
    type Error = HalError;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        self.line.pin.configure();
        self.line.set(false)?;
        start_systick(HCLK_HZ / 1_000);
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::info!("🔌 CH32V203 HAL initialized");

        Ok(())
    }

    fn output_line(&mut self) -> &mut Self::Line {
        &mut self.line
    }

    fn idle_pattern(&mut self) -> &mut Self::Idle {
        &mut self.idle
    }

    fn shutdown(&mut self) -> Result<(), Self::Error> {
        self.line.set(false)?;
        self.idle.enter_idle()?;

        #[cfg(feature = "defmt")]
        defmt::info!("🔌 CH32V203 HAL shutdown");
        Ok(())
    }
}

/// Start the 1kHz system tick feeding the embassy time driver
fn start_systick(reload: u32) {
    unsafe {
        core::ptr::write_volatile((regs::STK_BASE + regs::STK_SR) as *mut u32, 0);
        core::ptr::write_volatile((regs::STK_BASE + regs::STK_CMPLR) as *mut u32, reload - 1);
        core::ptr::write_volatile((regs::STK_BASE + regs::STK_CTLR) as *mut u32, regs::STK_CTLR_RUN);
    }
}

/// SysTick interrupt handler
#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn SysTick() {
    unsafe {
        core::ptr::write_volatile((regs::STK_BASE + regs::STK_SR) as *mut u32, 0);
    }
    crate::time_driver::on_systick();
}

/// CH32V203 pin configuration constants
pub mod pins {
    /// Morse / heartbeat LED
    pub const LED_PIN: u8 = 2; // PA2
}
