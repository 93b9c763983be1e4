//! SysTick-driven embassy time driver for CH32V203
//!
//! One tick per millisecond, one alarm slot (enough for the thread executor
//! with the generic timer queue).

use core::cell::Cell;
use critical_section::Mutex;
use embassy_time_driver::{AlarmHandle, Driver};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

struct Alarm {
    at: Cell<u64>,
    callback: Cell<Option<(fn(*mut ()), *mut ())>>,
}

// ctx is only handed back to the executor that registered it
unsafe impl Send for Alarm {}

pub struct SysTickDriver {
    ticks: AtomicU64,
    alarm_taken: AtomicBool,
    alarm: Mutex<Alarm>,
}

impl SysTickDriver {
    const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            alarm_taken: AtomicBool::new(false),
            alarm: Mutex::new(Alarm {
                at: Cell::new(u64::MAX),
                callback: Cell::new(None),
            }),
        }
    }

    /// Advance one tick and fire the alarm once due
    fn on_tick(&self) {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        let due = critical_section::with(|cs| {
            let alarm = self.alarm.borrow(cs);
            if alarm.at.get() <= now {
                alarm.at.set(u64::MAX);
                alarm.callback.get()
            } else {
                None
            }
        });

        if let Some((callback, ctx)) = due {
            callback(ctx);
        }
    }
}

impl Driver for SysTickDriver {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        if self.alarm_taken.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(AlarmHandle::new(0))
        }
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, callback: fn(*mut ()), ctx: *mut ()) {
        critical_section::with(|cs| {
            self.alarm.borrow(cs).callback.set(Some((callback, ctx)));
        });
    }

    fn set_alarm(&self, _alarm: AlarmHandle, timestamp: u64) -> bool {
        critical_section::with(|cs| {
            // Already due: tell the executor to poll right away instead
            if timestamp <= self.now() {
                return false;
            }
            self.alarm.borrow(cs).at.set(timestamp);
            true
        })
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: SysTickDriver = SysTickDriver::new());

/// Called from the SysTick interrupt handler
pub fn on_systick() {
    DRIVER.on_tick();
}

// Critical section implementation for single-core RISC-V
critical_section::set_impl!(RiscvCriticalSection);

struct RiscvCriticalSection;

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let mstatus = riscv::register::mstatus::read();
        riscv::register::mstatus::clear_mie();
        mstatus.mie() as u8
    }

    unsafe fn release(was_active: critical_section::RawRestoreState) {
        if was_active != 0 {
            riscv::register::mstatus::set_mie();
        }
    }
}
