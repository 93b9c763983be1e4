//! Exclusive-access gate for the output line
//!
//! Only one transmission session may exist at a time. Acquisition never
//! blocks: a held gate refuses the caller, who is expected to retry later.

use portable_atomic::{AtomicBool, Ordering};

/// Errors from gate release
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateError {
    /// The gate was not held when a token came back
    NotHeld,
    /// The token was issued by another gate
    ForeignToken,
}

#[cfg(feature = "std")]
impl core::fmt::Display for GateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GateError::NotHeld => write!(f, "Gate released without being held"),
            GateError::ForeignToken => write!(f, "Token belongs to another gate"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GateError {}

/// Proof of gate ownership
///
/// Not `Clone`, so each acquisition can be released at most once. The
/// token remembers its gate; any other gate refuses it.
#[derive(Debug)]
#[must_use = "dropping a token leaves the gate held"]
pub struct GateToken<'g> {
    gate: &'g AccessGate,
}

impl GateToken<'_> {
    /// True if this token was issued by `gate`
    pub fn is_for(&self, gate: &AccessGate) -> bool {
        core::ptr::eq(self.gate, gate)
    }
}

/// Binary try-lock shared between submitters
///
/// Safe for use in `static` and from interrupt context.
#[derive(Debug)]
pub struct AccessGate {
    held: AtomicBool,
}

impl AccessGate {
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Take the gate if nobody holds it
    pub fn try_acquire(&self) -> Option<GateToken<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GateToken { gate: self })
    }

    /// Give the gate back
    ///
    /// A token from another gate is refused and both gates keep their state.
    pub fn release(&self, token: GateToken<'_>) -> Result<(), GateError> {
        if !token.is_for(self) {
            return Err(GateError::ForeignToken);
        }
        if self.held.swap(false, Ordering::Release) {
            Ok(())
        } else {
            Err(GateError::NotHeld)
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}
