//! ISR-debounced falling-edge detector for the user button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The GPIO fires on the
//! falling edge; the ISR calls [`EdgeDetector::on_falling_edge`] with the
//! current uptime.  Edges closer than the debounce window to the last
//! accepted edge are contact bounce and are dropped.  Each accepted edge
//! invokes the callback registered with [`EdgeDetector::fall`] exactly
//! once.  The callback is registered once at boot, before the interrupt
//! is enabled; reading it from the ISR is a single atomic load.
//!
//! Everything here is lock-free so it can run in interrupt context while
//! the control tick reads the state the callback writes.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::OnceLock;

/// Debounce window used until the configuration is applied.
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// The board's user button.  `static` because ESP-IDF ISR callbacks
/// cannot capture state.
pub static USER_BUTTON: EdgeDetector = EdgeDetector::new(DEFAULT_DEBOUNCE_MS);

/// Falling-edge detector with a lockout debounce filter.
pub struct EdgeDetector {
    debounce_ms: AtomicU32,
    primed: AtomicBool,
    last_edge_ms: AtomicU32,
    accepted: AtomicU32,
    callback: OnceLock<fn()>,
}

impl EdgeDetector {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms: AtomicU32::new(debounce_ms),
            primed: AtomicBool::new(false),
            last_edge_ms: AtomicU32::new(0),
            accepted: AtomicU32::new(0),
            callback: OnceLock::new(),
        }
    }

    /// Register the function to run on every accepted falling edge.
    /// Only the first registration takes effect; returns `false` if a
    /// callback was already installed.
    pub fn fall(&self, callback: fn()) -> bool {
        self.callback.set(callback).is_ok()
    }

    /// ISR entry point.  `now_ms` is the monotonic uptime in milliseconds
    /// (wraps at `u32::MAX`).  Returns `true` if the edge was accepted.
    pub fn on_falling_edge(&self, now_ms: u32) -> bool {
        if self.primed.load(Ordering::Acquire) {
            let last = self.last_edge_ms.load(Ordering::Acquire);
            if now_ms.wrapping_sub(last) < self.debounce_ms.load(Ordering::Relaxed) {
                return false;
            }
        }
        self.last_edge_ms.store(now_ms, Ordering::Release);
        self.primed.store(true, Ordering::Release);
        self.accepted.fetch_add(1, Ordering::Relaxed);
        self.fire();
        true
    }

    /// Number of presses accepted since boot.
    pub fn accepted_edges(&self) -> u32 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms.load(Ordering::Relaxed)
    }

    /// Change the debounce window.  Call before enabling the interrupt.
    pub fn set_debounce_ms(&self, debounce_ms: u32) {
        self.debounce_ms.store(debounce_ms, Ordering::Relaxed);
    }

    fn fire(&self) {
        if let Some(callback) = self.callback.get() {
            callback();
        }
    }
}

/// ISR handler: register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomics only).
pub fn button_isr_handler(now_ms: u32) {
    USER_BUTTON.on_falling_edge(now_ms);
}
