//! Run/idle mode flags and the per-tick mode state machine.
//!
//! The button ISR is the only writer of the run bit; the control tick is
//! the only consumer of the pending-reset bit.  Both bits live in one
//! `AtomicU8` so a reader can never observe one flag updated without the
//! other.
//!
//! ```text
//!            press                      tick (reset once)
//!   Idle ─────────────▶ Entering ─────────────────────▶ Running
//!    ▲                  (run=1, pending=1)              (run=1, pending=0)
//!    │        press                                        │
//!    └─────────────────────────────────────────────────────┘
//! ```
//!
//! Per tick, [`ModeMachine::evaluate`] turns the current flags into a
//! [`ModeAction`] that the control service applies to the actuator and
//! the task indicator.

use core::sync::atomic::{AtomicU8, Ordering};

const RUNNING: u8 = 0b01;
const PENDING_RESET: u8 = 0b10;

/// Whether the control task is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Explicit three-phase view of the packed flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModePhase {
    /// Not running.  A reset may still be pending if a press pair landed
    /// between two ticks.
    Idle { pending_reset: bool },
    /// Running, reset-once actions not yet performed.
    Entering,
    /// Running, reset already performed.
    Running,
}

/// Consistent copy of both flags taken with one atomic load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSnapshot {
    pub run_state: RunState,
    pub pending_reset: bool,
}

impl FlagSnapshot {
    fn from_bits(bits: u8) -> Self {
        Self {
            run_state: if bits & RUNNING != 0 {
                RunState::Running
            } else {
                RunState::Idle
            },
            pending_reset: bits & PENDING_RESET != 0,
        }
    }

    pub fn phase(self) -> ModePhase {
        match (self.run_state, self.pending_reset) {
            (RunState::Idle, pending_reset) => ModePhase::Idle { pending_reset },
            (RunState::Running, true) => ModePhase::Entering,
            (RunState::Running, false) => ModePhase::Running,
        }
    }
}

/// Shared `(RunState, PendingReset)` pair.
///
/// `const`-constructible so it can live in a `static` reachable from the
/// GPIO ISR.
pub struct ModeFlags {
    bits: AtomicU8,
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeFlags {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// Flip the run state.  `Idle → Running` also raises the pending-reset
    /// bit; `Running → Idle` leaves it as it was.
    ///
    /// Lock-free, safe to call from interrupt context.  Returns the new
    /// run state.
    pub fn toggle(&self) -> RunState {
        let prev = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some(if bits & RUNNING != 0 {
                    bits & !RUNNING
                } else {
                    bits | RUNNING | PENDING_RESET
                })
            })
            .unwrap_or_else(|bits| bits);
        if prev & RUNNING != 0 {
            RunState::Idle
        } else {
            RunState::Running
        }
    }

    /// Read both flags at once.
    pub fn snapshot(&self) -> FlagSnapshot {
        FlagSnapshot::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Clear the pending-reset bit.  Returns whether it was set, so
    /// exactly one caller ever observes a given reset request.
    pub fn take_pending_reset(&self) -> bool {
        self.bits.fetch_and(!PENDING_RESET, Ordering::AcqRel) & PENDING_RESET != 0
    }

    pub fn run_state(&self) -> RunState {
        self.snapshot().run_state
    }
}

/// Process-wide flags written by the button ISR and read by the tick.
pub static MODE_FLAGS: ModeFlags = ModeFlags::new();

/// Falling-edge callback for the user button.
pub fn toggle_run_state() {
    MODE_FLAGS.toggle();
}

/// What the control tick must do to the actuator and indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    /// Idle and already reset: nothing to do.
    Hold,
    /// Just entered Running: reset once, then enable.
    Enter,
    /// Steady Running: assert enabled (idempotent).
    Run,
    /// Left Running: switch the actuator and indicator off once.
    Stop,
    /// Idle with a reset pending (press pair between ticks): reset once.
    Reset,
}

impl ModeAction {
    /// Whether this action performs the one-shot reset.
    pub fn resets(self) -> bool {
        matches!(self, Self::Enter | Self::Reset)
    }
}

/// Consumer side of [`ModeFlags`], owned by the control tick.
#[derive(Debug)]
pub struct ModeMachine {
    /// Run state the outputs were last driven to.
    applied: RunState,
    resets: u32,
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            applied: RunState::Idle,
            resets: 0,
        }
    }

    /// Decide this tick's action from the shared flags and consume the
    /// pending reset if there is one.
    pub fn evaluate(&mut self, flags: &ModeFlags) -> ModeAction {
        let snapshot = flags.snapshot();
        let action = match snapshot.phase() {
            ModePhase::Entering => {
                // The ISR may have toggled again since the snapshot; the
                // bit is consumed either way and the next tick sees Idle.
                if flags.take_pending_reset() {
                    ModeAction::Enter
                } else {
                    ModeAction::Run
                }
            }
            ModePhase::Running => ModeAction::Run,
            ModePhase::Idle { pending_reset: true } if flags.take_pending_reset() => {
                ModeAction::Reset
            }
            ModePhase::Idle { .. } => {
                if self.applied == RunState::Running {
                    ModeAction::Stop
                } else {
                    ModeAction::Hold
                }
            }
        };

        if action.resets() {
            self.resets = self.resets.wrapping_add(1);
        }
        self.applied = snapshot.run_state;
        action
    }

    /// Run state the outputs currently reflect.
    pub fn applied(&self) -> RunState {
        self.applied
    }

    /// Number of one-shot resets performed since startup.
    pub fn reset_count(&self) -> u32 {
        self.resets
    }
}
