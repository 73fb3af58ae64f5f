//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) and the
//! scheduler emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide where they go: the serial
//! console on the board, a recorder in tests.

use core::fmt::Write;

use crate::control::mode::{ModeAction, RunState};
use crate::error::ActuatorError;
use crate::scheduler::TickStats;

/// Rendered status line (no heap).
pub type Line = heapless::String<96>;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started.
    Started { period_ms: u32 },

    /// Per-tick status: measured motor velocity.
    Status { velocity: f32 },

    /// A tick ran longer than its budget.
    Overrun { period_ms: u32, elapsed_us: u64 },

    /// The mode machine applied a transition.
    ModeChanged {
        from: RunState,
        to: RunState,
        action: ModeAction,
    },

    /// The governor could not derive a valid ceiling this tick.
    GovernorFault(ActuatorError),

    /// Periodic timing report.
    Stats(TickStats),
}

impl AppEvent {
    /// Render the event as the single line printed on the serial link.
    pub fn render(&self) -> Line {
        let mut line = Line::new();
        // Overflow only truncates the line.
        let _ = match self {
            Self::Started { period_ms } => {
                write!(line, "Control loop started (period {} ms)", period_ms)
            }
            Self::Status { velocity } => write!(line, "Motor velocity: {:.6}", velocity),
            Self::Overrun { period_ms, .. } => {
                write!(line, "Warning: Main task took longer than {} ms", period_ms)
            }
            Self::ModeChanged { from, to, action } => {
                write!(line, "Mode: {:?} -> {:?} ({:?})", from, to, action)
            }
            Self::GovernorFault(e) => write!(line, "Governor: {}, ceiling forced to 0", e),
            Self::Stats(s) => write!(
                line,
                "Ticks: {} overruns={} last={}us max={}us",
                s.ticks, s.overruns, s.last_elapsed_us, s.max_elapsed_us
            ),
        };
        line
    }
}
