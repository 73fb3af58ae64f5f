//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`AppEvent`] as one line to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Overruns go out at warn level, governor faults at error level.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let line = event.render();
        match event {
            AppEvent::Overrun { .. } => warn!("{}", line),
            AppEvent::GovernorFault(_) => error!("{}", line),
            _ => info!("{}", line),
        }
    }
}
