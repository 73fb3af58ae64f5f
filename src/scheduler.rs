//! Periodic tick scheduler.
//!
//! Drives the control tick at a fixed period on the monotonic clock:
//!
//! ```text
//!  ┌─ start = now ────────────────────────────────────────────┐
//!  │  body()  (governor → mode machine → status → heartbeat)   │
//!  │  elapsed = now - start                                    │
//!  │  elapsed <  period → sleep(period - elapsed)              │
//!  │  elapsed >= period → warn, next tick starts immediately   │
//!  └───────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no catch-up: an overrun is reported, never compensated, and
//! the following ticks keep their normal budget.  The sleep is the only
//! point in the loop where the task suspends.

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, TimePort};

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Body finished within budget; the scheduler slept `sleep_us`.
    Slept { elapsed_us: u64, sleep_us: u64 },
    /// Body met or exceeded the budget; no sleep.
    Overrun { elapsed_us: u64 },
}

/// Remaining sleep for a tick, or `None` if the tick overran.
pub fn plan_sleep(period_us: u64, elapsed_us: u64) -> Option<u64> {
    if elapsed_us >= period_us {
        None
    } else {
        Some(period_us - elapsed_us)
    }
}

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Total ticks executed.
    pub ticks: u64,
    /// Ticks that met or exceeded the period.
    pub overruns: u64,
    /// Body duration of the last tick [µs].
    pub last_elapsed_us: u64,
    /// Longest body duration seen [µs].
    pub max_elapsed_us: u64,
}

impl TickStats {
    fn record(&mut self, elapsed_us: u64, overrun: bool) {
        self.ticks += 1;
        self.last_elapsed_us = elapsed_us;
        self.max_elapsed_us = self.max_elapsed_us.max(elapsed_us);
        if overrun {
            self.overruns += 1;
        }
    }
}

/// Fixed-period cooperative scheduler.
pub struct PeriodicScheduler {
    period_ms: u32,
    period_us: u64,
    /// Emit a [`AppEvent::Stats`] every this many ticks (0 = never).
    stats_interval: u32,
    stats: TickStats,
}

impl PeriodicScheduler {
    pub fn new(period_ms: u32, stats_interval: u32) -> Self {
        Self {
            period_ms,
            period_us: u64::from(period_ms) * 1000,
            stats_interval,
            stats: TickStats::default(),
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Run one tick: time the body, then sleep the remainder or report
    /// the overrun.
    pub fn run_tick<T, S>(
        &mut self,
        time: &mut T,
        sink: &mut S,
        body: impl FnOnce(&mut S),
    ) -> TickOutcome
    where
        T: TimePort,
        S: EventSink,
    {
        let start = time.now_us();
        body(sink);
        let elapsed_us = time.now_us().saturating_sub(start);

        let outcome = match plan_sleep(self.period_us, elapsed_us) {
            Some(sleep_us) => {
                self.stats.record(elapsed_us, false);
                time.sleep_us(sleep_us);
                TickOutcome::Slept {
                    elapsed_us,
                    sleep_us,
                }
            }
            None => {
                self.stats.record(elapsed_us, true);
                debug!(
                    "Tick overran: {}us against a {}ms budget",
                    elapsed_us, self.period_ms
                );
                sink.emit(&AppEvent::Overrun {
                    period_ms: self.period_ms,
                    elapsed_us,
                });
                TickOutcome::Overrun { elapsed_us }
            }
        };

        if self.stats_interval != 0 && self.stats.ticks % u64::from(self.stats_interval) == 0 {
            sink.emit(&AppEvent::Stats(self.stats));
        }
        outcome
    }

    /// Run ticks for the lifetime of the process.
    pub fn run<T, S>(&mut self, time: &mut T, sink: &mut S, mut body: impl FnMut(&mut S)) -> !
    where
        T: TimePort,
        S: EventSink,
    {
        loop {
            self.run_tick(time, sink, &mut body);
        }
    }
}
