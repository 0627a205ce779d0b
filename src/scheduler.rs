//! Periodic tick driver.
//!
//! One tick runs the visibility check, then the registry refresh, then hands
//! any new result to the presenter. The scheduler only owns cadence; the UI
//! loop (or [`TickScheduler::run_blocking`]) decides when to poll it.

use crate::audio::{SessionRegistry, SessionSource};
use crate::presentation::Presenter;
use crate::window::{ForegroundMonitor, VisibilityController, WidgetVisibility};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// Fixed-period timer that coalesces missed fires.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next_due: Option<Instant>,
}

impl Cadence {
    /// The first fire is due immediately.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.map_or(true, |due| now >= due)
    }

    /// Consume a due fire. The next one is a full period after `now`, so a
    /// late fire never produces a burst of catch-up ticks.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.next_due = Some(now + self.period);
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map_or(Duration::ZERO, |due| due.saturating_duration_since(now))
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub visibility: WidgetVisibility,

    /// Whether the presenter was called (a rebuild or an error)
    pub presented: bool,
}

/// Orders and paces the two control loops.
pub struct TickScheduler {
    cadence: Cadence,
    ticks: u64,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            cadence: Cadence::new(period),
            ticks: 0,
        }
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run a tick if one is due at `now`.
    pub fn poll<S, M, P>(
        &mut self,
        now: Instant,
        visibility: &mut VisibilityController<M>,
        registry: &mut SessionRegistry<S>,
        presenter: &mut P,
    ) -> Option<TickReport>
    where
        S: SessionSource,
        M: ForegroundMonitor,
        P: Presenter + ?Sized,
    {
        if !self.cadence.fire(now) {
            return None;
        }
        Some(self.tick(visibility, registry, presenter))
    }

    /// Run one tick unconditionally.
    pub fn tick<S, M, P>(
        &mut self,
        visibility: &mut VisibilityController<M>,
        registry: &mut SessionRegistry<S>,
        presenter: &mut P,
    ) -> TickReport
    where
        S: SessionSource,
        M: ForegroundMonitor,
        P: Presenter + ?Sized,
    {
        self.ticks += 1;

        let state = visibility.evaluate();
        let outcome = registry.refresh();
        let presented = !outcome.is_no_change();
        if presented {
            presenter.present(&outcome);
        }

        trace!(tick = self.ticks, ?state, presented, "tick");
        TickReport {
            visibility: state,
            presented,
        }
    }

    /// Drive ticks on the current thread until `stop` is set.
    ///
    /// Sleeps between fires; for use without a UI event loop.
    pub fn run_blocking<S, M, P>(
        &mut self,
        stop: &AtomicBool,
        visibility: &mut VisibilityController<M>,
        registry: &mut SessionRegistry<S>,
        presenter: &mut P,
    ) where
        S: SessionSource,
        M: ForegroundMonitor,
        P: Presenter + ?Sized,
    {
        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if self.poll(now, visibility, registry, presenter).is_none() {
                std::thread::sleep(self.cadence.time_until_due(now));
            }
        }
    }
}
