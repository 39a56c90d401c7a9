/*!
Per-engine data owned by the coordinator, and the signal plumbing for interrupts.

Engine status is stored atomically so the coordinator may read it after the post-search join
without locking the engine, and the remaining fields are metrics: idle time at the join,
barrier traffic, exchange pacing, and the deltas of the last primary sync.
*/

use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use crate::{portfolio::adapter::SearchStats, reports::Report};

const STATUS_UNKNOWN: u8 = 0;
const STATUS_SATISFIABLE: u8 = 1;
const STATUS_UNSATISFIABLE: u8 = 2;

/// Data the coordinator keeps per engine.
pub struct EngineData {
    /// The engine's stable index within the pack.
    pub index: usize,

    /// The engine's status slot, written by the engine's thread, read after the join.
    status: AtomicU8,

    /// The activity-counter threshold pacing the engine's next exchange.
    pub(crate) next_sync_threshold: AtomicU64,

    /// Wall time the engine has spent idling at the post-search join.
    idle_nanos: AtomicU64,

    /// Times this engine's answer was published.
    pub(crate) wins: AtomicU64,

    /// Times the engine entered the exchange protocol.
    pub(crate) barrier_entries: AtomicU64,

    /// Individual barrier waits, across exchange phases and the join.
    pub(crate) barrier_waits: AtomicU64,

    /// Variables replayed by the last primary sync.
    pub(crate) last_sync_variables: AtomicUsize,

    /// Units replayed by the last primary sync.
    pub(crate) last_sync_units: AtomicUsize,

    /// Clauses replayed by the last primary sync.
    pub(crate) last_sync_clauses: AtomicUsize,
}

impl EngineData {
    pub fn new(index: usize) -> Self {
        EngineData {
            index,
            status: AtomicU8::new(STATUS_UNKNOWN),
            next_sync_threshold: AtomicU64::new(0),
            idle_nanos: AtomicU64::new(0),
            wins: AtomicU64::new(0),
            barrier_entries: AtomicU64::new(0),
            barrier_waits: AtomicU64::new(0),
            last_sync_variables: AtomicUsize::new(0),
            last_sync_units: AtomicUsize::new(0),
            last_sync_clauses: AtomicUsize::new(0),
        }
    }

    /// The engine's reported status.
    pub fn status(&self) -> Report {
        match self.status.load(Ordering::Acquire) {
            STATUS_SATISFIABLE => Report::Satisfiable,
            STATUS_UNSATISFIABLE => Report::Unsatisfiable,
            _ => Report::Unknown,
        }
    }

    pub(crate) fn set_status(&self, report: Report) {
        let raw = match report {
            Report::Satisfiable => STATUS_SATISFIABLE,
            Report::Unsatisfiable => STATUS_UNSATISFIABLE,
            Report::Unknown => STATUS_UNKNOWN,
        };
        self.status.store(raw, Ordering::Release);
    }

    pub(crate) fn add_idle(&self, idle: Duration) {
        self.idle_nanos
            .fetch_add(idle.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Accumulated idle wall time at the post-search join, in seconds.
    pub fn idle_seconds(&self) -> f64 {
        self.idle_nanos.load(Ordering::Relaxed) as f64 * 1e-9
    }

    pub(crate) fn record_sync_deltas(&self, variables: usize, units: usize, clauses: usize) {
        self.last_sync_variables.store(variables, Ordering::Relaxed);
        self.last_sync_units.store(units, Ordering::Relaxed);
        self.last_sync_clauses.store(clauses, Ordering::Relaxed);
    }

    pub(crate) fn clear_sync_deltas(&self) {
        self.record_sync_deltas(0, 0, 0);
    }
}

/// The asynchronous stop signals of a portfolio: one stop flag, one interrupt per engine.
pub(crate) struct Signals {
    stop: AtomicBool,
    interrupts: Vec<Arc<AtomicBool>>,
}

impl Signals {
    pub fn new(interrupts: Vec<Arc<AtomicBool>>) -> Self {
        Signals {
            stop: AtomicBool::new(false),
            interrupts,
        }
    }

    /// Stop every engine: raise the stop flag, then every interrupt.
    ///
    /// Idempotent and asynchronous; engines notice at their next safepoint.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        for interrupt in &self.interrupts {
            interrupt.store(true, Ordering::Release);
        }
    }

    /// True once a stop has been requested.
    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Lower every signal, before a fresh solve.
    pub fn clear(&self) {
        self.stop.store(false, Ordering::Release);
        for interrupt in &self.interrupts {
            interrupt.store(false, Ordering::Release);
        }
    }
}

/// A cloneable handle for interrupting a solve from another thread.
///
/// The solving thread holds the portfolio itself, so a watchdog takes one of these instead.
#[derive(Clone)]
pub struct Interrupter {
    pub(crate) signals: Arc<Signals>,
}

impl Interrupter {
    /// Interrupt the solve in progress, if any.
    pub fn interrupt(&self) {
        self.signals.request_stop();
    }
}

/// A snapshot of one engine's statistics.
#[derive(Clone, Copy, Debug)]
pub struct EngineStats {
    pub index: usize,
    pub status: Report,
    pub search: SearchStats,
    pub idle_seconds: f64,
    pub wins: u64,
    pub barrier_entries: u64,
    pub barrier_waits: u64,
    pub last_sync_variables: usize,
    pub last_sync_units: usize,
    pub last_sync_clauses: usize,
}

/// A snapshot of the portfolio's statistics.
#[derive(Clone, Debug)]
pub struct PortfolioStats {
    pub cores: usize,
    pub simplification_seconds: f64,
    pub wall_seconds: f64,
    /// Arithmetic sums of the per-engine search totals.
    pub sum: SearchStats,
    /// Engines inside the exchange protocol at the snapshot; a metric only.
    pub syncing_solvers: usize,
    pub engines: Vec<EngineStats>,
}
