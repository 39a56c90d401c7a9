/*!
The three-phase, barrier-aligned exchange protocol, and the engine driver.

Engines call back into [sync_round] from restart-like safepoints.
A round is three rendezvous on the shared barrier:

1. **Rendezvous** --- every engine pauses at the exchange point.
2. **Publish** --- each engine drains its export buffer into *its own* pool, then waits.
3. **Import** --- each engine reads every *other* pool through its local quality filter, then
   waits.

The barriers give a global happens-before between writing a pool and any read of it, so the
pools need no further locking discipline.

Every rendezvous requires the full pack.
An engine done searching therefore *serves* the barrier from the post-search join in
[run_engine]: it decrements the shared active-searcher count and keeps waiting until the count
reaches zero, keeping in-flight rounds live while the rest of the pack drains.
The single release in which every engine is idle ends the join, and leaves the barrier empty.
*/

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, RwLock,
};
use std::time::Instant;

use crate::{
    misc::log::targets,
    portfolio::{
        adapter::PortfolioEngine,
        barrier::Barrier,
        clause_pool::{ClausePool, SharedClause},
        data::{EngineData, Signals},
    },
    reports::Report,
    structures::literal::CLiteral,
};

/// Counter-units an engine advances its exchange threshold by after each round.
pub(crate) const SYNC_COUNTER_INCREMENT: u64 = 10_000;

/// Clauses an engine may buffer for export between rounds; further learning is not offered.
pub(crate) const EXPORT_BUFFER_LIMIT: usize = 512;

/// Lock a mutex, riding over poisoning: a panicked engine thread should not wedge the pack.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// State shared between the coordinator and every engine thread.
pub(crate) struct Shared<E: PortfolioEngine> {
    /// The engines, locked for the duration of a run by their driving thread.
    pub engines: Vec<Mutex<E>>,

    /// Coordinator-owned data per engine.
    pub data: Vec<EngineData>,

    /// The rendezvous aligning exchange rounds and the post-search join.
    pub barrier: Barrier,

    /// One staging pool per engine, written by its owner in Phase 2.
    pub pools: Vec<Mutex<ClausePool>>,

    /// One export buffer per engine, fed by the learnt callback between rounds.
    pub exports: Vec<Mutex<Vec<SharedClause>>>,

    /// The assumptions of the solve in progress, written before workers wake.
    pub assumptions: RwLock<Vec<CLiteral>>,

    /// Stop and interrupt signalling.
    pub signals: Arc<Signals>,

    /// Engines still inside `solve_limited`.
    pub active_searchers: AtomicUsize,

    /// Engines inside the exchange protocol; reset as Phase 1 completes.
    /// A metric, nothing synchronises on it.
    pub syncing_solvers: AtomicUsize,

    /// Whether to print `c` progress lines.
    pub verbosity: u8,
}

/// Drive engine `index` through one search: solve, report, and serve the post-search join.
pub(crate) fn run_engine<E: PortfolioEngine>(shared: &Shared<E>, index: usize) {
    let data = &shared.data[index];

    let report = {
        let mut engine = lock(&shared.engines[index]);
        if !engine.okay() {
            // A bad state before searching is a verdict all the same.
            data.set_status(Report::Unsatisfiable);
            Report::Unsatisfiable
        } else {
            data.set_status(Report::Unknown);
            let assumptions = match shared.assumptions.read() {
                Ok(assumptions) => assumptions.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            };

            if shared.verbosity > 0 {
                println!("c started thread {index}");
            }
            log::debug!(target: targets::PORTFOLIO, "Engine {index} searching");

            let report = engine.solve_limited(&assumptions);
            data.set_status(report);
            report
        }
    };

    if report.definite() {
        shared.signals.request_stop();
    }
    log::debug!(target: targets::PORTFOLIO, "Engine {index} done: {report}");

    // The post-search join: serve the barrier until the whole pack is out of search.
    shared.active_searchers.fetch_sub(1, Ordering::AcqRel);
    let idle_timer = Instant::now();
    loop {
        shared.barrier.wait();
        data.barrier_waits.fetch_add(1, Ordering::Relaxed);
        if shared.active_searchers.load(Ordering::Acquire) == 0 {
            break;
        }
    }
    data.add_idle(idle_timer.elapsed());
}

/// One pass of the exchange protocol for engine `index`, called from its sync hook.
///
/// Returns `true` exactly when the coordinator has signalled stop.
pub(crate) fn sync_round<E: PortfolioEngine>(
    shared: &Shared<E>,
    index: usize,
    engine: &mut E,
) -> bool {
    let data = &shared.data[index];

    // Pacing: a no-op until the engine's activity counter passes its threshold.
    let activity = engine.activity_sum();
    if activity <= data.next_sync_threshold.load(Ordering::Relaxed) {
        return shared.signals.stopped();
    }

    shared.syncing_solvers.fetch_add(1, Ordering::Relaxed);
    data.barrier_entries.fetch_add(1, Ordering::Relaxed);
    log::trace!(target: targets::SYNC, "Engine {index} at exchange point");

    // Phase 1: rendezvous.
    shared.barrier.wait();
    data.barrier_waits.fetch_add(1, Ordering::Relaxed);
    shared.syncing_solvers.store(0, Ordering::Relaxed);

    // Phase 2: publish recent learning into this engine's own pool.
    {
        let mut pool = lock(&shared.pools[index]);
        let mut exports = lock(&shared.exports[index]);
        for clause in exports.drain(..) {
            pool.add_shared_clause(&clause.literals, clause.glue);
        }
    }
    shared.barrier.wait();
    data.barrier_waits.fetch_add(1, Ordering::Relaxed);

    // Phase 3: import from every other pool, through the local filter.
    for other in 0..shared.engines.len() {
        if other == index {
            continue;
        }
        let pool = lock(&shared.pools[other]);
        for slot in 0..pool.size() {
            let clause = pool.get(slot);
            if engine.import_filter(clause.glue, clause.literals.len()) {
                engine.import_learnt(&clause.literals, clause.glue);
            }
        }
    }
    shared.barrier.wait();
    data.barrier_waits.fetch_add(1, Ordering::Relaxed);

    data.next_sync_threshold
        .fetch_add(SYNC_COUNTER_INCREMENT, Ordering::Relaxed);
    lock(&shared.pools[index]).reset();

    shared.signals.stopped()
}
