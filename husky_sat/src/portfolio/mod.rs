/*!
The parallel portfolio coordinator.

A [Portfolio] owns a pack of diversified engines racing on the same formula.
Engine zero is the **primary**: it alone receives problem edits and runs simplification, and
the coordinator replays the resulting deltas to each **secondary** before a parallel solve.
During search, engines exchange learnt clauses through a three-phase, barrier-aligned
protocol, and when any engine finishes the rest are interrupted, joined through the
[barrier](Barrier), and a single answer is published.

Threading: `cores - 1` workers are managed by the [JobQueue]; the caller's thread drives the
primary.
At `cores == 1` the coordinator is a pure sequential pass-through and neither the queue nor
the barrier is built.

```rust
use husky_sat::config::PortfolioConfig;
use husky_sat::portfolio::Portfolio;
use husky_sat::reports::Report;

let mut config = PortfolioConfig::default();
config.cores = 4;
let mut pack: Portfolio = Portfolio::from_config(config);

pack.read_dimacs("p cnf 2 2\n1 2 0\n-1 2 0\n".as_bytes()).expect("well formed");
assert_eq!(pack.solve_limited(&[]), Ok(Report::Satisfiable));
```
*/

pub mod adapter;
pub mod barrier;
pub mod clause_pool;
mod data;
pub mod job_queue;
mod sync;

pub use adapter::{ParallelHooks, PortfolioEngine, SearchStats};
pub use barrier::Barrier;
pub use clause_pool::{ClausePool, SharedClause};
pub use data::{EngineData, EngineStats, Interrupter, PortfolioStats};
pub use job_queue::{JobQueue, PoolState};

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, RwLock,
};
use std::time::Instant;

use crate::{
    config::PortfolioConfig,
    context::Context,
    misc::log::targets,
    reports::Report,
    structures::{atom::Atom, literal::CLiteral},
    types::err::{ParseError, PortfolioError},
};

use data::Signals;
use sync::{lock, Shared};

/// A parallel portfolio of engines racing on one formula.
///
/// Generic over the engine; [Context] is the canonical instantiation.
pub struct Portfolio<E: PortfolioEngine = Context> {
    /// Engines in the pack, fixed at construction.
    cores: usize,

    /// State shared with engine threads.
    shared: Arc<Shared<E>>,

    /// The worker pool driving secondaries; absent at `cores == 1`.
    job_queue: Option<JobQueue>,

    /// Set by any mutation of the primary, cleared once secondaries are resynced.
    primary_dirty: bool,

    /// Whether the once-per-lifetime sequential simplification is still pending.
    use_simplification: bool,

    /// Original clauses of the primary already replayed to secondaries.
    synced_clauses: usize,

    /// Units of the primary already replayed to secondaries.
    synced_units: usize,

    /// Secondaries still in play; a failed sync retires an engine for good.
    healthy: Vec<bool>,

    /// Wall time spent in the sequential simplification phase.
    simplification_seconds: f64,

    /// Construction time, for the wall-clock statistics.
    started: Instant,

    /// Whether to print `c` progress lines.
    verbosity: u8,

    /// The published model, written only after all engines have joined.
    model: Vec<Option<bool>>,

    /// The published failed-assumption conflict, written only after all engines have joined.
    conflict: Vec<CLiteral>,
}

impl Portfolio<Context> {
    /// A portfolio of diversified [Context] engines per the configuration.
    pub fn from_config(config: PortfolioConfig) -> Self {
        let cores = config.resolved_cores();
        let engines = (0..cores)
            .map(|_| Context::from_config(config.context.clone()))
            .collect();
        Self::from_engines(config, engines)
    }

    /// Read a DIMACS formula into the primary engine.
    pub fn read_dimacs(
        &mut self,
        reader: impl std::io::BufRead,
    ) -> Result<crate::builder::ParserInfo, ParseError> {
        self.primary_dirty = true;
        let mut primary = lock(&self.shared.engines[0]);
        primary.read_dimacs(reader)
    }
}

impl<E: PortfolioEngine> Portfolio<E> {
    /// A portfolio over the given engines, diversifying each by its index.
    ///
    /// The `cores` of the configuration is ignored in favour of the engine count.
    pub fn from_engines(config: PortfolioConfig, mut engines: Vec<E>) -> Self {
        assert!(!engines.is_empty(), "a portfolio requires an engine");
        let cores = engines.len();
        let verbosity = config.verbosity;

        if verbosity > 0 {
            println!("c initialize solver for {cores} cores");
        }

        let use_simplification = config.context.simplification;
        for (index, engine) in engines.iter_mut().enumerate() {
            engine.diversify(index, 32);
            if index > 0 {
                // Simplification runs only on the primary.
                engine.eliminate(true);
            }
        }
        if !use_simplification {
            engines[0].eliminate(true);
        }

        let interrupts = engines.iter().map(|engine| engine.interrupt_flag()).collect();

        let job_queue = match cores {
            1 => None,
            _ => {
                if verbosity > 0 {
                    println!("c initialize thread pool for {} non-primary threads", cores - 1);
                }
                let queue = JobQueue::new(cores - 1);
                queue.set_state(PoolState::Sleep);
                Some(queue)
            }
        };

        let shared = Arc::new(Shared {
            engines: engines.into_iter().map(Mutex::new).collect(),
            data: (0..cores).map(EngineData::new).collect(),
            barrier: Barrier::new(0),
            pools: (0..cores).map(|_| Mutex::new(ClausePool::default())).collect(),
            exports: (0..cores).map(|_| Mutex::new(Vec::default())).collect(),
            assumptions: RwLock::new(Vec::default()),
            signals: Arc::new(Signals::new(interrupts)),
            active_searchers: AtomicUsize::new(0),
            syncing_solvers: AtomicUsize::new(0),
            verbosity,
        });

        Portfolio {
            cores,
            shared,
            job_queue,
            primary_dirty: false,
            use_simplification,
            synced_clauses: 0,
            synced_units: 0,
            healthy: vec![true; cores],
            simplification_seconds: 0.0,
            started: Instant::now(),
            verbosity,
            model: Vec::default(),
            conflict: Vec::default(),
        }
    }

    // Problem specification, forwarded to the primary.

    /// The current number of atoms.
    pub fn n_vars(&self) -> usize {
        lock(&self.shared.engines[0]).n_vars()
    }

    /// The current number of original clauses.
    pub fn n_clauses(&self) -> usize {
        lock(&self.shared.engines[0]).n_clauses()
    }

    /// A fresh atom on the primary, replayed to secondaries at the next solve.
    pub fn new_var(&mut self, polarity: bool, decision: bool) -> Atom {
        self.primary_dirty = true;
        lock(&self.shared.engines[0]).new_var(polarity, decision)
    }

    /// Reserve space for `count` atoms in total.
    pub fn reserve_vars(&mut self, count: usize) {
        lock(&self.shared.engines[0]).reserve_vars(count);
    }

    /// Add a clause; false exactly when the addition proves the formula unsatisfiable.
    pub fn add_clause(&mut self, literals: &[CLiteral]) -> bool {
        self.primary_dirty = true;
        lock(&self.shared.engines[0]).add_clause(literals)
    }

    /// Note a clause for proof checking.
    pub fn add_input_clause(&mut self, literals: &[CLiteral]) {
        self.primary_dirty = true;
        lock(&self.shared.engines[0]).add_input_clause(literals);
    }

    /// Freeze or thaw an atom against elimination on the primary.
    pub fn set_frozen(&mut self, atom: Atom, frozen: bool) {
        lock(&self.shared.engines[0]).set_frozen(atom, frozen);
    }

    /// Whether the primary has eliminated `atom`.
    pub fn is_eliminated(&self, atom: Atom) -> bool {
        lock(&self.shared.engines[0]).is_eliminated(atom)
    }

    /// Simplify the primary's formula; false exactly when proven unsatisfiable.
    pub fn eliminate(&mut self, turn_off: bool) -> bool {
        self.primary_dirty = true;
        if self.verbosity > 0 {
            println!("c primary elimination");
        }
        lock(&self.shared.engines[0]).eliminate(turn_off)
    }

    /// The clause count above which simplification is not performed.
    pub fn max_simp_cls(&self) -> usize {
        lock(&self.shared.engines[0]).max_simp_cls()
    }

    /// False if any engine is in a conflicting state.
    pub fn okay(&self) -> bool {
        self.shared
            .engines
            .iter()
            .all(|engine| lock(engine).okay())
    }

    // Results.

    /// The published model of the last satisfiable solve.
    pub fn model(&self) -> &[Option<bool>] {
        &self.model
    }

    /// The published failed assumptions of the last unsatisfiable solve.
    pub fn conflict(&self) -> &[CLiteral] {
        &self.conflict
    }

    // Solving.

    /// Determine satisfiability under `assumptions`, as a boolean.
    pub fn solve(&mut self, assumptions: &[CLiteral]) -> Result<bool, PortfolioError> {
        Ok(self.solve_limited(assumptions)? == Report::Satisfiable)
    }

    /// Determine satisfiability under `assumptions`.
    ///
    /// Returns [Unknown](Report::Unknown) when interrupted or when every engine exhausted its
    /// budget, and an error only on unsound disagreement between engines.
    pub fn solve_limited(
        &mut self,
        assumptions: &[CLiteral],
    ) -> Result<Report, PortfolioError> {
        self.model.clear();
        self.conflict.clear();
        self.shared.signals.clear();
        for data in &self.shared.data {
            data.clear_sync_deltas();
        }

        // Simplify sequentially, once per portfolio lifetime.
        if self.use_simplification {
            if self.verbosity > 0 {
                println!("c run simplification with primary solver");
            }
            self.use_simplification = false;
            let timer = Instant::now();
            let simplified = {
                let mut primary = lock(&self.shared.engines[0]);
                for assumption in assumptions {
                    primary.set_frozen(assumption.atom(), true);
                }
                let simplified = primary.eliminate(true);
                self.shared.data[0]
                    .next_sync_threshold
                    .store(primary.activity_sum(), Ordering::Relaxed);
                simplified
            };
            self.simplification_seconds += timer.elapsed().as_secs_f64();
            self.primary_dirty = true;

            if !simplified {
                if self.verbosity > 0 {
                    println!("c simplification solved formula as unsat");
                }
                // The short-circuit publishes through the same slots as any other outcome.
                self.shared.data[0].set_status(Report::Unsatisfiable);
                self.shared.data[0].wins.fetch_add(1, Ordering::Relaxed);
                return Ok(Report::Unsatisfiable);
            }
        }

        // Sequential fast path.
        if self.cores == 1 {
            let report = {
                let mut primary = lock(&self.shared.engines[0]);
                let report = primary.solve_limited(assumptions);
                match report {
                    Report::Satisfiable => self.model = primary.model().to_vec(),
                    Report::Unsatisfiable => self.conflict = primary.conflict().to_vec(),
                    Report::Unknown => {}
                }
                report
            };
            self.shared.data[0].set_status(report);
            if report.definite() {
                self.shared.data[0].wins.fetch_add(1, Ordering::Relaxed);
            }
            return Ok(report);
        }

        // Parallel path: publish assumptions, sync secondaries, launch, run the primary.
        //
        // An assumption over an atom the primary eliminated brings the atom and its clauses
        // back first, so the coming sync replays them to every secondary.
        {
            let mut primary = lock(&self.shared.engines[0]);
            for assumption in assumptions {
                if primary.is_eliminated(assumption.atom()) {
                    primary.set_frozen(assumption.atom(), true);
                    self.primary_dirty = true;
                }
            }
        }

        match self.shared.assumptions.write() {
            Ok(mut shared_assumptions) => *shared_assumptions = assumptions.to_vec(),
            Err(poisoned) => *poisoned.into_inner() = assumptions.to_vec(),
        }

        if let Some(queue) = &self.job_queue {
            queue.set_state(PoolState::Sleep);
        }

        let mut launched = vec![0_usize];
        for target in 1..self.cores {
            if !self.healthy[target] {
                self.shared.data[target].set_status(Report::Unsatisfiable);
                continue;
            }
            if self.primary_dirty && !self.sync_from_primary(target) {
                log::warn!(
                    target: targets::PORTFOLIO,
                    "Engine {target} lost while syncing from the primary"
                );
                self.healthy[target] = false;
                self.shared.data[target].set_status(Report::Unsatisfiable);
                continue;
            }
            launched.push(target);
        }

        // The barrier admits exactly the engines about to search.
        if self.shared.barrier.capacity() > launched.len() {
            self.shared.barrier.reinit(launched.len());
        } else {
            self.shared.barrier.grow(launched.len());
        }
        self.shared
            .active_searchers
            .store(launched.len(), Ordering::Release);

        for &target in launched.iter().skip(1) {
            self.install_hooks(target);
            let shared = self.shared.clone();
            if let Some(queue) = &self.job_queue {
                queue.add_job(Box::new(move || sync::run_engine(&shared, target)));
            }
        }
        self.install_hooks(0);

        if let Some(queue) = &self.job_queue {
            queue.set_state(PoolState::Working);
        }
        self.primary_dirty = false;

        // The caller's thread drives the primary.
        sync::run_engine(&self.shared, 0);

        // Prepare the deltas of the next incremental solve.
        {
            let primary = lock(&self.shared.engines[0]);
            self.synced_clauses = primary.n_clauses();
            self.synced_units = primary.n_units();
        }

        let report = self.collect_results(&launched);
        debug_assert!(self.shared.barrier.empty());
        if let Some(queue) = &self.job_queue {
            queue.set_state(PoolState::Sleep);
        }
        report
    }

    /// Interrupt the solve in progress, if any; idempotent and asynchronous.
    pub fn interrupt(&self) {
        self.shared.signals.request_stop();
    }

    /// A handle for interrupting from another thread, e.g. a watchdog.
    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            signals: self.shared.signals.clone(),
        }
    }

    /// True if no worker thread is currently executing a job.
    pub fn all_workers_sleeping(&self) -> bool {
        match &self.job_queue {
            None => true,
            Some(queue) => queue.all_sleeping(),
        }
    }

    // Internals.

    /// Wire the exchange hooks into engine `target`.
    ///
    /// The hooks live inside the engine, which lives inside the shared state: they hold the
    /// shared state weakly to keep the whole downgradeable to a drop.
    fn install_hooks(&self, target: usize) {
        let sync_shared = Arc::downgrade(&self.shared);
        let export_shared = Arc::downgrade(&self.shared);

        let hooks = ParallelHooks {
            sync: Box::new(move |engine: &mut E| match sync_shared.upgrade() {
                Some(shared) => sync::sync_round(&shared, target, engine),
                None => true,
            }),
            learnt: Box::new(move |literals, glue| {
                if let Some(shared) = export_shared.upgrade() {
                    let mut exports = lock(&shared.exports[target]);
                    if exports.len() < sync::EXPORT_BUFFER_LIMIT {
                        exports.push(SharedClause {
                            literals: literals.to_vec(),
                            glue,
                        });
                    }
                }
            }),
        };

        lock(&self.shared.engines[target]).initialize_parallel_solver(hooks);
    }

    /// Replay the primary's delta since the last sync onto engine `target`.
    ///
    /// A no-op unless the primary has been modified.
    /// Returns false if any replayed clause failed or the target is conflicted.
    fn sync_from_primary(&self, target: usize) -> bool {
        if !self.primary_dirty {
            return true;
        }
        if self.verbosity > 0 {
            println!("c sync solver {target} from primary solver object");
        }

        let primary = lock(&self.shared.engines[0]);
        let mut secondary = lock(&self.shared.engines[target]);

        // Variables: eliminated variables are non-decision in the secondary.
        let variable_diff = primary.n_vars().saturating_sub(secondary.n_vars());
        if variable_diff > 0 {
            if self.verbosity > 0 {
                println!("c resolve variable diff: {variable_diff}");
            }
            secondary.reserve_vars(primary.n_vars());
            while secondary.n_vars() < primary.n_vars() {
                let next = secondary.n_vars() as Atom;
                secondary.new_var(true, !primary.is_eliminated(next));
            }
        }

        let mut replayed = true;

        // Units.
        let unit_diff = primary.n_units() - self.synced_units;
        if self.verbosity > 0 {
            println!("c resolve unit diff: {unit_diff}");
        }
        for index in self.synced_units..primary.n_units() {
            replayed = replayed && secondary.add_clause(&[primary.unit_at(index)]);
        }

        // Clauses, skipping any removed by simplification.
        let clause_diff = primary.n_clauses() - self.synced_clauses;
        if self.verbosity > 0 {
            println!("c resolve clause diff: {clause_diff}");
        }
        let mut replayed_clauses = 0;
        for index in self.synced_clauses..primary.n_clauses() {
            let clause = primary.clause_at(index);
            if clause.removed {
                continue;
            }
            replayed = replayed && secondary.import_clause(clause);
            replayed_clauses += 1;
        }

        self.shared.data[target].record_sync_deltas(variable_diff, unit_diff, replayed_clauses);

        replayed && secondary.okay()
    }

    /// Inspect every launched engine and publish the winning answer.
    fn collect_results(&mut self, launched: &[usize]) -> Result<Report, PortfolioError> {
        let mut sat_engine = None;
        let mut unsat_engine = None;
        let mut smallest_conflict = usize::MAX;
        let mut smallest_engine = None;

        for &index in launched {
            match self.shared.data[index].status() {
                Report::Unknown => continue,

                Report::Satisfiable => {
                    if sat_engine.is_none() {
                        sat_engine = Some(index);
                    }
                }

                Report::Unsatisfiable => {
                    if unsat_engine.is_none() {
                        unsat_engine = Some(index);
                    }
                    let size = lock(&self.shared.engines[index]).conflict().len();
                    if size < smallest_conflict {
                        smallest_conflict = size;
                        smallest_engine = Some(index);
                    }
                }
            }
        }

        if let (Some(satisfiable), Some(unsatisfiable)) = (sat_engine, unsat_engine) {
            log::error!(
                target: targets::PORTFOLIO,
                "Unsound: engine {satisfiable} found a model, engine {unsatisfiable} a refutation"
            );
            return Err(PortfolioError::Disagreement {
                satisfiable,
                unsatisfiable,
            });
        }

        match (sat_engine, smallest_engine) {
            (Some(winner), _) => {
                if winner != 0 {
                    // The primary eliminated variables the winner never saw: adopt the model
                    // and extend it over the eliminated variables.
                    let transferred = lock(&self.shared.engines[winner]).model().to_vec();
                    let mut primary = lock(&self.shared.engines[0]);
                    primary.replace_model(transferred);
                    primary.extend_model();
                }
                self.model = lock(&self.shared.engines[0]).model().to_vec();
                self.shared.data[winner].wins.fetch_add(1, Ordering::Relaxed);
                Ok(Report::Satisfiable)
            }

            (None, Some(winner)) => {
                self.conflict = lock(&self.shared.engines[winner]).conflict().to_vec();
                self.shared.data[winner].wins.fetch_add(1, Ordering::Relaxed);
                Ok(Report::Unsatisfiable)
            }

            (None, None) => Ok(Report::Unknown),
        }
    }

    // Statistics.

    /// A snapshot of the portfolio's statistics.
    pub fn stats(&self) -> PortfolioStats {
        let mut engines = Vec::with_capacity(self.cores);
        let mut sum = SearchStats::default();

        for index in 0..self.cores {
            let search = lock(&self.shared.engines[index]).search_stats();
            sum.conflicts += search.conflicts;
            sum.decisions += search.decisions;
            sum.restarts += search.restarts;

            let data = &self.shared.data[index];
            engines.push(EngineStats {
                index,
                status: data.status(),
                search,
                idle_seconds: data.idle_seconds(),
                wins: data.wins.load(Ordering::Relaxed),
                barrier_entries: data.barrier_entries.load(Ordering::Relaxed),
                barrier_waits: data.barrier_waits.load(Ordering::Relaxed),
                last_sync_variables: data.last_sync_variables.load(Ordering::Relaxed),
                last_sync_units: data.last_sync_units.load(Ordering::Relaxed),
                last_sync_clauses: data.last_sync_clauses.load(Ordering::Relaxed),
            });
        }

        PortfolioStats {
            cores: self.cores,
            simplification_seconds: self.simplification_seconds,
            wall_seconds: self.started.elapsed().as_secs_f64(),
            sum,
            syncing_solvers: self.shared.syncing_solvers.load(Ordering::Relaxed),
            engines,
        }
    }

    /// Print the `c`-prefixed statistic block on stdout.
    pub fn print_stats(&self) {
        let stats = self.stats();
        let wall = stats.wall_seconds;
        let simp = stats.simplification_seconds;

        println!("c used {} cores", stats.cores);
        println!("c simplification wall time: {simp:.6} s");
        println!("c CPU time: {wall:.6} s");
        println!(
            "c theor. Max CPU time: {:.6} s",
            (wall - simp) * stats.cores as f64 + simp
        );

        let total_idle: f64 = stats.engines.iter().map(|engine| engine.idle_seconds).sum();
        println!("c idle wall search time (sum): {total_idle:.6} s");

        println!("c SUM stats conflicts: {}", stats.sum.conflicts);
        println!("c SUM stats decisions: {}", stats.sum.decisions);
        println!("c SUM stats restarts: {}", stats.sum.restarts);
    }
}
