//! The context --- a self-contained sequential CDCL solver.
//!
//! A [GenericContext] owns a formula, a valuation under construction, and everything needed to
//! search for a model: watch lists, an activity heap, a trail of assignments, and counters.
//! The generic parameter is the source of randomness; [Context] fixes it to the
//! [minimal PCG](crate::generic::minimal_pcg::MinimalPCG32).
//!
//! A context may be used directly:
//!
//! ```rust
//! use husky_sat::config::Config;
//! use husky_sat::context::Context;
//! use husky_sat::reports::Report;
//! use husky_sat::structures::literal::CLiteral;
//!
//! let mut ctx = Context::from_config(Config::default());
//! let p = ctx.fresh_atom(true, true);
//! let q = ctx.fresh_atom(true, true);
//!
//! ctx.add_clause(&[CLiteral::new(p, false), CLiteral::new(q, true)]);
//! ctx.add_clause(&[CLiteral::new(p, true)]);
//!
//! assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
//! assert_eq!(ctx.model[q as usize], Some(true));
//! ```
//!
//! Within a portfolio, contexts are driven through the
//! [PortfolioEngine](crate::portfolio::PortfolioEngine) trait instead.

mod callbacks;
mod counters;
pub use callbacks::{CallbackLearnt, SyncHook};
pub use counters::Counters;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rand::SeedableRng;

use crate::{
    config::Config,
    db::{atom::AtomCells, clause::ClauseDB, ClauseKey},
    generic::{index_heap::IndexHeap, luby::Luby, minimal_pcg::MinimalPCG32},
    preprocessing::EliminationRecord,
    structures::{atom::Atom, clause::ClauseView, literal::CLiteral},
};

/// A generic context, parameterised to a source of randomness.
pub struct GenericContext<R: rand::Rng + std::default::Default> {
    /// The configuration of the context.
    pub config: Config,

    /// Counters related to the context/solve.
    pub counters: Counters,

    /// The per-atom cells: valuation, phase, levels, reasons.
    pub cells: AtomCells,

    /// The clause database.
    pub clause_db: ClauseDB,

    /// Watch lists, keyed by literal index: the clauses to visit when the literal is
    /// assigned, each watching the literal's negation.
    pub(crate) watches: Vec<Vec<ClauseKey>>,

    /// The trail of assignments, in order of assignment.
    pub(crate) trail: Vec<CLiteral>,

    /// Indices into the trail at which each decision level begins.
    pub(crate) level_starts: Vec<usize>,

    /// The propagation queue head, as an index into the trail.
    pub(crate) q_head: usize,

    /// Atom activity, for decision heuristics.
    pub(crate) activity: IndexHeap<f64>,

    /// The activity bump applied to atoms used in conflict analysis.
    pub(crate) activity_increment: f64,

    /// The luby sequence scheduling restarts.
    pub(crate) luby: Luby,

    /// False if the formula is known unsatisfiable regardless of assumptions.
    pub(crate) ok: bool,

    /// The assumptions of the solve in progress, one per leading decision level.
    pub(crate) assumptions: Vec<CLiteral>,

    /// If the last solve was satisfiable, the model found.
    pub model: Vec<Option<bool>>,

    /// If the last solve was unsatisfiable under assumptions, the failed assumptions.
    pub conflict: Vec<CLiteral>,

    /// The source of randomness.
    pub(crate) rng: R,

    /// Asynchronous interrupt, checked every iteration of a solve.
    pub(crate) interrupt: Arc<AtomicBool>,

    /// The sync hook, invoked at restart boundaries (see [SyncHook]).
    pub(crate) sync_hook: Option<SyncHook<GenericContext<R>>>,

    /// The learnt-clause callback, invoked for learnt clauses of export quality.
    pub(crate) callback_learnt: Option<CallbackLearnt>,

    /// Records of eliminated atoms, for model reconstruction and reintroduction.
    pub(crate) elimination_records: Vec<EliminationRecord>,

    /// Whether [eliminate](GenericContext::eliminate) still simplifies.
    pub(crate) simplification_enabled: bool,

    /// Scratch space for conflict analysis, indexed by atom.
    pub(crate) seen: Vec<bool>,
}

/// A context which uses [MinimalPCG32] as its source of randomness.
pub type Context = GenericContext<MinimalPCG32>;

impl Context {
    /// A context from the given configuration.
    pub fn from_config(config: Config) -> Self {
        let simplification_enabled = config.simplification;
        GenericContext {
            config,
            counters: Counters::default(),
            cells: AtomCells::default(),
            clause_db: ClauseDB::default(),
            watches: Vec::default(),
            trail: Vec::default(),
            level_starts: Vec::default(),
            q_head: 0,
            activity: IndexHeap::default(),
            activity_increment: 1.0,
            luby: Luby::default(),
            ok: true,
            assumptions: Vec::default(),
            model: Vec::default(),
            conflict: Vec::default(),
            rng: MinimalPCG32::from_seed(0_u64.to_le_bytes()),
            interrupt: Arc::new(AtomicBool::new(false)),
            sync_hook: None,
            callback_learnt: None,
            elimination_records: Vec::default(),
            simplification_enabled,
            seen: Vec::default(),
        }
    }
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// A fresh atom, with `polarity` as its first saved phase and `decision` fixing whether
    /// the atom may be chosen as a decision.
    pub fn fresh_atom(&mut self, polarity: bool, decision: bool) -> Atom {
        let atom = self.cells.fresh_atom(polarity, decision);
        self.watches.push(Vec::default());
        self.watches.push(Vec::default());
        self.activity.ensure(atom as usize + 1);
        if decision {
            self.activity.activate(atom as usize);
        }
        self.seen.push(false);
        atom
    }

    /// Reserve space for `count` atoms in total.
    pub fn reserve_atoms(&mut self, count: usize) {
        self.cells.reserve(count);
    }

    /// A count of all atoms of the context.
    pub fn atom_count(&self) -> usize {
        self.cells.count()
    }

    /// A count of all original clauses of the context, removed clauses included.
    pub fn original_clause_count(&self) -> usize {
        self.clause_db.original_count()
    }

    /// A view of the original clause at `index`.
    pub fn original_clause_at(&self, index: usize) -> ClauseView<'_> {
        self.clause_db.original_at(index)
    }

    /// A count of the proven (root level) literals of the context.
    ///
    /// Units form a prefix of the trail, and the count is monotone across solves.
    pub fn unit_count(&self) -> usize {
        match self.level_starts.first() {
            Some(start) => *start,
            None => self.trail.len(),
        }
    }

    /// The proven literal at `index` of the unit prefix of the trail.
    pub fn unit_at(&self, index: usize) -> CLiteral {
        self.trail[index]
    }

    /// False if the formula is known unsatisfiable regardless of assumptions.
    pub fn okay(&self) -> bool {
        self.ok
    }

    /// The current decision level.
    pub fn current_level(&self) -> u32 {
        self.level_starts.len() as u32
    }

    /// A handle to the interrupt flag of the context.
    ///
    /// Storing the flag is safe: raising it from any thread interrupts a solve in progress at
    /// its next iteration.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Raise the interrupt flag of the context.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Note the formula is unsatisfiable regardless of assumptions.
    pub(crate) fn note_unsatisfiable(&mut self) {
        self.ok = false;
        self.conflict.clear();
    }

    /// Attach the clause at `key` to the watch lists via its first two literals.
    ///
    /// Requires the first two literals to be an acceptable watch pair: at the point of
    /// attachment neither may be falsified unless the clause is satisfied or asserting.
    pub(crate) fn attach_clause(&mut self, key: ClauseKey) {
        let clause = self.clause_db.get(key);
        let watch_a = clause.literals[0];
        let watch_b = clause.literals[1];
        self.watches[watch_a.negate().index()].push(key);
        self.watches[watch_b.negate().index()].push(key);
    }
}
