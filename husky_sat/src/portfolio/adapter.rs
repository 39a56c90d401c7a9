/*!
The contract the portfolio requires of an engine.

The coordinator assumes nothing of an engine beyond [PortfolioEngine]: structure editing,
inspection of units and clauses for replication, solving with assumptions, asynchronous
interruption, diversification, and the two callbacks bundled as [ParallelHooks].
The in-repo [Context](crate::context::Context) is the canonical instantiation, and any other
engine honouring the contract is a valid drop-in.

Replication and exchange import clauses through different doors on purpose:
[import_clause](PortfolioEngine::import_clause) replays a problem clause verbatim during
primary→secondary sync, while [import_learnt](PortfolioEngine::import_learnt) accepts another
engine's learning, gated by the engine's own [import_filter](PortfolioEngine::import_filter).
*/

use std::sync::{atomic::AtomicBool, Arc};

use rand::SeedableRng;

use crate::{
    context::{Context, GenericContext},
    reports::Report,
    structures::{atom::Atom, clause::ClauseView, literal::CLiteral},
};

/// Callbacks wired into an engine before a parallel solve.
pub struct ParallelHooks<E: ?Sized> {
    /// Invoked at restart-like safepoints with the trail at the root; `true` means stop
    /// searching.
    pub sync: Box<dyn FnMut(&mut E) -> bool + Send>,

    /// Invoked for each learnt clause of export quality, with its literals and glue.
    pub learnt: Box<dyn FnMut(&[CLiteral], u32) + Send>,
}

/// Per-engine search totals, summed for the portfolio statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    pub conflicts: u64,
    pub decisions: u64,
    pub restarts: u64,
}

/// The engine contract of the portfolio.
pub trait PortfolioEngine: Send + 'static {
    /// The current number of atoms.
    fn n_vars(&self) -> usize;

    /// The current number of original clauses, removed clauses included; monotone.
    fn n_clauses(&self) -> usize;

    /// The current number of proven (unit) literals; monotone.
    fn n_units(&self) -> usize;

    /// A fresh atom with the given first phase and decision eligibility.
    fn new_var(&mut self, polarity: bool, decision: bool) -> Atom;

    /// Reserve space for `count` atoms in total.
    fn reserve_vars(&mut self, count: usize);

    /// Add a problem clause; false exactly when the addition proves unsatisfiability.
    fn add_clause(&mut self, literals: &[CLiteral]) -> bool;

    /// Note a problem clause for proof checking.
    fn add_input_clause(&mut self, literals: &[CLiteral]);

    /// Freeze or thaw an atom against elimination.
    fn set_frozen(&mut self, atom: Atom, frozen: bool);

    /// Whether the atom has been eliminated by simplification.
    fn is_eliminated(&self, atom: Atom) -> bool;

    /// Simplify at the root, with `turn_off` disabling further simplification.
    /// False exactly when the formula is proven unsatisfiable.
    fn eliminate(&mut self, turn_off: bool) -> bool;

    /// The proven literal at `index` of the unit prefix.
    fn unit_at(&self, index: usize) -> CLiteral;

    /// A view of the original clause at `index`.
    fn clause_at(&self, index: usize) -> ClauseView<'_>;

    /// Replicate a problem clause produced by another engine.
    fn import_clause(&mut self, clause: ClauseView<'_>) -> bool;

    /// The engine's quality policy for imported learning.
    fn import_filter(&self, glue: u32, size: usize) -> bool;

    /// Accept a clause learnt by another engine; false exactly when the import proves
    /// unsatisfiability.
    fn import_learnt(&mut self, literals: &[CLiteral], glue: u32) -> bool;

    /// False if the engine is in a conflicting state.
    fn okay(&self) -> bool;

    /// A monotone activity measure, used to pace clause exchange.
    fn activity_sum(&self) -> u64;

    /// The clause count above which simplification is not performed.
    fn max_simp_cls(&self) -> usize;

    /// Search under the given assumptions until a verdict, an interrupt, or a budget.
    fn solve_limited(&mut self, assumptions: &[CLiteral]) -> Report;

    /// A handle to the engine's asynchronous interrupt flag.
    fn interrupt_flag(&self) -> Arc<AtomicBool>;

    /// The model of the last satisfiable solve.
    fn model(&self) -> &[Option<bool>];

    /// Install a model, as when adopting another engine's result.
    fn replace_model(&mut self, model: Vec<Option<bool>>);

    /// Complete the installed model over atoms eliminated by this engine.
    fn extend_model(&mut self);

    /// The failed assumptions of the last unsatisfiable solve.
    fn conflict(&self) -> &[CLiteral];

    /// Diversify the engine by its index, modulo the diversification modulus.
    fn diversify(&mut self, index: usize, modulus: usize);

    /// Wire the parallel callbacks into the engine.
    fn initialize_parallel_solver(&mut self, hooks: ParallelHooks<Self>)
    where
        Self: Sized;

    /// Search totals for portfolio statistics.
    fn search_stats(&self) -> SearchStats;
}

impl PortfolioEngine for Context {
    fn n_vars(&self) -> usize {
        self.atom_count()
    }

    fn n_clauses(&self) -> usize {
        self.original_clause_count()
    }

    fn n_units(&self) -> usize {
        self.unit_count()
    }

    fn new_var(&mut self, polarity: bool, decision: bool) -> Atom {
        self.fresh_atom(polarity, decision)
    }

    fn reserve_vars(&mut self, count: usize) {
        self.reserve_atoms(count);
    }

    fn add_clause(&mut self, literals: &[CLiteral]) -> bool {
        GenericContext::add_clause(self, literals)
    }

    fn add_input_clause(&mut self, literals: &[CLiteral]) {
        GenericContext::add_input_clause(self, literals);
    }

    fn set_frozen(&mut self, atom: Atom, frozen: bool) {
        GenericContext::set_frozen(self, atom, frozen);
    }

    fn is_eliminated(&self, atom: Atom) -> bool {
        GenericContext::is_eliminated(self, atom)
    }

    fn eliminate(&mut self, turn_off: bool) -> bool {
        GenericContext::eliminate(self, turn_off)
    }

    fn unit_at(&self, index: usize) -> CLiteral {
        GenericContext::unit_at(self, index)
    }

    fn clause_at(&self, index: usize) -> ClauseView<'_> {
        self.original_clause_at(index)
    }

    fn import_clause(&mut self, clause: ClauseView<'_>) -> bool {
        GenericContext::add_clause(self, clause.literals)
    }

    fn import_filter(&self, glue: u32, size: usize) -> bool {
        glue <= self.config.import_glue_limit && size <= self.config.import_size_limit
    }

    fn import_learnt(&mut self, literals: &[CLiteral], glue: u32) -> bool {
        GenericContext::import_learnt(self, literals, glue)
    }

    fn okay(&self) -> bool {
        GenericContext::okay(self)
    }

    fn activity_sum(&self) -> u64 {
        self.counters.sum()
    }

    fn max_simp_cls(&self) -> usize {
        self.config.max_simp_clauses
    }

    fn solve_limited(&mut self, assumptions: &[CLiteral]) -> Report {
        self.solve_given(assumptions)
    }

    fn interrupt_flag(&self) -> Arc<AtomicBool> {
        GenericContext::interrupt_flag(self)
    }

    fn model(&self) -> &[Option<bool>] {
        &self.model
    }

    fn replace_model(&mut self, model: Vec<Option<bool>>) {
        self.model = model;
    }

    fn extend_model(&mut self) {
        GenericContext::extend_model(self);
    }

    fn conflict(&self) -> &[CLiteral] {
        &self.conflict
    }

    /// Diversification, by residue of the engine index.
    ///
    /// Engine zero keeps the configured defaults, as the primary also runs simplification and
    /// serves as the reference for sequential comparisons.
    fn diversify(&mut self, index: usize, modulus: usize) {
        self.rng = SeedableRng::from_seed((index as u64).to_le_bytes());
        if index == 0 {
            return;
        }

        match index % modulus % 6 {
            1 => {
                self.config.luby_u = 64;
                self.config.polarity_default = false;
            }
            2 => {
                self.config.luby_u = 256;
                self.config.phase_saving = false;
            }
            3 => {
                self.config.luby_u = 512;
                self.config.import_glue_limit = 4;
            }
            4 => {
                self.config.polarity_lean = 0.02;
                self.config.variable_decay = 0.99;
            }
            5 => {
                self.config.luby_u = 32;
                self.config.export_glue_limit = 4;
                self.config.export_size_limit = 12;
            }
            _ => {
                self.config.variable_decay = 0.85;
                self.config.polarity_default = false;
                self.config.polarity_lean = 0.01;
            }
        }
    }

    fn initialize_parallel_solver(&mut self, hooks: ParallelHooks<Self>) {
        self.set_sync_hook(hooks.sync);
        self.set_callback_learnt(hooks.learnt);
    }

    fn search_stats(&self) -> SearchStats {
        SearchStats {
            conflicts: self.counters.total_conflicts,
            decisions: self.counters.total_decisions,
            restarts: self.counters.restarts,
        }
    }
}
