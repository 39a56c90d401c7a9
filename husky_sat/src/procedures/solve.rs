/*!
The solve procedure: the conflict-driven clause-learning loop.

Abstracting the bookkeeping, the loop is:

```none
          +---------------+
  +-------| make_decision |-----> satisfiable, if no atom lacks a value
  |       +---------------+
  |               ⌃
  |               | at fixpoint
  ⌄       +---------------+
--+------>|   propagate   |
  ⌃       +---------------+
  |               | on a falsified clause
  |               ⌄
  |       +---------------+
  +-------|    analyze    |-----> unsatisfiable, if the conflict is rooted
          +---------------+
```

Between iterations the loop may be interrupted (asynchronously, or by a budget), and at
restart boundaries the [sync hook](crate::context::SyncHook) runs with the trail at the root,
which is where a portfolio imports the learning of other engines.
*/

use crate::{
    context::GenericContext,
    procedures::decision::DecisionResult,
    reports::Report,
    structures::literal::CLiteral,
};

use std::sync::atomic::Ordering;

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Determine the satisfiability of the context under the given assumptions.
    ///
    /// Returns [Unknown](Report::Unknown) if interrupted or a configured budget is exhausted.
    /// Otherwise, a model or failed-assumption conflict is left on the context to match the
    /// report.
    pub fn solve_given(&mut self, assumptions: &[CLiteral]) -> Report {
        self.model.clear();
        self.conflict.clear();

        if !self.ok {
            return Report::Unsatisfiable;
        }

        self.assumptions = assumptions.to_vec();
        for assumption in assumptions {
            self.ensure_atoms(assumption.atom() as usize + 1);
            if self.cells.is_eliminated(assumption.atom()) {
                self.reintroduce(assumption.atom());
            }
        }

        self.backjump(0);
        self.counters.fresh_conflicts = 0;

        let timer = std::time::Instant::now();
        let conflicts_in = self.counters.total_conflicts;

        'solve_loop: loop {
            self.counters.time = timer.elapsed();

            if self.interrupt.load(Ordering::Relaxed) {
                self.backjump(0);
                return Report::Unknown;
            }

            if self.budget_exhausted(conflicts_in) {
                self.backjump(0);
                return Report::Unknown;
            }

            match self.propagate() {
                Err(key) => {
                    self.counters.total_conflicts += 1;
                    self.counters.fresh_conflicts += 1;

                    if self.current_level() == 0 {
                        self.note_unsatisfiable();
                        return Report::Unsatisfiable;
                    }

                    let analysis = self.analyze(key);
                    self.make_callback_learnt(&analysis.literals, analysis.glue);
                    self.backjump(analysis.backjump_level);

                    match analysis.literals.len() {
                        1 => self.assign(analysis.literals[0], None),

                        _ => {
                            let key = self
                                .clause_db
                                .store_addition(analysis.literals, analysis.glue);
                            self.attach_clause(key);
                            let asserted = self.clause_db.get(key).literals[0];
                            self.assign(asserted, Some(key));
                        }
                    }

                    if self.reduction_due() {
                        self.reduce();
                    }
                }

                Ok(()) => {
                    if self.restart_due() {
                        self.counters.restarts += 1;
                        self.counters.fresh_conflicts = 0;
                        self.luby.next();
                        self.backjump(0);

                        if self.call_sync_hook() {
                            return Report::Unknown;
                        }
                        continue 'solve_loop;
                    }

                    match self.make_decision() {
                        DecisionResult::Decided => continue 'solve_loop,

                        DecisionResult::Exhausted => {
                            self.model = self.cells.valuation();
                            self.complete_model();
                            self.backjump(0);
                            return Report::Satisfiable;
                        }

                        DecisionResult::FailedAssumption(assumption) => {
                            self.conflict = self.analyze_final(assumption);
                            self.backjump(0);
                            return Report::Unsatisfiable;
                        }
                    }
                }
            }
        }
    }

    /// True if the luby schedule calls for a restart.
    fn restart_due(&self) -> bool {
        self.config.restarts
            && self.counters.fresh_conflicts
                >= self.luby.value().saturating_mul(self.config.luby_u)
    }

    /// True if a configured conflict or time budget has been exhausted.
    fn budget_exhausted(&self, conflicts_in: u64) -> bool {
        if self.config.conflict_limit != 0
            && self.counters.total_conflicts - conflicts_in >= self.config.conflict_limit
        {
            return true;
        }
        !self.config.time_limit.is_zero() && self.counters.time > self.config.time_limit
    }
}
