//! Reduction of the addition store, forgetting learnt clauses of poor glue.

use crate::{context::GenericContext, misc::log::targets};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// True if the addition store has grown past the scheduled interval.
    pub(crate) fn reduction_due(&self) -> bool {
        let interval =
            self.config.reduction_interval + 500 * self.counters.reductions as usize;
        self.clause_db.retained_addition_count() > interval
    }

    /// Forget roughly half the retained additions, worst glue first.
    ///
    /// Clauses of glue two or below are kept, as are clauses currently acting as a reason.
    /// Forgetting only marks: watch lists drop marked clauses lazily.
    pub(crate) fn reduce(&mut self) {
        let mut candidates: Vec<_> = self
            .clause_db
            .addition_keys()
            .filter(|key| {
                let clause = self.clause_db.get(*key);
                if clause.glue <= 2 {
                    return false;
                }
                // A reason clause keeps its forced literal at position zero.
                let forced = clause.literals[0];
                !(self.cells.value_of_literal(forced) == Some(true)
                    && self.cells.reason_of(forced.atom()) == Some(*key))
            })
            .collect();

        candidates.sort_unstable_by_key(|key| std::cmp::Reverse(self.clause_db.get(*key).glue));

        let removal_count = candidates.len() / 2;
        for key in candidates.into_iter().take(removal_count) {
            self.clause_db.mark_removed(key);
        }

        self.counters.reductions += 1;
        log::debug!(
            target: targets::REDUCTION,
            "Reduction {} removed {removal_count} clauses",
            self.counters.reductions
        );
    }
}
