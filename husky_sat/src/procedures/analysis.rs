/*!
Conflict analysis: resolution to the first unique implication point, and final analysis of
failed assumptions.

Analysis walks the trail backwards from a falsified clause, resolving with the reason of each
marked literal until a single literal of the current level remains.
The derived clause asserts the negation of that literal after a backjump, and its glue --- the
count of distinct decision levels among its literals --- is recorded as a quality measure.

The reason convention: a clause forcing a value keeps the forced literal at position zero, so
resolution skips position zero of every reason.
*/

use crate::{
    context::GenericContext,
    db::ClauseKey,
    misc::log::targets,
    structures::{clause::CClause, literal::CLiteral},
};

/// The result of analysing a falsified clause.
pub(crate) struct Analysis {
    /// The derived (asserting) clause, asserting literal first.
    pub literals: CClause,

    /// The level to backjump to, at which the derived clause asserts.
    pub backjump_level: u32,

    /// The glue (LBD) of the derived clause.
    pub glue: u32,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Derive an asserting clause from the falsified clause at `conflict`.
    ///
    /// Requires a decision on the current level, and so is never called on a root conflict.
    pub(crate) fn analyze(&mut self, conflict: ClauseKey) -> Analysis {
        let current = self.current_level();
        let mut tail: CClause = Vec::default();
        let mut path_count: usize = 0;
        let mut trail_index = self.trail.len();
        let mut resolve_key = Some(conflict);
        let mut resolving_reason = false;
        let uip;

        loop {
            if let Some(key) = resolve_key {
                let clause = self.clause_db.get(key);
                for literal in clause.literals.iter().skip(resolving_reason as usize) {
                    let atom = literal.atom();
                    if !self.seen[atom as usize] && self.cells.level_of(atom) > 0 {
                        self.seen[atom as usize] = true;

                        let bumped =
                            self.activity.value_of(atom as usize) + self.activity_increment;
                        self.activity.revalue(atom as usize, bumped);

                        if self.cells.level_of(atom) == current {
                            path_count += 1;
                        } else {
                            tail.push(*literal);
                        }
                    }
                }
            }

            // The next marked literal on the trail is the next resolvent.
            loop {
                trail_index -= 1;
                if self.seen[self.trail[trail_index].atom() as usize] {
                    break;
                }
            }
            let resolvent = self.trail[trail_index];
            self.seen[resolvent.atom() as usize] = false;
            path_count -= 1;

            if path_count == 0 {
                uip = resolvent;
                break;
            }

            resolve_key = self.cells.reason_of(resolvent.atom());
            resolving_reason = true;
        }

        if self.activity_increment > 1e100 {
            self.activity.rescale(|value| value * 1e-100);
            self.activity_increment *= 1e-100;
        }
        self.activity_increment /= self.config.variable_decay;

        let mut literals = tail;
        literals.insert(0, uip.negate());

        // Watch order: the deepest literal of the tail moves to position one.
        let mut backjump_level = 0;
        for index in 1..literals.len() {
            let level = self.cells.level_of(literals[index].atom());
            if level > backjump_level {
                backjump_level = level;
                literals.swap(1, index);
            }
        }

        let mut levels: Vec<u32> = literals
            .iter()
            .map(|literal| self.cells.level_of(literal.atom()))
            .collect();
        levels.sort_unstable();
        levels.dedup();
        let glue = levels.len() as u32;

        for literal in literals.iter().skip(1) {
            self.seen[literal.atom() as usize] = false;
        }

        log::trace!(
            target: targets::ANALYSIS,
            "Derived {:?} asserting at level {backjump_level} with glue {glue}",
            literals
        );

        Analysis {
            literals,
            backjump_level,
            glue,
        }
    }

    /// The subset of the current assumptions which force the failure of `failed`.
    ///
    /// `failed` is an assumption whose negation holds on the current trail; the returned
    /// conflict contains `failed` together with every assumption reachable from the value of
    /// its atom through reasons.
    pub(crate) fn analyze_final(&mut self, failed: CLiteral) -> Vec<CLiteral> {
        let mut conflict = vec![failed];

        let first_decision = match self.level_starts.first() {
            // No decisions: the negation is rooted in the formula alone.
            None => return conflict,
            Some(start) => *start,
        };

        self.seen[failed.atom() as usize] = true;

        for trail_index in (first_decision..self.trail.len()).rev() {
            let literal = self.trail[trail_index];
            let atom = literal.atom();
            if !self.seen[atom as usize] {
                continue;
            }

            match self.cells.reason_of(atom) {
                None => {
                    // A decision, and decisions made before a failed assumption are
                    // assumptions themselves.
                    conflict.push(literal);
                }

                Some(key) => {
                    for antecedent in self.clause_db.get(key).literals.iter().skip(1) {
                        if self.cells.level_of(antecedent.atom()) > 0 {
                            self.seen[antecedent.atom() as usize] = true;
                        }
                    }
                }
            }

            self.seen[atom as usize] = false;
        }

        self.seen[failed.atom() as usize] = false;
        conflict
    }
}
