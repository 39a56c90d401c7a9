/*!
Decisions: assumptions first, then free choices by activity.

Each assumption of the solve holds its own leading decision level, whether or not a decision
was required to satisfy the assumption.
A falsified assumption ends the solve, reported through
[analyze_final](crate::context::GenericContext::analyze_final) as a failed-assumption set.
*/

use crate::{context::GenericContext, structures::atom::Atom, structures::literal::CLiteral};

/// The result of asking for a decision.
pub(crate) enum DecisionResult {
    /// A decision was made, and is queued for propagation.
    Decided,

    /// No atom lacks a value: the valuation is complete.
    Exhausted,

    /// The given assumption is falsified on the current trail.
    FailedAssumption(CLiteral),
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Make a decision, preferring pending assumptions, then the most active unvalued atom.
    pub(crate) fn make_decision(&mut self) -> DecisionResult {
        while (self.current_level() as usize) < self.assumptions.len() {
            let assumption = self.assumptions[self.current_level() as usize];
            match self.cells.value_of_literal(assumption) {
                // The assumption holds, though the level is opened regardless.
                Some(true) => self.push_level(),

                Some(false) => return DecisionResult::FailedAssumption(assumption),

                None => {
                    self.push_level();
                    self.counters.total_decisions += 1;
                    self.assign(assumption, None);
                    return DecisionResult::Decided;
                }
            }
        }

        loop {
            match self.activity.pop_max() {
                None => return DecisionResult::Exhausted,

                Some(index) => {
                    let atom = index as Atom;
                    if self.cells.value_of(atom).is_some() || !self.cells.is_decision(atom) {
                        continue;
                    }

                    let polarity = self.choose_polarity(atom);
                    self.push_level();
                    self.counters.total_decisions += 1;
                    self.assign(CLiteral::new(atom, polarity), None);
                    return DecisionResult::Decided;
                }
            }
        }
    }

    /// The polarity to decide `atom` at: the saved phase, unless the configuration leans on
    /// randomness.
    fn choose_polarity(&mut self, atom: Atom) -> bool {
        if self.config.polarity_lean > 0.0 && self.rng.gen_bool(self.config.polarity_lean) {
            self.rng.gen_bool(0.5)
        } else if self.config.phase_saving {
            self.cells.saved_phase(atom)
        } else {
            self.config.polarity_default
        }
    }
}
