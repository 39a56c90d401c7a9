/*!
Boolean constraint propagation, with two watched literals per clause.

Each clause of size two or more keeps its watched pair at the front of its literal vector.
A clause sits on the watch list of the *negation* of each watched literal, so the list keyed by
a literal holds exactly the clauses to inspect when that literal is assigned.

The watch invariant: a watched literal is falsified only if the clause is satisfied by, or
asserting through, its co-watch.
Propagation restores the invariant for each assignment in queue order, and reports the key of a
falsified clause as soon as one is found.

Removed clauses are dropped from watch lists lazily, as they are encountered.
*/

use crate::{
    context::GenericContext,
    db::ClauseKey,
    misc::log::targets,
    structures::literal::CLiteral,
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Value `literal` on the current level and push it to the trail.
    ///
    /// A reason is given exactly when the value is forced by a clause.
    pub(crate) fn assign(&mut self, literal: CLiteral, reason: Option<ClauseKey>) {
        let level = self.current_level();
        self.cells.assign(literal, level, reason);
        self.trail.push(literal);
    }

    /// Propagate queued assignments to fixpoint, or to the first falsified clause.
    pub(crate) fn propagate(&mut self) -> Result<(), ClauseKey> {
        while self.q_head < self.trail.len() {
            let literal = self.trail[self.q_head];
            self.q_head += 1;
            self.counters.total_propagations += 1;

            let mut list = std::mem::take(&mut self.watches[literal.index()]);
            let mut keep = 0;
            let mut index = 0;

            'watch_loop: while index < list.len() {
                let key = list[index];
                index += 1;

                if self.clause_db.get(key).removed {
                    continue 'watch_loop;
                }

                let false_literal = literal.negate();

                // Keep the falsified watch at position one.
                {
                    let clause = self.clause_db.get_mut(key);
                    if clause.literals[0] == false_literal {
                        clause.literals.swap(0, 1);
                    }
                }

                let co_watch = self.clause_db.get(key).literals[0];
                if self.cells.value_of_literal(co_watch) == Some(true) {
                    list[keep] = key;
                    keep += 1;
                    continue 'watch_loop;
                }

                let mut replacement = None;
                for (offset, candidate) in
                    self.clause_db.get(key).literals.iter().enumerate().skip(2)
                {
                    if self.cells.value_of_literal(*candidate) != Some(false) {
                        replacement = Some(offset);
                        break;
                    }
                }

                match replacement {
                    Some(offset) => {
                        let clause = self.clause_db.get_mut(key);
                        clause.literals.swap(1, offset);
                        let fresh_watch = clause.literals[1];
                        self.watches[fresh_watch.negate().index()].push(key);
                    }

                    None => {
                        // The clause is unit or falsified, and the watch stays.
                        list[keep] = key;
                        keep += 1;

                        match self.cells.value_of_literal(co_watch) {
                            Some(false) => {
                                log::trace!(target: targets::PROPAGATION, "Conflict on {key:?}");
                                while index < list.len() {
                                    list[keep] = list[index];
                                    keep += 1;
                                    index += 1;
                                }
                                list.truncate(keep);
                                self.watches[literal.index()] = list;
                                return Err(key);
                            }

                            _ => self.assign(co_watch, Some(key)),
                        }
                    }
                }
            }

            list.truncate(keep);
            self.watches[literal.index()] = list;
        }

        Ok(())
    }
}
