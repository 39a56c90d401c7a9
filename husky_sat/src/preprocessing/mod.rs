/*!
Simplification of the formula at the root level.

[eliminate](crate::context::GenericContext::eliminate) removes clauses satisfied at the root
and eliminates *pure* atoms --- atoms occurring with a single polarity --- together with their
clauses.
Each elimination is recorded with copies of the removed clauses so that:

- a model of the simplified formula extends to a model of the original by valuing each
  eliminated atom at its pure polarity
  ([complete_model](crate::context::GenericContext::complete_model)), and
- an eliminated atom returning to use (a fresh clause or assumption over the atom, or a
  freeze) is *reintroduced*: the recorded clauses are added back through the usual addition
  path, cascading to any eliminated atom they mention.

Frozen atoms are never eliminated.
A portfolio runs elimination only on its primary engine, with secondaries turned off at
construction.
*/

use crate::{
    context::GenericContext,
    db::ClauseKey,
    misc::log::targets,
    structures::{atom::Atom, clause::CClause},
};

/// The record of an eliminated atom.
pub struct EliminationRecord {
    /// The eliminated atom.
    pub atom: Atom,

    /// The polarity the atom was pure in.
    pub polarity: bool,

    /// Copies of the clauses removed with the atom, emptied on reintroduction.
    pub clauses: Vec<CClause>,

    /// Whether the atom has been reintroduced.
    pub restored: bool,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Simplify the formula at the root level, and with `turn_off` disable further
    /// simplification.
    ///
    /// Returns false exactly when the formula is proven unsatisfiable.
    pub fn eliminate(&mut self, turn_off: bool) -> bool {
        if !self.ok {
            return false;
        }

        self.backjump(0);
        if self.propagate().is_err() {
            self.note_unsatisfiable();
            return false;
        }

        if self.simplification_enabled
            && self.clause_db.original_count() <= self.config.max_simp_clauses
        {
            let mut eliminated_count = 0;
            loop {
                let mut changed = self.remove_satisfied();

                for atom in self.pure_atoms() {
                    self.eliminate_pure(atom);
                    eliminated_count += 1;
                    changed = true;
                }

                if !changed {
                    break;
                }
            }
            log::info!(
                target: targets::PREPROCESSING,
                "Elimination removed {eliminated_count} pure atoms"
            );
        }

        if turn_off {
            self.simplification_enabled = false;
        }

        true
    }

    /// Mark every clause satisfied at the root as removed, returning whether any was.
    fn remove_satisfied(&mut self) -> bool {
        let keys: Vec<ClauseKey> = self
            .clause_db
            .original_keys()
            .chain(self.clause_db.addition_keys())
            .collect();

        let mut changed = false;
        for key in keys {
            let satisfied = self
                .clause_db
                .get(key)
                .literals
                .iter()
                .any(|literal| self.cells.value_of_literal(*literal) == Some(true));
            if satisfied {
                self.clause_db.mark_removed(key);
                changed = true;
            }
        }
        changed
    }

    /// The atoms occurring with a single polarity among stored clauses, excluding valued,
    /// frozen, and already eliminated atoms.
    fn pure_atoms(&self) -> Vec<Atom> {
        let atom_count = self.cells.count();
        let mut positive = vec![false; atom_count];
        let mut negative = vec![false; atom_count];

        let keys: Vec<ClauseKey> = self
            .clause_db
            .original_keys()
            .chain(self.clause_db.addition_keys())
            .collect();
        for key in keys {
            for literal in &self.clause_db.get(key).literals {
                if self.cells.value_of(literal.atom()).is_none() {
                    match literal.polarity() {
                        true => positive[literal.atom() as usize] = true,
                        false => negative[literal.atom() as usize] = true,
                    }
                }
            }
        }

        (0..atom_count as Atom)
            .filter(|atom| {
                let index = *atom as usize;
                positive[index] != negative[index]
                    && self.cells.value_of(*atom).is_none()
                    && !self.cells.is_frozen(*atom)
                    && !self.cells.is_eliminated(*atom)
            })
            .collect()
    }

    /// Eliminate `atom` as pure, removing and recording its clauses.
    fn eliminate_pure(&mut self, atom: Atom) {
        let keys: Vec<ClauseKey> = self
            .clause_db
            .original_keys()
            .chain(self.clause_db.addition_keys())
            .collect();

        let mut polarity = true;
        let mut saved: Vec<CClause> = Vec::default();
        for key in keys {
            let clause = self.clause_db.get(key);
            match clause.literals.iter().find(|l| l.atom() == atom) {
                None => continue,
                Some(occurrence) => {
                    polarity = occurrence.polarity();
                    saved.push(clause.literals.clone());
                    self.clause_db.mark_removed(key);
                }
            }
        }

        self.cells.set_eliminated(atom, true);
        self.cells.set_decision(atom, false);
        self.elimination_records.push(EliminationRecord {
            atom,
            polarity,
            clauses: saved,
            restored: false,
        });
    }

    /// Return an eliminated atom to use, restoring its recorded clauses and cascading to any
    /// eliminated atom they mention.
    pub(crate) fn reintroduce(&mut self, atom: Atom) {
        let mut queue = vec![atom];
        while let Some(atom) = queue.pop() {
            if !self.cells.is_eliminated(atom) {
                continue;
            }
            log::debug!(target: targets::PREPROCESSING, "Reintroducing atom {atom}");

            self.cells.set_eliminated(atom, false);
            self.cells.set_decision(atom, true);
            if self.cells.value_of(atom).is_none() {
                self.activity.activate(atom as usize);
            }

            let mut restored: Vec<CClause> = Vec::default();
            for record in self.elimination_records.iter_mut() {
                if record.atom == atom && !record.restored {
                    record.restored = true;
                    restored.append(&mut record.clauses);
                }
            }

            for clause in restored {
                for literal in &clause {
                    if self.cells.is_eliminated(literal.atom()) {
                        queue.push(literal.atom());
                    }
                }
                self.add_clause(&clause);
            }
        }
    }

    /// Complete the model over eliminated atoms, and any atom left without a value.
    pub(crate) fn complete_model(&mut self) {
        for index in (0..self.elimination_records.len()).rev() {
            let record = &self.elimination_records[index];
            if !record.restored {
                self.model[record.atom as usize] = Some(record.polarity);
            }
        }
        for atom in 0..self.model.len() {
            if self.model[atom].is_none() {
                self.model[atom] = Some(self.cells.saved_phase(atom as Atom));
            }
        }
    }

    /// Complete a (possibly transferred) model over the atoms eliminated by this context.
    ///
    /// The same completion a satisfiable solve applies to its own model; counted separately
    /// as the portfolio calls this exactly once when adopting another engine's model.
    pub fn extend_model(&mut self) {
        self.counters.model_extensions += 1;
        self.complete_model();
    }

    /// Whether `atom` is currently eliminated.
    pub fn is_eliminated(&self, atom: Atom) -> bool {
        self.cells.is_eliminated(atom)
    }

    /// Freeze or thaw `atom` against elimination, reintroducing a frozen eliminated atom.
    pub fn set_frozen(&mut self, atom: Atom, frozen: bool) {
        self.ensure_atoms(atom as usize + 1);
        if frozen && self.cells.is_eliminated(atom) {
            self.reintroduce(atom);
        }
        self.cells.set_frozen(atom, frozen);
    }
}
