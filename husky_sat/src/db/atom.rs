//! The atom cells --- per-atom valuation, phase, and bookkeeping.
//!
//! Cells are held in parallel vectors indexed by atom, and grow only
//! (via [fresh_atom](AtomCells::fresh_atom)).

use crate::{
    db::ClauseKey,
    structures::{atom::Atom, literal::CLiteral},
};

/// Per-atom cells of a context.
pub struct AtomCells {
    /// The current value of each atom on the valuation being built.
    values: Vec<Option<bool>>,

    /// The last value each atom held, seeded with the default polarity (phase saving).
    previous: Vec<bool>,

    /// Whether the atom may be chosen as a decision.
    decision: Vec<bool>,

    /// Whether the atom is exempt from elimination.
    frozen: Vec<bool>,

    /// Whether the atom has been eliminated by simplification.
    eliminated: Vec<bool>,

    /// The decision level at which each atom was valued, if valued.
    level: Vec<u32>,

    /// The clause which forced the value of the atom, if the value was forced.
    reason: Vec<Option<ClauseKey>>,
}

impl Default for AtomCells {
    fn default() -> Self {
        AtomCells {
            values: Vec::default(),
            previous: Vec::default(),
            decision: Vec::default(),
            frozen: Vec::default(),
            eliminated: Vec::default(),
            level: Vec::default(),
            reason: Vec::default(),
        }
    }
}

impl AtomCells {
    /// A count of all atoms.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Cells for a fresh atom, returning the atom.
    pub fn fresh_atom(&mut self, polarity: bool, decision: bool) -> Atom {
        let atom = self.values.len() as Atom;
        self.values.push(None);
        self.previous.push(polarity);
        self.decision.push(decision);
        self.frozen.push(false);
        self.eliminated.push(false);
        self.level.push(0);
        self.reason.push(None);
        atom
    }

    /// Reserve space for `count` atoms in total.
    pub fn reserve(&mut self, count: usize) {
        let additional = count.saturating_sub(self.values.len());
        self.values.reserve(additional);
        self.previous.reserve(additional);
        self.decision.reserve(additional);
        self.frozen.reserve(additional);
        self.eliminated.reserve(additional);
        self.level.reserve(additional);
        self.reason.reserve(additional);
    }

    /// The value of `atom`, if any.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.values[atom as usize]
    }

    /// The value of `literal`: true if the valuation agrees with its polarity, false if it
    /// disagrees, and [None] if the atom is unvalued.
    pub fn value_of_literal(&self, literal: CLiteral) -> Option<bool> {
        self.values[literal.atom() as usize].map(|value| value == literal.polarity())
    }

    /// Value the atom of `literal` to agree with the literal, at `level`, for `reason`.
    pub fn assign(&mut self, literal: CLiteral, level: u32, reason: Option<ClauseKey>) {
        let atom = literal.atom() as usize;
        self.values[atom] = Some(literal.polarity());
        self.level[atom] = level;
        self.reason[atom] = reason;
    }

    /// Clear the value of `atom`, saving its phase.
    pub fn clear_value(&mut self, atom: Atom) {
        let atom = atom as usize;
        if let Some(value) = self.values[atom] {
            self.previous[atom] = value;
        }
        self.values[atom] = None;
        self.reason[atom] = None;
    }

    /// The saved phase of `atom`.
    pub fn saved_phase(&self, atom: Atom) -> bool {
        self.previous[atom as usize]
    }

    /// Overwrite the saved phase of `atom`.
    pub fn save_phase(&mut self, atom: Atom, phase: bool) {
        self.previous[atom as usize] = phase;
    }

    /// The level at which `atom` was valued (meaningful only while valued).
    pub fn level_of(&self, atom: Atom) -> u32 {
        self.level[atom as usize]
    }

    /// The forcing clause of `atom`, if its value was forced.
    pub fn reason_of(&self, atom: Atom) -> Option<ClauseKey> {
        self.reason[atom as usize]
    }

    /// Whether `atom` is eligible as a decision.
    pub fn is_decision(&self, atom: Atom) -> bool {
        self.decision[atom as usize]
    }

    /// Set whether `atom` is eligible as a decision.
    pub fn set_decision(&mut self, atom: Atom, decision: bool) {
        self.decision[atom as usize] = decision;
    }

    /// Whether `atom` is frozen against elimination.
    pub fn is_frozen(&self, atom: Atom) -> bool {
        self.frozen[atom as usize]
    }

    /// Set whether `atom` is frozen against elimination.
    pub fn set_frozen(&mut self, atom: Atom, frozen: bool) {
        self.frozen[atom as usize] = frozen;
    }

    /// Whether `atom` has been eliminated by simplification.
    pub fn is_eliminated(&self, atom: Atom) -> bool {
        self.eliminated[atom as usize]
    }

    /// Mark or unmark `atom` as eliminated.
    pub fn set_eliminated(&mut self, atom: Atom, eliminated: bool) {
        self.eliminated[atom as usize] = eliminated;
    }

    /// A snapshot of the current valuation.
    pub fn valuation(&self) -> Vec<Option<bool>> {
        self.values.clone()
    }
}
