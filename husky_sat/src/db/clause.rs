//! The clause database --- stores for original and addition clauses.
//!
//! Original clauses are the formula and are permanent: removal (by simplification) only marks
//! the clause, so original indices are stable and the portfolio may replay the suffix of the
//! store when syncing a secondary engine from the primary.
//! Additions are learnt or imported clauses, and may be forgotten during reduction, again by
//! marking.

use crate::{
    db::ClauseKey,
    structures::{
        clause::{CClause, ClauseView},
        literal::CLiteral,
    },
};

/// A stored clause.
pub struct DbClause {
    /// The literals of the clause, with the watched pair at the front.
    pub literals: CClause,

    /// The glue (LBD) of the clause at learning, or the clause length for originals.
    pub glue: u32,

    /// Whether the clause has been removed (satisfied, eliminated, or forgotten).
    pub removed: bool,
}

impl DbClause {
    /// A read-only view of the clause.
    pub fn view(&self) -> ClauseView<'_> {
        ClauseView {
            literals: &self.literals,
            glue: self.glue,
            removed: self.removed,
        }
    }
}

/// The clause database of a context.
#[derive(Default)]
pub struct ClauseDB {
    originals: Vec<DbClause>,
    additions: Vec<DbClause>,

    /// Additions still attached, i.e. not yet forgotten by reduction.
    retained_additions: usize,
}

impl ClauseDB {
    /// Store `literals` as an original clause and return its key.
    pub fn store_original(&mut self, literals: CClause) -> ClauseKey {
        let key = ClauseKey::Original(self.originals.len() as u32);
        let glue = literals.len() as u32;
        self.originals.push(DbClause {
            literals,
            glue,
            removed: false,
        });
        key
    }

    /// Store `literals` as an addition with the given glue and return its key.
    pub fn store_addition(&mut self, literals: CClause, glue: u32) -> ClauseKey {
        let key = ClauseKey::Addition(self.additions.len() as u32);
        self.additions.push(DbClause {
            literals,
            glue,
            removed: false,
        });
        self.retained_additions += 1;
        key
    }

    /// The clause stored at `key`.
    pub fn get(&self, key: ClauseKey) -> &DbClause {
        match key {
            ClauseKey::Original(index) => &self.originals[index as usize],
            ClauseKey::Addition(index) => &self.additions[index as usize],
        }
    }

    /// Mutable access to the clause stored at `key`.
    pub fn get_mut(&mut self, key: ClauseKey) -> &mut DbClause {
        match key {
            ClauseKey::Original(index) => &mut self.originals[index as usize],
            ClauseKey::Addition(index) => &mut self.additions[index as usize],
        }
    }

    /// A count of all original clauses, removed included.
    ///
    /// The count is monotone, which the portfolio relies on for delta syncs.
    pub fn original_count(&self) -> usize {
        self.originals.len()
    }

    /// A view of the original clause at `index`.
    pub fn original_at(&self, index: usize) -> ClauseView<'_> {
        self.originals[index].view()
    }

    /// A count of additions not yet forgotten.
    pub fn retained_addition_count(&self) -> usize {
        self.retained_additions
    }

    /// Iterate the keys of all stored (non-removed) original clauses.
    pub fn original_keys(&self) -> impl Iterator<Item = ClauseKey> + '_ {
        self.originals
            .iter()
            .enumerate()
            .filter(|(_, clause)| !clause.removed)
            .map(|(index, _)| ClauseKey::Original(index as u32))
    }

    /// Iterate the keys of all stored (non-removed) addition clauses.
    pub fn addition_keys(&self) -> impl Iterator<Item = ClauseKey> + '_ {
        self.additions
            .iter()
            .enumerate()
            .filter(|(_, clause)| !clause.removed)
            .map(|(index, _)| ClauseKey::Addition(index as u32))
    }

    /// Mark the clause at `key` removed.
    pub fn mark_removed(&mut self, key: ClauseKey) {
        let clause = self.get_mut(key);
        if !clause.removed {
            clause.removed = true;
            if matches!(key, ClauseKey::Addition(_)) {
                self.retained_additions -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::literal::CLiteral;

    fn clause(ints: &[isize]) -> CClause {
        ints.iter()
            .map(|int| CLiteral::from_int(*int).expect("non-zero"))
            .collect()
    }

    #[test]
    fn original_indices_stable_over_removal() {
        let mut db = ClauseDB::default();
        let a = db.store_original(clause(&[1, 2]));
        let _b = db.store_original(clause(&[-1, 3]));

        db.mark_removed(a);

        assert_eq!(db.original_count(), 2);
        assert!(db.original_at(0).removed);
        assert!(!db.original_at(1).removed);
        assert_eq!(db.original_keys().count(), 1);
    }

    #[test]
    fn retained_additions_follow_marks() {
        let mut db = ClauseDB::default();
        let a = db.store_addition(clause(&[1, 2, 3]), 2);
        let _b = db.store_addition(clause(&[-2, -3]), 1);
        assert_eq!(db.retained_addition_count(), 2);

        db.mark_removed(a);
        db.mark_removed(a);
        assert_eq!(db.retained_addition_count(), 1);
    }
}
