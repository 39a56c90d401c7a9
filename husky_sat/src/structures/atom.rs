//! Atoms --- the variables of a formula.
//!
//! Atoms are identified by their index, assigned in order of creation starting from zero.
//! An atom on its own carries no value; values belong to the
//! [atom cells](crate::db::atom::AtomCells) of a context.

/// An atom, aka. a propositional variable.
pub type Atom = u32;
