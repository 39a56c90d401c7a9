/*!
Building a formula within a context: clause addition, clause import, and DIMACS reading.

All additions happen at the root level.
Clauses are normalised on the way in: literals are sorted and deduplicated, tautologies are
skipped, literals false at the root are dropped, and clauses true at the root are not stored.
A clause emptied by normalisation proves the formula unsatisfiable.
*/

use std::io::BufRead;

use crate::{
    context::GenericContext,
    misc::log::targets,
    structures::{
        clause::CClause,
        literal::CLiteral,
    },
    types::err::ParseError,
};

/// Details of a read DIMACS file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParserInfo {
    /// The atom count claimed by the problem line, if any.
    pub expected_atoms: Option<usize>,

    /// The clause count claimed by the problem line, if any.
    pub expected_clauses: Option<usize>,

    /// Clauses added by the read.
    pub added_clauses: usize,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Ensure atoms up to `count` exist, freshening with default polarity as required.
    pub fn ensure_atoms(&mut self, count: usize) {
        let polarity = self.config.polarity_default;
        while self.cells.count() < count {
            self.fresh_atom(polarity, true);
        }
    }

    /// Add a clause over `literals` to the formula.
    ///
    /// Returns false exactly when the addition (together with the established units) proves
    /// the formula unsatisfiable.
    pub fn add_clause(&mut self, literals: &[CLiteral]) -> bool {
        if !self.ok {
            return false;
        }

        if let Some(highest) = literals.iter().map(|literal| literal.atom()).max() {
            self.ensure_atoms(highest as usize + 1);
        }

        for literal in literals {
            if self.cells.is_eliminated(literal.atom()) {
                self.reintroduce(literal.atom());
            }
        }

        let mut clause: CClause = literals.to_vec();
        clause.sort_unstable();
        clause.dedup();

        // After sorting, a tautology pairs adjacent literals on the same atom.
        for pair in clause.windows(2) {
            if pair[0].atom() == pair[1].atom() {
                return true;
            }
        }

        if clause
            .iter()
            .any(|literal| self.cells.value_of_literal(*literal) == Some(true))
        {
            return true;
        }
        clause.retain(|literal| self.cells.value_of_literal(*literal).is_none());

        match clause.len() {
            0 => {
                self.note_unsatisfiable();
                false
            }

            1 => {
                let unit = clause[0];
                self.assign(unit, None);
                true
            }

            _ => {
                self.enable_decisions(&clause);
                let key = self.clause_db.store_original(clause);
                self.attach_clause(key);
                true
            }
        }
    }

    /// Make the atoms of a stored clause eligible as decisions.
    ///
    /// An atom arrives non-decision only when it mirrors an atom eliminated elsewhere; a
    /// clause over the atom means it constrains this context after all.
    fn enable_decisions(&mut self, literals: &[CLiteral]) {
        for literal in literals {
            let atom = literal.atom();
            if !self.cells.is_decision(atom) && !self.cells.is_eliminated(atom) {
                self.cells.set_decision(atom, true);
                if self.cells.value_of(atom).is_none() {
                    self.activity.activate(atom as usize);
                }
            }
        }
    }

    /// Note a clause for proof checking.
    ///
    /// No online checker ships with the library, so the note is a log line.
    pub fn add_input_clause(&mut self, literals: &[CLiteral]) {
        log::trace!(target: targets::PREPROCESSING, "Input clause {literals:?}");
    }

    /// Import a clause learnt by another engine, at the given glue.
    ///
    /// The import is unconditional --- quality filtering belongs to the caller, via
    /// [import filters](crate::config::Config::import_glue_limit) --- and the clause joins the
    /// addition store, subject to reduction like any learnt clause.
    /// Returns false exactly when the import proves the formula unsatisfiable.
    pub fn import_learnt(&mut self, literals: &[CLiteral], glue: u32) -> bool {
        if !self.ok {
            return false;
        }
        debug_assert!(self.current_level() == 0, "imports happen at the root");

        let mut clause: CClause = literals.to_vec();
        clause.sort_unstable();
        clause.dedup();

        for pair in clause.windows(2) {
            if pair[0].atom() == pair[1].atom() {
                return true;
            }
        }

        if clause
            .iter()
            .any(|literal| self.cells.value_of_literal(*literal) == Some(true))
        {
            return true;
        }
        clause.retain(|literal| self.cells.value_of_literal(*literal).is_none());

        self.counters.imported_clauses += 1;

        match clause.len() {
            0 => {
                self.note_unsatisfiable();
                false
            }

            1 => {
                self.assign(clause[0], None);
                true
            }

            _ => {
                self.enable_decisions(&clause);
                let key = self.clause_db.store_addition(clause, glue);
                self.attach_clause(key);
                true
            }
        }
    }

    /// Read a DIMACS formula into the context.
    ///
    /// Comment and problem lines are honoured, though the problem line is optional and its
    /// counts are reported rather than enforced.
    pub fn read_dimacs(&mut self, mut reader: impl BufRead) -> Result<ParserInfo, ParseError> {
        let mut info = ParserInfo::default();
        let mut buffer = String::default();
        let mut clause: CClause = Vec::default();
        let mut line = 0;

        loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => line += 1,
                Err(_) => return Err(ParseError::Line(line)),
            }

            match buffer.chars().next() {
                Some('c') | Some('\n') | None => continue,

                Some('%') => break,

                Some('p') => {
                    let mut details = buffer.split_whitespace().skip(2);
                    let atoms: usize = details
                        .next()
                        .and_then(|string| string.parse().ok())
                        .ok_or(ParseError::ProblemSpecification)?;
                    let clauses: usize = details
                        .next()
                        .and_then(|string| string.parse().ok())
                        .ok_or(ParseError::ProblemSpecification)?;

                    self.ensure_atoms(atoms);
                    info.expected_atoms = Some(atoms);
                    info.expected_clauses = Some(clauses);
                }

                Some(_) => {
                    for item in buffer.split_whitespace() {
                        let int: isize =
                            item.parse().map_err(|_| ParseError::Literal(line))?;
                        match CLiteral::from_int(int) {
                            None => {
                                self.add_clause(&std::mem::take(&mut clause));
                                info.added_clauses += 1;
                            }
                            Some(literal) => clause.push(literal),
                        }
                    }
                }
            }
        }

        match clause.is_empty() {
            true => Ok(info),
            false => Err(ParseError::MissingDelimiter),
        }
    }
}

#[cfg(test)]
mod dimacs_tests {
    use crate::{config::Config, context::Context, reports::Report};

    use super::*;

    #[test]
    fn reads_a_formula() {
        let mut ctx = Context::from_config(Config::default());
        let dimacs = "c a comment\np cnf 3 2\n1 -2 0\n2 3 0\n";

        let info = ctx.read_dimacs(dimacs.as_bytes()).expect("parses");
        assert_eq!(info.expected_atoms, Some(3));
        assert_eq!(info.added_clauses, 2);
        assert_eq!(ctx.atom_count(), 3);
        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
    }

    #[test]
    fn bad_problem_line() {
        let mut ctx = Context::from_config(Config::default());
        assert_eq!(
            ctx.read_dimacs("p cnf\n1 2 0".as_bytes()),
            Err(ParseError::ProblemSpecification)
        );
    }

    #[test]
    fn unterminated_clause() {
        let mut ctx = Context::from_config(Config::default());
        assert_eq!(
            ctx.read_dimacs("1 2".as_bytes()),
            Err(ParseError::MissingDelimiter)
        );
    }

    #[test]
    fn tautologies_skipped() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.read_dimacs("1 -2 2 0\n".as_bytes()).is_ok());
        assert_eq!(ctx.original_clause_count(), 0);
    }
}
