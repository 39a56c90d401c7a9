//! Helpers for scenario tests: formula generators, model checking, and portfolio setup.

use rand::{seq::SliceRandom, Rng, SeedableRng};

use husky_sat::{
    config::PortfolioConfig,
    portfolio::Portfolio,
    structures::{clause::CClause, literal::CLiteral},
};

/// A clause from its DIMACS-style integers.
pub fn clause(ints: &[isize]) -> CClause {
    ints.iter()
        .map(|int| CLiteral::from_int(*int).expect("non-zero literal"))
        .collect()
}

/// A portfolio over `cores` engines holding `clauses`.
pub fn portfolio_over(cores: i32, clauses: &[CClause]) -> Portfolio {
    let mut config = PortfolioConfig::default();
    config.cores = cores;
    let mut portfolio = Portfolio::from_config(config);
    for clause in clauses {
        portfolio.add_clause(clause);
    }
    portfolio
}

/// True if `model` satisfies every clause of `clauses`.
pub fn satisfies(clauses: &[CClause], model: &[Option<bool>]) -> bool {
    clauses.iter().all(|clause| {
        clause.iter().any(|literal| {
            model
                .get(literal.atom() as usize)
                .copied()
                .flatten()
                .is_some_and(|value| value == literal.polarity())
        })
    })
}

/// The pigeonhole principle PHP(`pigeons`, `holes`): unsatisfiable whenever
/// `pigeons > holes`.
///
/// Variable `p * holes + h` reads 'pigeon `p` sits in hole `h`'.
pub fn pigeonhole(pigeons: usize, holes: usize) -> Vec<CClause> {
    let var = |pigeon: usize, hole: usize| (pigeon * holes + hole) as u32;
    let mut clauses = Vec::default();

    for pigeon in 0..pigeons {
        clauses.push(
            (0..holes)
                .map(|hole| CLiteral::new(var(pigeon, hole), true))
                .collect(),
        );
    }

    for hole in 0..holes {
        for first in 0..pigeons {
            for second in first + 1..pigeons {
                clauses.push(vec![
                    CLiteral::new(var(first, hole), false),
                    CLiteral::new(var(second, hole), false),
                ]);
            }
        }
    }

    clauses
}

/// A planted uniform random 3-SAT instance: satisfiable by construction.
///
/// Clauses are drawn uniformly and redrawn until satisfied by a hidden assignment, so the
/// instance keeps the texture of ratio `clauses / atoms` random 3-SAT without the risk of an
/// unsatisfiable draw.
pub fn planted_3sat(atoms: usize, clauses: usize, seed: u64) -> (Vec<CClause>, Vec<bool>) {
    assert!(atoms >= 3, "three distinct atoms per clause");
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let hidden: Vec<bool> = (0..atoms).map(|_| rng.gen()).collect();
    let indices: Vec<u32> = (0..atoms as u32).collect();

    let mut formula = Vec::with_capacity(clauses);
    while formula.len() < clauses {
        let chosen: Vec<u32> = indices.choose_multiple(&mut rng, 3).copied().collect();
        let candidate: CClause = chosen
            .iter()
            .map(|atom| CLiteral::new(*atom, rng.gen()))
            .collect();

        let planted_satisfied = candidate
            .iter()
            .any(|literal| hidden[literal.atom() as usize] == literal.polarity());
        if planted_satisfied {
            formula.push(candidate);
        }
    }

    (formula, hidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pigeonhole_shape() {
        let formula = pigeonhole(3, 2);
        // Three at-least-one clauses, and one conflict pair per hole per pigeon pair.
        assert_eq!(formula.len(), 3 + 2 * 3);
    }

    #[test]
    fn planted_instances_are_satisfiable() {
        let (formula, hidden) = planted_3sat(50, 175, 7);
        let model: Vec<Option<bool>> = hidden.into_iter().map(Some).collect();
        assert_eq!(formula.len(), 175);
        assert!(satisfies(&formula, &model));
    }
}
