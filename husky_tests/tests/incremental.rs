//! Incremental solving: delta-only syncs from the primary to the secondaries.

use husky_sat::reports::Report;
use husky_tests::{clause, portfolio_over};

mod incremental {
    use super::*;

    #[test]
    fn second_solve_replays_only_the_new_unit() {
        // No pure literal and no implied unit, so simplification leaves the formula alone and
        // the only unit the second sync can carry is the added clause.
        let formula = vec![clause(&[1, 2]), clause(&[-1, -2])];
        let mut portfolio = portfolio_over(4, &formula);

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));

        // One fresh unit on the primary; the next solve syncs exactly that.
        assert!(portfolio.add_clause(&clause(&[-1])));
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert_eq!(portfolio.model()[1], Some(true));

        let stats = portfolio.stats();
        for engine in stats.engines.iter().skip(1) {
            assert_eq!(engine.last_sync_variables, 0);
            assert_eq!(engine.last_sync_units, 1);
            assert_eq!(engine.last_sync_clauses, 0);
        }
    }

    #[test]
    fn unmodified_solves_sync_nothing() {
        let mut portfolio = portfolio_over(3, &[clause(&[1, 2]), clause(&[-1, 2])]);

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));

        let stats = portfolio.stats();
        for engine in stats.engines.iter().skip(1) {
            assert_eq!(engine.last_sync_variables, 0);
            assert_eq!(engine.last_sync_units, 0);
            assert_eq!(engine.last_sync_clauses, 0);
        }
    }

    #[test]
    fn fresh_variables_and_clauses_reach_secondaries() {
        let mut portfolio = portfolio_over(2, &[clause(&[1, 2])]);
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));

        let fresh = portfolio.new_var(true, true);
        assert!(portfolio.add_clause(&[husky_sat::structures::literal::CLiteral::new(
            fresh, true
        )]));
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert_eq!(portfolio.model()[fresh as usize], Some(true));

        let stats = portfolio.stats();
        assert_eq!(stats.engines[1].last_sync_variables, 1);
        assert_eq!(stats.engines[1].last_sync_units, 1);
    }

    #[test]
    fn additions_can_flip_the_verdict() {
        let mut portfolio = portfolio_over(3, &[clause(&[1, 2])]);
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));

        assert!(portfolio.add_clause(&clause(&[-1])));
        assert!(portfolio.add_clause(&clause(&[-2])));
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unsatisfiable));
    }
}
