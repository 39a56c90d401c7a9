//! Single-core scenarios: the portfolio as a pure sequential pass-through.

use husky_sat::reports::Report;
use husky_tests::{clause, portfolio_over, satisfies};

mod sequential {
    use super::*;

    #[test]
    fn trivial_satisfiable() {
        let formula = vec![clause(&[1])];
        let mut portfolio = portfolio_over(1, &formula);

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert_eq!(portfolio.model()[0], Some(true));
        assert!(satisfies(&formula, portfolio.model()));
    }

    #[test]
    fn trivial_unsatisfiable() {
        let formula = vec![clause(&[1]), clause(&[-1])];
        let mut portfolio = portfolio_over(1, &formula);

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unsatisfiable));
        assert!(portfolio.conflict().is_empty());
    }

    #[test]
    fn solve_is_a_boolean_view() {
        let mut satisfiable = portfolio_over(1, &[clause(&[1, 2])]);
        assert_eq!(satisfiable.solve(&[]), Ok(true));

        let mut unsatisfiable = portfolio_over(1, &[clause(&[1]), clause(&[-1])]);
        assert_eq!(unsatisfiable.solve(&[]), Ok(false));
    }

    #[test]
    fn dimacs_front_door() {
        let mut portfolio = portfolio_over(1, &[]);
        portfolio
            .read_dimacs("p cnf 2 2\n1 2 0\n-1 2 0\n".as_bytes())
            .expect("well formed");

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert_eq!(portfolio.model()[1], Some(true));
    }

    #[test]
    fn sum_stats_match_the_single_engine() {
        let formula = husky_tests::pigeonhole(3, 2);
        let mut portfolio = portfolio_over(1, &formula);
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unsatisfiable));

        let stats = portfolio.stats();
        assert_eq!(stats.cores, 1);
        assert_eq!(stats.sum.conflicts, stats.engines[0].search.conflicts);
        assert_eq!(stats.sum.decisions, stats.engines[0].search.decisions);
        assert_eq!(stats.sum.restarts, stats.engines[0].search.restarts);
    }

    #[test]
    fn assumption_conflicts_are_assumption_subsets() {
        let formula = vec![clause(&[-1, -2])];
        let mut portfolio = portfolio_over(1, &formula);

        let assumptions = [clause(&[1])[0], clause(&[2])[0]];
        assert_eq!(
            portfolio.solve_limited(&assumptions),
            Ok(Report::Unsatisfiable)
        );
        assert!(!portfolio.conflict().is_empty());
        for failed in portfolio.conflict() {
            assert!(assumptions.contains(failed));
        }
    }
}
