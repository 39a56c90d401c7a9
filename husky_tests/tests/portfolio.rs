//! Multi-core scenarios: racing, agreement, exchange, and statistics.

use husky_sat::reports::Report;
use husky_tests::{clause, pigeonhole, planted_3sat, portfolio_over, satisfies};

mod parallel {
    use super::*;

    #[test]
    fn pigeonhole_unsatisfiable_on_four_cores() {
        let formula = pigeonhole(3, 2);
        let mut portfolio = portfolio_over(4, &formula);

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unsatisfiable));
        assert!(portfolio.conflict().is_empty());

        let stats = portfolio.stats();
        assert_eq!(stats.cores, 4);
        assert!(stats.sum.conflicts >= 1);

        // Agreement: every definite engine found the same verdict.
        for engine in &stats.engines {
            assert_ne!(engine.status, Report::Satisfiable);
        }
    }

    #[test]
    fn planted_random_3sat_on_four_cores() {
        let (formula, _) = planted_3sat(50, 175, 42);
        let mut portfolio = portfolio_over(4, &formula);

        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert!(satisfies(&formula, portfolio.model()));

        // At least one engine idled at the post-search join.
        let stats = portfolio.stats();
        assert!(stats
            .engines
            .iter()
            .any(|engine| engine.idle_seconds > 0.0));
    }

    #[test]
    fn sum_stats_are_additive() {
        let formula = pigeonhole(3, 2);
        let mut portfolio = portfolio_over(4, &formula);
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unsatisfiable));

        let stats = portfolio.stats();
        let conflicts: u64 = stats.engines.iter().map(|e| e.search.conflicts).sum();
        let decisions: u64 = stats.engines.iter().map(|e| e.search.decisions).sum();
        let restarts: u64 = stats.engines.iter().map(|e| e.search.restarts).sum();
        assert_eq!(stats.sum.conflicts, conflicts);
        assert_eq!(stats.sum.decisions, decisions);
        assert_eq!(stats.sum.restarts, restarts);
    }

    #[test]
    fn assumptions_agree_across_cores() {
        let formula = vec![clause(&[-1, -2]), clause(&[2, 3])];
        let mut portfolio = portfolio_over(4, &formula);

        let assumptions = [clause(&[1])[0], clause(&[2])[0]];
        assert_eq!(
            portfolio.solve_limited(&assumptions),
            Ok(Report::Unsatisfiable)
        );
        for failed in portfolio.conflict() {
            assert!(assumptions.contains(failed));
        }

        // And without the assumptions the formula satisfies.
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
        assert!(satisfies(&formula, portfolio.model()));
    }

    #[test]
    fn repeated_solves_stay_sound() {
        let (formula, _) = planted_3sat(30, 100, 3);
        let mut portfolio = portfolio_over(3, &formula);

        for _ in 0..3 {
            assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Satisfiable));
            assert!(satisfies(&formula, portfolio.model()));
        }
    }

    #[test]
    fn workers_sleep_between_solves() {
        let formula = pigeonhole(3, 2);
        let mut portfolio = portfolio_over(4, &formula);
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unsatisfiable));

        let timer = std::time::Instant::now();
        while !portfolio.all_workers_sleeping() {
            assert!(
                timer.elapsed() < std::time::Duration::from_secs(5),
                "workers failed to sleep"
            );
            std::thread::yield_now();
        }
    }
}
