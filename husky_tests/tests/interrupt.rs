//! Interruption: a watchdog stops a hard solve, and the pack winds down cleanly.

use std::time::{Duration, Instant};

use husky_sat::reports::Report;
use husky_tests::{pigeonhole, portfolio_over};

mod interrupt {
    use super::*;

    #[test]
    fn watchdog_interrupts_a_hard_solve() {
        // PHP(10, 9) is far beyond a 100ms budget for any engine of the pack.
        let formula = pigeonhole(10, 9);
        let mut portfolio = portfolio_over(4, &formula);

        let interrupter = portfolio.interrupter();
        let watchdog = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            interrupter.interrupt();
        });

        let timer = Instant::now();
        assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unknown));
        assert!(
            timer.elapsed() < Duration::from_secs(30),
            "interrupt failed to wind the solve down"
        );

        watchdog.join().expect("watchdog panicked");

        // Every worker returns to sleep once the solve is wound down.
        let settle = Instant::now();
        while !portfolio.all_workers_sleeping() {
            assert!(
                settle.elapsed() < Duration::from_secs(5),
                "workers failed to sleep after an interrupt"
            );
            std::thread::yield_now();
        }

        // No partial result leaks from the interrupted solve.
        assert!(portfolio.model().is_empty());
        assert!(portfolio.conflict().is_empty());
    }

    #[test]
    fn interrupt_is_idempotent_and_the_pack_reusable() {
        let formula = pigeonhole(10, 9);
        let mut portfolio = portfolio_over(2, &formula);

        for _ in 0..2 {
            let interrupter = portfolio.interrupter();
            let watchdog = std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                // Twice, to no further effect.
                interrupter.interrupt();
                interrupter.interrupt();
            });

            assert_eq!(portfolio.solve_limited(&[]), Ok(Report::Unknown));
            watchdog.join().expect("watchdog panicked");
        }
    }
}
