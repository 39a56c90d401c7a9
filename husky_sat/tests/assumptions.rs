use husky_sat::{config::Config, context::Context, reports::Report, structures::literal::CLiteral};

mod assumptions {
    use super::*;

    fn lit(int: isize) -> CLiteral {
        CLiteral::from_int(int).expect("non-zero literal")
    }

    #[test]
    fn satisfiable_under_assumptions() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.add_clause(&[lit(1), lit(2)]));

        assert_eq!(ctx.solve_given(&[lit(-1)]), Report::Satisfiable);
        assert_eq!(ctx.model[0], Some(false));
        assert_eq!(ctx.model[1], Some(true));
    }

    #[test]
    fn failed_assumptions_are_a_subset() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.add_clause(&[lit(-1), lit(-2)]));

        let assumptions = [lit(1), lit(2)];
        assert_eq!(ctx.solve_given(&assumptions), Report::Unsatisfiable);

        assert!(!ctx.conflict.is_empty());
        for failed in &ctx.conflict {
            assert!(assumptions.contains(failed));
        }

        // The engine itself remains usable: the formula is satisfiable without assumptions.
        assert!(ctx.okay());
        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
    }

    #[test]
    fn irrelevant_assumptions_left_out() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.add_clause(&[lit(-1)]));
        assert!(ctx.add_clause(&[lit(3), lit(4)]));

        // Assumption 2 is irrelevant to the failure of assumption 1.
        assert_eq!(ctx.solve_given(&[lit(2), lit(1)]), Report::Unsatisfiable);
        assert_eq!(ctx.conflict, vec![lit(1)]);
    }

    #[test]
    fn contradictory_assumptions() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.add_clause(&[lit(1), lit(2)]));

        assert_eq!(ctx.solve_given(&[lit(3), lit(-3)]), Report::Unsatisfiable);
        assert!(ctx.conflict.contains(&lit(-3)) || ctx.conflict.contains(&lit(3)));
    }

    #[test]
    fn incremental_solves_replay_assumptions() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.add_clause(&[lit(1), lit(2)]));

        assert_eq!(ctx.solve_given(&[lit(-1)]), Report::Satisfiable);
        assert_eq!(ctx.solve_given(&[lit(-2)]), Report::Satisfiable);
        assert_eq!(ctx.model[0], Some(true));

        assert!(ctx.add_clause(&[lit(-1)]));
        assert_eq!(ctx.solve_given(&[lit(-2)]), Report::Unsatisfiable);
    }
}
