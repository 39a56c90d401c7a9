use husky_sat::{config::Config, context::Context, reports::Report, structures::literal::CLiteral};

mod basic {
    use super::*;

    fn lit(int: isize) -> CLiteral {
        CLiteral::from_int(int).expect("non-zero literal")
    }

    #[test]
    fn one_literal() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.add_clause(&[lit(1)]));

        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
        assert_eq!(ctx.model[0], Some(true));
    }

    #[test]
    fn conflict() {
        let mut ctx = Context::from_config(Config::default());

        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert!(ctx.add_clause(&[lit(-1), lit(-2)]));
        assert!(ctx.add_clause(&[lit(1), lit(-2)]));
        assert!(ctx.add_clause(&[lit(-1), lit(2)]));

        assert_eq!(ctx.solve_given(&[]), Report::Unsatisfiable);
        assert!(ctx.conflict.is_empty());
        assert!(!ctx.okay());
    }

    #[test]
    fn unit_conjunct() {
        let mut ctx = Context::from_config(Config::default());

        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert!(ctx.add_clause(&[lit(-1)]));

        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
        assert_eq!(ctx.model[0], Some(false));
        assert_eq!(ctx.model[1], Some(true));
    }

    #[test]
    fn units_prefix_the_trail() {
        let mut ctx = Context::from_config(Config::default());

        assert!(ctx.add_clause(&[lit(3)]));
        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert_eq!(ctx.unit_count(), 1);
        assert_eq!(ctx.unit_at(0), lit(3));

        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
        assert!(ctx.unit_count() >= 1);
    }

    #[test]
    fn model_satisfies_a_chain() {
        let mut ctx = Context::from_config(Config::default());

        let clauses: Vec<Vec<CLiteral>> = (1..8)
            .map(|atom| vec![lit(-atom), lit(atom + 1)])
            .collect();
        for clause in &clauses {
            assert!(ctx.add_clause(clause));
        }
        assert!(ctx.add_clause(&[lit(1)]));

        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
        for value in ctx.model.iter().take(8) {
            assert_eq!(*value, Some(true));
        }
    }
}

mod elimination {
    use super::*;

    fn lit(int: isize) -> CLiteral {
        CLiteral::from_int(int).expect("non-zero literal")
    }

    #[test]
    fn pure_literal_removed_and_modelled() {
        let mut ctx = Context::from_config(Config::default());

        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert!(ctx.add_clause(&[lit(1), lit(-2)]));

        assert!(ctx.eliminate(false));
        assert!(ctx.is_eliminated(0));

        assert_eq!(ctx.solve_given(&[]), Report::Satisfiable);
        assert_eq!(ctx.model[0], Some(true));
    }

    #[test]
    fn frozen_atoms_stay() {
        let mut ctx = Context::from_config(Config::default());

        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert!(ctx.add_clause(&[lit(1), lit(-2)]));

        ctx.set_frozen(0, true);
        assert!(ctx.eliminate(false));
        assert!(!ctx.is_eliminated(0));
    }

    #[test]
    fn reintroduction_restores_clauses() {
        let mut ctx = Context::from_config(Config::default());

        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert!(ctx.add_clause(&[lit(1), lit(-2)]));

        assert!(ctx.eliminate(false));
        assert!(ctx.is_eliminated(0));

        // The fresh clause mentions the eliminated atom, which returns with its clauses: the
        // formula is now 1|2, 1|-2, -1, and so unsatisfiable.
        ctx.add_clause(&[lit(-1)]);
        assert!(!ctx.is_eliminated(0));
        assert_eq!(ctx.solve_given(&[]), Report::Unsatisfiable);
    }

    #[test]
    fn turn_off_disables_simplification() {
        let mut ctx = Context::from_config(Config::default());
        assert!(ctx.eliminate(true));

        assert!(ctx.add_clause(&[lit(1), lit(2)]));
        assert!(ctx.add_clause(&[lit(1), lit(-2)]));
        assert!(ctx.eliminate(false));
        assert!(!ctx.is_eliminated(0));
    }
}

mod budgets {
    use super::*;

    fn lit(int: isize) -> CLiteral {
        CLiteral::from_int(int).expect("non-zero literal")
    }

    /// A small unsatisfiable parity-style knot, enough to force some conflicts.
    fn knotted(ctx: &mut Context) {
        for a in [-1, 1] {
            for b in [-2, 2] {
                for c in [-3, 3] {
                    if (a > 0) ^ (b > 0) ^ (c > 0) {
                        assert!(ctx.add_clause(&[lit(a), lit(b), lit(c)]));
                    }
                }
            }
        }
        for a in [-1, 1] {
            for b in [-2, 2] {
                for c in [-3, 3] {
                    if !((a > 0) ^ (b > 0) ^ (c > 0)) {
                        ctx.add_clause(&[lit(a), lit(b), lit(c)]);
                    }
                }
            }
        }
    }

    #[test]
    fn conflict_budget_reports_unknown() {
        let mut config = Config::default();
        config.conflict_limit = 1;
        let mut ctx = Context::from_config(config);
        knotted(&mut ctx);

        assert_eq!(ctx.solve_given(&[]), Report::Unknown);
    }

    #[test]
    fn interrupt_reports_unknown() {
        let mut ctx = Context::from_config(Config::default());
        knotted(&mut ctx);

        ctx.interrupt();
        assert_eq!(ctx.solve_given(&[]), Report::Unknown);
    }
}
