//! Incremental solving under assumptions: probe a formula without committing to clauses.

use husky_sat::{
    config::PortfolioConfig, portfolio::Portfolio, reports::Report,
    structures::literal::CLiteral,
};

fn main() {
    let mut config = PortfolioConfig::default();
    config.cores = 2;
    let mut pack: Portfolio = Portfolio::from_config(config);

    let a = pack.new_var(true, true);
    let b = pack.new_var(true, true);
    let c = pack.new_var(true, true);

    // a -> b, b -> c
    pack.add_clause(&[CLiteral::new(a, false), CLiteral::new(b, true)]);
    pack.add_clause(&[CLiteral::new(b, false), CLiteral::new(c, true)]);

    // Probing a with -c fails, and the conflict names the assumptions at fault.
    let probe = [CLiteral::new(a, true), CLiteral::new(c, false)];
    match pack.solve_limited(&probe) {
        Ok(Report::Unsatisfiable) => {
            let culprits: Vec<String> = pack
                .conflict()
                .iter()
                .map(|literal| literal.to_string())
                .collect();
            println!("failed assumptions: {}", culprits.join(" "));
        }
        other => println!("unexpected: {other:?}"),
    }

    // The formula itself is untouched.
    assert_eq!(pack.solve_limited(&[]), Ok(Report::Satisfiable));
    println!("still satisfiable without the probe");
}
