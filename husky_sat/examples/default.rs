//! Solve a small DIMACS formula on every available core and print statistics.

use husky_sat::{config::PortfolioConfig, portfolio::Portfolio, reports::Report};

fn main() {
    let mut config = PortfolioConfig::default();
    config.cores = 0;
    config.verbosity = 1;

    let mut pack: Portfolio = Portfolio::from_config(config);

    let dimacs = "
c one-hot selection over three options, plus a toggle
p cnf 4 6
 1  2  3 0
-1 -2 0
-1 -3 0
-2 -3 0
 3  4 0
-3 -4 0
";
    pack.read_dimacs(dimacs.trim_start().as_bytes())
        .expect("well formed DIMACS");

    match pack.solve_limited(&[]) {
        Ok(Report::Satisfiable) => {
            println!("s SATISFIABLE");
            let values: Vec<String> = pack
                .model()
                .iter()
                .enumerate()
                .map(|(atom, value)| match value {
                    Some(true) => format!("{}", atom + 1),
                    _ => format!("-{}", atom + 1),
                })
                .collect();
            println!("v {} 0", values.join(" "));
        }
        Ok(Report::Unsatisfiable) => println!("s UNSATISFIABLE"),
        Ok(Report::Unknown) => println!("s UNKNOWN"),
        Err(e) => eprintln!("c error: {e}"),
    }

    pack.print_stats();
}
