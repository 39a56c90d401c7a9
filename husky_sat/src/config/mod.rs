/*!
Configuration of contexts and of the portfolio.

A [Config] belongs to a single context and is fixed at construction, though
[diversification](crate::portfolio::PortfolioEngine::diversify) revises a copy per engine.
A [PortfolioConfig] wraps a context configuration together with the options the coordinator
itself recognises --- principally `cores`.
*/

use std::time::Duration;

/// The configuration of a (sequential) context.
///
/// Defaults are set to give quick, deterministic results on a library of tests.
#[derive(Clone)]
pub struct Config {
    /// The `u` value to multiply the luby sequence by when determining whether to restart.
    pub luby_u: u32,

    /// The polarity given to a fresh atom, used as the first saved phase.
    pub polarity_default: bool,

    /// The probability of choosing a random polarity over the saved phase when deciding.
    pub polarity_lean: f64,

    /// Default to the last set value of an atom when choosing a value for the atom.
    pub phase_saving: bool,

    /// Permit (luby scheduled) restarts.
    pub restarts: bool,

    /// The activity decay applied after each conflict, as the divisor of the bump increment.
    pub variable_decay: f64,

    /// Retained learnt clauses before a reduction of the learnt database is scheduled.
    pub reduction_interval: usize,

    /// Glue at or below which a learnt clause is offered to other engines.
    pub export_glue_limit: u32,

    /// Size at or below which a learnt clause is offered to other engines.
    pub export_size_limit: usize,

    /// Glue at or below which a clause learnt by another engine is imported.
    pub import_glue_limit: u32,

    /// Size at or below which a clause learnt by another engine is imported.
    pub import_size_limit: usize,

    /// Conflicts before a solve gives up and reports unknown, with zero for no limit.
    pub conflict_limit: u64,

    /// Wall time before a solve gives up and reports unknown, with zero for no limit.
    pub time_limit: Duration,

    /// Enable simplification of the formula via [eliminate](crate::context::GenericContext::eliminate).
    pub simplification: bool,

    /// Clause count above which simplification is not performed.
    pub max_simp_clauses: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            luby_u: 128,
            polarity_default: true,
            polarity_lean: 0.0,
            phase_saving: true,
            restarts: true,
            variable_decay: 0.95,
            reduction_interval: 2000,
            export_glue_limit: 6,
            export_size_limit: 30,
            import_glue_limit: 6,
            import_size_limit: 30,
            conflict_limit: 0,
            time_limit: Duration::ZERO,
            simplification: true,
            max_simp_clauses: 500_000,
        }
    }
}

/// The configuration of a portfolio.
#[derive(Clone, Default)]
pub struct PortfolioConfig {
    /// Engines to race: `0` for one per hardware thread, `-1` for one per two hardware threads
    /// (rounded up), and any other value taken literally, clamped to at least one.
    pub cores: i32,

    /// Print `c`-prefixed progress lines on stdout, solver-competition style.
    ///
    /// Statistics from [print_stats](crate::portfolio::Portfolio::print_stats) print
    /// regardless.
    pub verbosity: u8,

    /// The configuration handed to every engine, prior to diversification.
    pub context: Config,
}

impl PortfolioConfig {
    /// The literal number of engines to allocate, resolving the `cores` conventions.
    pub fn resolved_cores(&self) -> usize {
        let available = std::thread::available_parallelism().map_or(1, |n| n.get());
        let cores = match self.cores {
            0 => available,
            -1 => available.div_ceil(2),
            n if n >= 1 => n as usize,
            _ => 1,
        };
        cores.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_cores_clamped() {
        let mut config = PortfolioConfig::default();

        config.cores = 4;
        assert_eq!(config.resolved_cores(), 4);

        config.cores = -7;
        assert_eq!(config.resolved_cores(), 1);
    }

    #[test]
    fn detected_cores_nonzero() {
        let mut config = PortfolioConfig::default();

        config.cores = 0;
        assert!(config.resolved_cores() >= 1);

        config.cores = -1;
        assert!(config.resolved_cores() >= 1);
    }
}
