//! A parallel portfolio solver for boolean satisfiability.
//!
//! husky_sat determines the satisfiability of formulas in conjunctive normal form by racing a
//! *pack* of diversified sequential CDCL engines on the same formula.
//! Each engine is a full conflict-driven clause-learning solver (a [context](crate::context)),
//! and the [portfolio] module coordinates their lifecycle: a designated *primary* engine holds
//! the authoritative formula, secondaries are kept in sync with it, and learnt clauses are
//! exchanged between engines at deterministic, barrier-aligned points during search.
//!
//! # Orientation
//!
//! - The [portfolio](crate::portfolio::Portfolio) is the front door: formulas are added to it,
//!   solves run through it, and it publishes a single model or failed-assumption conflict.
//! - A [context](crate::context::Context) is a self-contained sequential solver, and may be
//!   used on its own.
//!   The portfolio drives contexts only through the
//!   [PortfolioEngine](crate::portfolio::PortfolioEngine) trait, so any engine honouring the
//!   trait contract is a valid drop-in.
//! - Coordination primitives live next to the coordinator: an N-party growable
//!   [barrier](crate::portfolio::Barrier), a [job queue](crate::portfolio::JobQueue) of worker
//!   threads, and per-engine [clause pools](crate::portfolio::ClausePool) which stage clauses
//!   for one exchange round.
//!
//! # Example
//!
//! ```rust
//! use husky_sat::config::PortfolioConfig;
//! use husky_sat::portfolio::Portfolio;
//! use husky_sat::reports::Report;
//! use husky_sat::structures::literal::CLiteral;
//!
//! let mut config = PortfolioConfig::default();
//! config.cores = 2;
//! let mut pack: Portfolio = Portfolio::from_config(config);
//!
//! let p = pack.new_var(true, true);
//! let q = pack.new_var(true, true);
//!
//! pack.add_clause(&[CLiteral::new(p, true), CLiteral::new(q, true)]);
//! pack.add_clause(&[CLiteral::new(p, false)]);
//!
//! assert_eq!(pack.solve_limited(&[]), Ok(Report::Satisfiable));
//! assert_eq!(pack.model()[q as usize], Some(true));
//! ```
//!
//! # Logs
//!
//! Diagnostic calls to [log!](log) are made throughout, filtered by the targets listed in
//! [misc::log].
//! No log implementation is provided, and the `c`-prefixed statistic lines from
//! [print_stats](crate::portfolio::Portfolio::print_stats) go to stdout, as solver tradition
//! demands.

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod builder;
pub mod config;
pub mod context;
pub mod db;
pub mod generic;
pub mod misc;
pub mod portfolio;
pub mod preprocessing;
pub mod procedures;
pub mod reports;
pub mod structures;
pub mod types;
