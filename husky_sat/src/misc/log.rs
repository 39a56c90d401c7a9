/*!
Miscellaneous items related to [logging](log).

Calls to the log macro are made throughout the library with a named target, so output can be
narrowed to the relevant parts --- e.g. with [env_logger](https://docs.rs/env_logger),
`RUST_LOG=sync=trace …` follows the clause exchange rounds and nothing else.

No log implementation is provided.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    pub const PROPAGATION: &str = "propagation";
    pub const ANALYSIS: &str = "analysis";
    pub const PREPROCESSING: &str = "preprocessing";
    pub const REDUCTION: &str = "reduction";
    pub const PORTFOLIO: &str = "portfolio";
    pub const SYNC: &str = "sync";
    pub const QUEUE: &str = "queue";
}
