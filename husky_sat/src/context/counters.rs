use std::time::Duration;

/// Counts for various things which count.
#[derive(Default)]
pub struct Counters {
    /// A count of every conflict seen.
    pub total_conflicts: u64,

    /// A count of conflicts seen since the last restart.
    pub fresh_conflicts: u32,

    /// A count of all decisions made.
    pub total_decisions: u64,

    /// A count of all literals propagated.
    pub total_propagations: u64,

    /// The number of restarts made.
    pub restarts: u64,

    /// A count of reductions of the addition store.
    pub reductions: u64,

    /// Clauses imported from other engines.
    pub imported_clauses: u64,

    /// Clauses offered to other engines.
    pub exported_clauses: u64,

    /// Times the model has been extended over eliminated atoms on request.
    pub model_extensions: u64,

    /// The time taken during the most recent solve.
    pub time: Duration,
}

impl Counters {
    /// A monotone measure of search effort, used to pace clause exchange.
    pub fn sum(&self) -> u64 {
        self.total_conflicts + self.total_propagations
    }
}
