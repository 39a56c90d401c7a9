//! Reports on the outcome of a solve.

/// The high-level outcome of a solve.
///
/// `Unknown` is reported whenever search ended without a verdict: an interrupt, an exhausted
/// budget, or --- for the portfolio --- every engine returning without a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    /// The formula is satisfiable, and a model is available.
    Satisfiable,

    /// The formula is unsatisfiable, perhaps only under the given assumptions.
    ///
    /// With assumptions, a failed-assumption conflict is available; without, or when the
    /// formula itself is unsatisfiable, the conflict is empty.
    Unsatisfiable,

    /// Search concluded without a verdict.
    Unknown,
}

impl Report {
    /// True if the report is a definite verdict.
    pub fn definite(&self) -> bool {
        !matches!(self, Report::Unknown)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
