/*!
Error types used in the library.

- Some of these are internally expected --- e.g. a BCP conflict is a learning opportunity and
  is used to control the flow of a solve.
- Others are external --- e.g. the portfolio returns a `Disagreement` error when two engines
  claim opposite definite verdicts, as in that case the portfolio is unsound and no answer can
  be published.
*/

use crate::structures::atom::Atom;

/// Errors during parsing of DIMACS input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Some issue with the problem specification line.
    ProblemSpecification,

    /// Some unspecific problem at a specific line.
    Line(usize),

    /// A literal outside the representable range (or zero where a literal was required).
    Literal(usize),

    /// A clause was left unterminated at the end of input.
    MissingDelimiter,
}

/// Errors when revising the formula of a context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// The addition made the formula unsatisfiable.
    Unsatisfiable,

    /// An atom beyond the atoms of the context.
    UnknownAtom(Atom),
}

/// Errors raised by the portfolio coordinator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PortfolioError {
    /// Two engines finished with opposite definite verdicts.
    ///
    /// This never happens when every engine honours its contract, and is surfaced rather than
    /// recovered: whichever engine is wrong may be wrong again.
    Disagreement {
        /// An engine which reported satisfiable.
        satisfiable: usize,
        /// An engine which reported unsatisfiable.
        unsatisfiable: usize,
    },

    /// A parse error from reading DIMACS input into the portfolio.
    Parse(ParseError),

    /// A build error from feeding clauses to the primary engine.
    Build(BuildError),
}

impl From<ParseError> for PortfolioError {
    fn from(e: ParseError) -> Self {
        PortfolioError::Parse(e)
    }
}

impl From<BuildError> for PortfolioError {
    fn from(e: BuildError) -> Self {
        PortfolioError::Build(e)
    }
}

impl std::fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioError::Disagreement {
                satisfiable,
                unsatisfiable,
            } => write!(
                f,
                "unsound portfolio: engine {satisfiable} reported satisfiable while engine {unsatisfiable} reported unsatisfiable"
            ),
            PortfolioError::Parse(e) => write!(f, "parse error: {e:?}"),
            PortfolioError::Build(e) => write!(f, "build error: {e:?}"),
        }
    }
}

impl std::error::Error for PortfolioError {}
