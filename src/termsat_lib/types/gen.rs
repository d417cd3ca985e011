use crate::structures::formula::Formula;

/// High-level reports regarding a fold.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula reduced to T.
    Satisfiable,

    /// The formula reduced to F.
    Unsatisfiable,

    /// The formula reduced to something other than a constant.
    ///
    /// Reduction only proves unsatisfiability, so this says nothing either way.
    Unknown,
}

impl From<&Formula> for Report {
    fn from(formula: &Formula) -> Self {
        match formula.as_constant() {
            Some(true) => Self::Satisfiable,
            Some(false) => Self::Unsatisfiable,
            None => Self::Unknown,
        }
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

/// Counts kept while folding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Clauses folded so far.
    pub clauses: usize,

    /// The length of the largest formula seen before reduction.
    pub peak_length: usize,

    /// The length of the formula after the most recent reduction.
    pub length: usize,
}
