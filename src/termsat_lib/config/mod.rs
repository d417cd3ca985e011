//! Configuration of a context.
//!
//! All options are held in [Config], with defaults drawn from [defaults].

pub mod defaults;

pub type PassLimit = usize;

#[derive(Debug, Clone)]
pub struct Config {
    /// How a rule pattern is matched against a subterm.
    pub matching: Matching,

    /// The most reduction passes made before reduction is abandoned as stuck.
    pub pass_limit: PassLimit,

    /// Display a stats window while folding clauses.
    pub show_stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        use defaults::*;
        Config {
            matching: MATCHING,
            pass_limit: PASS_LIMIT,
            show_stats: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Matching {
    #[default]
    /// A subterm matches a rule only if the two have the same encoding
    Exact,
    /// A subterm matches a rule if it is a substitution instance of the rule's pattern
    Instance,
}

impl std::fmt::Display for Matching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Instance => write!(f, "instance"),
        }
    }
}
