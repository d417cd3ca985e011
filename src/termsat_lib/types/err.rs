//! Error types used in the library.
//!
//! - Most of these indicate a broken invariant and are fatal to whatever raised them, e.g. an encoding collision while indexing.
//! - Expected misses (no rule for a subterm, no entry for a key) are never errors, and are instead returned as [None].
//!
//! Names of the error enums, for the most part, overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::structures::formula::VariableId;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Formula(FormulaError),
    Index(IndexError),
    Parse(ParseError),
    Reduction(ReductionError),
    Rule(RuleError),
    Trie(TrieError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Formula(e) => write!(f, "Formula error: {e:?}"),
            Self::Index(e) => write!(f, "Index error: {e:?}"),
            Self::Parse(e) => write!(f, "Parse error: {e:?}"),
            Self::Reduction(e) => write!(f, "Reduction error: {e:?}"),
            Self::Rule(e) => write!(f, "Rule error: {e:?}"),
            Self::Trie(e) => write!(f, "Trie error: {e:?}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// Errors in the construction of a formula.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormulaError {
    /// Variables are identified by positive integers.
    ZeroVariable,
}

impl From<FormulaError> for ErrorKind {
    fn from(e: FormulaError) -> Self {
        ErrorKind::Formula(e)
    }
}

/// Errors when building or reading a compiled index.
///
/// Database failures keep only the message of the underlying error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IndexError {
    /// Some failure of the underlying database.
    Database(String),

    /// Some failure of the filesystem, e.g. when publishing a finished index.
    Io(String),

    /// A rule resolved to a canonical formula absent from the canonical relation.
    MissingCanonical(String),

    /// A non-canonical row references a parent which has not been read.
    Orphan { id: i64, parent: i64 },

    /// A non-canonical row references a canonical id absent from the canonical relation.
    UnknownCanonicalId { id: i64, canonical: i64 },

    /// A row of the non-canonical relation did not hold a single symbol.
    Symbol(i64),

    /// The key of some trie node does not decode to the formula stored at the node.
    EncodingCollision(String),

    /// A non-canonical formula of a rule source has no canonical formula.
    NoRule(String),
}

impl From<IndexError> for ErrorKind {
    fn from(e: IndexError) -> Self {
        ErrorKind::Index(e)
    }
}

impl From<rusqlite::Error> for IndexError {
    fn from(e: rusqlite::Error) -> Self {
        IndexError::Database(e.to_string())
    }
}

impl From<rusqlite::Error> for ErrorKind {
    fn from(e: rusqlite::Error) -> Self {
        ErrorKind::Index(IndexError::from(e))
    }
}

/// Errors when reading DIMACS input, rule files, or encodings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Some issue with the problem specification in a DIMACS input.
    ProblemSpecification,

    /// The problem specification of some DIMACS input is not in the header of the input.
    MisplacedProblem(usize),

    /// Some unspecific problem at a specific line.
    Line(usize),

    /// A literal could not be read.
    Literal(String),

    /// An encoding ended before a formula was complete.
    UnexpectedEnd,

    /// An encoding held an unexpected symbol at the given position.
    UnexpectedSymbol(usize, char),

    /// An encoding held symbols after a complete formula, starting at the given position.
    TrailingSymbols(usize),

    /// A variable encoding with a leading zero, or a zero id.
    Variable(usize),

    /// A rule file line with more than two encodings.
    RuleLine(usize),

    /// Some failure to read the input.
    Io(String),

    /// Some issue with a rule at a specific line.
    Rule(usize, RuleError),
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors during reduction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReductionError {
    /// Reduction did not reach a fixpoint within the given number of passes.
    ///
    /// The rule library is assumed to be terminating, so this marks a broken library.
    PassLimit(usize),

    /// A pass ended without exactly one reduced formula, which marks a broken traversal.
    Unbalanced,
}

impl From<ReductionError> for ErrorKind {
    fn from(e: ReductionError) -> Self {
        ErrorKind::Reduction(e)
    }
}

/// Errors in a set of rules.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleError {
    /// A rule rewrites a formula to itself.
    Trivial(String),

    /// A formula is given two distinct canonical formulas.
    Conflict(String),

    /// A formula is both canonical and non-canonical.
    CanonicalPattern(String),

    /// The canonical side of a rule uses a variable which does not occur in the non-canonical side.
    UnboundVariable(String, VariableId),

    /// The two sides of a rule differ on some valuation.
    Unsound(String),

    /// A rule has too many variables to be checked by truth table.
    Unverifiable(String),
}

impl From<RuleError> for ErrorKind {
    fn from(e: RuleError) -> Self {
        ErrorKind::Rule(e)
    }
}

/// Errors in the use of a trie.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrieError {
    /// The empty key addresses the root, which never holds a value.
    EmptyKey,

    /// A node key which does not belong to the trie.
    UnknownNode,
}

impl From<TrieError> for ErrorKind {
    fn from(e: TrieError) -> Self {
        ErrorKind::Trie(e)
    }
}
