//! A library for deciding unsatisfiability of CNF formulas by term rewriting.
//!
//! Rather than searching for a valuation, each clause of a formula is folded into a single growing
//! term written with only negation and implication, and after each fold the term is *reduced* against
//! a library of equivalence rules.
//! If the fully folded and fully reduced term is the constant F, the formula is unsatisfiable.
//!
//! # Orientation
//!
//! - Formulas live in [structures::formula].
//!   Every formula has an [encoding](structures::formula::Formula::encoding), a short prefix-free string used as a key.
//! - Encodings are indexed by a [trie](generic::trie), which an [instance recognizer](recognizer) uses to find rule patterns.
//! - A [rule repository](rules) supplies canonical replacements, either from a rule file held in memory or from a compiled index.
//! - The [indexer] compiles a rule file into a compiled index, stored as two SQLite relations.
//! - [reduce](procedures::reduce) rewrites a formula to a fixpoint.
//! - A [context] folds DIMACS clauses and reduces after each fold.
//!
//! # Example
//!
//! ```rust
//! use termsat_lib::{
//!     config::Config,
//!     context::Context,
//!     rules::{memory::MemoryRepository, set::RuleSet},
//!     types::gen::Report,
//! };
//!
//! let rules = RuleSet::from_reader("--1. 1.\n*1.1. T\n-T F\n".as_bytes()).unwrap();
//! let repository = MemoryRepository::from_rule_set(rules, Config::default().matching).unwrap();
//!
//! let mut the_context = Context::from_config(Config::default(), repository);
//! the_context.read_dimacs("p cnf 1 2\n1 0\n-1 0\n".as_bytes()).unwrap();
//!
//! assert_eq!(the_context.report(), Report::Unsatisfiable);
//! ```
//!
//! # Logs
//!
//! Calls to [log!](log) are made throughout, with targets listed in [log::targets].
//! No logger is installed by the library.

pub mod config;
pub mod context;
pub mod generic;
pub mod indexer;
pub mod io;
pub mod log;
pub mod procedures;
pub mod recognizer;
pub mod rules;
pub mod structures;
pub mod types;
