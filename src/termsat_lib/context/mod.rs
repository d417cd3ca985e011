//! The context of a fold.
//!
//! A context holds a rule repository and a running formula.
//! Clauses are added one at a time, and each is folded into the running formula as a conjunct, after which the running formula is [reduced](crate::procedures::reduce).
//!
//! - Clauses are read from text in [builder].
//! - Clauses are folded in [fold].
//!
//! Reduction to F shows the clauses are unsatisfiable.
//! Reduction to anything other than a constant shows nothing, and is reported as [Unknown](Report::Unknown).
//!
//! ```rust
//! # use termsat_lib::config::{Config, Matching};
//! # use termsat_lib::context::Context;
//! # use termsat_lib::rules::{memory::MemoryRepository, set::RuleSet};
//! # use termsat_lib::types::gen::Report;
//! let rules = RuleSet::from_reader("--1. 1.\n*1.1. T\n-T F\n".as_bytes()).unwrap();
//! let repository = MemoryRepository::from_rule_set(rules, Matching::Instance).unwrap();
//! let mut the_context = Context::from_config(Config::default(), repository);
//!
//! the_context.clause_from_string("4").unwrap();
//! assert_eq!(the_context.report(), Report::Unknown);
//!
//! the_context.clause_from_string("-4").unwrap();
//! assert_eq!(the_context.report(), Report::Unsatisfiable);
//! ```

pub mod builder;
pub mod fold;

use std::time::Instant;

use crate::{
    config::Config,
    io::window::ContextWindow,
    rules::RuleRepository,
    structures::formula::Formula,
    types::gen::{Counters, Report},
};

pub struct Context<R: RuleRepository> {
    pub config: Config,
    repository: R,

    /// The running formula, or [None] if no clause has been folded.
    formula: Option<Formula>,
    counters: Counters,
    start: Instant,
    window: Option<ContextWindow>,
}

impl<R: RuleRepository> Context<R> {
    pub fn from_config(config: Config, repository: R) -> Self {
        Context {
            config,
            repository,
            formula: None,
            counters: Counters::default(),
            start: Instant::now(),
            window: None,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The running formula, reduced after the most recent fold.
    pub fn formula(&self) -> Option<&Formula> {
        self.formula.as_ref()
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// With no clauses the running formula is the empty conjunction, and so satisfiable.
    pub fn report(&self) -> Report {
        match &self.formula {
            None => Report::Satisfiable,
            Some(formula) => Report::from(formula),
        }
    }
}
