//! Procedures over formulas, relative to some rule repository.

pub mod reduce;
