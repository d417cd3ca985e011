//! Key structures.
//!
//! ## Formulas
//!
//! A [formula] is built from constants, variables, negation, and implication, and nothing else.
//! Conjunction, disjunction, and any other connective is a composition of the two connectives, e.g.
//!
//! - A ∧ B is ¬(A → ¬B)
//! - A ∨ B is ¬A → B

pub mod formula;
