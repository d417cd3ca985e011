//! Immutable propositional formulas over negation and implication.
//!
//! A [Formula] is a cheap handle to a shared, immutable term.
//! Cloning a formula clones the handle, and every operation which changes a formula returns a new formula, sharing unchanged subterms with the original.
//!
//! Formulas are compared and hashed structurally.
//! Two formulas built independently are equal exactly when they have the same shape, and so the same [encoding](Formula::encoding).
//!
//! ```rust
//! # use termsat_lib::structures::formula::Formula;
//! let p = Formula::variable(1).unwrap();
//! let q = Formula::variable(2).unwrap();
//!
//! let p_or_q = Formula::disjunction(p.clone(), q.clone());
//! assert_eq!(p_or_q, Formula::implication(Formula::negation(p), q));
//! assert_eq!(p_or_q.encoding(), "*-1.2.");
//! assert_eq!(p_or_q.length(), 4);
//! ```

pub mod encoding;

use std::{
    collections::BTreeSet,
    sync::{Arc, OnceLock},
};

use crate::types::err::FormulaError;

/// Variables are identified by positive integers.
pub type VariableId = u32;

/// The shape of a formula, one level deep.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Constant(bool),
    Variable(VariableId),
    Negation(Formula),

    /// The antecedent, then the consequent.
    Implication(Formula, Formula),
}

#[derive(PartialEq, Eq, Hash)]
struct Node {
    length: usize,
    term: Term,
}

// Dropping a deep formula with the derived drop recurses once per level.
// Instead, subterms about to be freed are moved onto a stack and freed in turn.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_operands(&mut self.term, &mut pending);
        while let Some(formula) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(formula.0) {
                take_operands(&mut node.term, &mut pending);
            }
        }
    }
}

fn take_operands(term: &mut Term, pending: &mut Vec<Formula>) {
    match std::mem::replace(term, Term::Constant(false)) {
        Term::Negation(child) => pending.push(child),
        Term::Implication(antecedent, consequent) => {
            pending.push(antecedent);
            pending.push(consequent);
        }
        Term::Constant(_) | Term::Variable(_) => {}
    }
}

/// A propositional formula.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Formula(Arc<Node>);

impl Formula {
    fn from_term(term: Term) -> Self {
        let length = match &term {
            Term::Constant(_) | Term::Variable(_) => 1,
            Term::Negation(child) => child.length() + 1,
            Term::Implication(antecedent, consequent) => {
                antecedent.length() + consequent.length() + 1
            }
        };
        Formula(Arc::new(Node { length, term }))
    }

    /// The constant T, or F.
    ///
    /// There is a single instance of each constant.
    pub fn constant(value: bool) -> Self {
        static TRUE: OnceLock<Formula> = OnceLock::new();
        static FALSE: OnceLock<Formula> = OnceLock::new();

        let cell = match value {
            true => &TRUE,
            false => &FALSE,
        };
        cell.get_or_init(|| Formula::from_term(Term::Constant(value)))
            .clone()
    }

    pub fn variable(id: VariableId) -> Result<Self, FormulaError> {
        match id {
            0 => Err(FormulaError::ZeroVariable),
            _ => Ok(Formula::from_term(Term::Variable(id))),
        }
    }

    pub fn negation(child: Formula) -> Self {
        Formula::from_term(Term::Negation(child))
    }

    pub fn implication(antecedent: Formula, consequent: Formula) -> Self {
        Formula::from_term(Term::Implication(antecedent, consequent))
    }

    /// A ∨ B, as ¬A → B.
    pub fn disjunction(left: Formula, right: Formula) -> Self {
        Formula::implication(Formula::negation(left), right)
    }

    /// A ∧ B, as ¬(A → ¬B).
    pub fn conjunction(left: Formula, right: Formula) -> Self {
        Formula::negation(Formula::implication(left, Formula::negation(right)))
    }

    pub fn term(&self) -> &Term {
        &self.0.term
    }

    /// The count of constants, variables, and connectives in the formula.
    pub fn length(&self) -> usize {
        self.0.length
    }

    pub fn as_constant(&self) -> Option<bool> {
        match self.term() {
            Term::Constant(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<VariableId> {
        match self.term() {
            Term::Variable(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_false(&self) -> bool {
        self.as_constant() == Some(false)
    }

    pub fn is_true(&self) -> bool {
        self.as_constant() == Some(true)
    }

    /// Whether the two handles refer to the same term, as opposed to two equal terms.
    pub fn same_term(&self, other: &Formula) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// All subformulas, in the order their symbols appear in the encoding.
    ///
    /// The formula at index `i` begins at symbol `i`, counting a variable as a single symbol.
    pub fn preorder(&self) -> Vec<&Formula> {
        let mut order = Vec::with_capacity(self.length());
        let mut stack = vec![self];
        while let Some(formula) = stack.pop() {
            order.push(formula);
            match formula.term() {
                Term::Constant(_) | Term::Variable(_) => {}
                Term::Negation(child) => stack.push(child),
                Term::Implication(antecedent, consequent) => {
                    stack.push(consequent);
                    stack.push(antecedent);
                }
            }
        }
        order
    }

    pub fn variables(&self) -> BTreeSet<VariableId> {
        self.preorder()
            .into_iter()
            .filter_map(|formula| formula.as_variable())
            .collect()
    }

    /// The value of the formula on the given valuation.
    pub fn evaluate(&self, value_of: &impl Fn(VariableId) -> bool) -> bool {
        match self.term() {
            Term::Constant(value) => *value,
            Term::Variable(id) => value_of(*id),
            Term::Negation(child) => !child.evaluate(value_of),
            Term::Implication(antecedent, consequent) => {
                !antecedent.evaluate(value_of) || consequent.evaluate(value_of)
            }
        }
    }

    /// Replaces each bound variable with the formula it is bound to.
    ///
    /// Variables without a binding are left as they are, and subterms without a bound variable are shared with the original.
    pub fn substitute(&self, bindings: &[(VariableId, Formula)]) -> Formula {
        match self.term() {
            Term::Constant(_) => self.clone(),

            Term::Variable(id) => match bindings.iter().find(|(bound, _)| bound == id) {
                Some((_, formula)) => formula.clone(),
                None => self.clone(),
            },

            Term::Negation(child) => {
                let substituted = child.substitute(bindings);
                match substituted.same_term(child) {
                    true => self.clone(),
                    false => Formula::negation(substituted),
                }
            }

            Term::Implication(antecedent, consequent) => {
                let a = antecedent.substitute(bindings);
                let c = consequent.substitute(bindings);
                match a.same_term(antecedent) && c.same_term(consequent) {
                    true => self.clone(),
                    false => Formula::implication(a, c),
                }
            }
        }
    }
}

impl std::fmt::Debug for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Formula({})", self.encoding())
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encoding())
    }
}
