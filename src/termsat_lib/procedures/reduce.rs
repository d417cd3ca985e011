//! Rewrites a formula until no rule of a repository applies to any subterm.
//!
//! # Passes
//!
//! A pass walks the formula in post-order, antecedents before consequents.
//! Once the operands of a composite term have been walked, the term (rebuilt only if some operand changed) is looked up in the repository, and replaced if some rule applies.
//!
//! So, within a pass, the innermost and then leftmost redex is rewritten first, and a parent is considered only after any rewrite of its operands.
//! A replacement is not looked at again until the next pass.
//!
//! Passes repeat until a pass makes no replacement.
//! The rules of a repository are taken to terminate, and so the count of passes is only bounded by a generous limit.
//! Exceeding the limit is an error, as it marks a broken rule library rather than a hard formula.
//!
//! Constants and variables are never looked up.
//!
//! The walk keeps an explicit stack, as folded formulas are deep.

use crate::{
    config::{defaults, PassLimit},
    rules::RuleRepository,
    structures::formula::{Formula, Term},
    types::err::{ErrorKind, ReductionError},
};

/// Reduces `formula` with the default limit on passes.
pub fn reduce(formula: &Formula, repository: &impl RuleRepository) -> Result<Formula, ErrorKind> {
    reduce_with_limit(formula, repository, defaults::PASS_LIMIT)
}

/// Reduces `formula`, making at most `limit` passes.
///
/// The final pass, which finds nothing to replace, counts toward the limit.
pub fn reduce_with_limit(
    formula: &Formula,
    repository: &impl RuleRepository,
    limit: PassLimit,
) -> Result<Formula, ErrorKind> {
    let mut current = formula.clone();
    let mut total = 0;

    for pass in 1..=limit {
        let (reduced, replacements) = reduce_pass(&current, repository)?;

        if replacements == 0 {
            log::trace!(target: crate::log::targets::REDUCTION,
                "Reduced length {} to {} in {pass} passes with {total} replacements", formula.length(), reduced.length());
            return Ok(reduced);
        }

        total += replacements;
        current = reduced;
    }

    log::error!(target: crate::log::targets::REDUCTION, "No fixpoint after {limit} passes, from {formula}");
    Err(ReductionError::PassLimit(limit).into())
}

enum Step<'f> {
    Enter(&'f Formula),
    Exit(&'f Formula),
}

/// A single pass, returning the rewritten formula and the count of replacements.
fn reduce_pass(
    formula: &Formula,
    repository: &impl RuleRepository,
) -> Result<(Formula, usize), ReductionError> {
    let mut replacements = 0;
    let mut stack = vec![Step::Enter(formula)];
    let mut reduced: Vec<Formula> = Vec::new();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(subformula) => match subformula.term() {
                Term::Constant(_) | Term::Variable(_) => reduced.push(subformula.clone()),

                Term::Negation(child) => {
                    stack.push(Step::Exit(subformula));
                    stack.push(Step::Enter(child));
                }

                Term::Implication(antecedent, consequent) => {
                    stack.push(Step::Exit(subformula));
                    stack.push(Step::Enter(consequent));
                    stack.push(Step::Enter(antecedent));
                }
            },

            Step::Exit(subformula) => {
                let rebuilt = match subformula.term() {
                    Term::Constant(_) | Term::Variable(_) => subformula.clone(),

                    Term::Negation(child) => {
                        let reduced_child = reduced.pop().ok_or(ReductionError::Unbalanced)?;
                        match reduced_child.same_term(child) {
                            true => subformula.clone(),
                            false => Formula::negation(reduced_child),
                        }
                    }

                    Term::Implication(antecedent, consequent) => {
                        let reduced_consequent = reduced.pop().ok_or(ReductionError::Unbalanced)?;
                        let reduced_antecedent = reduced.pop().ok_or(ReductionError::Unbalanced)?;
                        match reduced_antecedent.same_term(antecedent)
                            && reduced_consequent.same_term(consequent)
                        {
                            true => subformula.clone(),
                            false => Formula::implication(reduced_antecedent, reduced_consequent),
                        }
                    }
                };

                match repository.find_canonical_formula(&rebuilt) {
                    Some(canonical) => {
                        replacements += 1;
                        reduced.push(canonical);
                    }
                    None => reduced.push(rebuilt),
                }
            }
        }
    }

    match (reduced.pop(), reduced.is_empty()) {
        (Some(formula), true) => Ok((formula, replacements)),
        _ => Err(ReductionError::Unbalanced),
    }
}
