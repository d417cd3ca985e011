//! Rules, and repositories of rules.
//!
//! A rule pairs a *non-canonical* formula (the pattern) with an equivalent *canonical* formula (the replacement).
//!
//! - A [RuleSource] enumerates canonical and non-canonical formulas, and relates each non-canonical formula to its canonical formula.
//!   Sources are read by the [indexer](crate::indexer).
//! - A [RuleRepository] is a source which also answers, for an arbitrary candidate, what the candidate should be replaced with.
//!   Repositories are read by [reduce](crate::procedures::reduce).
//!
//! There are two repositories:
//!
//! - [MemoryRepository](memory::MemoryRepository), built from a [RuleSet](set::RuleSet) read from a rule file.
//! - [IndexedRepository](indexed::IndexedRepository), rebuilt from a compiled index.
//!
//! Given the same rules and the same [Matching], the two answer every lookup in the same way.

pub mod indexed;
pub mod memory;
pub mod set;

use crate::{config::Matching, recognizer::InstanceRecognizer, structures::formula::Formula};

pub trait RuleSource {
    /// Every canonical formula, ordered byte-wise by encoding.
    fn canonical_formulas_in_lexical_order(&self) -> Box<dyn Iterator<Item = Formula> + '_>;

    /// Every non-canonical formula.
    fn non_canonical_formulas(&self) -> Box<dyn Iterator<Item = Formula> + '_>;

    /// The canonical formula of a non-canonical formula, matched exactly.
    fn canonical_of(&self, non_canonical: &Formula) -> Option<Formula>;
}

pub trait RuleRepository: RuleSource {
    /// The replacement for `candidate`, if some rule applies to the candidate.
    ///
    /// A miss is not an error, and instead means the candidate is reduced with respect to the repository.
    fn find_canonical_formula(&self, candidate: &Formula) -> Option<Formula>;
}

impl<S: RuleSource + ?Sized> RuleSource for &S {
    fn canonical_formulas_in_lexical_order(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        (**self).canonical_formulas_in_lexical_order()
    }

    fn non_canonical_formulas(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        (**self).non_canonical_formulas()
    }

    fn canonical_of(&self, non_canonical: &Formula) -> Option<Formula> {
        (**self).canonical_of(non_canonical)
    }
}

/// A repository may be shared between contexts by reference.
impl<R: RuleRepository + ?Sized> RuleRepository for &R {
    fn find_canonical_formula(&self, candidate: &Formula) -> Option<Formula> {
        (**self).find_canonical_formula(candidate)
    }
}

/// Looks up the replacement for `candidate` in a recognizer of non-canonical formulas.
fn find_replacement(
    recognizer: &InstanceRecognizer,
    matching: Matching,
    candidate: &Formula,
    canonical_of: impl Fn(&Formula) -> Option<Formula>,
) -> Option<Formula> {
    match matching {
        Matching::Exact => {
            let node = recognizer.find(candidate)?;
            canonical_of(node.value()?)
        }

        Matching::Instance => {
            let found = recognizer.find_instance(candidate)?;
            let canonical = canonical_of(&found.pattern)?;
            Some(found.instantiate(&canonical))
        }
    }
}
