//! A repository held entirely in memory, built from a rule set.

use crate::{
    config::Matching,
    recognizer::InstanceRecognizer,
    rules::{find_replacement, set::RuleSet, RuleRepository, RuleSource},
    structures::formula::Formula,
    types::err::ErrorKind,
};

pub struct MemoryRepository {
    rules: RuleSet,
    recognizer: InstanceRecognizer,
    matching: Matching,
}

impl MemoryRepository {
    pub fn from_rule_set(rules: RuleSet, matching: Matching) -> Result<Self, ErrorKind> {
        let mut recognizer = InstanceRecognizer::default();
        for non_canonical in rules.non_canonical_formulas() {
            recognizer.add_formula(non_canonical)?;
        }

        log::info!(target: crate::log::targets::REPOSITORY,
            "Loaded {} rules into memory, matching {matching}", recognizer.len());

        Ok(MemoryRepository {
            rules,
            recognizer,
            matching,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn recognizer(&self) -> &InstanceRecognizer {
        &self.recognizer
    }

    pub fn matching(&self) -> Matching {
        self.matching
    }
}

impl RuleSource for MemoryRepository {
    fn canonical_formulas_in_lexical_order(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        self.rules.canonical_formulas_in_lexical_order()
    }

    fn non_canonical_formulas(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        self.rules.non_canonical_formulas()
    }

    fn canonical_of(&self, non_canonical: &Formula) -> Option<Formula> {
        self.rules.canonical_of(non_canonical)
    }
}

impl RuleRepository for MemoryRepository {
    fn find_canonical_formula(&self, candidate: &Formula) -> Option<Formula> {
        find_replacement(&self.recognizer, self.matching, candidate, |n| {
            self.rules.canonical_of(n)
        })
    }
}
