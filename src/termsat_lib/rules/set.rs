//! A set of rules, as read from a rule file.
//!
//! # Rule files
//!
//! A rule file is line oriented:
//!
//! - Blank lines, and lines beginning with `c`, are skipped.
//! - A line with two encodings, `NONCANONICAL CANONICAL`, is a rule.
//! - A line with one encoding declares a canonical formula, with no rule.
//!
//! The canonical side of each rule is canonical, whether declared or not.
//!
//! ```text
//! c double negation
//! --1. 1.
//! *1.1. T
//! -T F
//! ```
//!
//! Rules are checked as they are added, with the checks noted in [RuleError].
//! Soundness is only checked on request, with [verify](RuleSet::verify).

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    config::defaults::VERIFY_VARIABLE_LIMIT,
    rules::RuleSource,
    structures::formula::{Formula, VariableId},
    types::err::{ErrorKind, ParseError, RuleError},
};

#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    /// Rules, keyed by the encoding of the non-canonical formula.
    rules: BTreeMap<String, (Formula, Formula)>,

    /// Canonical formulas, keyed by encoding.
    canonical: BTreeMap<String, Formula>,
}

impl RuleSet {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ErrorKind> {
        let file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(e) => return Err(ParseError::Io(e.to_string()).into()),
        };
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, ErrorKind> {
        let mut the_set = RuleSet::default();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Err(ParseError::Io(e.to_string()).into()),
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            let encodings = line.split_whitespace().collect::<Vec<_>>();
            let result = match encodings.as_slice() {
                [canonical] => {
                    let canonical = parse_encoding(canonical, line_number)?;
                    the_set.add_canonical(canonical)
                }

                [non_canonical, canonical] => {
                    let non_canonical = parse_encoding(non_canonical, line_number)?;
                    let canonical = parse_encoding(canonical, line_number)?;
                    the_set.add_rule(non_canonical, canonical)
                }

                _ => return Err(ParseError::RuleLine(line_number).into()),
            };

            if let Err(e) = result {
                return Err(ParseError::Rule(line_number, e).into());
            }
        }

        log::info!(target: crate::log::targets::PARSE,
            "Read {} rules and {} canonical formulas", the_set.len(), the_set.canonical.len());
        Ok(the_set)
    }

    /// Declares a canonical formula.
    pub fn add_canonical(&mut self, canonical: Formula) -> Result<(), RuleError> {
        let key = canonical.encoding();
        if self.rules.contains_key(&key) {
            return Err(RuleError::CanonicalPattern(key));
        }
        self.canonical.insert(key, canonical);
        Ok(())
    }

    /// Adds the rule `non_canonical` ⇒ `canonical`.
    ///
    /// Adding a rule a second time has no effect.
    pub fn add_rule(&mut self, non_canonical: Formula, canonical: Formula) -> Result<(), RuleError> {
        let key = non_canonical.encoding();

        if non_canonical == canonical {
            return Err(RuleError::Trivial(key));
        }

        if self.canonical.contains_key(&key) {
            return Err(RuleError::CanonicalPattern(key));
        }

        let canonical_key = canonical.encoding();
        if self.rules.contains_key(&canonical_key) {
            return Err(RuleError::CanonicalPattern(canonical_key));
        }

        let bound = non_canonical.variables();
        if let Some(unbound) = canonical.variables().difference(&bound).next() {
            return Err(RuleError::UnboundVariable(canonical_key, *unbound));
        }

        if let Some((_, existing)) = self.rules.get(&key) {
            return match existing == &canonical {
                true => Ok(()),
                false => Err(RuleError::Conflict(key)),
            };
        }

        self.canonical.insert(canonical_key, canonical.clone());
        self.rules.insert(key, (non_canonical, canonical));
        Ok(())
    }

    /// The count of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn canonical_count(&self) -> usize {
        self.canonical.len()
    }

    /// Rules, as pairs of non-canonical and canonical formulas, ordered by the encoding of the non-canonical formula.
    pub fn rules(&self) -> impl Iterator<Item = (&Formula, &Formula)> {
        self.rules.values().map(|(n, c)| (n, c))
    }

    /// Checks each rule is sound, by comparing both sides on every valuation of their variables.
    pub fn verify(&self) -> Result<(), RuleError> {
        for (non_canonical, canonical) in self.rules() {
            let mut variables = non_canonical.variables();
            variables.extend(canonical.variables());
            let variables: Vec<VariableId> = variables.into_iter().collect();

            if variables.len() > VERIFY_VARIABLE_LIMIT {
                return Err(RuleError::Unverifiable(non_canonical.encoding()));
            }

            for row in 0..(1_u64 << variables.len()) {
                let valuation = |id: VariableId| match variables.binary_search(&id) {
                    Ok(index) => row & (1 << index) != 0,
                    Err(_) => false,
                };
                if non_canonical.evaluate(&valuation) != canonical.evaluate(&valuation) {
                    log::error!(target: crate::log::targets::PARSE,
                        "{non_canonical} and {canonical} differ on row {row} of {variables:?}");
                    return Err(RuleError::Unsound(non_canonical.encoding()));
                }
            }
        }

        Ok(())
    }
}

fn parse_encoding(encoding: &str, line_number: usize) -> Result<Formula, ParseError> {
    match encoding.parse::<Formula>() {
        Ok(formula) => Ok(formula),
        Err(e) => {
            log::warn!(target: crate::log::targets::PARSE, "Line {line_number}: {e:?} in {encoding}");
            Err(ParseError::Line(line_number))
        }
    }
}

impl RuleSource for RuleSet {
    fn canonical_formulas_in_lexical_order(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        Box::new(self.canonical.values().cloned())
    }

    fn non_canonical_formulas(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        Box::new(self.rules.values().map(|(n, _)| n.clone()))
    }

    fn canonical_of(&self, non_canonical: &Formula) -> Option<Formula> {
        self.rules
            .get(&non_canonical.encoding())
            .map(|(_, c)| c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(encoding: &str) -> Formula {
        encoding.parse().unwrap()
    }

    #[test]
    fn reading() {
        let text = "c a comment\n\n--1. 1.\n  *1.1. T\n-T F\nT\n";
        let the_set = RuleSet::from_reader(text.as_bytes()).unwrap();

        assert_eq!(the_set.len(), 3);
        assert_eq!(the_set.canonical_count(), 3);
        assert_eq!(the_set.canonical_of(&f("--1.")), Some(f("1.")));
        assert_eq!(the_set.canonical_of(&f("-T")), Some(f("F")));
        assert_eq!(the_set.canonical_of(&f("1.")), None);
    }

    #[test]
    fn lexical_order() {
        let text = "-T F\n--1. 1.\n*1.1. T\n--2. 2.\n";
        let the_set = RuleSet::from_reader(text.as_bytes()).unwrap();

        let canonical = the_set
            .canonical_formulas_in_lexical_order()
            .map(|c| c.encoding())
            .collect::<Vec<_>>();
        assert_eq!(canonical, vec!["1.", "2.", "F", "T"]);

        let non_canonical = the_set
            .non_canonical_formulas()
            .map(|c| c.encoding())
            .collect::<Vec<_>>();
        assert_eq!(non_canonical, vec!["*1.1.", "--1.", "--2.", "-T"]);
    }

    #[test]
    fn line_errors() {
        let bad_encoding = RuleSet::from_reader("--1. 1.\n-1 1.\n".as_bytes());
        assert_eq!(bad_encoding.unwrap_err(), ErrorKind::Parse(ParseError::Line(2)));

        let three = RuleSet::from_reader("--1. 1. T\n".as_bytes());
        assert_eq!(three.unwrap_err(), ErrorKind::Parse(ParseError::RuleLine(1)));
    }

    #[test]
    fn rule_checks() {
        let mut the_set = RuleSet::default();
        assert_eq!(
            the_set.add_rule(f("1."), f("1.")),
            Err(RuleError::Trivial("1.".to_string()))
        );
        assert_eq!(
            the_set.add_rule(f("*1.T"), f("2.")),
            Err(RuleError::UnboundVariable("2.".to_string(), 2))
        );

        assert_eq!(the_set.add_rule(f("--1."), f("1.")), Ok(()));
        assert_eq!(the_set.add_rule(f("--1."), f("1.")), Ok(()));
        assert_eq!(
            the_set.add_rule(f("--1."), f("T")),
            Err(RuleError::Conflict("--1.".to_string()))
        );

        assert_eq!(
            the_set.add_canonical(f("--1.")),
            Err(RuleError::CanonicalPattern("--1.".to_string()))
        );
        assert_eq!(
            the_set.add_rule(f("1."), f("T")),
            Err(RuleError::CanonicalPattern("1.".to_string()))
        );
        assert_eq!(
            the_set.add_rule(f("---1."), f("--1.")),
            Err(RuleError::CanonicalPattern("--1.".to_string()))
        );
        assert_eq!(the_set.len(), 1);
    }

    #[test]
    fn rule_errors_carry_line() {
        let result = RuleSet::from_reader("--1. 1.\n1. T\n".as_bytes());
        assert_eq!(
            result.unwrap_err(),
            ErrorKind::Parse(ParseError::Rule(
                2,
                RuleError::CanonicalPattern("1.".to_string())
            ))
        );
    }

    #[test]
    fn verification() {
        let sound = "--1. 1.\n*1.1. T\n*-1.1. 1.\n*1.-1. -1.\n*F1. T\n*1.F -1.\n";
        assert_eq!(RuleSet::from_reader(sound.as_bytes()).unwrap().verify(), Ok(()));

        let unsound = RuleSet::from_reader("*1.2. *2.1.\n".as_bytes()).unwrap();
        assert_eq!(
            unsound.verify(),
            Err(RuleError::Unsound("*1.2.".to_string()))
        );
    }
}
