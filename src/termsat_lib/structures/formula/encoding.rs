//! The linear encoding of a formula.
//!
//! Formulas are written in Polish notation:
//!
//! ```text
//! formula  := 'T' | 'F' | variable | '-' formula | '*' formula formula
//! variable := [1-9][0-9]* '.'
//! ```
//!
//! An implication is written as `*`, then the antecedent, then the consequent.
//! For example, `*-1.2.` is ¬p₁ → p₂.
//!
//! Each encoding is a complete token tree, so no encoding is a strict prefix of another and distinct formulas have distinct encodings.
//! [FromStr] accepts exactly the strings produced by [Formula::encoding].

use std::{fmt::Write, str::FromStr};

use crate::{
    structures::formula::{Formula, Term, VariableId},
    types::err::ParseError,
};

/// Symbols of the encoding.
pub mod symbol {
    pub const TRUE: char = 'T';
    pub const FALSE: char = 'F';
    pub const NEGATION: char = '-';
    pub const IMPLICATION: char = '*';
    pub const VARIABLE_END: char = '.';
}

impl Formula {
    pub fn encoding(&self) -> String {
        let mut out = String::with_capacity(self.length() * 2);
        self.write_encoding(&mut out);
        out
    }

    /// Appends the encoding of the formula to `out`.
    pub fn write_encoding(&self, out: &mut String) {
        out.extend(self.symbols());
    }

    /// The symbols of the encoding, produced as needed.
    ///
    /// Useful for walking a trie, as a walk which fails early only encodes a prefix of the formula.
    pub fn symbols(&self) -> Symbols<'_> {
        Symbols {
            stack: vec![self],
            digits: Vec::new(),
        }
    }
}

/// An iterator over the symbols of an encoding, see [Formula::symbols].
pub struct Symbols<'f> {
    stack: Vec<&'f Formula>,

    /// The remaining symbols of a variable, in reverse.
    digits: Vec<char>,
}

impl Iterator for Symbols<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if let Some(digit) = self.digits.pop() {
            return Some(digit);
        }

        let formula = self.stack.pop()?;
        match formula.term() {
            Term::Constant(true) => Some(symbol::TRUE),
            Term::Constant(false) => Some(symbol::FALSE),

            Term::Variable(id) => {
                let mut text = String::with_capacity(8);
                let _ = write!(text, "{id}{}", symbol::VARIABLE_END);
                self.digits.extend(text.chars().rev());
                self.digits.pop()
            }

            Term::Negation(child) => {
                self.stack.push(child);
                Some(symbol::NEGATION)
            }

            Term::Implication(antecedent, consequent) => {
                self.stack.push(consequent);
                self.stack.push(antecedent);
                Some(symbol::IMPLICATION)
            }
        }
    }
}

enum Pending {
    Negation,
    Antecedent,
    Consequent(Formula),
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let bytes = text.as_bytes();
        let mut pending: Vec<Pending> = Vec::new();
        let mut position = 0;

        loop {
            let Some(&byte) = bytes.get(position) else {
                return Err(ParseError::UnexpectedEnd);
            };

            let mut complete = match byte {
                b'T' => {
                    position += 1;
                    Formula::constant(true)
                }

                b'F' => {
                    position += 1;
                    Formula::constant(false)
                }

                b'-' => {
                    position += 1;
                    pending.push(Pending::Negation);
                    continue;
                }

                b'*' => {
                    position += 1;
                    pending.push(Pending::Antecedent);
                    continue;
                }

                b'1'..=b'9' => {
                    let start = position;
                    while bytes.get(position).is_some_and(|b| b.is_ascii_digit()) {
                        position += 1;
                    }
                    match bytes.get(position) {
                        None => return Err(ParseError::UnexpectedEnd),
                        Some(b'.') => {}
                        Some(_) => return Err(unexpected(text, position)),
                    }
                    let id: VariableId = match text[start..position].parse() {
                        Ok(id) => id,
                        Err(_) => return Err(ParseError::Variable(start)),
                    };
                    position += 1;
                    Formula::variable(id).map_err(|_| ParseError::Variable(start))?
                }

                b'0' => return Err(ParseError::Variable(position)),

                _ => return Err(unexpected(text, position)),
            };

            loop {
                match pending.pop() {
                    None => {
                        if position < bytes.len() {
                            return Err(ParseError::TrailingSymbols(position));
                        }
                        return Ok(complete);
                    }

                    Some(Pending::Negation) => complete = Formula::negation(complete),

                    Some(Pending::Antecedent) => {
                        pending.push(Pending::Consequent(complete));
                        break;
                    }

                    Some(Pending::Consequent(antecedent)) => {
                        complete = Formula::implication(antecedent, complete)
                    }
                }
            }
        }
    }
}

fn unexpected(text: &str, position: usize) -> ParseError {
    let symbol = text
        .get(position..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    ParseError::UnexpectedSymbol(position, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::formula::tests::{arb_formula, var};
    use proptest::prelude::*;

    #[test]
    fn encodings() {
        assert_eq!(Formula::constant(true).encoding(), "T");
        assert_eq!(Formula::constant(false).encoding(), "F");
        assert_eq!(var(12).encoding(), "12.");
        assert_eq!(Formula::negation(var(1)).encoding(), "-1.");
        assert_eq!(
            Formula::implication(Formula::negation(var(1)), var(2)).encoding(),
            "*-1.2."
        );
        assert_eq!(
            Formula::implication(Formula::implication(var(1), var(2)), var(3)).encoding(),
            "**1.2.3."
        );
    }

    #[test]
    fn variable_ids_are_delimited() {
        // 1 followed by 12 against 11 followed by 2
        let a = Formula::implication(var(1), var(12));
        let b = Formula::implication(var(11), var(2));
        assert_ne!(a.encoding(), b.encoding());
    }

    #[test]
    fn decoding() {
        assert_eq!(
            "*-1.2.".parse::<Formula>(),
            Ok(Formula::disjunction(var(1), var(2)))
        );
        assert_eq!("--T".parse::<Formula>(), Ok(Formula::negation(Formula::negation(Formula::constant(true)))));
        assert_eq!("307.".parse::<Formula>(), Ok(var(307)));
    }

    #[test]
    fn rejections() {
        assert_eq!("".parse::<Formula>(), Err(ParseError::UnexpectedEnd));
        assert_eq!("*1.".parse::<Formula>(), Err(ParseError::UnexpectedEnd));
        assert_eq!("12".parse::<Formula>(), Err(ParseError::UnexpectedEnd));
        assert_eq!("01.".parse::<Formula>(), Err(ParseError::Variable(0)));
        assert_eq!("-0.".parse::<Formula>(), Err(ParseError::Variable(1)));
        assert_eq!("1.2.".parse::<Formula>(), Err(ParseError::TrailingSymbols(2)));
        assert_eq!("*1.x".parse::<Formula>(), Err(ParseError::UnexpectedSymbol(3, 'x')));
        assert_eq!("1-".parse::<Formula>(), Err(ParseError::UnexpectedSymbol(1, '-')));
        assert_eq!(
            "99999999999.".parse::<Formula>(),
            Err(ParseError::Variable(0))
        );
    }

    #[test]
    fn symbols_stop_early() {
        let formula = Formula::implication(var(1), Formula::negation(var(23)));
        let mut symbols = formula.symbols();
        assert_eq!(symbols.next(), Some('*'));
        assert_eq!(symbols.next(), Some('1'));
        assert_eq!(symbols.collect::<String>(), ".-23.");
    }

    proptest! {
        #[test]
        fn encoding_is_injective(a in arb_formula(), b in arb_formula()) {
            prop_assert_eq!(a == b, a.encoding() == b.encoding());
        }

        #[test]
        fn decoding_inverts_encoding(formula in arb_formula()) {
            prop_assert_eq!(formula.encoding().parse::<Formula>(), Ok(formula));
        }

        #[test]
        fn no_encoding_is_a_strict_prefix(a in arb_formula(), b in arb_formula()) {
            let (a, b) = (a.encoding(), b.encoding());
            prop_assert!(a == b || !b.starts_with(&a));
        }
    }
}
