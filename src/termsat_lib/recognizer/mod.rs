//! A trie of formulas, keyed by encoding, for recognising rule patterns.
//!
//! Formulas are added with [add_formula](InstanceRecognizer::add_formula), and looked up in one of two ways:
//!
//! - [find](InstanceRecognizer::find) looks for a formula with exactly the encoding of the candidate.
//!   The node found also gives, through its ancestors, each strict prefix of the encoding.
//! - [find_instance](InstanceRecognizer::find_instance) looks for a pattern of which the candidate is a substitution instance.
//!   That is, a pattern whose variables may each be replaced by some formula, consistently, to obtain the candidate.
//!
//! # Instance search
//!
//! The search walks the trie, keeping a stack of subterms of the candidate still to be matched.
//! Connective and constant symbols must agree with the subterm on top of the stack, which is replaced by its operands.
//! The digits of a variable leave the stack as it is, and the delimiter of a variable binds the variable to the whole subterm on top of the stack (or checks an existing binding), taking the subterm from the stack.
//! A pattern is found when the key of a node with a value leaves nothing to be matched.
//!
//! Each visit saves enough to undo its step, and each leave undoes the step, so sibling branches start from the state of their parent.
//! Apart from comparing repeated bindings, the work of a search depends on the patterns and not on the size of the candidate.
//! As children are ordered by symbol, the first pattern found is the least matching pattern by encoding.
//! Connectives are tried before variables, but variables are tried before the constants `F` and `T`, as digits precede letters.
//!
//! ```rust
//! # use termsat_lib::recognizer::InstanceRecognizer;
//! # use termsat_lib::structures::formula::Formula;
//! let mut recognizer = InstanceRecognizer::default();
//! recognizer.add_formula("*1.1.".parse().unwrap()).unwrap();
//!
//! let candidate: Formula = "*-2.-2.".parse().unwrap();
//! assert!(recognizer.find(&candidate).is_none());
//!
//! let found = recognizer.find_instance(&candidate).unwrap();
//! assert_eq!(found.pattern.encoding(), "*1.1.");
//! assert_eq!(found.bindings, vec![(1, "-2.".parse().unwrap())]);
//! ```

use crate::{
    generic::trie::{NodeRef, Trie, Visitor},
    structures::formula::{encoding::symbol, Formula, Term, VariableId},
    types::err::TrieError,
};

#[derive(Default)]
pub struct InstanceRecognizer {
    trie: Trie<Formula>,
}

/// A pattern, together with bindings which instantiate the pattern to some candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub pattern: Formula,
    pub bindings: Vec<(VariableId, Formula)>,
}

impl Match {
    /// Applies the bindings of the match to `formula`.
    pub fn instantiate(&self, formula: &Formula) -> Formula {
        formula.substitute(&self.bindings)
    }
}

impl InstanceRecognizer {
    /// A recognizer around an existing trie, e.g. one rebuilt from a compiled index.
    ///
    /// The key of each value in the trie is expected to be the encoding of the value.
    pub fn from_trie(trie: Trie<Formula>) -> Self {
        InstanceRecognizer { trie }
    }

    /// Adds a formula, returning the formula previously stored under the same encoding, if any.
    pub fn add_formula(&mut self, formula: Formula) -> Result<Option<Formula>, TrieError> {
        let key = formula.encoding();
        self.trie.put(&key, formula)
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn trie(&self) -> &Trie<Formula> {
        &self.trie
    }

    pub fn accept(&self, visitor: &mut impl Visitor<Formula>) {
        self.trie.accept(visitor)
    }

    /// The node of the formula with the same encoding as `formula`, if there is one.
    ///
    /// Only as much of the encoding of `formula` as is found in the trie is generated.
    pub fn find(&self, formula: &Formula) -> Option<NodeRef<'_, Formula>> {
        let node = self.trie.node_by_symbols(formula.symbols())?;
        node.value()?;
        Some(node)
    }

    /// The first pattern, in order of encoding, of which `formula` is an instance.
    pub fn find_instance(&self, formula: &Formula) -> Option<Match> {
        let mut search = InstanceSearch {
            pending: vec![formula],
            frames: Vec::new(),
            bindings: Vec::new(),
            found: None,
        };
        self.trie.accept(&mut search);

        if let Some(found) = &search.found {
            log::trace!(target: crate::log::targets::RECOGNIZER, "Instance of {}", found.pattern);
        }
        search.found
    }
}

/// How to undo a step of an instance search.
struct Frame<'f> {
    /// The length of the pending stack before the step.
    pending: usize,

    /// The subterm taken from the pending stack by the step, if any.
    taken: Option<&'f Formula>,

    /// The count of bindings before the step.
    bindings: usize,
}

struct InstanceSearch<'f> {
    /// Subterms still to be matched, the next on top.
    pending: Vec<&'f Formula>,
    frames: Vec<Frame<'f>>,
    bindings: Vec<(VariableId, Formula)>,
    found: Option<Match>,
}

impl<'f> InstanceSearch<'f> {
    /// Matches `next` against the pending subterms, with `key` ending in `next`.
    fn step(&mut self, key: &str, next: char) -> bool {
        let Some(&subterm) = self.pending.last() else {
            return false;
        };

        // digits wait for the delimiter
        if next.is_ascii_digit() {
            return true;
        }

        self.pending.pop();
        if let Some(frame) = self.frames.last_mut() {
            frame.taken = Some(subterm);
        }

        match (next, subterm.term()) {
            (symbol::TRUE, Term::Constant(true)) => true,
            (symbol::FALSE, Term::Constant(false)) => true,

            (symbol::NEGATION, Term::Negation(child)) => {
                self.pending.push(child);
                true
            }

            (symbol::IMPLICATION, Term::Implication(antecedent, consequent)) => {
                self.pending.push(consequent);
                self.pending.push(antecedent);
                true
            }

            (symbol::VARIABLE_END, _) => {
                let Some(id) = variable_ending(key) else {
                    return false;
                };
                match self.bindings.iter().find(|(bound, _)| *bound == id) {
                    Some((_, formula)) => formula == subterm,
                    None => {
                        self.bindings.push((id, subterm.clone()));
                        true
                    }
                }
            }

            _ => false,
        }
    }
}

/// The id of the variable whose delimiter ends `key`.
fn variable_ending(key: &str) -> Option<VariableId> {
    let stem = key.strip_suffix(symbol::VARIABLE_END)?;
    let digits_from = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[digits_from..].parse().ok()
}

impl Visitor<Formula> for InstanceSearch<'_> {
    fn visit(&mut self, key: &str, node: NodeRef<'_, Formula>) -> bool {
        self.frames.push(Frame {
            pending: self.pending.len(),
            taken: None,
            bindings: self.bindings.len(),
        });

        let Some(next) = node.symbol() else {
            return false;
        };
        if !self.step(key, next) {
            return false;
        }

        if let Some(pattern) = node.value() {
            if self.pending.is_empty() {
                self.found = Some(Match {
                    pattern: pattern.clone(),
                    bindings: self.bindings.clone(),
                });
                return false;
            }
        }
        true
    }

    fn leave(&mut self, _key: &str, _node: NodeRef<'_, Formula>) {
        if let Some(frame) = self.frames.pop() {
            if let Some(taken) = frame.taken {
                self.pending.truncate(frame.pending - 1);
                self.pending.push(taken);
            }
            self.bindings.truncate(frame.bindings);
        }
    }

    fn is_complete(&self) -> bool {
        self.found.is_some()
    }
}
