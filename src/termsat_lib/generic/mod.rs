//! Generic structures, without reference to formulas or rules.

pub mod trie;
