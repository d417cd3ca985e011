//! A repository rebuilt from a compiled index.
//!
//! The trie is rebuilt in a single forward pass over the non-canonical relation, in order of id.
//! As parents precede their children, the node of each parent is always at hand when a child is read.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use rusqlite::{Connection, OpenFlags};

use crate::{
    config::Matching,
    generic::trie::{NodeKey, Trie},
    indexer::tables,
    recognizer::InstanceRecognizer,
    rules::{find_replacement, RuleRepository, RuleSource},
    structures::formula::Formula,
    types::err::{ErrorKind, IndexError, TrieError},
};

pub struct IndexedRepository {
    recognizer: InstanceRecognizer,

    /// Canonical formulas, keyed by encoding.
    canonical: BTreeMap<String, Formula>,

    /// The canonical formula of the rule at each node with a rule.
    replacements: HashMap<NodeKey, Formula>,

    matching: Matching,
}

impl IndexedRepository {
    pub fn open(path: impl AsRef<Path>, matching: Matching) -> Result<Self, ErrorKind> {
        let connection = Connection::open_with_flags(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Self::from_connection(&connection, matching)
    }

    pub fn from_connection(connection: &Connection, matching: Matching) -> Result<Self, ErrorKind> {
        let mut canonical_ids: HashMap<i64, Formula> = HashMap::default();
        let mut canonical: BTreeMap<String, Formula> = BTreeMap::default();

        let mut select = connection.prepare(tables::SELECT_CANONICAL)?;
        let rows = select.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (id, encoding) = row?;
            let formula: Formula = encoding.parse()?;
            canonical_ids.insert(id, formula.clone());
            canonical.insert(encoding, formula);
        }

        let mut trie: Trie<Formula> = Trie::default();
        let mut nodes: HashMap<i64, NodeKey> = HashMap::default();
        let mut replacements: HashMap<NodeKey, Formula> = HashMap::default();

        let mut select = connection.prepare(tables::SELECT_NONCANONICAL)?;
        let rows = select.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        for row in rows {
            let (id, symbol, parent, canonical_id) = row?;

            let mut symbols = symbol.chars();
            let (Some(symbol), None) = (symbols.next(), symbols.next()) else {
                return Err(IndexError::Symbol(id).into());
            };

            let parent_key = match parent {
                tables::NONE => trie.root().key(),
                _ => match nodes.get(&parent) {
                    Some(key) => *key,
                    None => return Err(IndexError::Orphan { id, parent }.into()),
                },
            };

            let key = trie.insert_child(parent_key, symbol)?;
            nodes.insert(id, key);

            if canonical_id != tables::NONE {
                let Some(replacement) = canonical_ids.get(&canonical_id) else {
                    return Err(IndexError::UnknownCanonicalId {
                        id,
                        canonical: canonical_id,
                    }
                    .into());
                };
                let Some(encoding) = trie.key_of(key) else {
                    return Err(TrieError::UnknownNode.into());
                };
                let pattern: Formula = encoding.parse()?;
                trie.set_value(key, pattern)?;
                replacements.insert(key, replacement.clone());
            }
        }

        log::info!(target: crate::log::targets::REPOSITORY,
            "Rebuilt {} rules over {} nodes, with {} canonical formulas, matching {matching}",
            replacements.len(), nodes.len(), canonical.len());

        Ok(IndexedRepository {
            recognizer: InstanceRecognizer::from_trie(trie),
            canonical,
            replacements,
            matching,
        })
    }

    pub fn recognizer(&self) -> &InstanceRecognizer {
        &self.recognizer
    }

    pub fn matching(&self) -> Matching {
        self.matching
    }
}

impl RuleSource for IndexedRepository {
    fn canonical_formulas_in_lexical_order(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        Box::new(self.canonical.values().cloned())
    }

    fn non_canonical_formulas(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        Box::new(self.recognizer.trie().values().into_iter().cloned())
    }

    fn canonical_of(&self, non_canonical: &Formula) -> Option<Formula> {
        let node = self.recognizer.find(non_canonical)?;
        self.replacements.get(&node.key()).cloned()
    }
}

impl RuleRepository for IndexedRepository {
    fn find_canonical_formula(&self, candidate: &Formula) -> Option<Formula> {
        find_replacement(&self.recognizer, self.matching, candidate, |n| {
            self.canonical_of(n)
        })
    }
}
