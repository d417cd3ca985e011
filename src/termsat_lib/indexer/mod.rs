//! Compiles a rule source into an index, held as two relations of a SQLite database.
//!
//! # Ids
//!
//! - Canonical formulas are given ids -1, -2, …, in byte-wise order of encoding (see [CanonicalIds]).
//! - Every node of a trie of the non-canonical formulas is given an id 1, 2, …, in pre-order.
//!   So, a parent always has a smaller id than any of its descendants.
//!
//! Canonical and non-canonical ids are distinguished by sign.
//!
//! # Failure
//!
//! Compilation is all or nothing.
//! Everything is written within a single transaction, and [index_to_path](RuleIndexer::index_to_path) writes to a `.partial` sibling of the output, which is renamed onto the output only after the transaction commits.
//!
//! The layout of the relations is given in [tables].

pub mod tables;

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use rusqlite::{params, Connection, Statement};

use crate::{
    generic::trie::{NodeKey, NodeRef, Visitor},
    recognizer::InstanceRecognizer,
    rules::RuleSource,
    structures::formula::Formula,
    types::err::{ErrorKind, IndexError, TrieError},
};

/// Ids of canonical formulas, keyed by encoding.
#[derive(Debug, Default)]
pub struct CanonicalIds {
    ids: BTreeMap<String, i64>,
}

impl CanonicalIds {
    /// Ids for the given encodings, assigned from -1 downwards in byte-wise order.
    ///
    /// The order encodings are given in is irrelevant, and duplicates share an id.
    pub fn assign<S: AsRef<str>>(encodings: impl IntoIterator<Item = S>) -> Self {
        let mut ids: BTreeMap<String, i64> = encodings
            .into_iter()
            .map(|encoding| (encoding.as_ref().to_owned(), tables::NONE))
            .collect();

        for (next, id) in (1..).zip(ids.values_mut()) {
            *id = -next;
        }

        CanonicalIds { ids }
    }

    pub fn get(&self, encoding: &str) -> Option<i64> {
        self.ids.get(encoding).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Pairs of encoding and id, from -1 downwards.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.ids.iter().map(|(encoding, id)| (encoding.as_str(), *id))
    }
}

/// Counts from a compilation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub canonical: usize,
    pub nodes: usize,
    pub rules: usize,
}

pub struct RuleIndexer;

impl RuleIndexer {
    /// Compiles `source` into a new database at `path`, replacing any existing file only on success.
    pub fn index_to_path(
        source: &(impl RuleSource + ?Sized),
        path: impl AsRef<Path>,
    ) -> Result<IndexSummary, ErrorKind> {
        let path = path.as_ref();
        let partial = partial_path(path);

        if partial.exists() {
            std::fs::remove_file(&partial).map_err(io_error)?;
        }

        let mut connection = Connection::open(&partial)?;
        let summary = match Self::index_into(source, &mut connection) {
            Ok(summary) => summary,
            Err(e) => {
                drop(connection);
                let _ = std::fs::remove_file(&partial);
                log::error!(target: crate::log::targets::INDEXER, "Indexing abandoned: {e}");
                return Err(e);
            }
        };

        if let Err((_, e)) = connection.close() {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, path).map_err(io_error)?;

        log::info!(target: crate::log::targets::INDEXER, "Published index at {}", path.display());
        Ok(summary)
    }

    /// Compiles `source` into the relations of `connection`, within a single transaction.
    ///
    /// The relations must not already exist.
    pub fn index_into(
        source: &(impl RuleSource + ?Sized),
        connection: &mut Connection,
    ) -> Result<IndexSummary, ErrorKind> {
        let mut recognizer = InstanceRecognizer::default();
        for non_canonical in source.non_canonical_formulas() {
            recognizer.add_formula(non_canonical)?;
        }
        log::info!(target: crate::log::targets::INDEXER, "Loaded {} non-canonical formulas", recognizer.len());

        let canonical_ids =
            CanonicalIds::assign(source.canonical_formulas_in_lexical_order().map(|c| c.encoding()));

        let transaction = connection.transaction()?;
        tables::create(&transaction)?;

        {
            let mut insert = transaction.prepare(tables::INSERT_CANONICAL)?;
            for (encoding, id) in canonical_ids.iter() {
                insert.execute(params![id, encoding])?;
            }
        }
        log::info!(target: crate::log::targets::INDEXER, "Wrote {} canonical formulas", canonical_ids.len());

        let (nodes, rules) = {
            let mut writer = NodeWriter {
                source,
                canonical_ids: &canonical_ids,
                insert: transaction.prepare(tables::INSERT_NONCANONICAL)?,
                ids: HashMap::default(),
                next_id: 1,
                rules: 0,
                error: None,
            };
            recognizer.accept(&mut writer);

            if let Some(e) = writer.error {
                return Err(e);
            }
            (writer.ids.len(), writer.rules)
        };
        log::info!(target: crate::log::targets::INDEXER, "Wrote {nodes} non-canonical nodes, with {rules} rules");

        transaction.commit()?;

        Ok(IndexSummary {
            canonical: canonical_ids.len(),
            nodes,
            rules,
        })
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    PathBuf::from(partial)
}

fn io_error(e: std::io::Error) -> ErrorKind {
    IndexError::Io(e.to_string()).into()
}

/// Writes a row for each visited node, stopping at the first error.
struct NodeWriter<'i, 't, S: RuleSource + ?Sized> {
    source: &'i S,
    canonical_ids: &'i CanonicalIds,
    insert: Statement<'t>,
    ids: HashMap<NodeKey, i64>,
    next_id: i64,
    rules: usize,
    error: Option<ErrorKind>,
}

impl<S: RuleSource + ?Sized> NodeWriter<'_, '_, S> {
    fn write(&mut self, key: &str, node: NodeRef<'_, Formula>) -> Result<(), ErrorKind> {
        let id = self.next_id;
        self.next_id += 1;

        let Some(symbol) = node.symbol() else {
            return Err(TrieError::UnknownNode.into());
        };

        let parent_id = match node.parent() {
            Some(parent) if !parent.is_root() => match self.ids.get(&parent.key()) {
                Some(parent_id) => *parent_id,
                None => return Err(IndexError::Orphan { id, parent: 0 }.into()),
            },
            _ => tables::NONE,
        };

        let canonical_id = match node.value() {
            None => tables::NONE,

            Some(pattern) => {
                if key.parse::<Formula>().as_ref() != Ok(pattern) {
                    return Err(IndexError::EncodingCollision(key.to_owned()).into());
                }

                let Some(canonical) = self.source.canonical_of(pattern) else {
                    return Err(IndexError::NoRule(key.to_owned()).into());
                };
                let encoding = canonical.encoding();
                let Some(canonical_id) = self.canonical_ids.get(&encoding) else {
                    return Err(IndexError::MissingCanonical(encoding).into());
                };

                self.rules += 1;
                canonical_id
            }
        };

        self.insert
            .execute(params![id, symbol.to_string(), parent_id, canonical_id])?;
        self.ids.insert(node.key(), id);
        Ok(())
    }
}

impl<S: RuleSource + ?Sized> Visitor<Formula> for NodeWriter<'_, '_, S> {
    fn visit(&mut self, key: &str, node: NodeRef<'_, Formula>) -> bool {
        match self.write(key, node) {
            Ok(()) => true,
            Err(e) => {
                self.error = Some(e);
                false
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.error.is_some()
    }
}
