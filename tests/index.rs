#![allow(unused_imports)]

mod common;

use common::*;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use termsat_lib::{
    config::Matching,
    indexer::{tables, IndexSummary, RuleIndexer},
    rules::{indexed::IndexedRepository, memory::MemoryRepository, RuleRepository, RuleSource},
    structures::formula::Formula,
};

fn index_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("basic.db")
}

fn compile(dir: &tempfile::TempDir) -> (PathBuf, IndexSummary) {
    let path = index_path(dir);
    let summary = RuleIndexer::index_to_path(&basic_rules(), &path).expect("indexing failed");
    (path, summary)
}

/// Candidates for lookups: every pattern, every canonical formula, and each pattern with its variables renamed and substituted.
fn candidates(rules: &impl RuleSource) -> Vec<Formula> {
    let mut candidates = rules.non_canonical_formulas().collect::<Vec<_>>();
    candidates.extend(rules.canonical_formulas_in_lexical_order());

    let renamed = [
        (1, "3.".parse::<Formula>().unwrap()),
        (2, "-*1.4.".parse::<Formula>().unwrap()),
    ];
    let substituted = rules
        .non_canonical_formulas()
        .map(|pattern| pattern.substitute(&renamed))
        .collect::<Vec<_>>();
    candidates.extend(substituted);
    candidates
}

/// A source whose only rule names a canonical formula the source does not list.
struct MissingCanonical;

impl RuleSource for MissingCanonical {
    fn canonical_formulas_in_lexical_order(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        Box::new(std::iter::empty())
    }

    fn non_canonical_formulas(&self) -> Box<dyn Iterator<Item = Formula> + '_> {
        Box::new(std::iter::once("-T".parse::<Formula>().unwrap()))
    }

    fn canonical_of(&self, _: &Formula) -> Option<Formula> {
        Some(Formula::constant(false))
    }
}

mod publication {
    use super::*;
    use termsat_lib::types::err::{ErrorKind, IndexError};

    #[test]
    fn summary() {
        let dir = tempfile::tempdir().unwrap();
        let (path, summary) = compile(&dir);
        let rules = basic_rules();

        assert!(path.exists());
        assert_eq!(summary.rules, rules.len());
        assert_eq!(summary.canonical, rules.canonical_count());
        assert!(summary.nodes >= summary.rules);
    }

    #[test]
    fn no_partial_file_remains() {
        let dir = tempfile::tempdir().unwrap();
        compile(&dir);

        let names = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["basic.db".to_string()]);
    }

    #[test]
    fn failure_keeps_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = compile(&dir);
        let before = std::fs::read(&path).unwrap();

        assert_eq!(
            RuleIndexer::index_to_path(&MissingCanonical, &path),
            Err(ErrorKind::Index(IndexError::MissingCanonical("F".to_string())))
        );
        assert_eq!(std::fs::read(&path).unwrap(), before);

        let names = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["basic.db".to_string()]);

        let repository = IndexedRepository::open(&path, Matching::Exact).unwrap();
        assert_eq!(
            repository.non_canonical_formulas().count(),
            basic_rules().len()
        );
    }

    #[test]
    fn failure_without_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = index_path(&dir);

        assert!(RuleIndexer::index_to_path(&MissingCanonical, &path).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn existing_index_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let (path, first) = compile(&dir);
        let (_, second) = compile(&dir);
        assert_eq!(first, second);

        let repository = IndexedRepository::open(&path, Matching::Exact).unwrap();
        assert_eq!(
            repository.non_canonical_formulas().count(),
            basic_rules().len()
        );
    }

    #[test]
    fn parents_precede_children() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = compile(&dir);
        let connection = Connection::open(path).unwrap();

        let mut select = connection.prepare(tables::SELECT_NONCANONICAL).unwrap();
        let rows = select
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(2)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(!rows.is_empty());
        for (id, parent) in rows {
            assert!(id > 0);
            assert!(parent == tables::NONE || (0 < parent && parent < id));
        }
    }

    #[test]
    fn canonical_ids_are_negative() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = compile(&dir);
        let connection = Connection::open(path).unwrap();

        let mut select = connection.prepare(tables::SELECT_CANONICAL).unwrap();
        let ids = select
            .query_map([], |row| row.get::<_, i64>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(ids.len(), basic_rules().canonical_count());
        assert!(ids.iter().all(|id| *id < 0));
    }
}

mod equivalence {
    use super::*;

    #[test]
    fn lookups_agree() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = compile(&dir);

        for matching in [Matching::Exact, Matching::Instance] {
            let memory = memory_repository(matching);
            let indexed = IndexedRepository::open(&path, matching).unwrap();

            for candidate in candidates(memory.rules()) {
                assert_eq!(
                    memory.find_canonical_formula(&candidate),
                    indexed.find_canonical_formula(&candidate),
                    "{candidate} with {matching} matching"
                );
            }
        }
    }

    #[test]
    fn folds_agree() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = compile(&dir);

        for collection in ["unsat", "sat", "valid"] {
            for cnf in cnf_files(collection) {
                for matching in [Matching::Exact, Matching::Instance] {
                    let from_memory = fold_file(&cnf, matching, memory_repository(matching));
                    let indexed = IndexedRepository::open(&path, matching).unwrap();
                    let from_index = fold_file(&cnf, matching, indexed);

                    assert_eq!(from_memory.formula(), from_index.formula(), "{}", cnf.display());
                    assert_eq!(from_memory.report(), from_index.report());
                }
            }
        }
    }

    #[test]
    fn sources_agree() {
        let dir = tempfile::tempdir().unwrap();
        let (path, _) = compile(&dir);

        let rules = basic_rules();
        let indexed = IndexedRepository::open(&path, Matching::Instance).unwrap();

        let from_rules = rules.canonical_formulas_in_lexical_order().collect::<Vec<_>>();
        let from_index = indexed.canonical_formulas_in_lexical_order().collect::<Vec<_>>();
        assert_eq!(from_rules, from_index);

        for pattern in rules.non_canonical_formulas() {
            assert_eq!(rules.canonical_of(&pattern), indexed.canonical_of(&pattern));
        }
    }
}
