#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use rand::Rng;

use termsat_lib::{
    config::{Config, Matching},
    context::Context,
    rules::{memory::MemoryRepository, set::RuleSet, RuleRepository},
};

pub fn cnf_path() -> PathBuf {
    Path::new(".").join("tests").join("cnf")
}

pub fn rules_path() -> PathBuf {
    Path::new(".").join("tests").join("rules").join("basic.rules")
}

/// Every `.cnf` file of a collection under `tests/cnf`, in name order.
pub fn cnf_files(collection: &str) -> Vec<PathBuf> {
    let collection_dir = fs::read_dir(cnf_path().join(collection))
        .unwrap_or_else(|_| panic!("{collection} missing"));

    let mut paths = collection_dir
        .map(|entry| entry.expect("unreadable entry").path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "cnf"))
        .collect::<Vec<_>>();
    paths.sort();
    assert!(!paths.is_empty(), "{collection} is empty");
    paths
}

pub fn basic_rules() -> RuleSet {
    RuleSet::from_path(rules_path()).expect("basic rules unreadable")
}

pub fn memory_repository(matching: Matching) -> MemoryRepository {
    MemoryRepository::from_rule_set(basic_rules(), matching).expect("basic rules rejected")
}

pub fn config(matching: Matching) -> Config {
    let mut the_config = Config::default();
    the_config.matching = matching;
    the_config
}

pub fn fold_file<R: RuleRepository>(path: &Path, matching: Matching, repository: R) -> Context<R> {
    let mut the_context = Context::from_config(config(matching), repository);
    let file = File::open(path).unwrap_or_else(|_| panic!("{} missing", path.display()));
    the_context
        .read_dimacs(BufReader::new(file))
        .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    the_context
}

/// Clauses of DIMACS literals over variables `1..=variables`, each of `1..=width` literals.
pub fn random_clauses(
    rng: &mut impl Rng,
    variables: i32,
    clauses: usize,
    width: usize,
) -> Vec<Vec<i32>> {
    (0..clauses)
        .map(|_| {
            let clause_width = rng.gen_range(1..=width);
            (0..clause_width)
                .map(|_| {
                    let variable = rng.gen_range(1..=variables);
                    match rng.gen_bool(0.5) {
                        true => variable,
                        false => -variable,
                    }
                })
                .collect()
        })
        .collect()
}

/// Whether the valuation, indexed from variable 1, satisfies every clause.
pub fn satisfies(clauses: &[Vec<i32>], valuation: &[bool]) -> bool {
    clauses.iter().all(|clause| {
        clause
            .iter()
            .any(|&literal| valuation[(literal.unsigned_abs() - 1) as usize] == (literal > 0))
    })
}

/// Every valuation of `variables` variables.
pub fn valuations(variables: usize) -> impl Iterator<Item = Vec<bool>> {
    (0..(1_u32 << variables)).map(move |row| (0..variables).map(|bit| row & (1 << bit) != 0).collect())
}

pub fn dimacs_string(variables: i32, clauses: &[Vec<i32>]) -> String {
    let mut dimacs = format!("p cnf {variables} {}\n", clauses.len());
    for clause in clauses {
        for literal in clause {
            dimacs.push_str(&format!("{literal} "));
        }
        dimacs.push_str("0\n");
    }
    dimacs
}
