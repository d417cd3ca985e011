#![allow(unused_imports)]

mod common;

use common::*;

use rand::{rngs::StdRng, Rng, SeedableRng};

use termsat_lib::{
    config::Matching,
    context::{builder::literal_from_string, Context},
    structures::formula::Formula,
    types::gen::Report,
};

mod collections {
    use super::*;

    #[test]
    fn unsatisfiable() {
        for path in cnf_files("unsat") {
            let the_context = fold_file(&path, Matching::Instance, memory_repository(Matching::Instance));
            assert_eq!(
                the_context.report(),
                Report::Unsatisfiable,
                "{}",
                path.display()
            );
        }
    }

    #[test]
    fn satisfiable_are_never_refuted() {
        for path in cnf_files("sat") {
            for matching in [Matching::Exact, Matching::Instance] {
                let the_context = fold_file(&path, matching, memory_repository(matching));
                assert_ne!(
                    the_context.report(),
                    Report::Unsatisfiable,
                    "{} with {matching} matching",
                    path.display()
                );

                let counters = the_context.counters();
                assert!(counters.length <= counters.peak_length);
            }
        }
    }

    #[test]
    fn valid() {
        for path in cnf_files("valid") {
            let the_context = fold_file(&path, Matching::Instance, memory_repository(Matching::Instance));
            assert_eq!(the_context.report(), Report::Satisfiable, "{}", path.display());
        }
    }

    #[test]
    fn exact_matching_is_weaker() {
        let unit = cnf_path().join("unsat").join("unit.cnf");
        let the_context = fold_file(&unit, Matching::Exact, memory_repository(Matching::Exact));
        assert_eq!(the_context.report(), Report::Unsatisfiable);

        // rules only mention variables 1 and 2 in order of appearance
        let pair = cnf_path().join("unsat").join("pair.cnf");
        let the_context = fold_file(&pair, Matching::Exact, memory_repository(Matching::Exact));
        assert_eq!(the_context.report(), Report::Unknown);
    }
}

mod clauses {
    use super::*;

    fn context(matching: Matching) -> Context<termsat_lib::rules::memory::MemoryRepository> {
        Context::from_config(config(matching), memory_repository(matching))
    }

    #[test]
    fn contradictory_units() {
        for matching in [Matching::Exact, Matching::Instance] {
            let mut the_context = context(matching);
            the_context.clause_from_string("1").unwrap();
            the_context.clause_from_string("-1").unwrap();
            assert!(the_context.formula().is_some_and(Formula::is_false));
            assert_eq!(the_context.counters().length, 1);
        }
    }

    #[test]
    fn single_clause() {
        let mut the_context = context(Matching::Instance);
        the_context.clause_from_string("1 2").unwrap();

        let formula = the_context.formula().unwrap();
        assert!(!formula.is_false());
        assert!(formula.length() <= 4);
        assert_eq!(the_context.report(), Report::Unknown);
    }

    #[test]
    fn folding_continues_after_refutation() {
        let mut the_context = context(Matching::Instance);
        the_context.clause_from_string("1").unwrap();
        the_context.clause_from_string("-1").unwrap();
        the_context.clause_from_string("2 3").unwrap();
        assert_eq!(the_context.report(), Report::Unsatisfiable);
        assert_eq!(the_context.counters().clauses, 3);
    }
}

mod random {
    use super::*;

    /// Folding and reducing preserves meaning, so the folded formula agrees with the clauses on every valuation.
    #[test]
    fn folded_formula_is_equivalent() {
        let mut rng = StdRng::seed_from_u64(0);
        let repository = memory_repository(Matching::Instance);

        for _ in 0..100 {
            let variables = rng.gen_range(2..=4);
            let clause_count = rng.gen_range(1..=10);
            let clauses = random_clauses(&mut rng, variables, clause_count, 3);

            let mut the_context = Context::from_config(config(Matching::Instance), &repository);
            the_context
                .read_dimacs(dimacs_string(variables, &clauses).as_bytes())
                .unwrap();
            let formula = the_context.formula().unwrap();

            let mut satisfiable = false;
            for valuation in valuations(variables as usize) {
                let expected = satisfies(&clauses, &valuation);
                satisfiable |= expected;
                let value_of = |id: u32| valuation[(id - 1) as usize];
                assert_eq!(formula.evaluate(&value_of), expected, "{clauses:?} as {formula}");
            }

            if the_context.report() == Report::Unsatisfiable {
                assert!(!satisfiable);
            }
        }
    }

    #[test]
    fn literal_variables() {
        for literal in [1_i32, -1, 7, -42] {
            let formula = literal_from_string(&literal.to_string()).unwrap();
            assert_eq!(
                formula.variables().into_iter().collect::<Vec<_>>(),
                vec![literal.unsigned_abs()]
            );
        }
    }
}

mod rules {
    use super::*;

    #[test]
    fn basic_rules_are_sound() {
        let rules = basic_rules();
        assert_eq!(rules.len(), 640);
        assert_eq!(rules.verify(), Ok(()));
    }
}
