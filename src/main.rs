#![allow(clippy::collapsible_if)]

#[cfg(not(target_env = "msvc"))]
#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::{fs::File, io::BufReader, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};

use termsat_lib::{
    config::{self, Config, Matching},
    context::Context,
    indexer::RuleIndexer,
    rules::{indexed::IndexedRepository, memory::MemoryRepository, set::RuleSet, RuleRepository},
    types::{
        err::{self, ErrorKind},
        gen::Report,
    },
};

/// Folds CNF formulas into a single term, reducing by a library of equivalences as it goes.
///
/// A formula which reduces to F is unsatisfiable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print the command line reference as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fold and reduce DIMACS CNF files
    Solve(SolveArgs),

    /// Compile a rule file into an index
    Index(IndexArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// DIMACS CNF files, folded in order as a single formula
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// A rule file, loaded into memory
    #[arg(short, long, conflicts_with = "index", required_unless_present = "index")]
    rules: Option<PathBuf>,

    /// An index compiled from a rule file
    #[arg(short, long)]
    index: Option<PathBuf>,

    /// How rule patterns are matched against subterms
    ///
    /// Exact matching only applies a rule to a subterm written with the same variables as the rule.
    /// Rule files state each equivalence over the smallest variables, so `instance` is needed to reduce most CNF inputs.
    #[arg(short, long, default_value_t, value_enum)]
    matching: Matching,

    /// The most reduction passes before reduction is abandoned
    #[arg(long, default_value_t = config::defaults::PASS_LIMIT)]
    pass_limit: config::PassLimit,

    /// Display stats while folding
    #[arg(short, long, default_value_t = false)]
    stats: bool,

    /// Display the final formula
    #[arg(long, default_value_t = false)]
    show_formula: bool,
}

impl SolveArgs {
    fn config(&self) -> Config {
        let mut the_config = Config::default();
        the_config.matching = self.matching;
        the_config.pass_limit = self.pass_limit;
        the_config.show_stats = self.stats;
        the_config
    }
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// The rule file to compile
    #[arg(short, long)]
    rules: PathBuf,

    /// Where to write the index, replacing any existing file
    #[arg(short, long)]
    output: PathBuf,

    /// Check each rule by truth table before compiling
    #[arg(long, default_value_t = false)]
    verify: bool,
}

const EXIT_UNKNOWN: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_FATAL: i32 = 2;
const EXIT_SATISFIABLE: i32 = 10;
const EXIT_UNSATISFIABLE: i32 = 20;

fn main() {
    #[cfg(feature = "log")]
    init_logging();

    let cli = Cli::parse();

    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return;
    }

    match cli.command {
        Some(Command::Solve(args)) => solve(args),
        Some(Command::Index(args)) => index(args),
        None => {
            let _ = Cli::command().print_help();
            std::process::exit(EXIT_INPUT)
        }
    }
}

/// Input errors are problems with what was given, anything else is a problem with the engine or the rules.
fn exit_code(error: &ErrorKind) -> i32 {
    match error {
        ErrorKind::Parse(_) | ErrorKind::Rule(_) => EXIT_INPUT,
        _ => EXIT_FATAL,
    }
}

fn solve(args: SolveArgs) {
    let config = args.config();
    let matching = config.matching;

    let report = match (&args.rules, &args.index) {
        (Some(path), _) => {
            let rules = match RuleSet::from_path(path) {
                Ok(rules) => rules,
                Err(e) => {
                    println!("c Error reading rules from {}: {e}", path.display());
                    std::process::exit(exit_code(&e))
                }
            };
            match MemoryRepository::from_rule_set(rules, matching) {
                Ok(repository) => fold_files(config, repository, &args),
                Err(e) => {
                    println!("c Error loading rules: {e}");
                    std::process::exit(exit_code(&e))
                }
            }
        }

        (None, Some(path)) => match IndexedRepository::open(path, matching) {
            Ok(repository) => fold_files(config, repository, &args),
            Err(e) => {
                println!("c Error opening index {}: {e}", path.display());
                std::process::exit(exit_code(&e))
            }
        },

        (None, None) => {
            println!("c Either a rule file or an index is required");
            std::process::exit(EXIT_INPUT)
        }
    };

    println!("s {report}");
    match report {
        Report::Satisfiable => std::process::exit(EXIT_SATISFIABLE),
        Report::Unsatisfiable => std::process::exit(EXIT_UNSATISFIABLE),
        Report::Unknown => std::process::exit(EXIT_UNKNOWN),
    }
}

fn fold_files<R: RuleRepository>(config: Config, repository: R, args: &SolveArgs) -> Report {
    let mut the_context = Context::from_config(config, repository);

    for path in &args.paths {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                println!("c Error reading {}: {e}", path.display());
                std::process::exit(EXIT_INPUT)
            }
        };

        match the_context.read_dimacs(BufReader::new(file)) {
            Ok(summary) => {
                if args.stats {
                    println!("c Folded {} clauses from {}", summary.clauses, path.display());
                }
            }
            Err(e) => {
                println!("c Error folding {}: {e}", path.display());
                if let ErrorKind::Reduction(err::ReductionError::PassLimit(limit)) = e {
                    println!("c No fixpoint within {limit} passes, the rules may not terminate");
                }
                std::process::exit(exit_code(&e))
            }
        }
    }

    if args.stats {
        the_context.draw_window();
        let counters = the_context.counters();
        println!(
            "c Folded {} clauses, peak length {}, final length {}",
            counters.clauses, counters.peak_length, counters.length
        );
    }

    if args.show_formula {
        if let Some(formula) = the_context.formula() {
            println!("c {formula}");
        }
    }

    the_context.report()
}

fn index(args: IndexArgs) {
    let rules = match RuleSet::from_path(&args.rules) {
        Ok(rules) => rules,
        Err(e) => {
            println!("c Error reading rules from {}: {e}", args.rules.display());
            std::process::exit(exit_code(&e))
        }
    };

    if args.verify {
        if let Err(e) = rules.verify() {
            println!("c Rule verification failed: {e:?}");
            std::process::exit(EXIT_INPUT)
        }
        println!("c Verified {} rules", rules.len());
    }

    match RuleIndexer::index_to_path(&rules, &args.output) {
        Ok(summary) => {
            println!(
                "c Indexed {} canonical formulas and {} rules over {} nodes",
                summary.canonical, summary.rules, summary.nodes
            );
        }
        Err(e) => {
            println!("c Error indexing: {e}");
            std::process::exit(exit_code(&e))
        }
    }
}

#[cfg(feature = "log")]
fn init_logging() {
    use log4rs::{
        append::file::FileAppender,
        config::{Appender, Root},
        encode::pattern::PatternEncoder,
    };

    let Ok(appender) = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S%.3f)} {l} {t} - {m}{n}",
        )))
        .build("termsat.log")
    else {
        return;
    };

    let Ok(log_config) = log4rs::Config::builder()
        .appender(Appender::builder().build("file", Box::new(appender)))
        .build(Root::builder().appender("file").build(log::LevelFilter::Trace))
    else {
        return;
    };

    let _ = log4rs::init_config(log_config);
}
