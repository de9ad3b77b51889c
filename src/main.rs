//! Page Solver CLI
//!
//! Usage:
//!   page-solver [OPTIONS] [FILE]
//!
//! Options:
//!   -e, --evaluate           Score the document as written, without solving
//!   -l, --lint               Report overlaps, escapes and negative boxes
//!   -s, --strict             Exit with status 1 when any condition fails
//!   -c, --conditions         List conditions next to each element
//!   -p, --max-passes <N>     Override the solver's pass ceiling
//!   -v, --verbose            Raise log verbosity (repeatable)
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use page_solver::{run_with_config, OutlineConfig, RunConfig};

#[derive(Parser)]
#[command(name = "page-solver")]
#[command(about = "Solve page element layouts described in TOML")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Score the document as written, without solving
    #[arg(short, long)]
    evaluate: bool,

    /// Run lint checks on the solved pages
    #[arg(short, long)]
    lint: bool,

    /// Exit with status 1 when any condition fails
    #[arg(short, long)]
    strict: bool,

    /// List conditions next to each element
    #[arg(short, long)]
    conditions: bool,

    /// Override the solver's pass ceiling
    #[arg(short = 'p', long)]
    max_passes: Option<usize>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut config = RunConfig::new()
        .with_outline(OutlineConfig::new().with_conditions(cli.conditions))
        .with_lint(cli.lint)
        .with_evaluate_only(cli.evaluate);
    if let Some(max_passes) = cli.max_passes {
        config = config.with_max_passes(max_passes);
    }

    match run_with_config(&source, config) {
        Ok(report) => {
            print!("{}", report);
            if cli.strict && !report.is_ok() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("page_solver={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
