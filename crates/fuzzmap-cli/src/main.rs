//! fuzzmap console
//!
//! Generates a random fuzzy cognitive map, converges it once and lets the
//! user edit nodes and edges.
//!
//! Usage:
//!   fuzzmap [--seed <u64>] [--dot]
//!
//! Environment:
//!   FCM_MIN_NODES, FCM_MAX_NODES, FCM_MAX_INCLUSIVE,
//!   FCM_MAX_ITERATIONS, FCM_EPSILON, FCM_SEED
//!   RUST_LOG  log filter (default: fuzzmap=info,fuzzmap_core=info)

mod error;
mod menu;

use std::io;

use fuzzmap_core::{FcmConfig, Simulation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CliError, Result};
use crate::menu::{Menu, RenderMode};

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Options {
    seed: Option<u64>,
    mode: RenderMode,
    help: bool,
}

impl Options {
    fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let raw = args
                        .next()
                        .ok_or_else(|| CliError::Usage("--seed requires a value".into()))?;
                    let seed = raw
                        .parse()
                        .map_err(|_| CliError::Usage(format!("invalid seed: {raw}")))?;
                    options.seed = Some(seed);
                }
                "--dot" => options.mode = RenderMode::Dot,
                "-h" | "--help" => options.help = true,
                other => return Err(CliError::Usage(format!("unknown argument: {other}"))),
            }
        }

        Ok(options)
    }
}

fn print_usage() {
    eprintln!("fuzzmap - Fuzzy Cognitive Map console");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  fuzzmap [--seed <u64>] [--dot]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed <u64>   Seed the random generator (overrides FCM_SEED)");
    eprintln!("  --dot          Display the graph as Graphviz DOT");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FCM_MIN_NODES       Smallest generated map (default: 3)");
    eprintln!("  FCM_MAX_NODES       Upper node bound (default: 10)");
    eprintln!("  FCM_MAX_INCLUSIVE   Whether FCM_MAX_NODES is allowed (default: false)");
    eprintln!("  FCM_MAX_ITERATIONS  Outer pass budget (default: 100)");
    eprintln!("  FCM_EPSILON         Freeze threshold (default: 1e-5)");
    eprintln!("  FCM_SEED            Random seed (default: entropy)");
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so prompts stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fuzzmap=info,fuzzmap_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            std::process::exit(1);
        }
    };
    if options.help {
        print_usage();
        return Ok(());
    }

    let mut config = FcmConfig::from_env()?;
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }

    println!("Starting program...");
    let mut sim = Simulation::random(config)?;
    let n = sim.map().node_count();

    println!("{}", sim.map().weights());
    println!("Successfully created the {n} x {n} adjacency matrix.");
    if let Some(report) = sim.last_report() {
        println!(
            "Calculated node values in {} passes ({}).",
            report.passes,
            if report.converged { "converged" } else { "not converged" }
        );
    }
    for (i, value) in sim.map().values().iter().enumerate() {
        println!("  Node {}: {:.4}", i + 1, value);
    }
    println!();

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(stdin.lock(), stdout.lock(), options.mode).run(&mut sim)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_default() {
        assert_eq!(Options::parse(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn seed_and_dot() {
        let options = Options::parse(args(&["--seed", "42", "--dot"])).unwrap();
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.mode, RenderMode::Dot);
    }

    #[test]
    fn bad_arguments() {
        assert!(matches!(
            Options::parse(args(&["--seed"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            Options::parse(args(&["--seed", "minus-one"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            Options::parse(args(&["--verbose"])),
            Err(CliError::Usage(_))
        ));
    }
}
