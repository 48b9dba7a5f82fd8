//! binclf - binary classification pipeline CLI
//!
//! Usage:
//!   binclf make-data                # Synthesize data/dataset.csv
//!   binclf train                    # Fit models/model.bin on the training split
//!   binclf evaluate                 # Write metrics.json and reports/roc.csv
//!   binclf run                      # All three stages in order
//!   binclf --root runs/a -v run     # Artifacts under runs/a, debug logging

use binclf::artifacts::ArtifactStore;
use binclf::config::PipelineParams;
use binclf::error::PipelineError;
use binclf::pipeline;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// binclf - reproducible binary classification pipeline
///
/// Generates a synthetic dataset, trains a logistic regression on a
/// stratified split, and evaluates it on the held-out rows.
#[derive(Parser)]
#[command(name = "binclf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Artifact root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Parameter file (relative paths resolve against the root)
    #[arg(long, global = true, default_value = "params.yaml")]
    params: PathBuf,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Synthesize the labeled dataset
    MakeData,
    /// Fit the classifier on the training split
    Train,
    /// Score the stored model on the held-out split
    Evaluate,
    /// Run make-data, train and evaluate
    Run,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let store = ArtifactStore::new(&cli.root);
    let params_path = if cli.params.is_absolute() {
        cli.params.clone()
    } else {
        cli.root.join(&cli.params)
    };
    let params = PipelineParams::from_file(&params_path)?;

    match cli.command {
        Commands::MakeData => pipeline::make_data(&params, &store).map(drop),
        Commands::Train => pipeline::train(&params, &store).map(drop),
        Commands::Evaluate => pipeline::evaluate(&params, &store).map(drop),
        Commands::Run => pipeline::run_all(&params, &store).map(drop),
    }
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("binclf={level},warn")));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

/// The single stderr line printed for a failed stage.
fn failure_message(err: &PipelineError) -> String {
    format!("error: {err}")
}

/// Distinct process exit code per failure class.
fn exit_code(err: &PipelineError) -> u8 {
    match err {
        PipelineError::Configuration { .. } => 2,
        PipelineError::InsufficientData { .. } => 3,
        PipelineError::DegenerateInput { .. } => 4,
        PipelineError::ArtifactIo { .. } => 5,
        PipelineError::Artifact { .. } => 6,
        PipelineError::SplitMismatch { .. } => 7,
        PipelineError::DimensionMismatch { .. }
        | PipelineError::EmptyInput { .. }
        | PipelineError::InvalidLabel { .. }
        | PipelineError::NotFitted => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["binclf", "train", "--root", "out", "-vv"]).expect("parses");
        assert!(matches!(cli.command, Commands::Train));
        assert_eq!(cli.root, Path::new("out"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.params, Path::new("params.yaml"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["binclf", "run", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_exit_codes_are_distinct_per_stage_failure() {
        let errors = [
            PipelineError::config("x"),
            PipelineError::insufficient("x"),
            PipelineError::DegenerateInput {
                reason: "x".to_string(),
            },
            PipelineError::io(Path::new("x"), std::io::Error::other("x")),
            PipelineError::artifact(Path::new("x"), "x"),
            PipelineError::SplitMismatch {
                expected: "a".to_string(),
                actual: "b".to_string(),
            },
        ];
        let mut codes: Vec<u8> = errors.iter().map(exit_code).collect();
        assert!(codes.iter().all(|&c| c > 1));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert_eq!(exit_code(&PipelineError::NotFitted), 1);
    }

    #[test]
    fn test_failure_is_reported_once() {
        let err = PipelineError::config("missing key data.test_size");
        let message = failure_message(&err);
        assert!(message.starts_with("error: "));
        assert_eq!(message.lines().count(), 1);
        assert_eq!(message.matches("data.test_size").count(), 1);
    }
}
