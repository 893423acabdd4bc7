//! Command-line driver: evaluate expression files, sum value files, or
//! write sorted listings next to their inputs.

use clap::{Parser, ValueEnum};
use rational_core::batch::{Batch, FileOutcome, Mode};
use rational_core::config::Config;
use rational_core::source::{write_result, FileSource};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Exact rational arithmetic over text files
#[derive(Parser, Debug)]
#[command(name = "rational-batch", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print reports as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// What to do with every input file
    #[arg(value_enum)]
    command: Command,

    /// Input files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Evaluate every line as an expression
    Eval,
    /// Print the sum of every valid value
    Sum,
    /// Write the values, sorted, to a companion result file
    Sort,
}

impl From<Command> for Mode {
    fn from(command: Command) -> Self {
        match command {
            Command::Eval => Mode::Evaluate,
            Command::Sum => Mode::Sum,
            Command::Sort => Mode::Collect,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}: {}", err, path.display());
                return ExitCode::from(2);
            }
        },
        None => Config::default(),
    };
    let level = match config.log_level() {
        Ok(level) => level,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mode = Mode::from(cli.command);
    let batch = Batch::new(config);
    let sources: Vec<FileSource> = cli.files.iter().map(FileSource::new).collect();
    let reports = batch.run(&sources, mode);

    if cli.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                error!(%err, "cannot serialize reports");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for report in &reports {
            for line in batch.describe(report) {
                println!("{}", line);
            }
        }
    }

    let mut failed = false;
    if mode == Mode::Collect {
        for (source, report) in sources.iter().zip(&reports) {
            if let FileOutcome::Collected(collected) = &report.outcome {
                let target = batch.result_path(source.path());
                match write_result(&target, &batch.render_sorted_listing(collected)) {
                    Ok(()) => info!(path = %target.display(), "result written"),
                    Err(err) => {
                        error!(%err, "cannot write result");
                        failed = true;
                    }
                }
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_command_and_files() {
        let cli = Cli::try_parse_from([
            "rational-batch",
            "--json",
            "--config",
            "batch.json",
            "sort",
            "input01.txt",
            "input02.txt",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("batch.json")));
        assert_eq!(Mode::from(cli.command), Mode::Collect);
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["rational-batch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_rejects_bad_invocations() {
        let missing_files = Cli::try_parse_from(["rational-batch", "sum"]).unwrap_err();
        assert_eq!(missing_files.kind(), ErrorKind::MissingRequiredArgument);

        let unknown = Cli::try_parse_from(["rational-batch", "average", "a.txt"]).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
