//! scorm-rte - attempt-history inspection CLI.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use scorm_rte::cli::history::{HistoryAction, HistoryCommand, HistoryOptions};
use scorm_rte::config::Config;
use scorm_rte::storage::FileHistoryStore;

/// SCORM RTE attempt-history inspection
#[derive(Parser)]
#[command(name = "scorm-rte")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or prune the stored attempt history for a key
    History {
        /// What to do with the history
        #[arg(value_enum)]
        action: HistoryActionArg,
        /// Attempt key (package/attempt identity)
        key: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Maximum number of entries to show
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[derive(Clone, ValueEnum)]
enum HistoryActionArg {
    List,
    Last,
    Clean,
}

impl From<HistoryActionArg> for HistoryAction {
    fn from(action: HistoryActionArg) -> Self {
        match action {
            HistoryActionArg::List => HistoryAction::List,
            HistoryActionArg::Last => HistoryAction::Last,
            HistoryActionArg::Clean => HistoryAction::Clean,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("scorm-rte error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::History {
            action,
            key,
            json,
            quiet,
            limit,
        } => {
            let config = Config::load();
            let store = FileHistoryStore::new(&config)?;

            let cmd = HistoryCommand::new(store);
            let options = HistoryOptions { json, quiet, limit };

            let output = cmd.run(action.into(), &key, &options);
            let formatted = cmd.format_output(&output, &options);

            if !formatted.is_empty() {
                println!("{}", formatted);
            }

            Ok(if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
