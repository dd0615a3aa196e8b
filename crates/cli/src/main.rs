// shopmatch CLI - reconcile catalog search results against live web results

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "shopmatch")]
#[command(about = "Reconcile catalog products against live web results")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match catalog and web results, flag price conflicts, build the comparison table
    #[command(after_help = "\
Examples:
  shopmatch run --catalog catalog.json --web web.json
  shopmatch run --catalog catalog.csv --web web.csv --json
  shopmatch run --catalog catalog.json --web web.json --config match.toml --output report.json
  shopmatch run --catalog catalog.json --web web.json --strategy optimal --min-score 0.6
  shopmatch run --catalog catalog.json --web web.json --fail-on-conflict

Logging:
  RUST_LOG=debug shopmatch run ...   (logs go to stderr)")]
    Run(recon::RunArgs),

    /// Validate a match config without running
    #[command(after_help = "\
Examples:
  shopmatch validate match.toml")]
    Validate {
        /// Path to the match config (TOML)
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  shopmatch-recon ", env!("CARGO_PKG_VERSION"),
        "\ncontract_version(run): 1",
    )
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            return ExitCode::from(code);
        }
    };
    init_logging();

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
