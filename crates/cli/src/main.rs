// feataudit CLI - reconcile curated feature tables against their reference

mod audit;
mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use feataudit_recon::Pass;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "feataudit")]
#[command(about = "Audit hand-curated feature tables against their reference table")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Audit config (TOML). Built-in defaults apply when omitted.
    #[arg(long, short = 'c', global = true, env = "FEATAUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Read tables from this directory instead of the config's data_dir
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all tables, run the audit passes and write issue logs
    #[command(after_help = "\
Examples:
  feataudit run
  feataudit --config feataudit.toml run
  feataudit run --pass forward --pass deletion
  feataudit run --json > report.json
  feataudit run --results out/ --strict")]
    Run {
        /// Pass to run (repeatable). All passes when omitted.
        #[arg(long, value_enum)]
        pass: Vec<PassArg>,

        /// Write issue logs and counts here instead of the config's results_dir
        #[arg(long)]
        results: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when any pass has findings
        #[arg(long)]
        strict: bool,
    },

    /// Load and validate every table without auditing
    #[command(after_help = "\
Examples:
  feataudit check
  feataudit --data-dir export/ check --strict")]
    Check {
        /// Exit non-zero when any table has malformed rows
        #[arg(long)]
        strict: bool,
    },

    /// Print reference, output and deletion counts
    Counts {
        /// Print counts as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PassArg {
    Forward,
    Backward,
    Deletion,
}

impl From<PassArg> for Pass {
    fn from(arg: PassArg) -> Self {
        match arg {
            PassArg::Forward => Pass::Forward,
            PassArg::Backward => Pass::Backward,
            PassArg::Deletion => Pass::Deletion,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("FEATAUDIT_COMMIT"), ")",
        "\ntarget:  ", env!("FEATAUDIT_TARGET"),
    )
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "feataudit={level},feataudit_recon={level},feataudit_io={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let opts = audit::LoadOptions {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        None => Err(CliError::usage("no command given")
            .with_hint("feataudit run | check | counts (see feataudit --help)")),
        Some(Commands::Run { pass, results, json, output, strict }) => {
            let passes: Vec<Pass> = pass.into_iter().map(Pass::from).collect();
            audit::cmd_run(&opts, &passes, results, json, output, strict)
        }
        Some(Commands::Check { strict }) => audit::cmd_check(&opts, strict),
        Some(Commands::Counts { json }) => audit::cmd_counts(&opts, json),
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
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
