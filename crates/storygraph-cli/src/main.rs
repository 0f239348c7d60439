#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use storygraph_core::{ErrorCode, ValidationConfig};
use storygraph_core::config::{load_config, load_config_file};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::Outcome;
use crate::input::InputError;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sgraph: cycle checks for branching story graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Read validation options from this file instead of
    /// `.storygraph/config.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn load_config(&self) -> anyhow::Result<ValidationConfig> {
        match &self.config {
            Some(path) => load_config_file(path),
            None => load_config(&env::current_dir()?),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Report every loop in a story graph",
        long_about = "Validate a story graph export and list its cycles, suggested breaks and self-loops.",
        after_help = "EXAMPLES:\n    # Check an export\n    sgraph check story.json\n\n    # Emit machine-readable output\n    sgraph check story.json --json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        about = "Ask whether a new link would close a loop",
        long_about = "Probe whether adding FROM → TO to the exported graph would create a cycle.",
        after_help = "EXAMPLES:\n    # Would linking scene 12 back to scene 3 loop?\n    sgraph probe story.json 12 3"
    )]
    Probe(cmd::probe::ProbeArgs),

    #[command(
        about = "Show graph statistics",
        long_about = "Print node, edge, loop and degree counts for a story graph export.",
        after_help = "EXAMPLES:\n    # Summary for an export\n    sgraph stats story.json"
    )]
    Stats(cmd::stats::StatsArgs),
}

/// Fallback directives when `SGRAPH_LOG` is unset. Covers the library
/// targets (`storygraph_*`) and this binary (`sgraph`).
const fn default_filter(debug: bool) -> &'static str {
    if debug {
        "storygraph=debug,sgraph=debug,info"
    } else {
        "storygraph=info,sgraph=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose || env::var("DEBUG").is_ok()))
    });

    let format = env::var("SGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

/// Map a command failure to a structured error with a known code if possible.
fn to_cli_error(err: &anyhow::Error) -> CliError {
    let message = format!("{err:#}");
    if let Some(input) = err.downcast_ref::<InputError>() {
        return CliError::with_code(message, input.code());
    }
    if err.chain().any(|cause| cause.is::<toml::de::Error>()) {
        return CliError::with_code(message, ErrorCode::ConfigParseError);
    }
    CliError::new(message)
}

fn run(cli: &Cli, output: OutputMode, w: &mut dyn Write) -> anyhow::Result<Outcome> {
    let config = cli.load_config()?;
    match &cli.command {
        Commands::Check(args) => cmd::check::run_check(args, output, &config, w),
        Commands::Probe(args) => cmd::probe::run_probe(args, output, &config, w),
        Commands::Stats(args) => cmd::stats::run_stats(args, output, &config, w),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let mut stdout = io::stdout().lock();

    match run(&cli, output, &mut stdout) {
        Ok(Outcome::Clean) => Ok(ExitCode::SUCCESS),
        Ok(Outcome::Findings) => Ok(ExitCode::from(1)),
        Err(err) => {
            render_error(output, &to_cli_error(&err), &mut io::stderr().lock())?;
            Ok(ExitCode::from(2))
        }
    }
}
