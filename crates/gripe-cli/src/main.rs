//! gripe CLI tool.
//!
//! Usage:
//! ```bash
//! gripe check [OPTIONS]
//! gripe list-rules
//! gripe init
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod git;

/// Exit code for configuration and usage errors.
const EXIT_CONFIG_ERROR: i32 = 2;

/// Rule-based text scanner with source-context diagnostics
#[derive(Parser)]
#[command(name = "gripe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GRIPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and report complaints
    Check(CheckArgs),

    /// List built-in rules and presets
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Arguments of `gripe check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// TOML rule file, or directory of `*.toml` rule files
    #[arg(long)]
    pub load_module: Option<PathBuf>,

    /// Directory to scan (default: `[scanner] root`, else current directory)
    #[arg(long)]
    pub analyze_dir: Option<PathBuf>,

    /// Lines of context before and after each span
    #[arg(short = 'n', long = "context", allow_negative_numbers = true)]
    pub context: Option<i64>,

    /// One line per complaint, without source context
    #[arg(long)]
    pub inline: bool,

    /// Only scan files staged for commit
    #[arg(long)]
    pub staged: bool,

    /// Also scan files not tracked by git
    #[arg(long)]
    pub include_untracked: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Built-in rule preset (python, all)
    #[arg(long)]
    pub preset: Option<String>,

    /// Only run specific rules (comma-separated)
    #[arg(long)]
    pub rules: Option<String>,
}

/// Output format for scan results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rendered complaints with source context.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => commands::check::run(&args, cli.config.as_deref()),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(0)
        }
        Commands::Init { force } => commands::init::run(force).map(|()| 0),
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            EXIT_CONFIG_ERROR
        }
    };
    std::process::exit(code);
}
