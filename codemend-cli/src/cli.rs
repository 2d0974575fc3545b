//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Codemend -- static-analysis scan and LLM remediation pipeline.
///
/// Use `codemend <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "codemend", version, about, long_about = None)]
pub struct Cli {
    /// Path to the codemend.toml configuration file.
    #[arg(short, long, default_value = "codemend.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full scan-and-remediate pipeline.
    Run(RunArgs),

    /// Run static analysis only (no LLM calls).
    Scan(ScanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Run the full pipeline over a source tree.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root directory to scan (default: current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Override the aggregate report output path.
    #[arg(long)]
    pub report_out: Option<PathBuf>,

    /// Override the LLM backend (groq, gemini).
    #[arg(long)]
    pub provider: Option<String>,

    /// Override the model identifier.
    #[arg(long)]
    pub model: Option<String>,
}

// ---- scan ----

/// Run static analysis only and print findings.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory to scan (default: current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Minimum severity to report (info, low, medium, high, critical).
    #[arg(long, default_value = "low")]
    pub min_severity: String,
}

// ---- config ----

/// Manage codemend configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scan, llm, report).
        #[arg(long)]
        section: Option<String>,
    },
}
