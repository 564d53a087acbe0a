//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// TransferLens - transfer market analytics for reporting dashboards
///
/// Parse a transfer table (local CSV file or HTTP URL) and generate
/// league, club, and spending statistics. Markdown/JSON reports.
/// Built in Rust.
///
/// Examples:
///   transferlens --source data/transfers.csv
///   transferlens --source https://example.com/transfers.csv --format json
///   transferlens --source data/transfers.csv --club "Arsenal FC"
///   transferlens --source data/transfers.csv --dry-run
///   transferlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path or URL of the transfer table
    ///
    /// Supports local files and http(s) URLs. Can also be set via the
    /// TRANSFERLENS_SOURCE env var. Not required with --init-config.
    #[arg(
        short,
        long,
        value_name = "PATH|URL",
        env = "TRANSFERLENS_SOURCE",
        required_unless_present = "init_config"
    )]
    pub source: Option<String>,

    /// Output file path for the report
    ///
    /// If not specified, uses the config file setting or transfer_report.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Club to build a focused report section for
    ///
    /// Adds per-club stats, per-year activity, and record transfers
    #[arg(short, long, value_name = "NAME")]
    pub club: Option<String>,

    /// Restrict the yearly spending table to one destination league
    #[arg(short, long, value_name = "NAME")]
    pub league: Option<String>,

    /// How many record transfers to list
    ///
    /// Overrides the config file setting. Default: 20
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// How many club record transfers to list
    ///
    /// Overrides the config file setting. Default: 10
    #[arg(long, value_name = "COUNT")]
    pub club_top: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .transferlens.toml in the current directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and parse the source without writing a report
    ///
    /// Shows dataset statistics and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .transferlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the source argument, empty if not set (validated first).
    pub fn source_str(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.source_str().trim().is_empty() {
            return Err("Source must be a file path or an http(s) URL".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref club) = self.club {
            if club.trim().is_empty() {
                return Err("Club name cannot be empty".to_string());
            }
        }

        if let Some(ref league) = self.league {
            if league.trim().is_empty() {
                return Err("League name cannot be empty".to_string());
            }
        }

        // Validate limits if provided
        if self.top == Some(0) {
            return Err("Top transfer count must be at least 1".to_string());
        }
        if self.club_top == Some(0) {
            return Err("Club top transfer count must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
