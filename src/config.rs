//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.transferlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "transfer_report.md".to_string()
}

/// Query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// How many record transfers the report lists.
    #[serde(default = "default_top_transfers")]
    pub top_transfers: usize,

    /// How many club record transfers the report lists.
    #[serde(default = "default_club_top_transfers")]
    pub club_top_transfers: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_transfers: default_top_transfers(),
            club_top_transfers: default_club_top_transfers(),
        }
    }
}

fn default_top_transfers() -> usize {
    crate::analysis::DEFAULT_TOP_TRANSFERS
}

fn default_club_top_transfers() -> usize {
    crate::analysis::DEFAULT_CLUB_TOP_TRANSFERS
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the league-to-league flow section.
    #[serde(default = "default_true")]
    pub include_flows: bool,

    /// Include the nationality section.
    #[serde(default = "default_true")]
    pub include_nationalities: bool,

    /// Include the playing-position section.
    #[serde(default = "default_true")]
    pub include_positions: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_flows: true,
            include_nationalities: true,
            include_positions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".transferlens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Optional settings - only override if provided
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(top) = args.top {
            self.query.top_transfers = top;
        }
        if let Some(club_top) = args.club_top {
            self.query.club_top_transfers = club_top;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "transfer_report.md");
        assert_eq!(config.query.top_transfers, 20);
        assert_eq!(config.query.club_top_transfers, 10);
        assert!(config.report.include_flows);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "window_summary.md"
verbose = true

[query]
top_transfers = 50

[report]
include_positions = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "window_summary.md");
        assert!(config.general.verbose);
        assert_eq!(config.query.top_transfers, 50);
        // Unset fields keep their defaults
        assert_eq!(config.query.club_top_transfers, 10);
        assert!(config.report.include_flows);
        assert!(!config.report.include_positions);
    }

    #[test]
    fn test_merge_with_args_precedence() {
        use crate::cli::{Args, OutputFormat};

        let mut config = Config::default();
        config.query.top_transfers = 5;

        let args = Args {
            source: Some("transfers.csv".to_string()),
            output: Some(std::path::PathBuf::from("out.md")),
            format: OutputFormat::Markdown,
            club: None,
            league: None,
            top: Some(30),
            club_top: None,
            config: None,
            verbose: true,
            quiet: false,
            dry_run: false,
            init_config: false,
        };

        config.merge_with_args(&args);
        assert_eq!(config.general.output, "out.md");
        assert_eq!(config.query.top_transfers, 30);
        // Not provided on the CLI, config value survives
        assert_eq!(config.query.club_top_transfers, 10);
        assert!(config.general.verbose);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[query]"));
        assert!(toml_str.contains("[report]"));
    }
}
