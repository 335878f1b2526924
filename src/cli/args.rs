//! CLI argument definitions for `CityAid`

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cityaid::config::ConfigOverrides;
use cityaid::core::models::ContributionKind;
use cityaid::core::report::ReportFormat;
use logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Which challenges a reroll replaces
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RerollScope {
    /// Today's challenge
    Daily,
    /// This week's unfinished challenges
    Weekly,
    /// Both
    All,
}

/// Parse a contribution date: `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD` (noon)
///
/// # Errors
/// Returns a message naming the accepted forms
pub fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)))
        .map_err(|_| format!("Invalid date '{value}': use YYYY-MM-DD or 'YYYY-MM-DD HH:MM'"))
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`, `types`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum ChallengesSubcommand {
    /// Replace active challenges with new random ones.
    ///
    /// Challenges that were already completed are kept.
    Reroll {
        /// Which challenges to replace
        #[arg(value_enum, default_value = "all")]
        scope: RerollScope,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileSubcommand {
    /// Change the display name (empty restores the default)
    SetName {
        /// New display name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Change the bio (empty restores the default)
    SetBio {
        /// New bio
        #[arg(value_name = "BIO")]
        bio: String,
    },
    /// Reset level, XP, streak and counters (requires confirmation).
    ///
    /// Logged contributions are kept.
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log a contribution.
    Log {
        /// Category (cleanliness, plant-care, donation, kindness, animal-care, other)
        #[arg(value_name = "CATEGORY")]
        kind: ContributionKind,

        /// Title (defaults to "Unnamed Contribution")
        #[arg(short, long)]
        title: Option<String>,

        /// When it happened (defaults to now)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDateTime>,

        /// Notes (defaults to "No notes")
        #[arg(short, long)]
        notes: Option<String>,

        /// Attached media file paths
        #[arg(short, long, value_name = "PATH", num_args = 1..)]
        media: Vec<PathBuf>,
    },
    /// Log a contribution right now with a numbered title.
    ///
    /// The title becomes "TITLE #N", counting quick logs per title.
    Quick {
        /// Category
        #[arg(value_name = "CATEGORY")]
        kind: ContributionKind,

        /// Title prefix (defaults to the category name)
        #[arg(value_name = "TITLE")]
        title: Option<String>,
    },
    /// List contributions, newest first.
    List {
        /// Only this category
        #[arg(short, long, value_name = "CATEGORY")]
        kind: Option<ContributionKind>,

        /// Show at most N contributions
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Show one contribution in full.
    Show {
        /// Contribution id or unique id prefix
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Edit a contribution.
    Edit {
        /// Contribution id or unique id prefix
        #[arg(value_name = "ID")]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New category
        #[arg(short, long, value_name = "CATEGORY")]
        kind: Option<ContributionKind>,

        /// New date
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDateTime>,

        /// New notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Replace attached media
        #[arg(short, long, value_name = "PATH", num_args = 1.., conflicts_with = "clear_media")]
        media: Vec<PathBuf>,

        /// Remove all attached media
        #[arg(long)]
        clear_media: bool,
    },
    /// Delete a contribution (requires confirmation).
    Delete {
        /// Contribution id or unique id prefix
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show daily and weekly challenges.
    Challenges {
        #[command(subcommand)]
        subcommand: Option<ChallengesSubcommand>,
    },
    /// Show level and contribution milestones.
    Milestones,
    /// Show or edit the profile.
    Profile {
        #[command(subcommand)]
        subcommand: Option<ProfileSubcommand>,
    },
    /// Generate a progress report.
    Report {
        /// Output file path (defaults to the configured reports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: ReportFormat,
    },
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "cityaid",
    about = "CityAid: track civic contributions, challenges and streaks",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the data directory holding the store
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the directory reports are written to
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            data_dir: self.data_dir.as_ref().map(path_string),
            reports_dir: self.reports_dir.as_ref().map(path_string),
        }
    }
}
