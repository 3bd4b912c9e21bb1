//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Unitconv CLI - Convert quantities and rewrite JSON documents into preferred units
///
/// Conversions are declared in a YAML definition file as formulas over
/// `magnitude`, each verified by its own test fixtures before use.
#[derive(Parser, Debug)]
#[command(
    name = "unitconv",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "UNITCONV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the conversion definition file
    #[arg(short, long, global = true, env = "UNITCONV_DEFINITIONS")]
    pub definitions: Option<PathBuf>,

    /// Output format for results [default: human, or the configured format]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a single quantity to a unit, or to its preferred unit
    Convert(ConvertArgs),

    /// Show the chain of conversions between two units
    Path(PathArgs),

    /// Rewrite the quantities of JSON documents into their preferred units
    Rewrite(RewriteArgs),

    /// Load the definition file and run every conversion's test fixtures
    Validate(ValidateArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Magnitude of the quantity
    #[arg(value_name = "MAGNITUDE", allow_negative_numbers = true)]
    pub magnitude: f64,

    /// Unit of the quantity
    #[arg(value_name = "UNIT")]
    pub unit: String,

    /// Target unit (the preferred unit if not specified)
    #[arg(short, long, value_name = "UNIT")]
    pub to: Option<String>,
}

/// Arguments for the path command
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Source unit
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Target unit
    #[arg(value_name = "TO")]
    pub to: String,
}

/// Arguments for the rewrite command
#[derive(Parser, Debug)]
pub struct RewriteArgs {
    /// JSON documents to rewrite
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Write the rewritten document to a file (single input only)
    #[arg(long = "save-to", value_name = "OUTPUT_FILE", conflicts_with = "in_place")]
    pub save_to: Option<PathBuf>,

    /// Overwrite each input file with its rewritten document
    #[arg(long)]
    pub in_place: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Show every conversion and its fixtures
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self, config: &Config) -> bool {
        !self.no_color && config.output.color && std::io::stdout().is_terminal()
    }

    /// Output format from the command line, falling back to the configuration
    pub fn output_format(&self, config: &Config) -> Result<OutputFormat> {
        match self.output {
            Some(format) => Ok(format),
            None => config.output.output_format(),
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
