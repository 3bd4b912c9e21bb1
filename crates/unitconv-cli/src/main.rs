//! Unitconv CLI - Command-line interface for formula-driven unit conversion
//!
//! This is the main entry point for the unitconv CLI application, providing
//! commands for converting single quantities, inspecting conversion paths,
//! validating definition files, and rewriting JSON documents into their
//! preferred units.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
mod report;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration comes first so it can shape logging and colors
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config.with_definitions(cli.definitions.clone()),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, false));
            process::exit(e.exit_code());
        }
    };

    // Set up colored output
    control::set_override(cli.use_color(&config));

    // Initialize logging
    if let Err(e) = logging::init_logging(logging_config(&cli, &config)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    let result = run(cli, config).await;

    // Handle the result
    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    // Create output writer
    let mut output = OutputWriter::new(
        cli.output_format(&config)?,
        cli.use_color(&config),
        cli.quiet,
    );
    if !config.output.progress {
        output = output.without_progress();
    }

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Convert(args) => handlers::handle_convert(args, &config, &mut output).await,
        Commands::Path(args) => handlers::handle_path(args, &config, &mut output).await,
        Commands::Rewrite(args) => handlers::handle_rewrite(args, &config, &mut output).await,
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Build the logging configuration from flags, the config file and the environment
fn logging_config(cli: &Cli, config: &Config) -> LoggingConfig {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(&config.logging, cli.verbosity_level());

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["unitconv", "path", "m", "in"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Path(_)));

        let cli = Cli::parse_from(["unitconv", "-vv", "convert", "3", "ft"]);
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_quiet_forces_error_level() {
        let cli = Cli::parse_from(["unitconv", "--quiet", "validate"]);
        let mut config = Config::default();
        config.logging.level = "debug".to_string();

        let logging = logging_config(&cli, &config);
        assert_eq!(logging.level, "error");
        assert!(!logging.console);
    }

    #[test]
    fn test_definitions_flag_overrides_config() {
        let cli = Cli::parse_from(["unitconv", "--definitions", "units.yml", "validate"]);
        let config = Config {
            definitions: Some("converter.yml".into()),
            ..Config::default()
        }
        .with_definitions(cli.definitions.clone());

        assert_eq!(config.definitions, Some("units.yml".into()));
    }
}
