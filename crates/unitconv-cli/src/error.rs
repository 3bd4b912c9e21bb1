//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from unitconv-core library
    #[error("{0}")]
    Core(#[from] unitconv_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No definition file was given and none was found
    #[error(
        "No conversion definitions found (looked in: {}). Pass --definitions or set UNITCONV_DEFINITIONS",
        searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )]
    DefinitionsNotFound { searched: Vec<PathBuf> },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// One or more documents were left partially or entirely unconverted
    #[error("{failed} of {total} document(s) could not be fully converted")]
    RewriteFailed { failed: usize, total: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Another error with a description of what was being attempted
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// Generic error
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::DefinitionsNotFound { .. } => 7,
            Self::RewriteFailed { .. } => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Context { source, .. } => source.exit_code(),
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        match self {
            Self::Context { source, .. } => source.should_show_help(),
            other => matches!(other, Self::InvalidArgs(_) | Self::DefinitionsNotFound { .. }),
        }
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    // Core errors are tagged with their kind so scripts can grep for it
    let message = match error {
        Error::Core(core_error) => format!("[{}] {}", core_error.kind(), core_error),
        other => other.to_string(),
    };

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::Core(unitconv_core::Error::configuration("bad")),
            Error::FileNotFound { path: PathBuf::from("a.json") },
            Error::config("bad"),
            Error::invalid_args("bad"),
            Error::DefinitionsNotFound { searched: vec![] },
            Error::RewriteFailed { failed: 1, total: 2 },
            Error::other("bad"),
        ];

        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|code| *code != 0));
    }

    #[test]
    fn test_format_core_error_with_kind() {
        let error = Error::Core(unitconv_core::Error::NoPathFound {
            from: "m".to_string(),
            to: "kg".to_string(),
        });
        assert_eq!(
            format_error(&error, false),
            "Error: [NoPathFound] Unable to find a conversion path from \"m\" to \"kg\""
        );
    }

    #[test]
    fn test_definitions_not_found_lists_paths() {
        let error = Error::DefinitionsNotFound {
            searched: vec![PathBuf::from("converter.yml")],
        };
        assert!(error.to_string().contains("converter.yml"));
        assert!(error.should_show_help());
    }

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let error = result.with_context(|| "Failed to read doc.json".to_string()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to read doc.json: IO error: "));
    }

    #[test]
    fn test_context_keeps_exit_code() {
        let io_failure: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let error = io_failure
            .with_context(|| "Failed to write out.json".to_string())
            .unwrap_err();
        assert_eq!(error.exit_code(), 1);

        let bad_args: Result<()> = Err(Error::invalid_args("bad"));
        let error = bad_args.with_context(|| "rewrite".to_string()).unwrap_err();
        assert_eq!(error.exit_code(), 6);
        assert!(error.should_show_help());
    }
}
