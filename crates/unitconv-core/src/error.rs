//! Error types for the unitconv core library
//!
//! This module defines the error handling system for the conversion engine,
//! using thiserror for ergonomic error definitions. Every failure carries
//! enough context (units, formula, document address) to be reported without
//! the caller having to reconstruct it.

use crate::formula::FormulaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for unitconv operations
#[derive(Error, Debug)]
pub enum Error {
    /// The quantity handed to a conversion is not in the conversion's source unit
    #[error("Conversion from unit mismatch: got {actual:?} but expected {expected:?}")]
    UnitMismatch { expected: String, actual: String },

    /// The formula does not parse or references an unknown identifier
    #[error("Invalid formula {formula:?}: {source}")]
    InvalidFormula {
        formula: String,
        #[source]
        source: FormulaError,
    },

    /// The formula parsed but could not produce a usable value
    #[error("Formula {formula:?} could not be evaluated: {message}")]
    FormulaEvaluation { formula: String, message: String },

    /// A conversion was declared without any test fixtures
    #[error("Conversion from {from:?} to {to:?} with formula {formula:?} has no test fixtures")]
    MissingFixtures {
        from: String,
        to: String,
        formula: String,
    },

    /// A test fixture did not reproduce its expected value
    #[error(
        "Conversion test failed, from {from:?} to {to:?} with formula {formula:?} \
         and input {input} expected {expected} but got {actual}"
    )]
    FixtureMismatch {
        from: String,
        to: String,
        formula: String,
        input: f64,
        expected: f64,
        actual: f64,
    },

    /// No chain of conversions connects the two units
    #[error("Unable to find a conversion path from {from:?} to {to:?}")]
    NoPathFound { from: String, to: String },

    /// None of the preferred units can be reached from the given unit
    #[error("Unable to find a preferred unit for {unit:?}, conversion not possible")]
    NoPreferredUnitReachable { unit: String },

    /// The document handed to the rewriter is not valid JSON
    #[error("Document parse error: {message}")]
    DocumentParse {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A converted value could not be written back into the document text
    #[error("Unable to patch document at {address}: {message}")]
    DocumentPatch { address: String, message: String },

    /// A conversion failure attributed to a node of a rewritten document
    #[error("{address}: {source}")]
    Node {
        address: String,
        #[source]
        source: Box<Error>,
    },

    /// Validation errors for inputs and definitions
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Definition file errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error categories, for callers that only need to branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnitMismatch,
    InvalidFormula,
    FormulaEvaluation,
    MissingFixtures,
    FixtureMismatch,
    NoPathFound,
    NoPreferredUnitReachable,
    DocumentParse,
    DocumentPatch,
    Validation,
    Configuration,
    Io,
}

impl Error {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error without an underlying YAML error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Attribute an error to a document address
    pub fn at(self, address: impl Into<String>) -> Self {
        Self::Node {
            address: address.into(),
            source: Box::new(self),
        }
    }

    /// The category of this error; `Node` reports the kind of what it wraps
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnitMismatch { .. } => ErrorKind::UnitMismatch,
            Self::InvalidFormula { .. } => ErrorKind::InvalidFormula,
            Self::FormulaEvaluation { .. } => ErrorKind::FormulaEvaluation,
            Self::MissingFixtures { .. } => ErrorKind::MissingFixtures,
            Self::FixtureMismatch { .. } => ErrorKind::FixtureMismatch,
            Self::NoPathFound { .. } => ErrorKind::NoPathFound,
            Self::NoPreferredUnitReachable { .. } => ErrorKind::NoPreferredUnitReachable,
            Self::DocumentParse { .. } => ErrorKind::DocumentParse,
            Self::DocumentPatch { .. } => ErrorKind::DocumentPatch,
            Self::Node { source, .. } => source.kind(),
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Document address this error is attributed to, if any
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Node { address, .. } | Self::DocumentPatch { address, .. } => Some(address),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnitMismatch => write!(f, "UnitMismatch"),
            ErrorKind::InvalidFormula => write!(f, "InvalidFormula"),
            ErrorKind::FormulaEvaluation => write!(f, "FormulaEvaluationError"),
            ErrorKind::MissingFixtures => write!(f, "MissingFixtures"),
            ErrorKind::FixtureMismatch => write!(f, "FixtureMismatch"),
            ErrorKind::NoPathFound => write!(f, "NoPathFound"),
            ErrorKind::NoPreferredUnitReachable => write!(f, "NoPreferredUnitReachable"),
            ErrorKind::DocumentParse => write!(f, "DocumentParseError"),
            ErrorKind::DocumentPatch => write!(f, "DocumentPatchError"),
            ErrorKind::Validation => write!(f, "Validation"),
            ErrorKind::Configuration => write!(f, "Configuration"),
            ErrorKind::Io => write!(f, "Io"),
        }
    }
}

// Conversion implementations
impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Configuration {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
