//! Serializable command results
//!
//! Handlers build these and hand them to the `OutputWriter`, which renders
//! them for humans or serializes them as JSON/YAML.

use serde::Serialize;
use std::path::PathBuf;
use unitconv_core::{Conversion, ConversionPath, Quantity, TestFixture};

/// Result of the convert command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input: Quantity,
    pub output: Quantity,
    /// Units visited, starting with the input unit
    pub path: Vec<String>,
    /// Whether the target was picked from the preferred units
    pub preferred: bool,
}

/// One edge of a resolved path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub from: String,
    pub to: String,
    pub formula: String,
}

impl From<&Conversion> for StepReport {
    fn from(conversion: &Conversion) -> Self {
        Self {
            from: conversion.from.clone(),
            to: conversion.to.clone(),
            formula: conversion.formula.clone(),
        }
    }
}

/// Result of the path command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    pub from: String,
    pub to: String,
    pub steps: Vec<StepReport>,
    /// Whether the path is memoized for later lookups
    pub cached: bool,
}

impl PathReport {
    pub fn new(from: &str, to: &str, path: &ConversionPath<'_>, cached: bool) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            steps: path.iter().map(StepReport::from).collect(),
            cached,
        }
    }

    /// Units visited, starting with the source unit
    pub fn units(&self) -> Vec<&str> {
        let mut units = vec![self.from.as_str()];
        units.extend(self.steps.iter().map(|step| step.to.as_str()));
        units
    }
}

/// A core error flattened for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub message: String,
}

impl From<&unitconv_core::Error> for ErrorReport {
    fn from(error: &unitconv_core::Error) -> Self {
        let message = match error {
            unitconv_core::Error::Node { source, .. } => source.to_string(),
            other => other.to_string(),
        };

        Self {
            kind: error.kind().to_string(),
            address: error.address().map(str::to_string),
            message,
        }
    }
}

/// Result of rewriting one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewriteReport {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
    /// Rewritten text, when it was not saved to a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub errors: Vec<ErrorReport>,
}

impl RewriteReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One conversion listed by `validate --detailed`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub from: String,
    pub to: String,
    pub formula: String,
    pub fixtures: Vec<TestFixture>,
}

impl From<&Conversion> for ConversionSummary {
    fn from(conversion: &Conversion) -> Self {
        Self {
            from: conversion.from.clone(),
            to: conversion.to.clone(),
            formula: conversion.formula.clone(),
            fixtures: conversion.fixtures.clone(),
        }
    }
}

/// Result of the validate command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub definitions: PathBuf,
    pub conversions: usize,
    pub units: Vec<String>,
    pub preferred_units: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ConversionSummary>,
}
