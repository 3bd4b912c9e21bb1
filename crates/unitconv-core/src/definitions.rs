//! Loading conversion definitions from YAML
//!
//! The definition file lists the preferred target units and every directed
//! conversion with its fixtures:
//!
//! ```yaml
//! preferredUnits: [cm, kg]
//! conversions:
//!   - from: in
//!     to: cm
//!     formula: magnitude * 2.54
//!     testFixtures:
//!       - input: 1
//!         expected: 2.54
//! ```

use crate::conversion::Conversion;
use crate::document::JsonConverter;
use crate::error::{Error, Result};
use crate::graph::Converter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parsed, not yet validated, definition file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConverterDefinition {
    /// Targets for preferred-unit conversion, in priority order
    #[serde(default, rename = "preferredUnits")]
    pub preferred_units: Vec<String>,

    /// Directed conversions, in declaration order
    #[serde(default)]
    pub conversions: Vec<Conversion>,
}

impl ConverterDefinition {
    /// Parse a definition from YAML text
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let definition: Self = serde_yaml::from_str(raw)?;
        debug!(
            conversions = definition.conversions.len(),
            preferred_units = definition.preferred_units.len(),
            "Parsed conversion definitions"
        );
        Ok(definition)
    }

    /// Read and parse a definition file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            message: format!("Failed to read {}: {}", path.display(), source),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Replace the preferred unit list
    pub fn with_preferred_units(mut self, preferred_units: Vec<String>) -> Self {
        self.preferred_units = preferred_units;
        self
    }

    /// Validate the definition and build a graph from it
    pub fn into_converter(self) -> Result<Converter> {
        if self.conversions.is_empty() {
            return Err(Error::configuration("No conversions defined"));
        }

        if let Some(position) = self
            .preferred_units
            .iter()
            .position(|unit| unit.trim().is_empty())
        {
            return Err(Error::validation(
                "preferredUnits",
                format!("entry {} is empty", position),
            ));
        }

        Converter::new(self.conversions, self.preferred_units)
    }
}

impl Converter {
    /// Parse YAML definitions and build a self-tested graph
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        ConverterDefinition::from_yaml_str(raw)?.into_converter()
    }

    /// Read YAML definitions from a file and build a self-tested graph
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        ConverterDefinition::from_yaml_file(path.as_ref())?.into_converter()
    }
}

impl JsonConverter {
    /// Parse YAML definitions and wrap the resulting graph
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Converter::from_yaml_str(raw).map(JsonConverter::new)
    }

    /// Read YAML definitions from a file and wrap the resulting graph
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        Converter::from_yaml_file(path).map(JsonConverter::new)
    }
}
