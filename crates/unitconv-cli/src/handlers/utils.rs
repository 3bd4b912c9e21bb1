//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use unitconv_core::{Converter, ConverterDefinition};

/// Read the configured definition file
///
/// Preferred units from the configuration replace the ones in the file.
pub fn load_definition(config: &Config) -> Result<(PathBuf, ConverterDefinition)> {
    let path = config.definitions_path()?;
    debug!(path = %path.display(), "Reading conversion definitions");

    let mut definition = ConverterDefinition::from_yaml_file(&path)?;
    if let Some(preferred_units) = &config.preferred_units {
        info!(?preferred_units, "Overriding preferred units from configuration");
        definition = definition.with_preferred_units(preferred_units.clone());
    }

    Ok((path, definition))
}

/// Read the configured definition file and build a self-tested graph
pub fn load_converter(config: &Config) -> Result<Converter> {
    let (path, definition) = load_definition(config)?;
    let _timer = Timer::with_details("converter_build", &path.display().to_string());
    Ok(definition.into_converter()?)
}

/// Fail early with a clear error when an input file is missing
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = "\
preferredUnits: [cm]
conversions:
  - from: in
    to: cm
    formula: magnitude * 2.54
    testFixtures:
      - input: 1
        expected: 2.54
";

    fn config_with(definitions: &str) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("converter.yml");
        std::fs::write(&path, definitions).unwrap();
        let config = Config::default().with_definitions(Some(path));
        (dir, config)
    }

    #[test]
    fn test_load_converter() {
        let (_dir, config) = config_with(DEFINITIONS);
        let converter = load_converter(&config).unwrap();
        assert_eq!(converter.preferred_units(), ["cm".to_string()]);
        assert_eq!(converter.conversions().len(), 1);
    }

    #[test]
    fn test_preferred_units_override() {
        let (_dir, mut config) = config_with(DEFINITIONS);
        config.preferred_units = Some(vec!["in".to_string()]);

        let (_, definition) = load_definition(&config).unwrap();
        assert_eq!(definition.preferred_units, vec!["in".to_string()]);
    }

    #[test]
    fn test_failing_fixture_is_a_core_error() {
        let (_dir, config) = config_with(&DEFINITIONS.replace("expected: 2.54", "expected: 3"));
        let err = load_converter(&config).unwrap_err();
        assert!(matches!(err, Error::Core(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_ensure_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ensure_exists(&dir.path().join("missing.json")),
            Err(Error::FileNotFound { .. })
        ));
        // Directories are not documents
        assert!(ensure_exists(dir.path()).is_err());
    }
}
