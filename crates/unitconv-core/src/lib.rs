//! Unitconv Core - Formula-driven unit conversion for JSON documents
//!
//! This crate converts `(magnitude, unit)` quantities between units using a
//! graph of user-declared, self-tested conversion formulas, and rewrites the
//! quantities embedded in JSON documents into a set of preferred units.
//!
//! # Main Components
//!
//! - **Formulas**: A small arithmetic language over the input `magnitude`
//! - **Conversions**: Directed edges carrying a formula and test fixtures
//! - **Graph**: Path resolution across edges, with a shared path cache and
//!   preferred-unit selection
//! - **Documents**: Structure-preserving rewrite of JSON text
//! - **Definitions**: Loading conversions and preferred units from YAML
//!
//! # Example
//!
//! ```
//! use unitconv_core::{JsonConverter, Result};
//!
//! fn example() -> Result<()> {
//!     let converter = JsonConverter::from_yaml_str(
//!         r#"
//! preferredUnits: [cm]
//! conversions:
//!   - from: in
//!     to: cm
//!     formula: magnitude * 2.54
//!     testFixtures:
//!       - input: 1
//!         expected: 2.54
//! "#,
//!     )?;
//!
//!     let outcome = converter.convert_to_preferred_units(r#"{"magnitude":10,"unit":"in"}"#);
//!     assert_eq!(outcome.output, r#"{"magnitude":25.4,"unit":"cm"}"#);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod conversion;
pub mod definitions;
pub mod document;
pub mod error;
pub mod formula;
pub mod graph;
pub mod types;

// Re-export main types for convenience
pub use conversion::Conversion;
pub use definitions::ConverterDefinition;
pub use document::{Address, DocumentBuffer, JsonConverter, RewriteOutcome, Segment};
pub use error::{Error, ErrorKind, Result};
pub use formula::{Expression, FormulaError};
pub use graph::{CacheStats, ConversionPath, Converter, PathKey, MAX_PATH_HOPS};
pub use types::{Quantity, TestFixture};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonConverter>();
    }
}
