//! Structure-preserving rewrite of JSON documents
//!
//! A [`JsonConverter`] finds every quantity-shaped object in a document (an
//! object with a numeric `magnitude` and a string `unit`) and converts it to
//! its preferred unit. Only the two affected values are rewritten in the
//! output text; everything else is left exactly as it was.
//!
//! Copyright (c) 2025 Unitconv Team
//! Licensed under the Apache-2.0 license

pub mod address;
pub mod buffer;

pub use address::{Address, Segment};
pub use buffer::{format_magnitude, DocumentBuffer};

use crate::error::Error;
use crate::graph::Converter;
use crate::types::Quantity;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Property holding the numeric value of a quantity object
pub const MAGNITUDE_KEY: &str = "magnitude";

/// Property holding the unit label of a quantity object
pub const UNIT_KEY: &str = "unit";

/// Result of rewriting one document
///
/// An empty `output` with a single [`Error::DocumentParse`] means the input
/// was not JSON; otherwise `output` is the rewritten document and `errors`
/// lists the quantities that were left unconverted.
#[derive(Debug, Default)]
pub struct RewriteOutcome {
    pub output: String,
    pub errors: Vec<Error>,
}

impl RewriteOutcome {
    /// Whether every quantity was converted
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Error>) {
        (self.output, self.errors)
    }
}

/// Read a quantity out of an object if it has the quantity shape
pub fn as_quantity(object: &Map<String, Value>) -> Option<Quantity> {
    let magnitude = object.get(MAGNITUDE_KEY)?.as_f64()?;
    let unit = object.get(UNIT_KEY)?.as_str()?;
    Some(Quantity::new(magnitude, unit))
}

/// Rewrites the quantities of JSON documents to their preferred units
#[derive(Debug)]
pub struct JsonConverter {
    converter: Converter,
}

impl JsonConverter {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }

    /// The underlying conversion graph
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Convert every quantity in `document` to its preferred unit
    pub fn convert_to_preferred_units(&self, document: &str) -> RewriteOutcome {
        let tree: Value = match serde_json::from_str(document) {
            Ok(tree) => tree,
            Err(source) => {
                debug!(error = %source, "Document is not valid JSON");
                return RewriteOutcome {
                    output: String::new(),
                    errors: vec![Error::DocumentParse {
                        message: source.to_string(),
                        source,
                    }],
                };
            }
        };

        let mut rewrite = Rewrite {
            converter: &self.converter,
            buffer: DocumentBuffer::new(document),
            errors: Vec::new(),
            converted: 0,
        };
        let mut address = Address::root();
        rewrite.walk(&tree, &mut address);

        debug!(
            converted = rewrite.converted,
            errors = rewrite.errors.len(),
            "Document rewritten"
        );

        RewriteOutcome {
            output: rewrite.buffer.into_string(),
            errors: rewrite.errors,
        }
    }
}

/// State of one in-progress document walk
struct Rewrite<'a> {
    converter: &'a Converter,
    buffer: DocumentBuffer,
    errors: Vec<Error>,
    converted: usize,
}

impl Rewrite<'_> {
    fn walk(&mut self, node: &Value, address: &mut Address) {
        match node {
            Value::Object(object) => {
                for (key, child) in object {
                    address.push(Segment::Key(key.clone()));
                    self.walk(child, address);
                    address.pop();
                }

                if let Some(quantity) = as_quantity(object) {
                    self.convert(&quantity, address);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    address.push(Segment::Index(index));
                    self.walk(item, address);
                    address.pop();
                }
            }
            _ => {}
        }
    }

    fn convert(&mut self, quantity: &Quantity, address: &Address) {
        trace!(address = %address, quantity = %quantity, "Found quantity");

        let converted = match self.converter.convert_to_preferred_unit(quantity) {
            Ok(converted) => converted,
            Err(err) => {
                warn!(address = %address, error = %err, "Quantity left unconverted");
                self.errors.push(err.at(address.to_string()));
                return;
            }
        };

        match self.buffer.set_quantity(address, &converted) {
            Ok(()) => self.converted += 1,
            Err(err) => {
                warn!(address = %address, error = %err, "Unable to write converted quantity");
                self.errors.push(err);
            }
        }
    }
}
