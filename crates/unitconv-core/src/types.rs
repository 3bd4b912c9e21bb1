//! Core value types for the unitconv engine
//!
//! These are plain data: a magnitude paired with a unit label, and the
//! input/expected samples used to self-test a conversion formula.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A magnitude expressed in a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric value
    pub magnitude: f64,

    /// Unit label (e.g. "cm", "kg")
    pub unit: String,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(magnitude: f64, unit: impl Into<String>) -> Self {
        Self {
            magnitude,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// A declared sample used to verify a conversion formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestFixture {
    /// Magnitude fed to the formula, in the source unit
    pub input: f64,

    /// Magnitude the formula must produce, in the target unit
    pub expected: f64,
}

impl TestFixture {
    pub fn new(input: f64, expected: f64) -> Self {
        Self { input, expected }
    }
}
