//! Directed conversion edges
//!
//! A [`Conversion`] turns a quantity in its `from` unit into a quantity in
//! its `to` unit by evaluating a formula over the input magnitude. Every
//! conversion carries test fixtures that are replayed by [`Conversion::test`]
//! before the edge is admitted into a graph.

use crate::error::{Error, Result};
use crate::formula::Expression;
use crate::types::{Quantity, TestFixture};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::trace;

/// A formula-defined edge from one unit to another
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversion {
    /// Source unit label
    #[serde(default)]
    pub from: String,

    /// Target unit label
    #[serde(default)]
    pub to: String,

    /// Arithmetic formula over `magnitude`
    #[serde(default)]
    pub formula: String,

    /// Samples the formula must reproduce exactly
    #[serde(default, rename = "testFixtures")]
    pub fixtures: Vec<TestFixture>,

    /// Compiled formula, filled on first use
    #[serde(skip)]
    expression: OnceLock<Expression>,
}

impl Conversion {
    /// Create a new conversion edge
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        formula: impl Into<String>,
        fixtures: Vec<TestFixture>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            formula: formula.into(),
            fixtures,
            expression: OnceLock::new(),
        }
    }

    /// Add a fixture (builder style)
    pub fn with_fixture(mut self, input: f64, expected: f64) -> Self {
        self.fixtures.push(TestFixture::new(input, expected));
        self
    }

    /// The compiled formula, compiling it on first access
    pub fn expression(&self) -> Result<&Expression> {
        if let Some(expression) = self.expression.get() {
            return Ok(expression);
        }

        let compiled = Expression::compile(&self.formula).map_err(|source| Error::InvalidFormula {
            formula: self.formula.clone(),
            source,
        })?;

        Ok(self.expression.get_or_init(|| compiled))
    }

    /// Convert a quantity in the `from` unit to the `to` unit
    pub fn convert(&self, input: &Quantity) -> Result<Quantity> {
        if input.unit != self.from {
            return Err(Error::UnitMismatch {
                expected: self.from.clone(),
                actual: input.unit.clone(),
            });
        }

        let magnitude = self.expression()?.evaluate(input.magnitude);
        if !magnitude.is_finite() {
            return Err(Error::FormulaEvaluation {
                formula: self.formula.clone(),
                message: format!(
                    "magnitude {} produced non-finite result {}",
                    input.magnitude, magnitude
                ),
            });
        }

        trace!(from = %self.from, to = %self.to, input = input.magnitude, output = magnitude, "Converted");

        Ok(Quantity {
            magnitude,
            unit: self.to.clone(),
        })
    }

    /// Replay every fixture and require exact equality
    pub fn test(&self) -> Result<()> {
        for (field, value) in [("from", &self.from), ("to", &self.to), ("formula", &self.formula)] {
            if value.trim().is_empty() {
                return Err(Error::validation(
                    field,
                    format!("conversion {:?} -> {:?} requires a non-empty {}", self.from, self.to, field),
                ));
            }
        }

        if self.fixtures.is_empty() {
            return Err(Error::MissingFixtures {
                from: self.from.clone(),
                to: self.to.clone(),
                formula: self.formula.clone(),
            });
        }

        for fixture in &self.fixtures {
            let input = Quantity::new(fixture.input, self.from.clone());
            let output = self.convert(&input)?;

            if output.magnitude != fixture.expected {
                return Err(Error::FixtureMismatch {
                    from: self.from.clone(),
                    to: self.to.clone(),
                    formula: self.formula.clone(),
                    input: fixture.input,
                    expected: fixture.expected,
                    actual: output.magnitude,
                });
            }
        }

        Ok(())
    }
}

impl PartialEq for Conversion {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.formula == other.formula
            && self.fixtures == other.fixtures
    }
}
