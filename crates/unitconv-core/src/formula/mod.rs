//! Arithmetic formula engine for conversion edges
//!
//! Formulas are restricted to floating-point literals, `+ - * /`, unary
//! signs, parentheses and the single bound variable `magnitude`. Anything
//! else is rejected at compile time, so evaluation itself cannot fail; it can
//! only produce a non-finite value, which the conversion layer reports.
//!
//! Copyright (c) 2025 Unitconv Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{BinaryOperator, Node, UnaryOperator, MAGNITUDE_VARIABLE};
pub use error::FormulaError;
pub use parser::Parser;

use std::fmt;

/// A compiled formula, ready to evaluate
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parse and compile a formula
    pub fn compile(formula: &str) -> Result<Self, FormulaError> {
        let root = Parser::new(formula)?.parse()?;
        Ok(Self {
            source: formula.to_string(),
            root,
        })
    }

    /// Evaluate with `magnitude` bound to the given value
    pub fn evaluate(&self, magnitude: f64) -> f64 {
        self.root.evaluate(magnitude)
    }

    /// The formula text this expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed syntax tree
    pub fn root(&self) -> &Node {
        &self.root
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::str::FromStr for Expression {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}
