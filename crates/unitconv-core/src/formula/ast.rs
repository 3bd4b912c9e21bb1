//! Abstract syntax tree for conversion formulas
//!
//! Copyright (c) 2025 Unitconv Team
//! Licensed under the Apache-2.0 license

use std::fmt;

/// Name of the single variable a formula may reference
pub const MAGNITUDE_VARIABLE: &str = "magnitude";

/// A node of a parsed formula
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Floating-point literal
    Number(f64),
    /// The input magnitude
    Magnitude,
    /// Prefix operator
    Unary {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    /// Infix arithmetic
    Binary {
        left: Box<Node>,
        operator: BinaryOperator,
        right: Box<Node>,
    },
}

/// Infix operators, in the grammar's four-function set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Plus,
}

impl Node {
    /// Evaluate with plain IEEE-754 semantics
    ///
    /// Division by zero yields an infinity or NaN here; callers decide
    /// whether a non-finite result is acceptable.
    pub fn evaluate(&self, magnitude: f64) -> f64 {
        match self {
            Node::Number(value) => *value,
            Node::Magnitude => magnitude,
            Node::Unary { operator, operand } => {
                let value = operand.evaluate(magnitude);
                match operator {
                    UnaryOperator::Negate => -value,
                    UnaryOperator::Plus => value,
                }
            }
            Node::Binary {
                left,
                operator,
                right,
            } => {
                let left = left.evaluate(magnitude);
                let right = right.evaluate(magnitude);
                match operator {
                    BinaryOperator::Add => left + right,
                    BinaryOperator::Subtract => left - right,
                    BinaryOperator::Multiply => left * right,
                    BinaryOperator::Divide => left / right,
                }
            }
        }
    }

    /// Whether the subtree reads the input magnitude at all
    pub fn references_magnitude(&self) -> bool {
        match self {
            Node::Number(_) => false,
            Node::Magnitude => true,
            Node::Unary { operand, .. } => operand.references_magnitude(),
            Node::Binary { left, right, .. } => {
                left.references_magnitude() || right.references_magnitude()
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(value) => write!(f, "{}", value),
            Node::Magnitude => write!(f, "{}", MAGNITUDE_VARIABLE),
            Node::Unary { operator, operand } => write!(f, "{}{}", operator, operand),
            Node::Binary {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Plus => write!(f, "+"),
        }
    }
}
