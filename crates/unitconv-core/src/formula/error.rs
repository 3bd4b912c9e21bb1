//! Error types for formula parsing
//!
//! Copyright (c) 2025 Unitconv Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Reasons a formula fails to compile
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// The formula is empty or only whitespace
    #[error("Empty formula")]
    Empty,

    /// Unexpected token while parsing
    #[error("Syntax error at position {position}: {message} (found {found})")]
    Syntax {
        message: String,
        position: usize,
        expected: Vec<String>,
        found: String,
    },

    /// A numeric literal that does not parse as a float
    #[error("Invalid number {literal:?} at position {position}")]
    InvalidNumber { literal: String, position: usize },

    /// An identifier other than the bound variable
    #[error("Unknown identifier {name:?} at position {position}, only `magnitude` is bound")]
    UnknownIdentifier { name: String, position: usize },

    /// Groups, signs or operator chains nested past the parser's limit
    #[error("Formula nests too deeply at position {position}")]
    TooDeep { position: usize },
}

impl FormulaError {
    /// Create a syntax error with expectation details
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            expected,
            found: found.into(),
        }
    }

    /// Byte offset in the formula where the problem was detected
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::Syntax { position, .. }
            | Self::InvalidNumber { position, .. }
            | Self::UnknownIdentifier { position, .. }
            | Self::TooDeep { position } => Some(*position),
        }
    }

    /// Render the error with a caret under the offending position
    pub fn detailed_message(&self, formula: &str) -> String {
        let mut result = self.to_string();
        if let Self::Syntax { expected, .. } = self {
            if !expected.is_empty() {
                result.push_str(&format!("\nExpected one of: {}", expected.join(", ")));
            }
        }
        if let Some(position) = self.position() {
            if position <= formula.len() {
                result.push_str(&format!("\nFormula: {}", formula));
                let column = formula[..position].chars().count();
                result.push_str(&format!("\n         {}^", " ".repeat(column)));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_message_points_at_position() {
        let err = FormulaError::syntax("Unexpected character", 11, vec!["number".to_string()], "*");
        let detailed = err.detailed_message("magnitude /**e2> 1000");
        assert!(detailed.contains("Expected one of: number"));
        assert!(detailed.ends_with(&format!("{}^", " ".repeat(11))));
    }

    #[test]
    fn test_empty_has_no_position() {
        assert_eq!(FormulaError::Empty.position(), None);
        assert_eq!(FormulaError::Empty.detailed_message(""), "Empty formula");
    }
}
