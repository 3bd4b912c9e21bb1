//! Formula parser
//!
//! A recursive descent parser for the arithmetic formula grammar:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := ('-' | '+') unary | primary
//! primary    := number | 'magnitude' | '(' expression ')'
//! ```
//!
//! Copyright (c) 2025 Unitconv Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::error::FormulaError;
use std::iter::Peekable;
use std::str::Chars;

type ParseResult<T> = std::result::Result<T, FormulaError>;

/// Deepest nesting of groups, signs and operator chains the parser accepts
pub const MAX_NESTING_DEPTH: usize = 64;

/// Formula parser
pub struct Parser<'a> {
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Current byte offset in input
    position: usize,
    /// Current nesting depth
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given formula
    pub fn new(input: &'a str) -> ParseResult<Self> {
        if input.trim().is_empty() {
            return Err(FormulaError::Empty);
        }

        Ok(Self {
            chars: input.chars().peekable(),
            position: 0,
            depth: 0,
        })
    }

    /// Parse the whole formula into an AST
    pub fn parse(mut self) -> ParseResult<Node> {
        let node = self.parse_expression()?;

        self.skip_whitespace();
        if let Some(ch) = self.current_char() {
            return Err(FormulaError::syntax(
                "Unexpected trailing input",
                self.position,
                vec!["operator".to_string(), "end of formula".to_string()],
                ch.to_string(),
            ));
        }

        Ok(node)
    }

    /// Parse additive expressions
    fn parse_expression(&mut self) -> ParseResult<Node> {
        let base = self.depth;
        let mut node = self.parse_term()?;

        loop {
            self.skip_whitespace();
            let operator = match self.current_char() {
                Some('+') => BinaryOperator::Add,
                Some('-') => BinaryOperator::Subtract,
                _ => break,
            };
            self.descend()?;
            self.advance();
            let right = self.parse_term()?;
            node = Node::Binary {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(node)
    }

    /// Parse multiplicative expressions
    fn parse_term(&mut self) -> ParseResult<Node> {
        let base = self.depth;
        let mut node = self.parse_unary()?;

        loop {
            self.skip_whitespace();
            let operator = match self.current_char() {
                Some('*') => BinaryOperator::Multiply,
                Some('/') => BinaryOperator::Divide,
                _ => break,
            };
            self.descend()?;
            self.advance();
            let right = self.parse_unary()?;
            node = Node::Binary {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        self.depth = base;
        Ok(node)
    }

    /// Parse prefix signs
    fn parse_unary(&mut self) -> ParseResult<Node> {
        self.skip_whitespace();

        let operator = match self.current_char() {
            Some('-') => UnaryOperator::Negate,
            Some('+') => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };
        self.descend()?;
        self.advance();
        let operand = self.parse_unary()?;
        self.depth -= 1;

        Ok(Node::Unary {
            operator,
            operand: Box::new(operand),
        })
    }

    /// Parse literals, the variable and parenthesized groups
    fn parse_primary(&mut self) -> ParseResult<Node> {
        self.skip_whitespace();

        match self.current_char() {
            Some('(') => {
                self.descend()?;
                self.advance();
                let node = self.parse_expression()?;
                self.skip_whitespace();
                self.expect_char(')')?;
                self.depth -= 1;
                Ok(node)
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.parse_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let start = self.position;
                let identifier = self.parse_identifier();
                if identifier == MAGNITUDE_VARIABLE {
                    Ok(Node::Magnitude)
                } else {
                    Err(FormulaError::UnknownIdentifier {
                        name: identifier,
                        position: start,
                    })
                }
            }
            Some(ch) => Err(FormulaError::syntax(
                "Unexpected character in formula",
                self.position,
                vec![
                    "number".to_string(),
                    MAGNITUDE_VARIABLE.to_string(),
                    "(".to_string(),
                ],
                ch.to_string(),
            )),
            None => Err(FormulaError::syntax(
                "Unexpected end of formula",
                self.position,
                vec!["number".to_string(), MAGNITUDE_VARIABLE.to_string()],
                "end of formula",
            )),
        }
    }

    /// Parse a number literal (`12`, `0.5`, `.5`, `2.54e-2`)
    fn parse_number(&mut self) -> ParseResult<Node> {
        let start = self.position;
        let mut literal = String::new();

        self.take_digits(&mut literal);

        if self.current_char() == Some('.') {
            literal.push('.');
            self.advance();
            self.take_digits(&mut literal);
        }

        if let Some(ch) = self.current_char() {
            if ch == 'e' || ch == 'E' {
                literal.push(ch);
                self.advance();

                if let Some(sign) = self.current_char() {
                    if sign == '+' || sign == '-' {
                        literal.push(sign);
                        self.advance();
                    }
                }

                self.take_digits(&mut literal);
            }
        }

        literal
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Node::Number)
            .ok_or(FormulaError::InvalidNumber {
                literal,
                position: start,
            })
    }

    fn take_digits(&mut self, literal: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                literal.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse an identifier
    fn parse_identifier(&mut self) -> String {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        identifier
    }

    /// Enter one more level of nesting
    fn descend(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(FormulaError::TooDeep {
                position: self.position,
            });
        }
        Ok(())
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get current character without advancing
    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Expect a specific character
    fn expect_char(&mut self, expected: char) -> ParseResult<()> {
        match self.current_char() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(FormulaError::syntax(
                format!("Expected '{}'", expected),
                self.position,
                vec![expected.to_string()],
                ch.to_string(),
            )),
            None => Err(FormulaError::syntax(
                format!("Expected '{}' but reached end of formula", expected),
                self.position,
                vec![expected.to_string()],
                "end of formula",
            )),
        }
    }
}
