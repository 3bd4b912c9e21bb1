//! Address-based patching of serialized JSON
//!
//! The buffer keeps the document as text and replaces individual values in
//! place, so whitespace, key order and untouched values survive byte for
//! byte. Values are located by scanning the text along an [`Address`]; when
//! an object repeats a key the last occurrence is used, matching what
//! `serde_json` keeps when parsing.

use super::address::{Address, Segment};
use crate::error::{Error, Result};
use crate::types::Quantity;
use std::ops::Range;

/// Mutable JSON text with value replacement by address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBuffer {
    text: String,
}

impl DocumentBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Byte range of the value at `address`
    pub fn locate(&self, address: &Address) -> Result<Range<usize>> {
        let mut scanner = Scanner::new(&self.text);
        let patch_error = |message: String| Error::DocumentPatch {
            address: address.to_string(),
            message,
        };

        scanner.skip_whitespace();
        let mut span = scanner.value_span().map_err(patch_error)?;

        for segment in address.segments() {
            span = match segment {
                Segment::Key(key) => scanner.find_member(span.start, key),
                Segment::Index(index) => scanner.find_element(span.start, *index),
            }
            .map_err(patch_error)?;
        }

        Ok(span)
    }

    /// Replace the value at `address` with raw JSON text
    pub fn set(&mut self, address: &Address, json: &str) -> Result<()> {
        let span = self.locate(address)?;
        self.text.replace_range(span, json);
        Ok(())
    }

    /// Overwrite `magnitude` and `unit` of the quantity object at `address`
    pub fn set_quantity(&mut self, address: &Address, quantity: &Quantity) -> Result<()> {
        let magnitude = format_magnitude(quantity.magnitude).map_err(|message| Error::DocumentPatch {
            address: address.to_string(),
            message,
        })?;
        let unit = serde_json::to_string(&quantity.unit).map_err(|err| Error::DocumentPatch {
            address: address.to_string(),
            message: err.to_string(),
        })?;

        self.set(&address.key("magnitude"), &magnitude)?;
        self.set(&address.key("unit"), &unit)
    }
}

/// Shortest decimal form that reads back as the same `f64`
///
/// Never uses an exponent, so the result is always a valid JSON number.
pub fn format_magnitude(magnitude: f64) -> std::result::Result<String, String> {
    if !magnitude.is_finite() {
        return Err(format!("magnitude {} is not representable in JSON", magnitude));
    }
    Ok(format!("{}", magnitude))
}

/// Minimal JSON scanner over text already known to be valid
struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    position: usize,
}

type ScanResult<T> = std::result::Result<T, String>;

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            position: 0,
        }
    }

    fn current_byte(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_byte(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.advance();
        }
    }

    fn expect_byte(&mut self, expected: u8) -> ScanResult<()> {
        match self.current_byte() {
            Some(byte) if byte == expected => {
                self.advance();
                Ok(())
            }
            Some(byte) => Err(format!(
                "expected '{}' at byte {} but found '{}'",
                expected as char, self.position, byte as char
            )),
            None => Err(format!("expected '{}' but reached end of document", expected as char)),
        }
    }

    /// Skip the value starting at the current position and return its span
    fn value_span(&mut self) -> ScanResult<Range<usize>> {
        let start = self.position;
        self.skip_value()?;
        Ok(start..self.position)
    }

    fn skip_value(&mut self) -> ScanResult<()> {
        match self.current_byte() {
            Some(b'{') => self.skip_container(b'{', b'}', true),
            Some(b'[') => self.skip_container(b'[', b']', false),
            Some(b'"') => self.skip_string(),
            Some(_) => {
                let start = self.position;
                while let Some(byte) = self.current_byte() {
                    if matches!(byte, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r') {
                        break;
                    }
                    self.advance();
                }
                if self.position == start {
                    return Err(format!("expected a value at byte {}", start));
                }
                Ok(())
            }
            None => Err("unexpected end of document".to_string()),
        }
    }

    fn skip_string(&mut self) -> ScanResult<()> {
        self.expect_byte(b'"')?;
        while let Some(byte) = self.current_byte() {
            self.advance();
            match byte {
                b'\\' => self.advance(),
                b'"' => return Ok(()),
                _ => {}
            }
        }
        Err("unterminated string".to_string())
    }

    fn skip_container(&mut self, open: u8, close: u8, keyed: bool) -> ScanResult<()> {
        self.expect_byte(open)?;
        self.skip_whitespace();
        if self.current_byte() == Some(close) {
            self.advance();
            return Ok(());
        }

        loop {
            if keyed {
                self.skip_string()?;
                self.skip_whitespace();
                self.expect_byte(b':')?;
                self.skip_whitespace();
            }
            self.skip_value()?;
            self.skip_whitespace();

            match self.current_byte() {
                Some(b',') => {
                    self.advance();
                    self.skip_whitespace();
                }
                Some(byte) if byte == close => {
                    self.advance();
                    return Ok(());
                }
                _ => return Err(format!("malformed container at byte {}", self.position)),
            }
        }
    }

    /// Span of the last member named `key` in the object starting at `start`
    fn find_member(&mut self, start: usize, key: &str) -> ScanResult<Range<usize>> {
        self.position = start;
        self.expect_byte(b'{')?;
        self.skip_whitespace();

        let mut found = None;
        if self.current_byte() == Some(b'}') {
            return Err(format!("property {:?} not found", key));
        }

        loop {
            let key_start = self.position;
            self.skip_string()?;
            let matches = self.key_matches(key_start..self.position, key);

            self.skip_whitespace();
            self.expect_byte(b':')?;
            self.skip_whitespace();
            let span = self.value_span()?;
            if matches {
                found = Some(span);
            }
            self.skip_whitespace();

            match self.current_byte() {
                Some(b',') => {
                    self.advance();
                    self.skip_whitespace();
                }
                Some(b'}') => break,
                _ => return Err(format!("malformed object at byte {}", self.position)),
            }
        }

        found.ok_or_else(|| format!("property {:?} not found", key))
    }

    /// Span of element `index` in the array starting at `start`
    fn find_element(&mut self, start: usize, index: usize) -> ScanResult<Range<usize>> {
        self.position = start;
        self.expect_byte(b'[')?;
        self.skip_whitespace();

        if self.current_byte() != Some(b']') {
            let mut current = 0;
            loop {
                let span = self.value_span()?;
                if current == index {
                    return Ok(span);
                }
                current += 1;
                self.skip_whitespace();

                match self.current_byte() {
                    Some(b',') => {
                        self.advance();
                        self.skip_whitespace();
                    }
                    Some(b']') => break,
                    _ => return Err(format!("malformed array at byte {}", self.position)),
                }
            }
        }

        Err(format!("index {} out of bounds", index))
    }

    /// Compare a quoted key in the text with a decoded key
    fn key_matches(&self, span: Range<usize>, key: &str) -> bool {
        let raw = &self.input[span];
        let inner = &raw[1..raw.len() - 1];
        if !inner.contains('\\') {
            return inner == key;
        }
        serde_json::from_str::<String>(raw)
            .map(|decoded| decoded == key)
            .unwrap_or(false)
    }
}
