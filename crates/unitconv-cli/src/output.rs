//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! rendering for command reports and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::report::{
    ConversionReport, ErrorReport, PathReport, RewriteReport, ValidationReport,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Trait for formatting output with specialized support for command reports
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the result of a single conversion
    fn format_conversion(&self, report: &ConversionReport) -> Result<String>;

    /// Format a resolved conversion path
    fn format_path(&self, report: &PathReport) -> Result<String>;

    /// Format the results of a rewrite run
    fn format_rewrites(&self, reports: &[RewriteReport]) -> Result<String>;

    /// Format a definition validation summary
    fn format_validation(&self, report: &ValidationReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_conversion(&self, report: &ConversionReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_conversion_human(report)),
            _ => self.format(report),
        }
    }

    fn format_path(&self, report: &PathReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_path_human(report)),
            _ => self.format(report),
        }
    }

    fn format_rewrites(&self, reports: &[RewriteReport]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_rewrites_human(reports)),
            _ => self.format(&reports),
        }
    }

    fn format_validation(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Disable progress indicators regardless of the terminal
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        debug!("Output warning: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write a conversion result
    pub fn conversion(&mut self, report: &ConversionReport) -> Result<()> {
        let formatted = self.format.format_conversion(report)?;
        self.emit(formatted)
    }

    /// Write a resolved path
    pub fn path(&mut self, report: &PathReport) -> Result<()> {
        let formatted = self.format.format_path(report)?;
        self.emit(formatted)
    }

    /// Write the results of a rewrite run
    pub fn rewrites(&mut self, reports: &[RewriteReport]) -> Result<()> {
        let formatted = self.format.format_rewrites(reports)?;
        self.emit(formatted)
    }

    /// Write a definition validation summary
    pub fn validation(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_validation(report)?;
        self.emit(formatted)
    }

    /// Write formatted output, terminating it with exactly one newline
    fn emit(&mut self, formatted: String) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format a conversion result for human reading
fn format_conversion_human(report: &ConversionReport) -> String {
    let mut output = format!("{} = {}\n", report.input, report.output);
    let mut via = format!("  via {}", report.path.join(" -> "));
    if report.preferred {
        via.push_str(" (preferred unit)");
    }
    output.push_str(&via);
    output.push('\n');
    output
}

/// Format a resolved path for human reading
fn format_path_human(report: &PathReport) -> String {
    let hops = report.steps.len();
    let mut output = format!(
        "{} ({} hop{}{})\n",
        report.units().join(" -> "),
        hops,
        if hops == 1 { "" } else { "s" },
        if report.cached { ", cached" } else { "" }
    );

    for (i, step) in report.steps.iter().enumerate() {
        output.push_str(&format!("  {}. {} -> {}: {}\n", i + 1, step.from, step.to, step.formula));
    }

    output
}

/// Format one error for human reading
fn format_error_human(error: &ErrorReport) -> String {
    match &error.address {
        Some(address) => format!("{}: [{}] {}", address, error.kind, error.message),
        None => format!("[{}] {}", error.kind, error.message),
    }
}

/// Format rewrite results for human reading
///
/// Documents that were not saved are printed verbatim so the output can be
/// redirected into a file.
fn format_rewrites_human(reports: &[RewriteReport]) -> String {
    let mut output = String::new();

    for report in reports {
        if let Some(document) = &report.document {
            output.push_str(document);
            if !document.ends_with('\n') {
                output.push('\n');
            }
        }

        if let Some(saved_to) = &report.saved_to {
            output.push_str(&format!(
                "✓ {} -> {}\n",
                report.file.display(),
                saved_to.display()
            ));
        }

        if !report.is_clean() {
            output.push_str(&format!(
                "✗ {}: {} quantit{} left unconverted\n",
                report.file.display(),
                report.errors.len(),
                if report.errors.len() == 1 { "y" } else { "ies" }
            ));
            for error in &report.errors {
                output.push_str(&format!("  • {}\n", format_error_human(error)));
            }
        }
    }

    output
}

/// Format a validation summary for human reading
fn format_validation_human(report: &ValidationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "✓ {} conversion(s) in {} passed their test fixtures\n",
        report.conversions,
        report.definitions.display()
    ));
    output.push_str(&format!("  Units: {}\n", report.units.join(", ")));

    if report.preferred_units.is_empty() {
        output.push_str("  Preferred units: (none)\n");
    } else {
        output.push_str(&format!(
            "  Preferred units: {}\n",
            report.preferred_units.join(", ")
        ));
    }

    output
}
