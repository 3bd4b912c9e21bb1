// Tests for report formatting
//
// These tests verify the human renderings of command reports and that the
// machine formats stay parseable.

use super::*;
use crate::report::{ConversionSummary, StepReport};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use unitconv_core::{Quantity, TestFixture};

/// Writer that keeps everything written to it for inspection
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
    (writer, buffer)
}

fn sample_path() -> PathReport {
    PathReport {
        from: "m".to_string(),
        to: "in".to_string(),
        steps: vec![
            StepReport {
                from: "m".to_string(),
                to: "km".to_string(),
                formula: "magnitude / 1000".to_string(),
            },
            StepReport {
                from: "km".to_string(),
                to: "in".to_string(),
                formula: "magnitude * 39370.08".to_string(),
            },
        ],
        cached: true,
    }
}

fn sample_rewrite(errors: Vec<ErrorReport>) -> RewriteReport {
    RewriteReport {
        file: PathBuf::from("desk.json"),
        saved_to: None,
        document: Some(r#"{"width": {"magnitude": 25.4, "unit": "cm"}}"#.to_string()),
        errors,
    }
}

#[test]
fn test_conversion_formatting_human() {
    let report = ConversionReport {
        input: Quantity::new(10.0, "in"),
        output: Quantity::new(25.4, "cm"),
        path: vec!["in".to_string(), "cm".to_string()],
        preferred: true,
    };

    let output = OutputFormat::Human.format_conversion(&report).unwrap();
    assert!(output.starts_with("10 in = 25.4 cm\n"));
    assert!(output.contains("via in -> cm (preferred unit)"));
}

#[test]
fn test_conversion_formatting_json() {
    let report = ConversionReport {
        input: Quantity::new(1.0, "km"),
        output: Quantity::new(1000.0, "m"),
        path: vec!["km".to_string(), "m".to_string()],
        preferred: false,
    };

    let output = OutputFormat::Json.format_conversion(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["output"]["magnitude"], 1000.0);
    assert_eq!(parsed["output"]["unit"], "m");
    assert_eq!(parsed["preferred"], false);
}

#[test]
fn test_path_formatting_human() {
    let output = OutputFormat::Human.format_path(&sample_path()).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "m -> km -> in (2 hops, cached)");
    assert_eq!(lines[1], "  1. m -> km: magnitude / 1000");
    assert_eq!(lines[2], "  2. km -> in: magnitude * 39370.08");
}

#[test]
fn test_single_hop_path_is_singular() {
    let mut report = sample_path();
    report.steps.truncate(1);
    report.to = "km".to_string();
    report.cached = false;

    let output = OutputFormat::Human.format_path(&report).unwrap();
    assert!(output.starts_with("m -> km (1 hop)\n"));
}

#[test]
fn test_path_formatting_yaml() {
    let output = OutputFormat::Yaml.format_path(&sample_path()).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
    assert_eq!(parsed["from"], "m");
    assert_eq!(parsed["steps"][1]["to"], "in");
    assert_eq!(parsed["cached"], true);
}

#[test]
fn test_clean_rewrite_prints_document_only() {
    let output = OutputFormat::Human
        .format_rewrites(&[sample_rewrite(Vec::new())])
        .unwrap();

    assert_eq!(output, "{\"width\": {\"magnitude\": 25.4, \"unit\": \"cm\"}}\n");
}

#[test]
fn test_rewrite_errors_human() {
    let errors = vec![ErrorReport {
        kind: "NoPreferredUnitReachable".to_string(),
        address: Some("items.2.weight".to_string()),
        message: "No preferred unit reachable from 'stone'".to_string(),
    }];

    let output = OutputFormat::Human
        .format_rewrites(&[sample_rewrite(errors)])
        .unwrap();

    assert!(output.contains("✗ desk.json: 1 quantity left unconverted"));
    assert!(output.contains(
        "  • items.2.weight: [NoPreferredUnitReachable] No preferred unit reachable from 'stone'"
    ));
}

#[test]
fn test_saved_rewrite_human() {
    let report = RewriteReport {
        file: PathBuf::from("in.json"),
        saved_to: Some(PathBuf::from("out.json")),
        document: None,
        errors: Vec::new(),
    };

    let output = OutputFormat::Human.format_rewrites(&[report]).unwrap();
    assert_eq!(output, "✓ in.json -> out.json\n");
}

#[test]
fn test_rewrite_formatting_json_is_array() {
    let output = OutputFormat::JsonPretty
        .format_rewrites(&[sample_rewrite(Vec::new())])
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let reports = parsed.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["file"], "desk.json");
    assert!(reports[0].get("saved_to").is_none());
    assert!(reports[0]["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_validation_formatting() {
    let report = ValidationReport {
        definitions: PathBuf::from("converter.yml"),
        conversions: 2,
        units: vec!["cm".to_string(), "in".to_string(), "m".to_string()],
        preferred_units: vec!["cm".to_string()],
        details: vec![ConversionSummary {
            from: "in".to_string(),
            to: "cm".to_string(),
            formula: "magnitude * 2.54".to_string(),
            fixtures: vec![TestFixture::new(1.0, 2.54)],
        }],
    };

    let human = OutputFormat::Human.format_validation(&report).unwrap();
    assert!(human.contains("✓ 2 conversion(s) in converter.yml passed their test fixtures"));
    assert!(human.contains("Units: cm, in, m"));
    assert!(human.contains("Preferred units: cm"));

    let json = OutputFormat::Json.format_validation(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["details"][0]["fixtures"][0]["expected"], 2.54);
}

#[test]
fn test_quiet_writer_suppresses_messages_not_data() {
    let (mut out, buffer) = writer(OutputFormat::Human, true);

    out.info("loading").unwrap();
    out.warning("a.json was left untouched").unwrap();
    out.section("Conversions").unwrap();
    out.path(&sample_path()).unwrap();

    let contents = buffer.contents();
    assert!(!contents.contains("loading"));
    assert!(!contents.contains("untouched"));
    assert!(!contents.contains("Conversions"));
    assert!(contents.starts_with("m -> km -> in"));
}

#[test]
fn test_machine_format_skips_messages() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);

    out.info("loading").unwrap();
    out.warning("careful").unwrap();
    out.conversion(&ConversionReport {
        input: Quantity::new(1.0, "g"),
        output: Quantity::new(0.001, "kg"),
        path: vec!["g".to_string(), "kg".to_string()],
        preferred: true,
    })
    .unwrap();

    assert_eq!(
        buffer.contents(),
        "{\"input\":{\"magnitude\":1.0,\"unit\":\"g\"},\"output\":{\"magnitude\":0.001,\"unit\":\"kg\"},\"path\":[\"g\",\"kg\"],\"preferred\":true}\n"
    );
}

#[test]
fn test_plain_messages_without_color() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);

    out.info("loading").unwrap();
    out.warning("careful").unwrap();
    out.section("Conversions").unwrap();

    assert_eq!(
        buffer.contents(),
        "INFO: loading\nWARNING: careful\n\n=== Conversions ===\n"
    );
}

#[test]
fn test_table_output() {
    let (mut out, buffer) = writer(OutputFormat::Human, false);

    out.table(
        &["From", "To"],
        vec![
            vec!["in".to_string(), "cm".to_string()],
            vec!["km".to_string(), "m".to_string()],
        ],
    )
    .unwrap();

    let contents = buffer.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "From │ To");
    assert_eq!(lines[1], "─────┼───");
    assert_eq!(lines[2], "in   │ cm");
    assert_eq!(lines[3], "km   │ m");
}

#[test]
fn test_custom_writer_has_no_progress_bar() {
    let (out, _) = writer(OutputFormat::Human, false);
    assert!(out.progress_bar(3, "rewriting").is_none());
}
