//! Rewrite command handler
//!
//! Documents are rewritten on the blocking pool, bounded by
//! `rewrite.max_concurrency`, and reported in the order they were given.

use super::utils::{ensure_exists, load_converter};
use crate::cli::RewriteArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use crate::report::{ErrorReport, RewriteReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use unitconv_core::{JsonConverter, RewriteOutcome};

/// Handle the rewrite command
#[instrument(skip(config, output), fields(files = args.files.len(), in_place = args.in_place))]
pub async fn handle_rewrite(
    args: RewriteArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let timer = Timer::with_details("rewrite_command", &format!("files: {}", args.files.len()));

    if args.save_to.is_some() && args.files.len() > 1 {
        return Err(Error::invalid_args(
            "--save-to takes a single input file; use --in-place to rewrite several",
        ));
    }
    for file in &args.files {
        ensure_exists(file)?;
    }

    let converter = Arc::new(JsonConverter::new(load_converter(config)?));
    let limit = Arc::new(Semaphore::new(config.rewrite.max_concurrency.max(1)));
    debug!(max_concurrency = config.rewrite.max_concurrency, "Starting rewrite tasks");

    let tasks: Vec<_> = args
        .files
        .iter()
        .map(|file| spawn_rewrite(file.clone(), Arc::clone(&converter), Arc::clone(&limit)))
        .collect();

    let progress = output.progress_bar(tasks.len() as u64, "Rewriting documents");
    let mut reports = Vec::with_capacity(tasks.len());

    for (file, task) in args.files.iter().zip(tasks) {
        let outcome = task
            .await
            .map_err(|e| Error::other(format!("Rewrite of {} failed: {}", file.display(), e)))??;

        let destination = if args.in_place {
            Some(file.clone())
        } else {
            args.save_to.clone()
        };
        reports.push(finish(file, outcome, destination).await?);

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    output.rewrites(&reports)?;

    if args.in_place || args.save_to.is_some() {
        for report in reports.iter().filter(|report| report.saved_to.is_none()) {
            output.warning(&format!(
                "{} was left untouched because it is not valid JSON",
                report.file.display()
            ))?;
        }
    }

    let failed = reports.iter().filter(|report| !report.is_clean()).count();
    info!(
        total = reports.len(),
        failed,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Rewrite finished"
    );
    if failed > 0 {
        return Err(Error::RewriteFailed {
            failed,
            total: reports.len(),
        });
    }

    Ok(())
}

/// Read and rewrite one document on the blocking pool
fn spawn_rewrite(
    file: PathBuf,
    converter: Arc<JsonConverter>,
    limit: Arc<Semaphore>,
) -> JoinHandle<Result<RewriteOutcome>> {
    tokio::spawn(async move {
        let _permit = limit
            .acquire_owned()
            .await
            .map_err(|e| Error::other(format!("Rewrite queue closed: {}", e)))?;

        let document = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        debug!(file = %file.display(), bytes = document.len(), "Read document");

        tokio::task::spawn_blocking(move || converter.convert_to_preferred_units(&document))
            .await
            .map_err(|e| Error::other(format!("Rewrite worker failed: {}", e)))
    })
}

/// Save or keep the rewritten text and build the report for one file
///
/// A document that failed to parse has no output and is never written.
async fn finish(
    file: &Path,
    outcome: RewriteOutcome,
    destination: Option<PathBuf>,
) -> Result<RewriteReport> {
    let (document, errors) = outcome.into_parts();
    let errors: Vec<ErrorReport> = errors.iter().map(ErrorReport::from).collect();

    for error in &errors {
        warn!(
            file = %file.display(),
            address = error.address.as_deref().unwrap_or("-"),
            kind = %error.kind,
            "{}",
            error.message
        );
    }

    let parsed = !document.is_empty();
    let (saved_to, document) = match destination {
        Some(target) if parsed => {
            tokio::fs::write(&target, &document)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            info!(file = %file.display(), saved_to = %target.display(), "Saved rewritten document");
            (Some(target), None)
        }
        Some(_) => (None, None),
        None if parsed => (None, Some(document)),
        None => (None, None),
    };

    Ok(RewriteReport {
        file: file.to_path_buf(),
        saved_to,
        document,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    const DEFINITIONS: &str = "\
preferredUnits: [cm]
conversions:
  - from: in
    to: cm
    formula: magnitude * 2.54
    testFixtures:
      - input: 10
        expected: 25.4
";

    struct Workspace {
        dir: tempfile::TempDir,
        config: Config,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let definitions = dir.path().join("converter.yml");
            std::fs::write(&definitions, DEFINITIONS).unwrap();
            let config = Config::default().with_definitions(Some(definitions));
            Self { dir, config }
        }

        fn file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, Box::new(std::io::sink()))
    }

    fn args(files: Vec<PathBuf>) -> RewriteArgs {
        RewriteArgs {
            files,
            save_to: None,
            in_place: false,
        }
    }

    #[tokio::test]
    async fn test_in_place_rewrite() {
        let workspace = Workspace::new();
        let a = workspace.file("a.json", r#"{"w": {"magnitude": 10, "unit": "in"}}"#);
        let b = workspace.file("b.json", r#"[{"magnitude": 10, "unit": "in"}]"#);

        let mut rewrite = args(vec![a.clone(), b.clone()]);
        rewrite.in_place = true;
        handle_rewrite(rewrite, &workspace.config, &mut quiet_output())
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(a).unwrap(),
            r#"{"w": {"magnitude": 25.4, "unit": "cm"}}"#
        );
        assert_eq!(
            std::fs::read_to_string(b).unwrap(),
            r#"[{"magnitude": 25.4, "unit": "cm"}]"#
        );
    }

    #[tokio::test]
    async fn test_save_to_single_file() {
        let workspace = Workspace::new();
        let input = workspace.file("in.json", r#"{"magnitude": 10, "unit": "in"}"#);
        let target = workspace.dir.path().join("out.json");

        let mut rewrite = args(vec![input.clone()]);
        rewrite.save_to = Some(target.clone());
        handle_rewrite(rewrite, &workspace.config, &mut quiet_output())
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(target).unwrap(),
            r#"{"magnitude": 25.4, "unit": "cm"}"#
        );
        // The input is left alone
        assert_eq!(
            std::fs::read_to_string(input).unwrap(),
            r#"{"magnitude": 10, "unit": "in"}"#
        );
    }

    #[tokio::test]
    async fn test_save_to_rejects_several_files() {
        let workspace = Workspace::new();
        let a = workspace.file("a.json", "{}");
        let b = workspace.file("b.json", "{}");

        let mut rewrite = args(vec![a, b]);
        rewrite.save_to = Some(workspace.dir.path().join("out.json"));
        let err = handle_rewrite(rewrite, &workspace.config, &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn test_partial_failure_still_saves() {
        let workspace = Workspace::new();
        let input = workspace.file(
            "mixed.json",
            r#"{"ok": {"magnitude": 10, "unit": "in"}, "bad": {"magnitude": 1, "unit": "stone"}}"#,
        );

        let mut rewrite = args(vec![input.clone()]);
        rewrite.in_place = true;
        let err = handle_rewrite(rewrite, &workspace.config, &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RewriteFailed { failed: 1, total: 1 }));

        assert_eq!(
            std::fs::read_to_string(input).unwrap(),
            r#"{"ok": {"magnitude": 25.4, "unit": "cm"}, "bad": {"magnitude": 1, "unit": "stone"}}"#
        );
    }

    #[tokio::test]
    async fn test_unparseable_document_is_not_overwritten() {
        let workspace = Workspace::new();
        let input = workspace.file("broken.json", "{\"a\": ");

        let outcome = JsonConverter::from_yaml_str(DEFINITIONS)
            .unwrap()
            .convert_to_preferred_units("{\"a\": ");
        let report = finish(&input, outcome, Some(input.clone())).await.unwrap();

        assert!(report.saved_to.is_none());
        assert!(report.document.is_none());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, "DocumentParseError");
        assert_eq!(std::fs::read_to_string(input).unwrap(), "{\"a\": ");
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_io_error() {
        let workspace = Workspace::new();
        let input = workspace.file("in.json", r#"{"magnitude": 10, "unit": "in"}"#);

        let mut rewrite = args(vec![input]);
        rewrite.save_to = Some(workspace.dir.path().join("missing").join("out.json"));
        let err = handle_rewrite(rewrite, &workspace.config, &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Context { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let workspace = Workspace::new();
        let rewrite = args(vec![workspace.dir.path().join("nope.json")]);
        let err = handle_rewrite(rewrite, &workspace.config, &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
