//! Validate command handler

use super::utils::load_definition;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use crate::report::{ConversionSummary, ValidationReport};
use tracing::{info, instrument};

/// Handle the validate command
///
/// Building the graph replays every fixture; the first failing conversion
/// is reported as the command error.
#[instrument(skip(config, output), fields(detailed = args.detailed))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("validate_command");

    let (path, definition) = load_definition(config)?;
    output.info(&format!("Validating conversion definitions: {}", path.display()))?;

    let converter = definition.into_converter()?;
    info!(conversions = converter.conversions().len(), "All fixtures passed");

    let details: Vec<ConversionSummary> = if args.detailed {
        converter.conversions().iter().map(ConversionSummary::from).collect()
    } else {
        Vec::new()
    };

    let report = ValidationReport {
        definitions: path,
        conversions: converter.conversions().len(),
        units: converter.units().into_iter().map(str::to_string).collect(),
        preferred_units: converter.preferred_units().to_vec(),
        details,
    };
    output.validation(&report)?;

    if args.detailed {
        output.section("Conversions")?;
        let rows = report
            .details
            .iter()
            .map(|summary| {
                vec![
                    summary.from.clone(),
                    summary.to.clone(),
                    summary.formula.clone(),
                    summary.fixtures.len().to_string(),
                ]
            })
            .collect();
        output.table(&["From", "To", "Formula", "Fixtures"], rows)?;
    }

    Ok(())
}
