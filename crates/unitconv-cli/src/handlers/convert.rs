//! Convert command handler

use super::utils::load_converter;
use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use crate::report::ConversionReport;
use tracing::{info, instrument};
use unitconv_core::Quantity;

/// Handle the convert command
#[instrument(skip(config, output), fields(unit = %args.unit, to = ?args.to))]
pub async fn handle_convert(
    args: ConvertArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("convert_command", &args.unit);
    let converter = load_converter(config)?;

    let input = Quantity::new(args.magnitude, args.unit);
    let (target, preferred) = match args.to {
        Some(to) => (to, false),
        None => (converter.preferred_unit_for(&input.unit)?.to_string(), true),
    };

    let path = converter.resolve(&input.unit, &target)?;
    let converted = path.apply(&input)?;
    info!(input = %input, output = %converted, hops = path.len(), "Converted quantity");

    let report = ConversionReport {
        path: path.units().into_iter().map(str::to_string).collect(),
        input,
        output: converted,
        preferred,
    };

    output.conversion(&report)
}
