//! Path command handler

use super::utils::load_converter;
use crate::cli::PathArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use crate::report::PathReport;
use tracing::{debug, instrument};

/// Handle the path command
#[instrument(skip(config, output), fields(from = %args.from, to = %args.to))]
pub async fn handle_path(args: PathArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let converter = load_converter(config)?;

    let path = converter.resolve(&args.from, &args.to)?;
    let cached = converter.is_cached(&args.from, &args.to);
    debug!(hops = path.len(), cached, "Resolved conversion path");

    output.path(&PathReport::new(&args.from, &args.to, &path, cached))
}
