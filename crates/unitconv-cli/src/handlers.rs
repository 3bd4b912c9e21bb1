//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod convert;
mod path;
mod rewrite;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use convert::handle_convert;
pub use path::handle_path;
pub use rewrite::handle_rewrite;
pub use validate::handle_validate;
