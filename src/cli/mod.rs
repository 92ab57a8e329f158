//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod describe;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use describe::{DescribeArgs, describe_failure_hint, run_describe};
pub use logging::init_logging;
pub use version::display_version;
