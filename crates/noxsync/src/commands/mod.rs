//! Subcommand handlers.

pub mod config_cmd;
pub mod parse;
pub mod sync;
