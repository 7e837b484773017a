//! Subcommand implementations.
//!
//! Each command prints its result to stdout, as text or as JSON when
//! `--json` is given. Notices about degraded data go to stderr.

pub mod cache;
pub mod calendar;
pub mod config;
pub mod event;
pub mod holidays;
pub mod logs;

use serde::Serialize;

use crate::error::ClientResult;

/// Prints `value` as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
