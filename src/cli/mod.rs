//! CLI command implementations

pub mod complete;
pub mod init;
pub mod progress;

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a value as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
