//! Log output for the terminal front end. The grid owns the terminal, so logs
//! either go to a file or nowhere.

use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

pub fn log_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(io::sink));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file '{}'", path.display()))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

pub fn init_tracing(filter: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(log_writer(log_file)?)
        .init();
    Ok(())
}

#[cfg(test)]
#[path = "tests/logging_tests.rs"]
mod tests;
