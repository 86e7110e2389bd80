//! GitHub Actions host integration.
//!
//! Step outputs go through [OutputSink] so tests can capture them; failures are
//! surfaced as `::error::` workflow commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ReleaseActionError, Result};

/// Destination for step outputs.
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Appends outputs to the file named by `GITHUB_OUTPUT`.
pub struct GithubOutputFile {
    path: Option<PathBuf>,
}

impl GithubOutputFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        GithubOutputFile { path }
    }

    /// Uses `GITHUB_OUTPUT` when set and non-empty.
    pub fn from_env() -> Self {
        let path = std::env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self::new(path)
    }
}

fn delimiter() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("ghadelimiter_{}_{}", std::process::id(), nanos)
}

/// Formats one output in the multi-line file command syntax.
pub fn format_output(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) {
        return Err(ReleaseActionError::output(format!(
            "output name '{}' contains the delimiter",
            name
        )));
    }
    if value.contains(delimiter) {
        return Err(ReleaseActionError::output(format!(
            "value of output '{}' contains the delimiter",
            name
        )));
    }
    Ok(format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter))
}

impl OutputSink for GithubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.path else {
            tracing::info!("{}={}", name, value);
            return Ok(());
        };

        let entry = format_output(name, value, &delimiter())?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }
}

/// Keeps outputs in memory, in the order they were set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryOutputs {
    pub entries: Vec<(String, String)>,
}

impl MemoryOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl OutputSink for MemoryOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.entries.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

/// Escapes data for a workflow command message.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats an `::error::` workflow command.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Emits an error annotation for the step.
pub fn report_failure(message: &str) {
    println!("{}", error_command(message));
}
