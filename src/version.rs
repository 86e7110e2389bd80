use crate::error::{ReleaseActionError, Result};

/// Parses the major version number out of a release version string.
///
/// Strips a leading 'v' or 'V' and discards everything from the first dot onward,
/// so "v5.2.1", "5.2.1-rc.1" and "5" all yield 5. An empty string means there
/// is no previous release and parses as 0.
///
/// # Arguments
/// * `raw` - Version string as supplied by the release step (e.g., "5.2.1")
///
/// # Returns
/// * `Ok(u64)` - The major version
/// * `Err` - If the major component is not a non-negative integer
///
/// # Example
/// ```ignore
/// assert_eq!(parse_major_version("v5.2.1").unwrap(), 5);
/// assert_eq!(parse_major_version("").unwrap(), 0);
/// assert!(parse_major_version("next").is_err());
/// ```
pub fn parse_major_version(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let clean = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let major = match clean.find('.') {
        Some(dot) => &clean[..dot],
        None => clean,
    };

    if major.is_empty() {
        return Ok(0);
    }

    major.parse::<u64>().map_err(|_| {
        ReleaseActionError::version(format!("Invalid major version in '{}'", raw))
    })
}

/// Decides whether moving from `previous` to `next` is a breaking (major) release.
///
/// Only an increase of exactly one counts. Equal versions, decreases and
/// jumps of more than one major version are not treated as breaking.
pub fn is_breaking_change(previous: u64, next: u64) -> bool {
    if previous.checked_add(1) == Some(next) {
        tracing::info!("It is a breaking change");
        return true;
    }
    false
}

/// Major, minor and patch components of a computed release version.
///
/// Pre-release and build metadata are accepted and ignored.
pub fn version_components(version: &str) -> Result<(u64, u64, u64)> {
    let parsed = semver::Version::parse(version.trim()).map_err(|e| {
        ReleaseActionError::version(format!("Invalid release version '{}': {}", version, e))
    })?;
    Ok((parsed.major, parsed.minor, parsed.patch))
}
