//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_CSV_PATH, DEFAULT_SESSION_TTL_SECS};
use crate::{SurveyError, SurveyResult};
use chrono::Duration;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    csv_path: PathBuf,
    session_ttl: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::InvalidInput` if:
    /// - `csv_path` is empty or names an existing directory,
    /// - `csv_path` has a parent directory that does not exist,
    /// - `session_ttl_secs` is zero or too large to represent.
    pub fn new(csv_path: PathBuf, session_ttl_secs: u64) -> SurveyResult<Self> {
        if csv_path.as_os_str().is_empty() {
            return Err(SurveyError::InvalidInput("csv_path cannot be empty".into()));
        }
        if csv_path.is_dir() {
            return Err(SurveyError::InvalidInput(format!(
                "csv_path is a directory: {}",
                csv_path.display()
            )));
        }
        if let Some(parent) = csv_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(SurveyError::InvalidInput(format!(
                    "directory for csv_path does not exist: {}",
                    parent.display()
                )));
            }
        }

        if session_ttl_secs == 0 {
            return Err(SurveyError::InvalidInput(
                "session TTL must be at least one second".into(),
            ));
        }
        let session_ttl = i64::try_from(session_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                SurveyError::InvalidInput(format!(
                    "session TTL is out of range: {}",
                    session_ttl_secs
                ))
            })?;

        Ok(Self {
            csv_path,
            session_ttl,
        })
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

/// Resolve the store path from an optional value, falling back to [`DEFAULT_CSV_PATH`].
pub fn csv_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH))
}

/// Parse the session TTL (seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SESSION_TTL_SECS`].
pub fn session_ttl_from_env_value(value: Option<String>) -> SurveyResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => v.parse::<u64>().map_err(|e| {
            SurveyError::InvalidInput(format!("invalid session TTL '{}': {}", v, e))
        }),
        None => Ok(DEFAULT_SESSION_TTL_SECS),
    }
}
