use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, RvqError};

/// Parameters of one regional revenue query.
///
/// Dates are ISO `YYYY-MM-DD` strings; the window is `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub region_name: String,
    pub start_date: String,
    pub end_date: String,
    pub workers: usize,
}

/// Query settings read from a `--config` JSON file.
///
/// Every field is optional so command-line flags can supply or override it;
/// the caller decides which fields are required once both sources are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    pub region_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub workers: Option<usize>,
}

impl QuerySettings {
    /// # Errors
    /// An unreadable file or malformed JSON is a configuration error naming `path`.
    pub fn load_from_json(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).map_err(|e| {
            RvqError::InvalidConfig(format!("cannot read config {}: {e}", path.display()))
        })?;
        serde_json::from_str(&s)
            .map_err(|e| RvqError::InvalidConfig(format!("{}: {e}", path.display())))
    }
}

impl QueryConfig {
    /// Reject settings the engine must never see.
    ///
    /// `start_date == end_date` is accepted and simply selects no orders.
    pub fn validate(&self) -> Result<()> {
        if self.region_name.is_empty() {
            return Err(RvqError::InvalidConfig(
                "region name must not be empty".to_string(),
            ));
        }
        check_iso_date("start_date", &self.start_date)?;
        check_iso_date("end_date", &self.end_date)?;
        if self.start_date > self.end_date {
            return Err(RvqError::InvalidConfig(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        if self.workers == 0 {
            return Err(RvqError::InvalidConfig(
                "worker count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number of workers used when none is configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

// Lexicographic comparison is only chronological for the fixed-width form.
fn check_iso_date(name: &str, value: &str) -> Result<()> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(RvqError::InvalidConfig(format!(
            "{name} must be YYYY-MM-DD, got {value:?}"
        )));
    }
    let month = &value[5..7];
    let day = &value[8..10];
    if !("01"..="12").contains(&month) || !("01"..="31").contains(&day) {
        return Err(RvqError::InvalidConfig(format!(
            "{name} is not a calendar date: {value}"
        )));
    }
    Ok(())
}
