//! The persisted `(date, build)` record

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use crate::date::parse_date_version;
use crate::error::{Error, Result};

/// The single record the version manager persists
///
/// `date` is `None` until the first version is issued. Once set, `build`
/// counts the versions issued on that date and is always at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Date of the last issued version, `YYYY.MM.DD`
    pub date: Option<String>,
    /// Number of versions issued on `date`
    pub build: u32,
}

impl VersionRecord {
    /// Record for a date that has had `build` versions issued
    pub fn new(date: impl Into<String>, build: u32) -> Self {
        Self {
            date: Some(date.into()),
            build,
        }
    }

    /// The never-initialized record: `{date: null, build: 0}`
    pub fn uninitialized() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.date.is_some()
    }

    /// The version this record describes, `None` when never initialized
    pub fn version(&self) -> Option<Version> {
        self.date.as_ref().map(|date| Version {
            date: date.clone(),
            build: self.build,
        })
    }

    /// Check the record invariants, returning the violated rule on failure
    pub fn validate(&self) -> std::result::Result<(), String> {
        match &self.date {
            None if self.build != 0 => Err(format!(
                "build is {} but no date has been recorded",
                self.build
            )),
            None => Ok(()),
            Some(_) if self.build == 0 => Err("build must be at least 1 once a date is recorded".to_string()),
            Some(date) => parse_date_version(date)
                .map(|_| ())
                .map_err(|_| format!("date {:?} is not in YYYY.MM.DD form", date)),
        }
    }

    /// Serialize to the on-disk JSON form (two-space indent, no trailing newline)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate the on-disk JSON form
    ///
    /// `origin` names where the text came from and is only used in errors.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        let record: VersionRecord = serde_json::from_str(text).map_err(|e| Error::CorruptState {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;

        record.validate().map_err(|reason| Error::CorruptState {
            path: origin.to_path_buf(),
            reason,
        })?;

        Ok(record)
    }
}

/// A version string `YYYY.MM.DD.build`, derived from its two components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub date: String,
    pub build: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.date, self.build)
    }
}
