//! Date-anchored build versions
//!
//! Versions look like `2024.03.15.2`: the date they were issued on followed by
//! a build number that starts at 1 each day. The manager persists the last
//! issued `(date, build)` pair so consecutive processes keep counting.
//!
//! # Example
//!
//! ```
//! use pdf_mergician_tools::date::FixedClock;
//! use pdf_mergician_tools::version::{MemoryStore, VersionManager};
//!
//! let clock = FixedClock::from_ymd(2024, 1, 1).unwrap();
//! let mut manager = VersionManager::new(MemoryStore::new(), &clock);
//!
//! assert_eq!(manager.current_version().unwrap(), "2024.01.01.1");
//! assert_eq!(manager.next_version().unwrap(), "2024.01.01.1");
//! assert_eq!(manager.next_version().unwrap(), "2024.01.01.2");
//!
//! clock.advance_days(1);
//! assert_eq!(manager.next_version().unwrap(), "2024.01.02.1");
//! ```

pub mod patch;
pub mod record;
pub mod store;

use tracing::info;
use crate::date::{format_date_version, Clock};
use crate::error::{Error, Result};

pub use patch::{patch_all, patch_file, PatchTarget, SubstitutionRule};
pub use record::{Version, VersionRecord};
pub use store::{JsonFileStore, MemoryStore, StateStore, DEFAULT_STATE_FILE};

/// What `show` reports: the current version and, once initialized, the record behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStatus {
    pub version: String,
    pub record: Option<VersionRecord>,
}

/// Issues versions and keeps the persisted record up to date
#[derive(Debug)]
pub struct VersionManager<S, C> {
    store: S,
    clock: C,
}

impl<S: StateStore, C: Clock> VersionManager<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Today's date as a version date, `YYYY.MM.DD`
    pub fn current_date_version(&self) -> String {
        format_date_version(&self.clock.today())
    }

    /// The persisted record, or `{date: null, build: 0}` when nothing is stored
    pub fn load_state(&self) -> Result<VersionRecord> {
        Ok(self.store.load()?.unwrap_or_default())
    }

    /// Overwrite the persisted record
    pub fn save_state(&mut self, record: &VersionRecord) -> Result<()> {
        self.store.save(record)
    }

    /// Issue the next version and persist it
    ///
    /// Same day as the stored record: build + 1. Any other day: build 1.
    pub fn next_version(&mut self) -> Result<String> {
        let today = self.current_date_version();
        let existing = self.load_state()?;

        let build = if existing.date.as_deref() == Some(today.as_str()) {
            existing
                .build
                .checked_add(1)
                .ok_or_else(|| Error::BuildOverflow { date: today.clone() })?
        } else {
            1
        };

        let record = VersionRecord::new(today, build);
        self.save_state(&record)?;

        let version = Version {
            date: record.date.unwrap_or_default(),
            build,
        };
        info!(%version, "issued version");
        Ok(version.to_string())
    }

    /// The last issued version, without changing anything
    ///
    /// When nothing has been issued yet this predicts what [`next_version`]
    /// would return today.
    ///
    /// [`next_version`]: VersionManager::next_version
    pub fn current_version(&self) -> Result<String> {
        Ok(self.status()?.version)
    }

    /// Current version together with the stored record
    pub fn status(&self) -> Result<VersionStatus> {
        let record = self.load_state()?;

        match record.version() {
            Some(version) => Ok(VersionStatus {
                version: version.to_string(),
                record: Some(record),
            }),
            None => Ok(VersionStatus {
                version: format!("{}.1", self.current_date_version()),
                record: None,
            }),
        }
    }

    /// Forget all issued versions
    pub fn reset_state(&mut self) -> Result<()> {
        self.store.clear()?;
        info!("version state reset");
        Ok(())
    }

    /// Write `version` into every target, returning per-target results in order
    pub fn propagate_version(&self, version: &str, targets: &[PatchTarget]) -> Vec<Result<bool>> {
        patch_all(targets, version)
    }

    /// Issue the next version and propagate it
    pub fn bump(&mut self, targets: &[PatchTarget]) -> Result<(String, Vec<Result<bool>>)> {
        let version = self.next_version()?;
        let results = self.propagate_version(&version, targets);
        Ok((version, results))
    }
}
