//! Persistence for the version record
//!
//! The manager only talks to [`StateStore`]. Production code uses
//! [`JsonFileStore`]; tests swap in [`MemoryStore`].
//!
//! Neither store locks across processes: two invocations racing through a
//! load/modify/save cycle can lose an update, and the last writer wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;
use super::record::VersionRecord;
use crate::error::{Error, Result};

/// Storage for the single version record
pub trait StateStore {
    /// Read the stored record, `None` when nothing has been saved
    fn load(&self) -> Result<Option<VersionRecord>>;

    /// Replace the stored record in full
    fn save(&mut self, record: &VersionRecord) -> Result<()>;

    /// Remove the stored record; succeeds when there is nothing to remove
    fn clear(&mut self) -> Result<()>;
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn load(&self) -> Result<Option<VersionRecord>> {
        (**self).load()
    }

    fn save(&mut self, record: &VersionRecord) -> Result<()> {
        (**self).save(record)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// Default name of the state file inside a project root
pub const DEFAULT_STATE_FILE: &str = ".version_state.json";

/// Record stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<VersionRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no version state file");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let record = VersionRecord::from_json(&content, &self.path)?;
        debug!(path = %self.path.display(), ?record, "loaded version state");
        Ok(Some(record))
    }

    fn save(&mut self, record: &VersionRecord) -> Result<()> {
        let content = record.to_json()?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // Write beside the target and rename over it so readers never see a partial file
        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(path = %self.path.display(), ?record, "saved version state");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed version state file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Record held in memory, encoded the same way as the file store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored text, as if a previous process had written it
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    /// The raw stored text, if any
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<VersionRecord>> {
        self.contents
            .as_deref()
            .map(|text| VersionRecord::from_json(text, Path::new("<memory>")))
            .transpose()
    }

    fn save(&mut self, record: &VersionRecord) -> Result<()> {
        self.contents = Some(record.to_json()?);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.contents = None;
        Ok(())
    }
}
