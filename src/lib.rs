//! pdf-mergician tooling library
//!
//! Release and test support for the pdf-mergician project:
//! - Issue date-based build versions (`YYYY.MM.DD.build`) backed by a small
//!   persisted state file
//! - Propagate a version into declaration sites in project files
//! - Generate sample PDF documents used as test fixtures
//!
//! # Example
//!
//! ```no_run
//! use pdf_mergician_tools::config::VersionConfig;
//! use pdf_mergician_tools::date::SystemClock;
//! use pdf_mergician_tools::version::{JsonFileStore, VersionManager};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = VersionConfig::discover(root).expect("Failed to load config");
//! let store = JsonFileStore::new(config.state_path(root));
//! let mut manager = VersionManager::new(store, SystemClock);
//!
//! let targets = config.patch_targets(root).expect("Invalid targets");
//! let (version, _results) = manager.bump(&targets).expect("Failed to bump");
//! println!("{}", version);
//! ```

pub mod config;
pub mod date;
pub mod error;
pub mod pdf;
pub mod version;

// Re-export commonly used items
pub use error::{Error, Result};
