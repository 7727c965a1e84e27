//! Project configuration for the version tool
//!
//! Defaults describe the pdf-mergician layout. A `version.toml` in the project
//! root overrides them:
//!
//! ```toml
//! state_file = ".version_state.json"
//!
//! [[targets]]
//! file = "pyproject.toml"
//! pattern = '(\[project\][^\[]*version\s*=\s*)"[^"]+"'
//! replacement = '${1}"{version}"'
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use crate::error::{Error, Result};
use crate::version::patch::{
    PatchTarget, SubstitutionRule, DUNDER_VERSION_PATTERN, DUNDER_VERSION_TEMPLATE,
    PYPROJECT_PATTERN, PYPROJECT_TEMPLATE,
};
use crate::version::store::DEFAULT_STATE_FILE;

/// Name of the optional configuration file in a project root
pub const CONFIG_FILE: &str = "version.toml";

/// One file whose version declaration is rewritten on bump
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// Path, relative to the project root unless absolute
    pub file: PathBuf,
    pub pattern: String,
    pub replacement: String,
}

/// Version tool settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// State file, relative to the project root unless absolute
    pub state_file: PathBuf,
    pub targets: Vec<TargetConfig>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            targets: vec![
                TargetConfig {
                    file: PathBuf::from("pyproject.toml"),
                    pattern: PYPROJECT_PATTERN.to_string(),
                    replacement: PYPROJECT_TEMPLATE.to_string(),
                },
                TargetConfig {
                    file: PathBuf::from("merge_pdf").join("__init__.py"),
                    pattern: DUNDER_VERSION_PATTERN.to_string(),
                    replacement: DUNDER_VERSION_TEMPLATE.to_string(),
                },
            ],
        }
    }
}

impl VersionConfig {
    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `version.toml` from `root`, or the defaults when it doesn't exist
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            debug!(path = %path.display(), "using version config");
            Self::from_file(&path)
        } else {
            debug!(root = %root.display(), "no version config, using defaults");
            Ok(Self::default())
        }
    }

    /// Absolute location of the state file for a project root
    pub fn state_path(&self, root: &Path) -> PathBuf {
        root.join(&self.state_file)
    }

    /// Compile the configured targets into patch targets
    pub fn patch_targets(&self, root: &Path) -> Result<Vec<PatchTarget>> {
        self.targets
            .iter()
            .map(|target| {
                let rule = SubstitutionRule::new(&target.pattern, target.replacement.clone())?;
                Ok(PatchTarget::new(root.join(&target.file), rule))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_project_layout() {
        let config = VersionConfig::default();
        assert_eq!(config.state_file, PathBuf::from(".version_state.json"));
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].file, PathBuf::from("pyproject.toml"));
    }

    #[test]
    fn test_default_targets_compile() {
        let root = Path::new("/project");
        let targets = VersionConfig::default().patch_targets(root).unwrap();
        assert_eq!(targets[1].path, root.join("merge_pdf").join("__init__.py"));
    }

    #[test]
    fn test_discover_without_file() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(VersionConfig::discover(temp_dir.path()).unwrap(), VersionConfig::default());
    }

    #[test]
    fn test_discover_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"
state_file = "build/state.json"

[[targets]]
file = "Cargo.toml"
pattern = '(\[package\][^\[]*version\s*=\s*)"[^"]+"'
replacement = '${1}"{version}"'
"#,
        )
        .unwrap();

        let config = VersionConfig::discover(temp_dir.path()).unwrap();
        assert_eq!(config.state_path(temp_dir.path()), temp_dir.path().join("build/state.json"));
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].file, PathBuf::from("Cargo.toml"));
    }

    #[test]
    fn test_partial_file_keeps_default_targets() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "state_file = \"state.json\"\n").unwrap();

        let config = VersionConfig::discover(temp_dir.path()).unwrap();
        assert_eq!(config.state_file, PathBuf::from("state.json"));
        assert_eq!(config.targets, VersionConfig::default().targets);
    }

    #[test]
    fn test_bad_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "state_file = [").unwrap();
        assert!(matches!(VersionConfig::from_file(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_bad_pattern_surfaces_on_compile() {
        let config = VersionConfig {
            state_file: PathBuf::from("s.json"),
            targets: vec![TargetConfig {
                file: PathBuf::from("x"),
                pattern: "([".to_string(),
                replacement: "{version}".to_string(),
            }],
        };
        assert!(matches!(config.patch_targets(Path::new(".")), Err(Error::InvalidPattern(_))));
    }
}
