//! Rewriting version declarations in project files
//!
//! Each target file gets one declared [`SubstitutionRule`]: a pattern that
//! finds the declaration and a template that rebuilds it with the new version.
//! Only the first match is replaced.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};
use crate::error::{Error, Result};

/// Placeholder in a replacement template that receives the version
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Pattern for `version = "..."` inside the `[project]` table of a pyproject.toml
pub const PYPROJECT_PATTERN: &str = r#"(\[project\][^\[]*version\s*=\s*)"[^"]+""#;
pub const PYPROJECT_TEMPLATE: &str = r#"${1}"{version}""#;

/// Pattern for a Python `__version__ = "..."` assignment
pub const DUNDER_VERSION_PATTERN: &str = r#"__version__\s*=\s*"[^"]+""#;
pub const DUNDER_VERSION_TEMPLATE: &str = r#"__version__ = "{version}""#;

/// How one version declaration is found and rewritten
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pattern: Regex,
    template: String,
}

impl SubstitutionRule {
    /// Compile a rule
    ///
    /// `template` follows `regex` replacement syntax (`${1}` refers to a
    /// capture group) and may contain `{version}`.
    pub fn new(pattern: &str, template: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            template: template.into(),
        })
    }

    /// Rule for the `[project]` version of a pyproject.toml
    pub fn pyproject() -> Result<Self> {
        Self::new(PYPROJECT_PATTERN, PYPROJECT_TEMPLATE)
    }

    /// Rule for a Python `__version__` assignment
    pub fn dunder_version() -> Result<Self> {
        Self::new(DUNDER_VERSION_PATTERN, DUNDER_VERSION_TEMPLATE)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether `content` contains a declaration this rule rewrites
    pub fn matches(&self, content: &str) -> bool {
        self.pattern.is_match(content)
    }

    /// Build the replacement text for `version`
    ///
    /// `$` in the version is escaped so it can't be read as a group reference.
    pub fn render(&self, version: &str) -> String {
        self.template
            .replace(VERSION_PLACEHOLDER, &version.replace('$', "$$"))
    }

    /// Rewrite the first declaration in `content`
    ///
    /// Returns `None` when nothing matched or the declaration already carries
    /// this version.
    pub fn apply(&self, content: &str, version: &str) -> Option<String> {
        let replacement = self.render(version);
        match self.pattern.replace(content, replacement.as_str()) {
            Cow::Owned(updated) if updated != content => Some(updated),
            _ => None,
        }
    }
}

/// A file and the rule that rewrites its version declaration
#[derive(Debug, Clone)]
pub struct PatchTarget {
    pub path: PathBuf,
    pub rule: SubstitutionRule,
}

impl PatchTarget {
    pub fn new(path: impl Into<PathBuf>, rule: SubstitutionRule) -> Self {
        Self {
            path: path.into(),
            rule,
        }
    }
}

/// Write `version` into one target, returning whether the file changed
///
/// The file is only written when its content actually changes.
pub fn patch_file(target: &PatchTarget, version: &str) -> Result<bool> {
    let content = read_target(&target.path)?;

    let Some(updated) = target.rule.apply(&content, version) else {
        debug!(path = %target.path.display(), pattern = target.rule.pattern(), "no change");
        return Ok(false);
    };

    fs::write(&target.path, updated).map_err(|source| Error::FileAccess {
        path: target.path.clone(),
        source,
    })?;
    debug!(path = %target.path.display(), version, "updated version declaration");
    Ok(true)
}

/// Patch every target in order
///
/// Failures are reported per target; a failing target never stops the rest.
pub fn patch_all(targets: &[PatchTarget], version: &str) -> Vec<Result<bool>> {
    targets
        .iter()
        .map(|target| {
            let result = patch_file(target, version);
            if let Err(ref e) = result {
                warn!(path = %target.path.display(), error = %e, "failed to update version");
            }
            result
        })
        .collect()
}

fn read_target(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}
