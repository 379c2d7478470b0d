//! Remembered teacher id, stored as a small JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const PREFS_FILE: &str = "prefs.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub remember_teacher: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

/// `<config dir>/schoolgate/prefs.json`, or a relative file when the platform
/// has no config directory.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")))
        .unwrap_or_default()
        .join(PREFS_FILE)
}

impl Prefs {
    /// Missing or empty files load as defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// # Errors
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("saved preferences to {}", path.display());
        Ok(())
    }

    /// Teacher id to pre-fill, if remembering is on.
    #[must_use]
    pub fn remembered_teacher(&self) -> Option<&str> {
        self.teacher_id
            .as_deref()
            .filter(|_| self.remember_teacher)
    }

    pub fn remember_teacher(&mut self, teacher_id: &str) {
        self.remember_teacher = true;
        self.teacher_id = Some(teacher_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_default() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let prefs = Prefs::load(&dir.path().join("nope.json"))?;
        assert_eq!(prefs, Prefs::default());
        assert_eq!(prefs.remembered_teacher(), None);
        Ok(())
    }

    #[test]
    fn save_and_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join(PREFS_FILE);

        let mut prefs = Prefs::default();
        prefs.remember_teacher("T7");
        prefs.save(&path)?;

        let loaded = Prefs::load(&path)?;
        assert_eq!(loaded.remembered_teacher(), Some("T7"));
        Ok(())
    }

    #[test]
    fn corrupt_file_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(PREFS_FILE);
        fs::write(&path, "{not json")?;
        assert!(Prefs::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(default_path().ends_with(PREFS_FILE));
    }
}
