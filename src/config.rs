//! Runtime settings
//!
//! Loaded from `settings.ron` in the platform config directory. Every field
//! is optional; a missing or broken file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::data::read_ron;
use crate::error::DataError;

pub const SETTINGS_FILE: &str = "settings.ron";
/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "ABYSSLOOT_DATA";
/// Data directory used when nothing else is configured
pub const FALLBACK_DATA_DIR: &str = "assets/data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootSettings {
    /// Content directory; see `resolve_data_dir` for precedence
    pub data_dir: Option<PathBuf>,
    /// Forces the item level of every roll
    pub item_level_override: Option<u32>,
    /// Log each rolled instance at info level
    pub log_creation: bool,
    /// Seed used when a command is not given one
    pub seed: Option<u64>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "abyssbound", "abyssloot")
}

/// Path of the settings file
pub fn settings_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
        None => PathBuf::from(SETTINGS_FILE),
    }
}

/// Platform data directory for content, if the platform has one
pub fn platform_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("data"))
}

impl LootSettings {
    /// Load from `path`, falling back to defaults when missing or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("{} not found, using default settings", path.display());
            return Self::default();
        }
        match read_ron(path) {
            Ok(settings) => {
                log::info!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}. Using default settings.", e);
                Self::default()
            }
        }
    }

    /// Load from the platform settings path
    pub fn load_default() -> Self {
        Self::load(&settings_path())
    }

    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| DataError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let config = ron::ser::PrettyConfig::new().indentor("    ".to_string());
        let text = ron::ser::to_string_pretty(self, config)
            .map_err(|source| DataError::Serialize { what: SETTINGS_FILE, source })?;
        fs::write(path, text).map_err(|source| DataError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Data directory to load content from.
    ///
    /// `ABYSSLOOT_DATA` wins, then `data_dir`, then the platform data
    /// directory when it exists, then `assets/data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        let env = std::env::var(DATA_DIR_ENV).ok();
        self.resolve_data_dir_with(env.as_deref(), platform_data_dir().as_deref())
    }

    fn resolve_data_dir_with(&self, env: Option<&str>, platform: Option<&Path>) -> PathBuf {
        if let Some(dir) = env.map(str::trim).filter(|s| !s.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match platform {
            Some(dir) if dir.is_dir() => dir.to_path_buf(),
            _ => PathBuf::from(FALLBACK_DATA_DIR),
        }
    }

    /// Item level after applying the override
    pub fn item_level(&self, requested: u32) -> u32 {
        self.item_level_override.unwrap_or(requested).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_are_default() {
        let dir = TempDir::new().unwrap();
        let settings = LootSettings::load(&dir.path().join(SETTINGS_FILE));
        assert_eq!(settings, LootSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = LootSettings {
            data_dir: Some(PathBuf::from("/tmp/loot")),
            item_level_override: Some(7),
            log_creation: true,
            seed: Some(42),
        };
        settings.save(&path).unwrap();
        assert_eq!(LootSettings::load(&path), settings);
    }

    #[test]
    fn test_partial_and_broken_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        fs::write(&path, "(seed: Some(9))").unwrap();
        let settings = LootSettings::load(&path);
        assert_eq!(settings.seed, Some(9));
        assert!(!settings.log_creation);

        fs::write(&path, "(seed: ").unwrap();
        assert_eq!(LootSettings::load(&path), LootSettings::default());
    }

    #[test]
    fn test_data_dir_precedence() {
        let platform = TempDir::new().unwrap();
        let mut settings = LootSettings::default();

        assert_eq!(
            settings.resolve_data_dir_with(None, Some(Path::new("/does/not/exist"))),
            PathBuf::from(FALLBACK_DATA_DIR)
        );
        assert_eq!(
            settings.resolve_data_dir_with(None, Some(platform.path())),
            platform.path().to_path_buf()
        );

        settings.data_dir = Some(PathBuf::from("custom"));
        assert_eq!(settings.resolve_data_dir_with(None, Some(platform.path())), PathBuf::from("custom"));
        assert_eq!(settings.resolve_data_dir_with(Some("  "), None), PathBuf::from("custom"));
        assert_eq!(settings.resolve_data_dir_with(Some("from_env"), None), PathBuf::from("from_env"));
    }

    #[test]
    fn test_item_level_override() {
        let mut settings = LootSettings::default();
        assert_eq!(settings.item_level(5), 5);
        assert_eq!(settings.item_level(0), 1);
        settings.item_level_override = Some(12);
        assert_eq!(settings.item_level(5), 12);
    }
}
