use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::db::SeedMode;
use crate::error::{TrackerError, TrackerResult};

const APP_DIR_NAME: &str = "focuspulse";
const DATABASE_FILE_NAME: &str = "focuspulse.sqlite3";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
    pub sample_interval_ms: u64,
    /// Sessions must run strictly longer than this to be summarized.
    pub min_session_secs: u64,
    pub seed_mode: SeedMode,
    pub analytics_days: u32,
    pub current_app: String,
    pub current_window: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: app_data_dir().join(DATABASE_FILE_NAME),
            export_dir: default_export_dir(),
            sample_interval_ms: 1000,
            min_session_secs: 10,
            seed_mode: SeedMode::IfEmpty,
            analytics_days: 30,
            current_app: "FocusPulse Elite".into(),
            current_window: "Productivity Tracking Session".into(),
        }
    }
}

impl Settings {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}

/// Per-platform application data directory, or the working directory when unknown.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Exports go to the user's documents folder when the platform has one.
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR_NAME).join("exports"))
        .unwrap_or_else(|| PathBuf::from("exports"))
}

pub fn default_settings_path() -> PathBuf {
    app_data_dir().join(SETTINGS_FILE_NAME)
}

fn load(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
        warn!("Ignoring malformed settings at {}: {err}", path.display());
        Settings::default()
    }))
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Missing files yield defaults; malformed files are logged and yield defaults.
    /// An unreadable file is a [`TrackerError::Settings`].
    pub fn new(path: PathBuf) -> TrackerResult<Self> {
        let data = load(&path).map_err(TrackerError::settings)?;
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Settings {
        self.read().clone()
    }

    pub fn update(&self, settings: Settings) -> TrackerResult<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard).map_err(TrackerError::settings)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let settings = store.settings();
        assert_eq!(settings.sample_interval_ms, 1000);
        assert_eq!(settings.min_session_secs, 10);
        assert_eq!(settings.seed_mode, SeedMode::IfEmpty);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "minSessionSecs": 30, "seedMode": "recreate" }"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.min_session_secs, 30);
        assert_eq!(settings.seed_mode, SeedMode::Recreate);
        assert_eq!(settings.analytics_days, 30);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(SettingsStore::new(path).unwrap().settings(), Settings::default());
    }

    #[test]
    fn update_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut settings = store.settings();
        settings.analytics_days = 14;
        store.update(settings).unwrap();

        let reloaded = SettingsStore::new(path).unwrap().settings();
        assert_eq!(reloaded.analytics_days, 14);
        assert!(store.path().ends_with("nested/settings.json"));
    }

    #[test]
    fn unreadable_file_is_a_settings_error() {
        let dir = TempDir::new().unwrap();
        // A directory exists at the path but cannot be read as a file.
        let result = SettingsStore::new(dir.path().to_path_buf());
        assert!(matches!(result, Err(TrackerError::Settings(_))));
    }

    #[test]
    fn unwritable_location_is_a_settings_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let store = SettingsStore::new(blocker.join("settings.json")).unwrap();
        let result = store.update(Settings::default());
        assert!(matches!(result, Err(TrackerError::Settings(_))));
    }
}
