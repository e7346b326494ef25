//! On-disk preference storage and platform paths.
//!
//! Preferences are kept as a flat JSON object mapping keys such as
//! `connection/server` to a string or bool. The file is rewritten on every
//! `set`, matching how often the wallet actually changes settings.

use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::{PreferenceStore, PreferenceValue, StoreError};

// ==================== Path Utilities ====================

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("co", "zecwallet", "zecwallet-lite")
}

/// Get the application data directory.
/// Uses platform-specific paths via `directories` crate.
pub fn get_data_dir() -> Result<PathBuf, StoreError> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StoreError::Other("Could not determine data directory".to_string()))
}

/// Get the config directory.
pub fn get_config_dir() -> Result<PathBuf, StoreError> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| StoreError::Other("Could not determine config directory".to_string()))
}

/// Get the JSON settings file path.
pub fn get_settings_path() -> Result<PathBuf, StoreError> {
    get_config_dir().map(|dir| dir.join("settings.json"))
}

/// Get the SQLite settings database path.
pub fn get_db_path() -> Result<PathBuf, StoreError> {
    get_data_dir().map(|dir| dir.join("settings.db"))
}

// ==================== JSON File Store ====================

/// Preference store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, PreferenceValue>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts empty; a file that is not
    /// a JSON object is backed up and replaced by an empty store. Entries that are
    /// neither string nor bool are skipped.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&content) {
                Ok(raw) => parse_entries(&path, raw),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Settings file is corrupted: {}", e);
                    let backup = backup_corrupted_file(&path)?;
                    tracing::warn!(backup = %backup.display(), "Backed up corrupted settings");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "Opened settings file");
        Ok(Self { path, values })
    }

    /// Open the store at the platform default location.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(get_settings_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, values: &BTreeMap<String, PreferenceValue>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Keep every entry that holds a string or bool; drop the rest with a warning.
fn parse_entries(
    path: &Path,
    raw: BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, PreferenceValue> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(value) => Some((key, value)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    key = %key,
                    "Skipping unreadable preference: {}",
                    e
                );
                None
            }
        })
        .collect()
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<(), StoreError> {
        // Memory only changes once the file write has gone through
        let mut updated = self.values.clone();
        updated.insert(key.to_string(), value);
        self.save(&updated)?;
        self.values = updated;
        tracing::debug!(key, "Saved preference");
        Ok(())
    }
}

/// Copy a corrupted settings file aside for debugging. Returns the backup path.
pub fn backup_corrupted_file(path: &Path) -> Result<PathBuf, StoreError> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::Other("Settings file has no parent directory".to_string()))?;
    let backup_path = parent.join(format!(
        "settings.backup.{}",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));
    fs::copy(path, &backup_path)?;
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Path Utility Tests ====================

    #[test]
    fn test_get_settings_path() {
        let result = get_settings_path();
        assert!(result.is_ok());
        assert!(result.unwrap().to_string_lossy().contains("settings.json"));
    }

    #[test]
    fn test_get_db_path() {
        let result = get_db_path();
        assert!(result.is_ok());
        assert!(result.unwrap().to_string_lossy().contains("settings.db"));
    }

    // ==================== JsonFileStore Tests ====================

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get("connection/server").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_string("connection/server", "https://lightd.example:443/").unwrap();
        store.set_bool("options/allowfetchprices", false).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_string("connection/server").unwrap(),
            Some("https://lightd.example:443/".to_string())
        );
        assert!(!reopened.get_bool("options/allowfetchprices", true).unwrap());
    }

    #[test]
    fn test_file_format_is_flat_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_bool("options/allowcheckupdates", true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["options/allowcheckupdates"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_corrupted_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("settings.backup."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(backups[0].path()).unwrap(), "{not json");
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_string("connection/server", "https://old/").unwrap();

        // A regular file where the parent directory should be makes every save fail
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        store.path = blocker.join("settings.json");

        assert!(store.set_string("connection/server", "https://new/").is_err());
        assert_eq!(
            store.get_string("connection/server").unwrap(),
            Some("https://old/".to_string())
        );
        assert!(store.set_bool("options/allowfetchprices", false).is_err());
        assert_eq!(store.get("options/allowfetchprices").unwrap(), None);
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"connection/server": "https://kept/", "options/x": 5, "options/allowcheckupdates": false}"#,
        )
        .unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("options/x").unwrap(), None);
        assert_eq!(
            store.get_string("connection/server").unwrap(),
            Some("https://kept/".to_string())
        );
        assert!(!store.get_bool("options/allowcheckupdates", true).unwrap());

        store.set_string("options/theme_name", "dark").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_string("connection/server").unwrap(),
            Some("https://kept/".to_string())
        );
        let no_backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .all(|e| !e.file_name().to_string_lossy().starts_with("settings.backup."));
        assert!(no_backups);
    }
}
