//! Settings persisted to a TOML file.
//!
//! ```toml
//! [values]
//! "0" = 43775
//! ```
//!
//! The whole file is rewritten on every write. A missing file is an empty
//! store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use circlesquared_common::SettingsStore;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// On-disk layout. TOML keys are strings, so integer keys are stringified.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, i32>,
}

/// Key-value store backed by a TOML file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<u32, i32>,
}

impl FileStore {
    /// `settings.toml` in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "circlesquared", "circlesquared")
            .context("cannot determine the config directory")?;
        Ok(dirs.config_dir().join("settings.toml"))
    }

    /// Load the store at `path`, or start empty if the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let mut values = BTreeMap::new();
        if path.exists() {
            let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            let file: SettingsFile = toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
            for (key, value) in file.values {
                let key: u32 = key
                    .parse()
                    .with_context(|| format!("invalid key {key:?} in {}", path.display()))?;
                values.insert(key, value);
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn save(
        &self,
        values: &BTreeMap<u32, i32>,
    ) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let file = SettingsFile {
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        };
        let raw = toml::to_string(&file).context("serialize settings")?;
        fs::write(&self.path, raw).with_context(|| format!("write {}", self.path.display()))
    }
}

impl SettingsStore for FileStore {
    type Error = anyhow::Error;

    fn read_i32(
        &self,
        key: u32,
    ) -> Option<i32> {
        self.values.get(&key).copied()
    }

    fn write_i32(
        &mut self,
        key: u32,
        value: i32,
    ) -> Result<()> {
        let mut values = self.values.clone();
        values.insert(key, value);
        self.save(&values)?;
        self.values = values;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn make_tmp_dir() -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos();
        let root = std::env::temp_dir().join(format!("circlesquared-test-{}-{nanos}", std::process::id()));
        _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = make_tmp_dir();
        let store = FileStore::open(&dir.join("absent.toml")).unwrap();
        assert_eq!(store.read_i32(0), None);
        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_round_trip_across_reopen() {
        let dir = make_tmp_dir();
        let path = dir.join("nested").join("settings.toml");

        let mut store = FileStore::open(&path).unwrap();
        store.write_i32(0, 0x00AA_FF).unwrap();
        store.write_i32(7, -1).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.read_i32(0), Some(0x00AA_FF));
        assert_eq!(reopened.read_i32(7), Some(-1));
        assert_eq!(reopened.read_i32(1), None);
        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = make_tmp_dir();
        let blocker = dir.join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("settings.toml");

        let mut store = FileStore::open(&path).unwrap();
        assert!(store.write_i32(0, 0xAA).is_err());
        assert_eq!(store.read_i32(0), None);
        assert!(!path.exists());
        _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let dir = make_tmp_dir();
        let path = dir.join("settings.toml");
        fs::write(&path, "[values]\nbackground = 1\n").unwrap();
        assert!(FileStore::open(&path).is_err());
        _ = fs::remove_dir_all(&dir);
    }
}
