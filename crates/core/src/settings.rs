//! Persisted key/value settings.
//!
//! The gadget only needs string keys and string values. Typed access is
//! layered on top by [`SettingsExt`], which parses with `FromStr` and falls
//! back to the caller's default when a stored value can't be parsed.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

/// Key/value store shared between the registry and the gadget surface
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Typed helpers for any [`SettingsStore`]
pub trait SettingsExt: SettingsStore {
    fn get_value<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    log::warn!("Ignoring unparseable setting {}={:?}", key, raw);
                    default
                }
            },
            None => default,
        }
    }

    fn set_value<T: ToString>(&self, key: &str, value: T) {
        self.set(key, &value.to_string());
    }
}

impl<S: SettingsStore + ?Sized> SettingsExt for S {}

/// Volatile store, used by tests and when no settings file is wanted
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key);
    }
}

/// Settings backed by a flat JSON object on disk.
///
/// Every write rewrites the file. Write failures are logged and the in-memory
/// value is kept, so the running gadget never observes a failed `set`.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonSettings {
    /// Open a settings file, starting empty if it doesn't exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        log::info!("Loaded {} settings from {}", values.len(), path.display());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Default location under the user's config directory
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "sens-gadget", "sens-gadget")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current values to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = {
            let values = self.values.lock().unwrap_or_else(|p| p.into_inner());
            serde_json::to_string_pretty(&*values)?
        };
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn save_logged(&self) {
        if let Err(e) = self.save() {
            log::warn!("Failed to save settings to {}: {}", self.path.display(), e);
        }
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let changed = {
            let mut values = self.values.lock().unwrap_or_else(|p| p.into_inner());
            values.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        };
        if changed {
            self.save_logged();
        }
    }

    fn remove(&self, key: &str) {
        let removed = self
            .values
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key)
            .is_some();
        if removed {
            self.save_logged();
        }
    }
}
