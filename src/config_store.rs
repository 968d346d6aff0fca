//! Persistent key/value store backing menu toggles.
//!
//! A single JSON object keyed by dotted paths (`ui.animations`), shared with
//! the shell plugin's scripts. Writes are atomic (temp file + rename) so a
//! crash mid-write can never leave a corrupt store behind.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use serde_json::{Map, Value};

use crate::logging::log_debug;

/// Narrow interface the menu core sees; the JSON file is one implementation.
pub trait ConfigStore {
    fn get_bool(&self, key: &str, default: bool) -> bool;
    /// Returns false when the value could not be persisted; the in-memory
    /// state must then still reflect the last successful write.
    fn set_bool(&mut self, key: &str, value: bool) -> bool;
}

/// Resolve the config file location: explicit override, `SHELLMATE_CONFIG`,
/// then `~/.config/shellmate/config.json`.
pub fn resolve_config_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    if let Ok(path) = env::var("SHELLMATE_CONFIG") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("shellmate")
            .join("config.json");
    }
    env::temp_dir().join("shellmate_config.json")
}

/// Dotted-path JSON store. Opening never fails: a missing or corrupt file
/// reads as an empty object, and the first successful write recreates it.
pub struct JsonStore {
    path: PathBuf,
    root: Map<String, Value>,
}

impl JsonStore {
    pub fn open(path: PathBuf) -> Self {
        let root = read_object(&path);
        Self { path, root }
    }

    pub fn open_default(override_path: Option<&Path>) -> Self {
        Self::open(resolve_config_path(override_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, discarding in-memory state. Used after an
    /// external process (backup restore) replaced the file.
    pub fn reload(&mut self) {
        self.root = read_object(&self.path);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Insert and persist. On a failed write the previous value is restored
    /// in memory so the store never claims state it did not save.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        let previous = self.root.insert(key.to_string(), value);
        if self.persist() {
            return true;
        }
        match previous {
            Some(v) => {
                self.root.insert(key.to_string(), v);
            }
            None => {
                self.root.remove(key);
            }
        }
        false
    }

    fn persist(&self) -> bool {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && fs::create_dir_all(parent).is_err() {
                log_debug(&format!("config: cannot create {}", parent.display()));
                return false;
            }
        }
        let mut body = match serde_json::to_string_pretty(&Value::Object(self.root.clone())) {
            Ok(body) => body,
            Err(err) => {
                log_debug(&format!("config: serialize failed: {err}"));
                return false;
            }
        };
        body.push('\n');

        // Temp-then-rename keeps the store intact if we die mid-write.
        let tmp = self
            .path
            .with_extension(format!("tmp.{}", process::id()));
        if let Err(err) = fs::write(&tmp, body.as_bytes()) {
            log_debug(&format!("config: write {} failed: {err}", tmp.display()));
            return false;
        }
        if let Err(err) = fs::rename(&tmp, &self.path) {
            log_debug(&format!("config: rename into place failed: {err}"));
            let _ = fs::remove_file(&tmp);
            return false;
        }
        true
    }
}

impl ConfigStore for JsonStore {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(other) => {
                log_debug(&format!("config: {key} holds non-bool {other}, using default"));
                default
            }
            None => default,
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> bool {
        self.set(key, Value::Bool(value))
    }
}

fn read_object(path: &Path) -> Map<String, Value> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return Map::new(),
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log_debug(&format!("config: {} is not a JSON object", path.display()));
            Map::new()
        }
        Err(err) => {
            log_debug(&format!("config: {} unreadable: {err}", path.display()));
            Map::new()
        }
    }
}
