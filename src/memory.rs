//! Key-value memory
//!
//! A single JSON object on disk. Every operation reloads the whole file, mutates it and
//! writes it back; the last write wins.

use crate::error::JarvisResult;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reply for a key that was never remembered
pub const RECALL_MISS: &str = "I don't remember that yet.";

#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: PathBuf,
}

impl MemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn remember(&self, key: &str, value: impl Into<Value>) -> JarvisResult<()> {
        let mut memory = self.load()?;
        memory.insert(key.to_string(), value.into());
        self.save(&memory)?;
        debug!("🧠 Remembered '{}'", key);
        Ok(())
    }

    /// Value stored under `key`, or [`RECALL_MISS`] as a JSON string
    pub fn recall(&self, key: &str) -> JarvisResult<Value> {
        Ok(self
            .load()?
            .remove(key)
            .unwrap_or_else(|| Value::String(RECALL_MISS.to_string())))
    }

    /// Remove `key`. Returns whether it was present.
    pub fn forget(&self, key: &str) -> JarvisResult<bool> {
        let mut memory = self.load()?;
        if memory.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&memory)?;
        debug!("🧠 Forgot '{}'", key);
        Ok(true)
    }

    fn load(&self) -> JarvisResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(
                    "⚠️ Memory file {} is not a JSON object, starting fresh",
                    self.path.display()
                );
                let backup_path = self.path.with_extension("json.corrupt");
                let _ = std::fs::rename(&self.path, backup_path);
                Ok(Map::new())
            }
        }
    }

    fn save(&self, memory: &Map<String, Value>) -> JarvisResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(memory)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Spoken reply for a forget request
pub fn forget_reply(key: &str, existed: bool) -> String {
    if existed {
        format!("Forgot '{}'.", key)
    } else {
        format!("'{}' wasn't in memory.", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, MemoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(dir.path().join("memory.json"));
        (dir, store)
    }

    #[test]
    fn test_remember_then_recall() {
        let (_dir, store) = store();
        store.remember("x", "y").unwrap();
        assert_eq!(store.recall("x").unwrap(), json!("y"));
    }

    #[test]
    fn test_forget_then_recall_misses() {
        let (_dir, store) = store();
        store.remember("x", "y").unwrap();
        assert!(store.forget("x").unwrap());
        assert_eq!(store.recall("x").unwrap(), json!(RECALL_MISS));
    }

    #[test]
    fn test_forget_unknown_key() {
        let (_dir, store) = store();
        assert!(!store.forget("nothing").unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_last_write_wins() {
        let (_dir, store) = store();
        store.remember("color", "blue").unwrap();
        store.remember("color", "green").unwrap();
        assert_eq!(store.recall("color").unwrap(), json!("green"));
    }

    #[test]
    fn test_arbitrary_json_values() {
        let (_dir, store) = store();
        store.remember("count", 3).unwrap();
        store.remember("tags", json!(["a", "b"])).unwrap();
        assert_eq!(store.recall("count").unwrap(), json!(3));
        assert_eq!(store.recall("tags").unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_file_is_shared_between_handles() {
        let (_dir, store) = store();
        let other = MemoryStore::new(store.path());
        store.remember("k", "v").unwrap();
        assert_eq!(other.recall("k").unwrap(), json!("v"));
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "[1, 2").unwrap();
        assert_eq!(store.recall("k").unwrap(), json!(RECALL_MISS));
        store.remember("k", "v").unwrap();
        assert_eq!(store.recall("k").unwrap(), json!("v"));
    }

    #[test]
    fn test_forget_reply() {
        assert_eq!(forget_reply("x", true), "Forgot 'x'.");
        assert_eq!(forget_reply("x", false), "'x' wasn't in memory.");
    }
}
