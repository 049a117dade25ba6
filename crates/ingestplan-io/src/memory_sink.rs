//! In-memory bundle sink for testing.
//!
//! Keeps documents in a sorted map so listings are deterministic.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::sink::BundleSink;

/// Thread-safe in-memory sink. Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryBundleSink {
    data: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryBundleSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.lock().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stored paths under `prefix`, sorted.
    pub fn list(&self, prefix: &str) -> Vec<String> {
        self.lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl BundleSink for MemoryBundleSink {
    fn write(&self, rel_path: &str, contents: &str) -> Result<()> {
        self.lock().insert(rel_path.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_get_list() {
        let sink = MemoryBundleSink::new();
        sink.write("pipelines/b.yml", "b").unwrap();
        sink.write("pipelines/a.yml", "a").unwrap();
        sink.write("schemas.yml", "s").unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.get("pipelines/a.yml").as_deref(), Some("a"));
        assert!(!sink.contains("gateways/x.yml"));
        assert_eq!(
            sink.list("pipelines/"),
            vec!["pipelines/a.yml".to_string(), "pipelines/b.yml".to_string()]
        );
    }

    #[test]
    fn clones_share_storage() {
        let sink = MemoryBundleSink::new();
        let other = sink.clone();
        other.write("x", "1").unwrap();
        assert!(sink.contains("x"));
    }
}
