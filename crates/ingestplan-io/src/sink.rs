//! Destinations for rendered bundle documents.
//!
//! - `FsBundleSink`: writes under a root directory (default for the CLI).
//! - `MemoryBundleSink` (in `memory_sink`): keeps documents in a map, for tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Anything that can store a document at a bundle-relative path.
pub trait BundleSink: Send + Sync {
    fn write(&self, rel_path: &str, contents: &str) -> Result<()>;
}

/// Local filesystem sink rooted at `root`.
#[derive(Debug, Clone)]
pub struct FsBundleSink {
    root: PathBuf,
}

impl FsBundleSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, rel_path: &str) -> Result<PathBuf> {
        let rel = Path::new(rel_path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if rel_path.is_empty() || escapes {
            return Err(Error::Sink(format!(
                "refusing to write outside the bundle root: {rel_path:?}"
            )));
        }
        Ok(self.root.join(rel))
    }
}

impl BundleSink for FsBundleSink {
    fn write(&self, rel_path: &str, contents: &str) -> Result<()> {
        let p = self.resolve(rel_path)?;
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = File::create(&p)?;
        f.write_all(contents.as_bytes())?;
        f.flush()?;
        Ok(())
    }
}
