//! Where spreadsheet bytes come from.
//!
//! Network retrieval of published sheets lives outside this workspace; a
//! host wires its fetcher in by implementing [`DataSource`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Fetches the raw bytes of a tabular source.
pub trait DataSource: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Reads sources as files below a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, location: &str) -> PathBuf {
        self.root.join(location)
    }
}

impl DataSource for FileSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.path_for(location);
        std::fs::read(&path)
            .map_err(|error| IngestError::fetch(location, format!("{}: {error}", path.display())))
    }
}

/// In-memory sources keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(location, contents);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.entries.insert(location.into(), contents.into());
    }

    pub fn remove(&mut self, location: &str) -> Option<Vec<u8>> {
        self.entries.remove(location)
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        self.entries
            .get(location)
            .cloned()
            .ok_or_else(|| IngestError::fetch(location, "source not available"))
    }
}
