//! Search snapshots exported by the engine as JSON files.
//!
//! A snapshot directory holds one `<handle>.json` per search. Each file is a
//! `SearchSnapshot`; the engine rewrites it while the search runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use librarian_core::error::{Error, Result};
use librarian_core::traits::SearchSource;
use librarian_core::types::{RawEntry, RequestHandle, RequestNode, RequestState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub indexes: String,
    pub request: RequestNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RawEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::NotFound(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text).map_err(|e| Error::InvalidSnapshot(format!("{}: {}", path.display(), e)))
    }

    pub fn handle(&self) -> RequestHandle { RequestHandle::derive(&self.query, &self.indexes) }

    /// Results of a finished search, or why there are none.
    pub fn into_results(self) -> Result<Vec<RawEntry>> {
        if let Some(error) = self.error {
            return Err(Error::AbortedSearch(error));
        }
        let state = &self.request.state;
        if !state.is_done() {
            return Err(Error::NotFound(format!("search '{}' is still running ({})", self.query, state)));
        }
        if *state != RequestState::Finished {
            return Err(Error::AbortedSearch(format!("search '{}' ended in state {}", self.query, state)));
        }
        Ok(self.results.unwrap_or_default())
    }
}

/// `SearchSource` reading snapshots from disk. Either a directory keyed by
/// handle, or a single pinned file that answers for any handle.
#[derive(Debug, Clone)]
pub struct FileSearchSource {
    dir: PathBuf,
    pinned: Option<PathBuf>,
}

impl FileSearchSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into(), pinned: None } }

    pub fn pinned(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { dir, pinned: Some(file) }
    }

    pub fn path_for(&self, handle: RequestHandle) -> PathBuf {
        match &self.pinned {
            Some(file) => file.clone(),
            None => self.dir.join(format!("{}.json", handle)),
        }
    }

    pub fn read(&self, handle: RequestHandle) -> Result<SearchSnapshot> { SearchSnapshot::load(&self.path_for(handle)) }
}

impl SearchSource for FileSearchSource {
    fn snapshot(&self, handle: RequestHandle) -> Result<RequestNode> { Ok(self.read(handle)?.request) }

    fn results(&self, handle: RequestHandle) -> Result<Vec<RawEntry>> { self.read(handle)?.into_results() }
}
