use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use librarian_core::types::ParsedUri;

/// Version key within a site. `Unversioned` sorts before every edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Version {
    Unversioned,
    Edition(u64),
}

impl Version {
    pub fn edition(self) -> Option<u64> {
        match self {
            Self::Unversioned => None,
            Self::Edition(n) => Some(n),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unversioned => f.write_str("unversioned"),
            Self::Edition(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusteredEntry {
    pub uri: String,
    pub descr: String,
    pub parsed: ParsedUri,
}

pub type VersionMap = BTreeMap<Version, Vec<ClusteredEntry>>;

/// `site identity -> version -> entries`.
///
/// Sites iterate in lexicographic order of their identity and versions in
/// ascending order, so the grouping never depends on arrival order. Entries
/// inside one version keep arrival order; exact duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterTree {
    sites: BTreeMap<String, VersionMap>,
    entries: usize,
}

impl ClusterTree {
    pub fn new() -> Self { Self::default() }

    /// Returns false when an identical entry is already in that version.
    pub fn insert(&mut self, site_identity: String, version: Version, entry: ClusteredEntry) -> bool {
        let bucket = self.sites.entry(site_identity).or_default().entry(version).or_default();
        if bucket.iter().any(|e| e.uri == entry.uri && e.descr == entry.descr) {
            return false;
        }
        bucket.push(entry);
        self.entries += 1;
        true
    }

    pub fn sites(&self) -> impl Iterator<Item = (&str, &VersionMap)> {
        self.sites.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn site(&self, site_identity: &str) -> Option<&VersionMap> { self.sites.get(site_identity) }

    pub fn site_count(&self) -> usize { self.sites.len() }

    pub fn entry_count(&self) -> usize { self.entries }

    pub fn is_empty(&self) -> bool { self.entries == 0 }
}
