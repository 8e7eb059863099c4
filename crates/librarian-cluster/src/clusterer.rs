use librarian_core::diagnostics::Diagnostics;
use librarian_core::traits::UriCanonicalizer;
use librarian_core::types::RawEntry;

use crate::tree::{ClusterTree, ClusteredEntry, Version};

/// Groups a result collection by site identity and edition.
pub struct ResultClusterer<'a, C: UriCanonicalizer + ?Sized> {
    canonicalizer: &'a C,
}

impl<'a, C: UriCanonicalizer + ?Sized> ResultClusterer<'a, C> {
    pub fn new(canonicalizer: &'a C) -> Self { Self { canonicalizer } }

    /// Entries whose URI does not parse are skipped and reported to
    /// `diagnostics`; the pass itself never fails.
    pub fn cluster<I>(&self, entries: I, diagnostics: &mut Diagnostics) -> ClusterTree
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut tree = ClusterTree::new();
        let mut seen = 0usize;
        let mut duplicates = 0usize;
        let skipped_before = diagnostics.len();
        for RawEntry { uri, descr } in entries {
            seen += 1;
            let parsed = match self.canonicalizer.parse(&uri) {
                Ok(parsed) => parsed,
                Err(error) => {
                    diagnostics.report(error);
                    continue;
                }
            };
            let version = match parsed.edition {
                Some(edition) if parsed.is_alias() => Version::Edition(edition),
                _ => Version::Unversioned,
            };
            let site = parsed.site_identity.clone();
            tracing::debug!(%site, %version, uri = %parsed.uri, "clustered result");
            let entry = ClusteredEntry { uri: parsed.uri.clone(), descr, parsed };
            if !tree.insert(site, version, entry) {
                duplicates += 1;
            }
        }
        tracing::info!(
            seen,
            kept = tree.entry_count(),
            sites = tree.site_count(),
            skipped = diagnostics.len() - skipped_before,
            duplicates,
            "clustered search results"
        );
        tree
    }
}
