//! Presentation order of a `ClusterTree`.
//!
//! Per site the highest version is shown directly; every earlier version goes
//! into a collapsible "older versions" block whose initial visibility is
//! `show_old`. A version only gets its own heading when `GroupingRule` says
//! so, otherwise its entries sit directly under the site.

use serde::Serialize;

use librarian_core::config::{GroupingSettings, PresentationSettings};
use librarian_core::traits::UriCanonicalizer;

use crate::tree::{ClusterTree, ClusteredEntry, Version};

/// Descriptions that mean "no title".
const NOT_AVAILABLE: &str = "not available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingRule {
    pub min_entries: usize,
    pub min_versions: usize,
}

impl Default for GroupingRule {
    fn default() -> Self { Self::from_settings(&GroupingSettings::default()) }
}

impl GroupingRule {
    pub fn from_settings(settings: &GroupingSettings) -> Self {
        Self { min_entries: settings.min_entries, min_versions: settings.min_versions }
    }

    pub fn groups(&self, entries_in_version: usize, versions_in_site: usize) -> bool {
        entries_in_version >= self.min_entries || versions_in_site >= self.min_versions
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationOptions {
    pub show_old: bool,
    /// Client can toggle blocks, so the "older versions" link is useful.
    pub scripting: bool,
    pub grouping: GroupingRule,
}

impl PresentationOptions {
    pub fn from_settings(settings: &PresentationSettings) -> Self {
        Self {
            show_old: settings.show_old,
            scripting: settings.scripting,
            grouping: GroupingRule::from_settings(&settings.grouping),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryLine {
    pub title: String,
    pub href: String,
    pub display: String,
    pub uri: String,
    pub edition_href: Option<String>,
    pub newest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionHeading {
    pub label: String,
    /// Number of older versions behind the "show older" link, if shown.
    pub older_link: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionBlock {
    pub version: Version,
    pub heading: Option<VersionHeading>,
    pub entries: Vec<EntryLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OlderVersions {
    pub visible: bool,
    pub versions: Vec<VersionBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteBlock {
    pub site_identity: String,
    pub heading: String,
    pub older: Option<OlderVersions>,
    pub newest: VersionBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsLayout {
    pub sites: Vec<SiteBlock>,
    pub total_count: usize,
}

impl ResultsLayout {
    pub fn build<C>(tree: &ClusterTree, canonicalizer: &C, options: &PresentationOptions) -> Self
    where
        C: UriCanonicalizer + ?Sized,
    {
        let mut total_count = 0;
        let mut sites = Vec::with_capacity(tree.site_count());
        for (site_identity, versions) in tree.sites() {
            let heading = site_heading(site_identity).to_string();
            let version_count = versions.len();
            let mut blocks: Vec<VersionBlock> = versions
                .iter()
                .enumerate()
                .map(|(i, (version, entries))| {
                    let newest = i + 1 == version_count;
                    let version_heading = options.grouping.groups(entries.len(), version_count).then(|| VersionHeading {
                        label: version_label(&heading, *version),
                        older_link: (newest && !options.show_old && options.scripting && version_count > 1)
                            .then_some(version_count - 1),
                    });
                    let entries: Vec<EntryLine> =
                        entries.iter().map(|e| entry_line(e, canonicalizer, newest)).collect();
                    total_count += entries.len();
                    VersionBlock { version: *version, heading: version_heading, entries }
                })
                .collect();
            let Some(newest) = blocks.pop() else { continue };
            let older = (!blocks.is_empty()).then(|| OlderVersions { visible: options.show_old, versions: blocks });
            sites.push(SiteBlock { site_identity: site_identity.to_string(), heading, older, newest });
        }
        Self { sites, total_count }
    }

    /// Plain-text listing, older versions marked and indented.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for site in &self.sites {
            out.push_str(&format!("== {}\n", site.heading));
            if let Some(older) = &site.older {
                let state = if older.visible { "shown" } else { "hidden" };
                out.push_str(&format!("  -- {} older version(s), {}\n", older.versions.len(), state));
                if older.visible {
                    older.versions.iter().for_each(|v| write_version(v, "    ", &mut out));
                }
            }
            write_version(&site.newest, "  ", &mut out);
        }
        out.push_str(&format!("Found {} results\n", self.total_count));
        out
    }
}

fn write_version(block: &VersionBlock, pad: &str, out: &mut String) {
    let mut entry_pad = pad.to_string();
    if let Some(h) = &block.heading {
        match h.older_link {
            Some(n) => out.push_str(&format!("{}{} [{} older matching versions]\n", pad, h.label, n)),
            None => out.push_str(&format!("{}{}\n", pad, h.label)),
        }
        entry_pad.push_str("  ");
    }
    for e in &block.entries {
        out.push_str(&format!("{}{}\n{}  {}", entry_pad, e.title, entry_pad, e.display));
        if let Some(href) = &e.edition_href {
            out.push_str(&format!(" [USK {}]", href));
        }
        out.push('\n');
    }
}

/// Last path segment of a site identity.
fn site_heading(site_identity: &str) -> &str { site_identity.rsplit('/').next().unwrap_or(site_identity) }

fn version_label(heading: &str, version: Version) -> String {
    match version.edition() {
        Some(n) => format!("{}-{}", heading, n),
        None => heading.to_string(),
    }
}

fn entry_line<C: UriCanonicalizer + ?Sized>(entry: &ClusteredEntry, canonicalizer: &C, newest: bool) -> EntryLine {
    let display = canonicalizer.display_form(&entry.parsed);
    let title = if entry.descr.trim().is_empty() || entry.descr == NOT_AVAILABLE {
        display.clone()
    } else {
        entry.descr.clone()
    };
    EntryLine {
        title,
        href: format!("/{}", entry.uri),
        display,
        uri: entry.uri.clone(),
        edition_href: entry.parsed.edition_uri.as_ref().map(|u| format!("/{}", u)),
        newest,
    }
}
