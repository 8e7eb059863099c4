//! librarian-cluster
//!
//! Groups a finished search's results by site and edition (`clusterer`,
//! `tree`) and derives the order they are shown in (`layout`). `keys` holds a
//! canonicalizer for Freenet-style content keys.

pub mod clusterer;
pub mod keys;
pub mod layout;
pub mod tree;

pub use clusterer::ResultClusterer;
pub use keys::FreenetKeys;
pub use layout::{EntryLine, GroupingRule, OlderVersions, PresentationOptions, ResultsLayout, SiteBlock, VersionBlock, VersionHeading};
pub use tree::{ClusterTree, ClusteredEntry, Version};
