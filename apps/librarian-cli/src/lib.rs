//! librarian-cli
//!
//! File-backed search snapshots and terminal rendering for the `librarian`
//! binary.

pub mod bars;
pub mod snapshot;

pub use bars::ProgressBars;
pub use snapshot::{FileSearchSource, SearchSnapshot};
