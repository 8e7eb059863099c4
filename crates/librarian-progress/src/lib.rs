//! librarian-progress
//!
//! Rolls a request tree up into display-ready progress rows. See `aggregator`
//! for the walk and `view` for the output tree.

pub mod aggregator;
pub mod view;

pub use aggregator::{index_label, is_index_fanout_subject, percentage, ProgressAggregator};
pub use view::{IndexedProgress, ProgressCell, ProgressRow, ProgressView};
