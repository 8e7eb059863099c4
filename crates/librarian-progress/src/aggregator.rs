use regex::Regex;
use std::sync::LazyLock;

use librarian_core::config::ProgressSettings;
use librarian_core::types::{FanoutKind, RequestNode};

use crate::view::{IndexedProgress, ProgressCell, ProgressRow, ProgressView};

/// Subject of an untagged node that searches several indexes at once:
/// `<query>%<index>` followed by more space or semicolon separated indexes.
static INDEX_FANOUT_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+%.+[ ;].+$").expect("index fanout regex"));

/// Turns request tree snapshots into `ProgressView`s. Stateless apart from
/// the depth cap; safe to call on every poll.
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    max_depth: usize,
}

impl Default for ProgressAggregator {
    fn default() -> Self { Self::from_settings(&ProgressSettings::default()) }
}

impl ProgressAggregator {
    pub fn new(max_depth: usize) -> Self { Self { max_depth: max_depth.max(1) } }

    pub fn from_settings(settings: &ProgressSettings) -> Self { Self::new(settings.max_depth) }

    pub fn render(&self, node: &RequestNode) -> ProgressView { self.render_at(node, 0) }

    fn render_at(&self, node: &RequestNode, depth: usize) -> ProgressView {
        if depth >= self.max_depth {
            tracing::warn!(subject = %node.subject, depth, "request tree deeper than max_depth, truncating");
            return ProgressView::Truncated(node.subject.clone());
        }
        let Some(fanout) = node.fanout.as_ref() else {
            return ProgressView::Row(leaf_row(node));
        };
        let kind = fanout.kind.unwrap_or_else(|| {
            if is_index_fanout_subject(&node.subject) { FanoutKind::PerIndex } else { FanoutKind::Plain }
        });
        match kind {
            FanoutKind::PerIndex => ProgressView::Indexed(
                fanout
                    .sub_requests
                    .iter()
                    .map(|child| IndexedProgress {
                        index: index_label(&child.subject).to_string(),
                        view: self.render_at(child, depth + 1),
                    })
                    .collect(),
            ),
            FanoutKind::Plain => ProgressView::Flat(
                fanout.sub_requests.iter().map(|child| self.render_at(child, depth + 1)).collect(),
            ),
        }
    }
}

/// Row for a leaf. Every counter is read exactly once.
fn leaf_row(node: &RequestNode) -> ProgressRow {
    let state = node.state.clone();
    let done = node.parts_done;
    let total = node.parts_total;
    let total_is_final = node.total_is_final;

    let stage = if state.has_stage() { node.current_stage.clone() } else { state.to_string() };
    let progress = match percentage(done, total) {
        Some(value) if !state.is_done() => ProgressCell::Percent { value, is_final: total_is_final },
        _ => ProgressCell::Indeterminate,
    };
    ProgressRow { label: node.subject.clone(), stage, state, progress }
}

/// `floor(100 * done / total)`, clamped to 100 when a torn snapshot has
/// `done > total`. `None` when `total` is zero.
pub fn percentage(done: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = (u128::from(done) * 100 / u128::from(total)).min(100);
    u8::try_from(pct).ok()
}

/// Whether an untagged fanout's subject names several indexes.
pub fn is_index_fanout_subject(subject: &str) -> bool { INDEX_FANOUT_SUBJECT.is_match(subject) }

/// Index part of a `<query>%<index>` subject; the whole subject if there is none.
pub fn index_label(subject: &str) -> &str { subject.split('%').nth(1).unwrap_or(subject) }
