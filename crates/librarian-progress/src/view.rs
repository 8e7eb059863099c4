use serde::Serialize;
use std::fmt;

use librarian_core::types::RequestState;

/// Progress column of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressCell {
    /// Done, or nothing quantifiable yet.
    Indeterminate,
    /// `value` is in `0..=100`; `is_final` is false while the total is an estimate.
    Percent { value: u8, is_final: bool },
}

impl ProgressCell {
    pub fn percent(&self) -> Option<u8> {
        match self {
            Self::Indeterminate => None,
            Self::Percent { value, .. } => Some(*value),
        }
    }
}

impl fmt::Display for ProgressCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indeterminate => Ok(()),
            Self::Percent { value, is_final: true } => write!(f, "{}%", value),
            Self::Percent { value, is_final: false } => write!(f, "~{}% (fetch length unknown)", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressRow {
    pub label: String,
    pub stage: String,
    pub state: RequestState,
    pub progress: ProgressCell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedProgress {
    pub index: String,
    pub view: ProgressView,
}

/// Rendered request tree. Mirrors the input shape: leaves become rows,
/// per-index fanouts keep one labelled group per child, plain fanouts are
/// flattened into their children's views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum ProgressView {
    Row(ProgressRow),
    Indexed(Vec<IndexedProgress>),
    Flat(Vec<ProgressView>),
    /// The walk stopped here because the tree was deeper than allowed.
    Truncated(String),
}

impl ProgressView {
    /// All rows in display order.
    pub fn rows(&self) -> Vec<&ProgressRow> {
        let mut out = Vec::new();
        self.collect_rows(&mut out);
        out
    }

    fn collect_rows<'a>(&'a self, out: &mut Vec<&'a ProgressRow>) {
        match self {
            Self::Row(row) => out.push(row),
            Self::Indexed(groups) => groups.iter().for_each(|g| g.view.collect_rows(out)),
            Self::Flat(views) => views.iter().for_each(|v| v.collect_rows(out)),
            Self::Truncated(_) => {}
        }
    }

    /// Plain-text table, one line per row, indented under index labels.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.write_text(0, &mut out);
        out
    }

    fn write_text(&self, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        match self {
            Self::Row(row) => {
                let cell = row.progress.to_string();
                if cell.is_empty() {
                    out.push_str(&format!("{}{} | {}\n", pad, row.label, row.stage));
                } else {
                    out.push_str(&format!("{}{} | {} | {}\n", pad, row.label, row.stage, cell));
                }
            }
            Self::Indexed(groups) => {
                for g in groups {
                    out.push_str(&format!("{}[{}]\n", pad, g.index));
                    g.view.write_text(indent + 1, out);
                }
            }
            Self::Flat(views) => views.iter().for_each(|v| v.write_text(indent, out)),
            Self::Truncated(subject) => out.push_str(&format!("{}{} | ...\n", pad, subject)),
        }
    }
}
