use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use librarian_progress::{ProgressCell, ProgressView};

const FINAL_TEMPLATE: &str = "{msg:50} [{bar:30.green/white}] {pos:>3}%";
const PROVISIONAL_TEMPLATE: &str = "{msg:50} [{bar:30.yellow/white}] ~{pos:>2}% (fetch length unknown)";
const IDLE_TEMPLATE: &str = "{msg:50} {spinner:.blue}";

/// Terminal bars for the rows of a `ProgressView`, one bar per leaf. Bars
/// are reused across polls so the display updates in place; bars for rows
/// that disappeared are cleared.
pub struct ProgressBars {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
    final_style: ProgressStyle,
    provisional_style: ProgressStyle,
    idle_style: ProgressStyle,
}

impl ProgressBars {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            multi: MultiProgress::new(),
            bars: Vec::new(),
            final_style: ProgressStyle::with_template(FINAL_TEMPLATE)?.progress_chars("#>-"),
            provisional_style: ProgressStyle::with_template(PROVISIONAL_TEMPLATE)?.progress_chars("=>-"),
            idle_style: ProgressStyle::with_template(IDLE_TEMPLATE)?,
        })
    }

    pub fn update(&mut self, view: &ProgressView) {
        let rows = view.rows();
        if self.bars.len() > rows.len() {
            for bar in self.bars.drain(rows.len()..) {
                bar.finish_and_clear();
                self.multi.remove(&bar);
            }
        }
        while self.bars.len() < rows.len() {
            self.bars.push(self.multi.add(ProgressBar::new(100)));
        }
        for (bar, row) in self.bars.iter().zip(rows) {
            bar.set_message(format!("{} | {}", row.label, row.stage));
            match row.progress {
                ProgressCell::Percent { value, is_final } => {
                    bar.set_style(if is_final { self.final_style.clone() } else { self.provisional_style.clone() });
                    bar.set_position(u64::from(value));
                }
                ProgressCell::Indeterminate => {
                    bar.set_style(self.idle_style.clone());
                    bar.tick();
                }
            }
        }
    }

    /// Bars currently on screen.
    pub fn len(&self) -> usize { self.bars.len() }

    pub fn is_empty(&self) -> bool { self.bars.is_empty() }

    pub fn finish(&self) {
        for bar in &self.bars {
            bar.finish();
        }
    }
}
