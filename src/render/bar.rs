//! Usage bar graphs

use serde::{Deserialize, Serialize};

pub const FILLED: char = '█';
pub const EMPTY: char = '░';

/// A used/total pair in a shared unit (load vs. cores, bytes vs. bytes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageRatio {
    pub used: f64,
    pub total: f64,
}

impl UsageRatio {
    pub fn new(used: f64, total: f64) -> Self {
        Self { used, total }
    }

    /// Percentage clamped to `0..=100`; zero when there is no total.
    pub fn percent(&self) -> f64 {
        if self.total <= 0.0 || !self.total.is_finite() || !self.used.is_finite() {
            return 0.0;
        }
        (self.used / self.total * 100.0).clamp(0.0, 100.0)
    }

    pub fn bar(&self, width: usize) -> String {
        bar_graph(self.used, self.total, width)
    }
}

/// Render `width` glyphs with the filled share leading.
///
/// A non-positive total yields an all-empty bar. The filled count rounds
/// half up, so exactly 50% of an even width fills exactly half.
pub fn bar_graph(used: f64, total: f64, width: usize) -> String {
    let percent = UsageRatio::new(used, total).percent();
    let filled = ((percent / 100.0 * width as f64).round() as usize).min(width);
    let empty = width - filled;

    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(empty));
    bar
}
