//! Column width negotiation

use super::{display_len, Entry, LayoutConfig};

/// Shared column widths for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widths {
    pub label: usize,
    pub data: usize,
}

impl Widths {
    /// Width of every emitted line, both outer border glyphs included.
    pub fn line(&self) -> usize {
        self.label + self.data + 7
    }

    /// Width of the run between the two outer border glyphs.
    pub fn inner(&self) -> usize {
        self.label + self.data + 5
    }
}

/// Compute label and data widths from observed content, clamped to the
/// configured bounds. Dividers contribute nothing; an empty body collapses
/// to the configured minimums.
///
/// Bounds are assumed valid (see [`LayoutConfig::validate`]).
pub fn negotiate<'a, I>(entries: I, cfg: &LayoutConfig) -> Widths
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut label_max = 0;
    let mut data_max = 0;

    for entry in entries {
        if let Entry::Row(row) = entry {
            label_max = label_max.max(display_len(&row.label));
            data_max = data_max.max(display_len(&row.value));
        }
    }

    Widths {
        label: label_max.clamp(cfg.min_label_width, cfg.max_label_width),
        data: data_max.clamp(cfg.min_data_width, cfg.max_data_width),
    }
}
