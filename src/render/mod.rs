//! Report table renderer
//!
//! Turns an ordered body of label/value rows and dividers into the framed
//! box-drawing report. Rendering is pure: the same body and layout always
//! produce byte-identical output, and nothing is shared between calls.

pub mod bar;
pub mod frame;
pub mod row;
pub mod width;

pub use bar::{bar_graph, UsageRatio};
pub use frame::{DividerPosition, Frame};
pub use row::{fit, format_row};
pub use width::{negotiate, Widths};

use crate::error::{Column, RenderError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "UNITED STATES GRAPHICS COMPANY";
pub const DEFAULT_SUBTITLE: &str = "TR-100 MACHINE REPORT";

/// Column count of a string as the table sees it (one per `char`).
pub(crate) fn display_len(text: &str) -> usize {
    text.chars().count()
}

/// One label/value line of the report body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub label: String,
    pub value: String,
}

impl MetricRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A row with no label, continuing the value of the row above it.
    pub fn continuation(value: impl Into<String>) -> Self {
        Self::new(String::new(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Row(MetricRow),
    Divider,
}

/// Ordered report body, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportBody {
    entries: Vec<Entry>,
}

impl ReportBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(Entry::Row(MetricRow::new(label, value)));
        self
    }

    pub fn divider(mut self) -> Self {
        self.entries.push(Entry::Divider);
        self
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<Entry> for ReportBody {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ReportBody {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Column bounds and title lines for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_label_width: usize,
    pub max_label_width: usize,
    pub min_data_width: usize,
    pub max_data_width: usize,
    pub title: String,
    pub subtitle: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_label_width: 5,
            max_label_width: 13,
            min_data_width: 20,
            max_data_width: 32,
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Reject bounds the renderer cannot honor. Inverted bounds are never
    /// swapped silently.
    pub fn validate(&self) -> Result<(), RenderError> {
        check_bounds(Column::Label, self.min_label_width, self.max_label_width)?;
        check_bounds(Column::Data, self.min_data_width, self.max_data_width)
    }
}

fn check_bounds(column: Column, min: usize, max: usize) -> Result<(), RenderError> {
    if min > max {
        return Err(RenderError::InvertedBounds { column, min, max });
    }
    if min == 0 {
        return Err(RenderError::ZeroWidth { column });
    }
    Ok(())
}

/// Render the full framed report.
///
/// The layout is validated before anything is built, so the caller either
/// gets the complete report or an error, never a partial frame.
pub fn render(body: &ReportBody, cfg: &LayoutConfig) -> Result<String, RenderError> {
    cfg.validate()?;

    let widths = negotiate(body, cfg);
    let frame = Frame::new(widths);

    let mut lines = Vec::with_capacity(body.len() + 7);
    lines.extend(frame.top_header());
    lines.push(frame.centered_line(&cfg.title));
    lines.push(frame.centered_line(&cfg.subtitle));
    lines.push(frame.divider(DividerPosition::Top));

    for entry in body {
        lines.push(match entry {
            Entry::Row(row) => format_row(row, widths),
            Entry::Divider => frame.divider(DividerPosition::Middle),
        });
    }

    lines.push(frame.divider(DividerPosition::Bottom));
    lines.push(frame.footer());

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> ReportBody {
        ReportBody::new()
            .row("OS", "Debian 13")
            .divider()
            .row("UPTIME", "2d 3h")
    }

    #[test]
    fn test_render_sample_report() {
        let cfg = LayoutConfig {
            title: "ACME".to_string(),
            subtitle: "REPORT".to_string(),
            ..LayoutConfig::default()
        };
        let out = render(&sample_body(), &cfg).unwrap();
        let expected = "\
┌┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┬┐
├┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┴┤
│             ACME              │
│            REPORT             │
├────────┬──────────────────────┤
│ OS     │ Debian 13            │
├────────┼──────────────────────┤
│ UPTIME │ 2d 3h                │
├────────┴──────────────────────┤
└───────────────────────────────┘
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_line_widths_are_uniform() {
        let out = render(&sample_body(), &LayoutConfig::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 10);
        for line in &lines {
            assert_eq!(line.chars().count(), 33, "{line}");
        }
        let rows = lines.iter().filter(|l| l.starts_with('│') && l.contains(" │ ")).count();
        assert_eq!(rows, 2);
        assert_eq!(lines.iter().filter(|l| l.contains('┼')).count(), 1);
    }

    #[test]
    fn test_render_empty_body() {
        let out = render(&ReportBody::new(), &LayoutConfig::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 7);
        // 5 + 20 + 7
        assert!(lines.iter().all(|l| l.chars().count() == 32));
    }

    #[test]
    fn test_render_is_idempotent() {
        let cfg = LayoutConfig::default();
        let body = sample_body().row("HYPERVISOR", "x".repeat(50));
        assert_eq!(render(&body, &cfg), render(&body, &cfg));
    }

    #[test]
    fn test_inverted_bounds_fail_fast() {
        let cfg = LayoutConfig {
            min_label_width: 14,
            max_label_width: 13,
            ..LayoutConfig::default()
        };
        assert_eq!(
            render(&sample_body(), &cfg),
            Err(RenderError::InvertedBounds {
                column: Column::Label,
                min: 14,
                max: 13
            })
        );

        let cfg = LayoutConfig {
            min_data_width: 40,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(RenderError::InvertedBounds { column: Column::Data, .. })
        ));
    }

    #[test]
    fn test_zero_minimum_rejected() {
        let cfg = LayoutConfig {
            min_data_width: 0,
            ..LayoutConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(RenderError::ZeroWidth { column: Column::Data })
        );
    }

    #[test]
    fn test_dividers_drawn_as_given() {
        let body: ReportBody = [
            Entry::Divider,
            Entry::Row(MetricRow::new("OS", "Debian 13")),
            Entry::Divider,
            Entry::Divider,
        ]
        .into_iter()
        .collect();
        let out = render(&body, &LayoutConfig::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        // comb (2), titles (2), top divider, 4 body entries, bottom divider, footer
        assert_eq!(lines.len(), 11);
        assert!(lines[4].contains('┬'));
        assert!(lines[5].contains('┼'));
        assert_eq!(lines[6], "│ OS    │ Debian 13            │");
        assert!(lines[7].contains('┼'));
        assert!(lines[8].contains('┼'));
        assert!(lines[9].contains('┴'));
        assert!(lines[10].starts_with('└'));
        assert_eq!(lines.iter().filter(|l| l.contains('┼')).count(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 5 + 20 + 7));
    }

    #[test]
    fn test_label_named_divider_is_a_row() {
        let body = ReportBody::new().row("DIVIDER", "");
        let out = render(&body, &LayoutConfig::default()).unwrap();
        assert!(out.contains("│ DIVIDER "));
        assert!(!out.contains('┼'));
    }

    #[test]
    fn test_body_serializes_as_tagged_entries() {
        let json = serde_json::to_string(&sample_body()).unwrap();
        assert_eq!(
            json,
            r#"[{"kind":"row","label":"OS","value":"Debian 13"},{"kind":"divider"},{"kind":"row","label":"UPTIME","value":"2d 3h"}]"#
        );
    }
}
