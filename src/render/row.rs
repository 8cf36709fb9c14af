//! Body row formatting

use super::frame::VERTICAL;
use super::{display_len, MetricRow, Widths};

const ELLIPSIS: &str = "...";

/// Fit `text` to exactly `width` columns: right-pad when short, cut and
/// append `...` when long.
///
/// Widths of 3 or less keep a single character before the ellipsis, so the
/// result overflows rather than slicing to a negative length.
pub fn fit(text: &str, width: usize) -> String {
    let len = display_len(text);
    if len > width {
        let keep = width.saturating_sub(ELLIPSIS.len()).max(1);
        let mut cut: String = text.chars().take(keep).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        let mut padded = String::with_capacity(text.len() + width - len);
        padded.push_str(text);
        padded.extend(std::iter::repeat(' ').take(width - len));
        padded
    }
}

/// One framed body line: `│ label │ value │`.
pub fn format_row(row: &MetricRow, widths: Widths) -> String {
    format!(
        "{v} {} {v} {} {v}",
        fit(&row.label, widths.label),
        fit(&row.value, widths.data),
        v = VERTICAL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTHS: Widths = Widths { label: 13, data: 32 };

    #[test]
    fn test_short_label_is_padded() {
        assert_eq!(fit("HYPERVISOR", 13), "HYPERVISOR   ");
    }

    #[test]
    fn test_long_value_is_truncated_with_ellipsis() {
        let value = "x".repeat(40);
        let fitted = fit(&value, 32);
        assert_eq!(fitted.len(), 32);
        assert_eq!(fitted, format!("{}...", "x".repeat(29)));
    }

    #[test]
    fn test_exact_length_unchanged() {
        assert_eq!(fit("ABCDE", 5), "ABCDE");
    }

    #[test]
    fn test_degenerate_width_keeps_one_char() {
        assert_eq!(fit("HOSTNAME", 3), "H...");
        assert_eq!(fit("HOSTNAME", 1), "H...");
    }

    #[test]
    fn test_empty_value_renders_blank_cell() {
        let line = format_row(&MetricRow::new("", ""), WIDTHS);
        assert_eq!(line, format!("│ {} │ {} │", " ".repeat(13), " ".repeat(32)));
    }

    #[test]
    fn test_row_assembly() {
        let widths = Widths { label: 6, data: 20 };
        let line = format_row(&MetricRow::new("OS", "Debian 13"), widths);
        assert_eq!(line, "│ OS     │ Debian 13            │");
        assert_eq!(line.chars().count(), 33);
    }

    #[test]
    fn test_multibyte_truncation_is_char_aligned() {
        let fitted = fit(&"█".repeat(40), 32);
        assert_eq!(fitted.chars().count(), 32);
        assert!(fitted.ends_with("..."));
    }

    proptest! {
        #[test]
        fn prop_row_width_is_constant(label in "\\PC{0,40}", value in "\\PC{0,60}") {
            let line = format_row(&MetricRow::new(label, value), WIDTHS);
            prop_assert_eq!(line.chars().count(), WIDTHS.line());
        }
    }
}
