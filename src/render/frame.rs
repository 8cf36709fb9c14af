//! Box-drawing frame: header comb, title lines, dividers and footer

use super::{display_len, Widths};

pub const TOP_LEFT: char = '┌';
pub const TOP_RIGHT: char = '┐';
pub const BOTTOM_LEFT: char = '└';
pub const BOTTOM_RIGHT: char = '┘';
pub const HORIZONTAL: char = '─';
pub const VERTICAL: char = '│';
pub const DOWN_TEE: char = '┬';
pub const UP_TEE: char = '┴';
pub const LEFT_TEE: char = '├';
pub const RIGHT_TEE: char = '┤';
pub const CROSS: char = '┼';

/// Where a horizontal rule sits relative to the column split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerPosition {
    /// Opens the columns under the title block.
    Top,
    /// Between two groups of body rows.
    Middle,
    /// Closes the columns above the footer.
    Bottom,
}

impl DividerPosition {
    fn junction(self) -> char {
        match self {
            DividerPosition::Top => DOWN_TEE,
            DividerPosition::Middle => CROSS,
            DividerPosition::Bottom => UP_TEE,
        }
    }
}

fn run(glyph: char, count: usize) -> impl Iterator<Item = char> {
    std::iter::repeat(glyph).take(count)
}

/// Draws frame lines for a fixed pair of column widths.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    widths: Widths,
}

impl Frame {
    pub fn new(widths: Widths) -> Self {
        Self { widths }
    }

    /// The two-line comb that opens every report: `┌┬┬…┐` over `├┴┴…┤`.
    pub fn top_header(&self) -> [String; 2] {
        let inner = self.widths.inner();
        let comb: String = std::iter::once(TOP_LEFT)
            .chain(run(DOWN_TEE, inner))
            .chain(std::iter::once(TOP_RIGHT))
            .collect();
        let teeth: String = std::iter::once(LEFT_TEE)
            .chain(run(UP_TEE, inner))
            .chain(std::iter::once(RIGHT_TEE))
            .collect();
        [comb, teeth]
    }

    /// A horizontal rule with its junction over the column split.
    pub fn divider(&self, position: DividerPosition) -> String {
        std::iter::once(LEFT_TEE)
            .chain(run(HORIZONTAL, self.widths.label + 2))
            .chain(std::iter::once(position.junction()))
            .chain(run(HORIZONTAL, self.widths.data + 2))
            .chain(std::iter::once(RIGHT_TEE))
            .collect()
    }

    pub fn footer(&self) -> String {
        std::iter::once(BOTTOM_LEFT)
            .chain(run(HORIZONTAL, self.widths.inner()))
            .chain(std::iter::once(BOTTOM_RIGHT))
            .collect()
    }

    /// `text` centered between the outer borders, extra space on the right.
    /// Overlong text is cut hard without an ellipsis.
    pub fn centered_line(&self, text: &str) -> String {
        let inner = self.widths.inner();
        let text: String = text.chars().take(inner).collect();
        let slack = inner - display_len(&text);
        let left = slack / 2;
        let right = slack - left;

        let mut line = String::with_capacity(text.len() + inner + 2 * VERTICAL.len_utf8());
        line.push(VERTICAL);
        line.extend(run(' ', left));
        line.push_str(&text);
        line.extend(run(' ', right));
        line.push(VERTICAL);
        line
    }
}
