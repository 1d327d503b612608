use crate::fonts::{Font, encodable};

use super::canvas::{CELL_MARGIN, Canvas};

/// Padding reserved above and below every record block.
pub const BLOCK_PADDING: f32 = 2.0;

fn is_blank(text: &str) -> bool {
    encodable(text).trim().is_empty()
}

/// Number of lines `text` takes when written with
/// [`Canvas::write_wrapped_text`] into a box `width` wide: the same greedy
/// wrap, inside the same cell margins. 0 for blank text, otherwise at
/// least 1.
pub fn wrap_line_count<C: Canvas + ?Sized>(canvas: &C, text: &str, font: Font, width: f32) -> usize {
    wrap_lines(canvas, text, font, width - 2.0 * CELL_MARGIN).len()
}

/// Height of a block of lines, each wrapped in its own font into a box
/// `width` wide, plus the top and bottom padding.
pub fn block_height<C: Canvas + ?Sized>(
    canvas: &C,
    lines: &[(&str, Font)],
    width: f32,
    line_height: f32,
) -> f32 {
    let body: f32 = lines
        .iter()
        .map(|&(text, font)| wrap_line_count(canvas, text, font, width) as f32 * line_height)
        .sum();
    BLOCK_PADDING + body + BLOCK_PADDING
}

/// Split a word wider than `max_width` into pieces that each fit, keeping at
/// least one character per piece.
fn break_word<C: Canvas + ?Sized>(canvas: &C, word: &str, font: Font, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && canvas.measure_text_width(&current, font) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy word wrap into lines no wider than `max_width`. Explicit newlines
/// force a break; a word wider than a whole line is broken between
/// characters. Blank text yields no lines.
pub fn wrap_lines<C: Canvas + ?Sized>(canvas: &C, text: &str, font: Font, max_width: f32) -> Vec<String> {
    if is_blank(text) {
        return Vec::new();
    }
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if canvas.measure_text_width(&candidate, font) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if canvas.measure_text_width(word, font) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(canvas, word, font, max_width);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }

    lines
}
