//! Width-aware line wrapping.
//!
//! The transcript is pre-wrapped so the number of rows is known exactly when
//! computing scroll bounds. Words move to the next row whole; a word wider
//! than the row is split by character.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    if line.width() <= width {
        return vec![line];
    }

    let alignment = line.alignment;
    let line_style = line.style;
    let mut rows: Vec<Vec<Span<'static>>> = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut row_width = 0usize;

    for (token, style) in tokenize(&line) {
        let token_width = token.width();
        let is_space = token.chars().all(char::is_whitespace);

        if row_width + token_width <= width {
            if !(is_space && row_width == 0 && !rows.is_empty()) {
                push_piece(&mut row, token, style);
                row_width += token_width;
            }
            continue;
        }

        if is_space {
            // Break here and drop the whitespace at the row boundary
            finish_row(&mut rows, &mut row);
            row_width = 0;
            continue;
        }

        if token_width <= width {
            if !row.is_empty() {
                finish_row(&mut rows, &mut row);
            }
            push_piece(&mut row, token, style);
            row_width = token_width;
            continue;
        }

        for ch in token.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width && !row.is_empty() {
                finish_row(&mut rows, &mut row);
                row_width = 0;
            }
            push_piece(&mut row, ch.to_string(), style);
            row_width += ch_width;
        }
    }
    if !row.is_empty() || rows.is_empty() {
        finish_row(&mut rows, &mut row);
    }

    rows.into_iter()
        .map(|spans| {
            let mut wrapped = Line::from(spans).style(line_style);
            wrapped.alignment = alignment;
            wrapped
        })
        .collect()
}

/// Split spans into alternating word / whitespace runs, keeping span styles.
fn tokenize(line: &Line<'static>) -> Vec<(String, Style)> {
    let mut tokens = Vec::new();
    for span in &line.spans {
        let mut current = String::new();
        let mut current_is_space = None;
        for ch in span.content.chars() {
            let is_space = ch.is_whitespace();
            if current_is_space.is_some_and(|prev| prev != is_space) {
                tokens.push((std::mem::take(&mut current), span.style));
            }
            current_is_space = Some(is_space);
            current.push(ch);
        }
        if !current.is_empty() {
            tokens.push((current, span.style));
        }
    }
    tokens
}

/// Close the row, dropping whitespace left at its end.
fn finish_row(rows: &mut Vec<Vec<Span<'static>>>, row: &mut Vec<Span<'static>>) {
    while let Some(last) = row.last_mut() {
        let trimmed_len = last.content.trim_end().len();
        if trimmed_len == 0 {
            row.pop();
            continue;
        }
        last.content.to_mut().truncate(trimmed_len);
        break;
    }
    rows.push(std::mem::take(row));
}

/// Append text to the row, merging with the previous span when styles match.
fn push_piece(row: &mut Vec<Span<'static>>, text: String, style: Style) {
    if let Some(last) = row.last_mut() {
        if last.style == style {
            last.content.to_mut().push_str(&text);
            return;
        }
    }
    row.push(Span::styled(text, style));
}
