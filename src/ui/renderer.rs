use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::ui::transcript::{build_display_lines, TranscriptView};

const MAX_INPUT_ROWS: u16 = 6;
const INPUT_HINT: &str =
    "Enter to send • Alt+Enter for new line • Ctrl+L to toggle log • Ctrl+C to quit";
const INPUT_HINT_PENDING: &str = "Waiting for the reply • Ctrl+C to quit";

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        area,
    );

    let input_rows = input_area_height(app);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input_rows + 2), // borders
        ])
        .split(area);

    render_title(f, app, chunks[0]);
    render_transcript(f, app, chunks[1]);
    render_input(f, app, chunks[2]);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "{} • hookchat v{} • Logging: {}",
        app.branding.title,
        env!("CARGO_PKG_VERSION"),
        app.logging.get_status_string()
    );
    let line = Line::from(Span::styled(
        truncate_to_width(&title, usize::from(area.width)),
        app.theme.title_style,
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let view = TranscriptView {
        turns: app.session().turns(),
        banner: &app.branding.banner,
        theme: &app.theme,
        pending_frame: app.pending_frame(),
    };
    // Rows are wrapped up front so the scroll bounds are exact
    let lines = build_display_lines(&view, area.width);
    let offset = app.scroll.layout(lines.len(), area.height);

    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let hint = if app.is_awaiting_reply() {
        INPUT_HINT_PENDING
    } else {
        INPUT_HINT
    };
    let inner_width = usize::from(area.width.saturating_sub(4));

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.input_border_style)
        .title(Span::styled(
            truncate_to_width(hint, inner_width),
            app.theme.input_title_style,
        ));
    if let Some(status) = app.status.as_deref() {
        block = block.title_bottom(Span::styled(
            truncate_to_width(status, inner_width),
            app.theme.status_style,
        ));
    }

    app.textarea.set_block(block);
    f.render_widget(&app.textarea, area);
}

fn input_area_height(app: &App) -> u16 {
    let rows = u16::try_from(app.textarea.lines().len()).unwrap_or(MAX_INPUT_ROWS);
    rows.clamp(1, MAX_INPUT_ROWS)
}

/// Cut `text` to at most `max_width` cells, ending in `…` when shortened.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width + 1 > max_width {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push('…');
    out
}
