use ratatui::layout::Alignment;
use ratatui::text::{Line, Span};

use crate::core::message::Turn;
use crate::ui::markdown::{render_markdown, render_plain};
use crate::ui::theme::Theme;
use crate::ui::wrap::wrap_lines;

pub const ASSISTANT_PREFIX: &str = "🤖 ";
pub const USER_PREFIX: &str = "You: ";
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Everything the transcript view needs for one frame.
pub struct TranscriptView<'a> {
    pub turns: &'a [Turn],
    pub banner: &'a [String],
    pub theme: &'a Theme,
    /// Spinner frame index while a reply is outstanding
    pub pending_frame: Option<usize>,
}

/// Build wrapped transcript rows for a viewport `width` cells wide.
///
/// User turns are right-aligned and wrap at three quarters of the width;
/// replies use the full width.
pub fn build_display_lines(view: &TranscriptView<'_>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let user_width = (width * 3 / 4).max(1);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for row in view.banner {
        lines.push(
            Line::from(Span::styled(row.clone(), view.theme.banner_style))
                .alignment(Alignment::Center),
        );
    }
    if !view.banner.is_empty() {
        lines.push(Line::default());
    }

    for turn in view.turns {
        match turn {
            Turn::User(content) => {
                let rendered = user_lines(content, view.theme)
                    .into_iter()
                    .map(|line| line.alignment(Alignment::Right))
                    .collect();
                lines.extend(wrap_lines(rendered, user_width));
            }
            Turn::Assistant(_) => {
                lines.extend(wrap_lines(assistant_lines(turn, view.theme), width));
            }
        }
        lines.push(Line::default());
    }

    if let Some(frame) = view.pending_frame {
        let spinner = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
        lines.push(Line::from(vec![
            Span::styled(ASSISTANT_PREFIX, view.theme.assistant_text_style),
            Span::styled(
                format!("{spinner} Waiting for the assistant…"),
                view.theme.pending_indicator_style,
            ),
        ]));
    }

    lines
}

fn user_lines(content: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = render_plain(content, theme.user_text_style);
    if let Some(first) = lines.first_mut() {
        first
            .spans
            .insert(0, Span::styled(USER_PREFIX, theme.user_prefix_style));
    }
    lines
}

fn assistant_lines(turn: &Turn, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = if turn.is_error() {
        render_plain(turn.text(), theme.error_text_style)
    } else {
        render_markdown(turn.text(), theme.assistant_text_style, theme)
    };
    if lines.is_empty() {
        lines.push(Line::default());
    }
    lines[0]
        .spans
        .insert(0, Span::styled(ASSISTANT_PREFIX, theme.assistant_text_style));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::GatewayResult;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn view<'a>(turns: &'a [Turn], banner: &'a [String], theme: &'a Theme) -> TranscriptView<'a> {
        TranscriptView {
            turns,
            banner,
            theme,
            pending_frame: None,
        }
    }

    #[test]
    fn user_turns_are_right_aligned_and_replies_are_prefixed() {
        let theme = Theme::dark_default();
        let turns = vec![
            Turn::user("Hello"),
            Turn::assistant(GatewayResult::reply("**Hi** there")),
        ];

        let lines = build_display_lines(&view(&turns, &[], &theme), 80);

        assert_eq!(text(&lines[0]), "You: Hello");
        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        assert_eq!(text(&lines[1]), "");
        assert_eq!(text(&lines[2]), "🤖 Hi there");
        assert_eq!(lines[2].alignment, None);
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn error_replies_are_not_parsed_as_markdown() {
        let theme = Theme::dark_default();
        let turns = vec![
            Turn::user("ping"),
            Turn::assistant(GatewayResult::failure("HTTP 502 Bad Gateway: **upstream**")),
        ];

        let lines = build_display_lines(&view(&turns, &[], &theme), 200);

        assert_eq!(
            text(&lines[2]),
            "🤖 Error: Failed to connect to the LLM - HTTP 502 Bad Gateway: **upstream**"
        );
        assert_eq!(lines[2].spans[1].style, theme.error_text_style);
    }

    #[test]
    fn banner_is_centered_above_transcript() {
        let theme = Theme::dark_default();
        let banner = vec!["/\\_/\\".to_string(), "( o.o )".to_string()];

        let lines = build_display_lines(&view(&[], &banner, &theme), 40);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].alignment, Some(Alignment::Center));
        assert_eq!(text(&lines[1]), "( o.o )");
    }

    #[test]
    fn pending_reply_shows_spinner() {
        let theme = Theme::dark_default();
        let turns = vec![Turn::user("Hello")];
        let mut pending = view(&turns, &[], &theme);
        pending.pending_frame = Some(1);

        let lines = build_display_lines(&pending, 80);

        assert_eq!(
            text(lines.last().expect("spinner row")),
            "🤖 ⠙ Waiting for the assistant…"
        );
    }

    #[test]
    fn long_user_messages_wrap_at_three_quarters_width() {
        let theme = Theme::dark_default();
        let turns = vec![Turn::user("aaaa bbbb cccc dddd")];

        let lines = build_display_lines(&view(&turns, &[], &theme), 20);

        assert_eq!(text(&lines[0]), "You: aaaa bbbb");
        assert_eq!(text(&lines[1]), "cccc dddd");
        assert!(lines[..2]
            .iter()
            .all(|line| line.alignment == Some(Alignment::Right)));
    }

    #[test]
    fn empty_reply_still_gets_a_row() {
        let theme = Theme::dark_default();
        let turns = vec![Turn::assistant(GatewayResult::reply(""))];

        let lines = build_display_lines(&view(&turns, &[], &theme), 20);

        assert_eq!(text(&lines[0]), "🤖 ");
    }
}
