use ratatui::style::{Color, Modifier, Style};

pub const THEME_NAMES: &[&str] = &["dark", "light"];

#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,
    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,
    pub banner_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_code_style: Style,
    pub md_link_style: Style,
    pub md_quote_style: Style,
    pub md_html_style: Style,

    // Chrome
    pub title_style: Style,
    pub pending_indicator_style: Style,
    pub status_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Reset,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),
            banner_style: Style::default().fg(Color::LightBlue),

            md_heading_style: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::LightGreen),
            md_link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            md_quote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            md_html_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            pending_indicator_style: Style::default().fg(Color::White),
            status_style: Style::default().fg(Color::Yellow),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::Reset,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),
            banner_style: Style::default().fg(Color::Blue),

            md_heading_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::Green),
            md_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            md_quote_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            md_html_style: Style::default().fg(Color::Gray),

            title_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            pending_indicator_style: Style::default().fg(Color::Black),
            status_style: Style::default().fg(Color::Magenta),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}
