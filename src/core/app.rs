//! Interactive chat state owned by the event loop.

use std::time::Instant;

use tracing::{debug, warn};
use tui_textarea::TextArea;

use crate::core::conversation::{Conversation, PendingTurn, TurnError};
use crate::core::message::GatewayResult;
use crate::core::session::Session;
use crate::ui::branding::Branding;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

/// Transcript scroll position, in wrapped rows from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u16,
    pub follow_bottom: bool,
    /// Largest valid offset as of the last frame
    pub max_offset: u16,
    /// Transcript rows visible in the last frame
    pub viewport_height: u16,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow_bottom: true,
            max_offset: 0,
            viewport_height: 0,
        }
    }
}

impl ScrollState {
    /// Record the frame geometry and return the offset to draw with.
    pub fn layout(&mut self, total_rows: usize, viewport_height: u16) -> u16 {
        let total = u16::try_from(total_rows).unwrap_or(u16::MAX);
        self.viewport_height = viewport_height;
        self.max_offset = total.saturating_sub(viewport_height);
        if self.follow_bottom || self.offset >= self.max_offset {
            self.offset = self.max_offset;
            self.follow_bottom = true;
        }
        self.offset
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.offset = self.offset.min(self.max_offset).saturating_sub(rows);
        self.follow_bottom = self.offset >= self.max_offset;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset);
        self.follow_bottom = self.offset >= self.max_offset;
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.saturating_sub(1).max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.follow_bottom = self.max_offset == 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset;
        self.follow_bottom = true;
    }
}

pub struct App {
    pub conversation: Conversation,
    pub branding: Branding,
    pub theme: Theme,
    pub textarea: TextArea<'static>,
    pub scroll: ScrollState,
    pub logging: LoggingState,
    /// One-line notice shown under the input box until the next keypress
    pub status: Option<String>,
    pub pending_since: Option<Instant>,
    pub exit_requested: bool,
}

impl App {
    pub fn new(session: Session, branding: Branding, theme: Theme, logging: LoggingState) -> Self {
        if let Err(err) = logging.start_session(session.id()) {
            warn!(error = %err, "could not write transcript log header");
        }
        let mut app = Self {
            conversation: Conversation::new(session),
            branding,
            theme,
            textarea: TextArea::default(),
            scroll: ScrollState::default(),
            logging,
            status: None,
            pending_since: None,
            exit_requested: false,
        };
        app.configure_textarea();
        app
    }

    pub fn session(&self) -> &Session {
        self.conversation.session()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.conversation.is_awaiting_reply()
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn input_is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.is_empty())
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    /// Turn the input box contents into a user turn.
    ///
    /// Returns the request to send, or `None` when nothing should be sent. The
    /// input is kept when the turn is refused so nothing typed is lost.
    pub fn submit_input(&mut self) -> Option<PendingTurn> {
        let text = self.input_text();
        match self.conversation.begin_turn(text) {
            Ok(pending) => {
                self.clear_input();
                self.log_last_turn();
                self.pending_since = Some(Instant::now());
                self.scroll.scroll_to_bottom();
                debug!(session_id = %pending.session_id, "submitted user turn");
                Some(pending)
            }
            Err(TurnError::EmptyMessage) => None,
            Err(err) => {
                self.status = Some(err.to_string());
                None
            }
        }
    }

    pub fn receive_reply(&mut self, result: GatewayResult) {
        match self.conversation.finish_turn(result) {
            Ok(()) => {
                self.pending_since = None;
                self.log_last_turn();
            }
            Err(err) => warn!(error = %err, "dropping unexpected reply"),
        }
    }

    pub fn toggle_logging(&mut self) {
        self.status = Some(match self.logging.toggle_logging() {
            Ok(message) => message,
            Err(err) => err.to_string(),
        });
    }

    /// Spinner frame for the pending reply, advancing ten times a second.
    pub fn pending_frame(&self) -> Option<usize> {
        self.pending_since
            .map(|since| (since.elapsed().as_millis() / 100) as usize)
    }

    fn log_last_turn(&mut self) {
        let Some(turn) = self.conversation.session().last() else {
            return;
        };
        if let Err(err) = self.logging.log_turn(turn) {
            warn!(error = %err, "transcript log write failed");
            self.status = Some(format!("Log write failed: {err}"));
        }
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_style(self.theme.input_text_style);
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
        self.textarea
            .set_placeholder_text("Type your message here");
    }
}
