//! Markdown rendering for assistant replies.
//!
//! Replies are untrusted remote text. Markdown structure is rendered, but HTML
//! blocks and inline tags are shown literally (dimmed) instead of being
//! interpreted. Control sequences are stripped from the source and again from
//! every rendered span, since character references like `&#27;` decode to
//! control characters during parsing.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;
use crate::utils::sanitize::strip_control_sequences;

const CODE_INDENT: &str = "  ";
const LIST_INDENT: &str = "  ";
const QUOTE_PREFIX: &str = "│ ";

pub fn render_markdown(content: &str, base: Style, theme: &Theme) -> Vec<Line<'static>> {
    let cleaned = strip_control_sequences(content);
    MarkdownRenderer::new(base, theme).render(&cleaned)
}

/// Render `content` with no markup interpretation at all.
pub fn render_plain(content: &str, style: Style) -> Vec<Line<'static>> {
    strip_control_sequences(content)
        .split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<Option<u64>>,
    pending_bullet: Option<String>,
    quote_depth: usize,
    in_code_block: bool,
    link_targets: Vec<String>,
    needs_blank: bool,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(base: Style, theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            current: Vec::new(),
            style_stack: vec![base],
            list_stack: Vec::new(),
            pending_bullet: None,
            quote_depth: 0,
            in_code_block: false,
            link_targets: Vec::new(),
            needs_blank: false,
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        for event in Parser::new_ext(content, parser_options()) {
            self.handle_event(event);
        }
        self.flush_line();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                let style = self.style();
                self.push_text(&text, style);
            }
            Event::Code(code) => {
                let style = self.style().patch(self.theme.md_code_style);
                self.push_span(Span::styled(code.to_string(), style));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = self.style().patch(self.theme.md_html_style);
                self.push_text(&html, style);
            }
            Event::SoftBreak => {
                let style = self.style();
                self.push_span(Span::styled(" ", style));
            }
            Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.begin_block();
                let style = self.style().patch(self.theme.md_quote_style);
                self.push_span(Span::styled("────────", style));
                self.end_block();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                let style = self.style();
                self.push_span(Span::styled(marker, style));
            }
            Event::FootnoteReference(label) => {
                let style = self.style();
                self.push_span(Span::styled(format!("[^{label}]"), style));
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                let style = self.style().patch(self.theme.md_code_style);
                self.push_span(Span::styled(math.to_string(), style));
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.begin_block(),
            Tag::Heading { level, .. } => {
                self.begin_block();
                let style = self.style().patch(self.theme.md_heading_style);
                self.push_span(Span::styled(
                    format!("{} ", "#".repeat(level as usize)),
                    style,
                ));
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.begin_block();
                self.quote_depth += 1;
                let style = self.style().patch(self.theme.md_quote_style);
                self.style_stack.push(style);
            }
            Tag::CodeBlock(_) => {
                self.begin_block();
                self.in_code_block = true;
                let style = self.style().patch(self.theme.md_code_style);
                self.style_stack.push(style);
            }
            Tag::HtmlBlock => self.begin_block(),
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.begin_block();
                } else {
                    self.flush_line();
                }
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let bullet = match self.list_stack.last_mut() {
                    Some(Some(number)) => {
                        let bullet = format!("{number}. ");
                        *number += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.pending_bullet = Some(bullet);
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } => {
                self.link_targets.push(strip_control_sequences(&dest_url));
                let style = self.style().patch(self.theme.md_link_style);
                self.style_stack.push(style);
            }
            Tag::Image { dest_url, .. } => {
                self.link_targets.push(strip_control_sequences(&dest_url));
                let style = self.style().patch(self.theme.md_link_style);
                self.push_span(Span::styled("[image: ", style));
                self.style_stack.push(style);
            }
            Tag::Table(_) => self.begin_block(),
            Tag::TableHead => self.push_modifier(Modifier::BOLD),
            Tag::TableRow => self.flush_line(),
            Tag::TableCell => {
                if !self.current.is_empty() {
                    let style = self.style();
                    self.push_span(Span::styled(" │ ", style));
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock | TagEnd::Table => self.end_block(),
            TagEnd::Heading(_) => {
                self.style_stack.pop();
                self.end_block();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.style_stack.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.needs_blank = true;
            }
            TagEnd::CodeBlock => {
                self.style_stack.pop();
                self.in_code_block = false;
                self.end_block();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.needs_blank = true;
                }
            }
            TagEnd::Item => {
                self.flush_line();
                self.pending_bullet = None;
                // Tight items carry no paragraph; loose ones must not add
                // blank lines between siblings.
                self.needs_blank = false;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::Link => {
                self.style_stack.pop();
                if let Some(target) = self.link_targets.pop() {
                    let shown = self.current_text_ends_with(&target);
                    if !shown && !target.is_empty() {
                        let style = self.style().patch(self.theme.md_quote_style);
                        self.push_span(Span::styled(format!(" ({target})"), style));
                    }
                }
            }
            TagEnd::Image => {
                let style = self.style();
                self.style_stack.pop();
                let target = self.link_targets.pop().unwrap_or_default();
                self.push_span(Span::styled(format!("] ({target})"), style));
            }
            TagEnd::TableHead => {
                self.style_stack.pop();
                self.flush_line();
            }
            TagEnd::TableRow => self.flush_line(),
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn begin_block(&mut self) {
        self.flush_line();
        if self.needs_blank && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.needs_blank = false;
    }

    fn end_block(&mut self) {
        self.flush_line();
        self.needs_blank = true;
    }

    fn push_text(&mut self, text: &str, style: Style) {
        let mut segments = text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            if !segment.is_empty() {
                self.push_span(Span::styled(segment.to_string(), style));
            }
            if segments.peek().is_some() {
                self.new_line();
            }
        }
    }

    fn push_span(&mut self, mut span: Span<'static>) {
        if span.content.chars().any(char::is_control) {
            span.content = strip_control_sequences(&span.content)
                .replace('\n', " ")
                .into();
        }
        if self.current.is_empty() {
            let prefix = self.line_prefix();
            if !prefix.is_empty() {
                let prefix_style = if self.quote_depth > 0 {
                    self.theme.md_quote_style
                } else {
                    self.style_stack.first().copied().unwrap_or_default()
                };
                self.current.push(Span::styled(prefix, prefix_style));
            }
        }
        self.current.push(span);
    }

    /// End the current line, keeping it even when empty inside code blocks.
    fn new_line(&mut self) {
        if self.current.is_empty() && self.in_code_block {
            self.lines.push(Line::default());
        } else {
            self.flush_line();
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn line_prefix(&mut self) -> String {
        let mut prefix = QUOTE_PREFIX.repeat(self.quote_depth);
        if !self.list_stack.is_empty() {
            prefix.push_str(&LIST_INDENT.repeat(self.list_stack.len() - 1));
            match self.pending_bullet.take() {
                Some(bullet) => prefix.push_str(&bullet),
                None => prefix.push_str(LIST_INDENT),
            }
        }
        if self.in_code_block {
            prefix.push_str(CODE_INDENT);
        }
        prefix
    }

    fn current_text_ends_with(&self, needle: &str) -> bool {
        let text: String = self
            .current
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        text.ends_with(needle)
    }
}
