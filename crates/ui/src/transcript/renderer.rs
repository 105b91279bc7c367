use super::attachments::{AttachmentSummary, describe_attachment};
use super::viewport::TranscriptViewport;
use crate::theme::Theme;

use chatline_core::{FinalMessage, ReconciledView, Role};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
};

/// Placeholder shown before the first message
pub const EMPTY_TRANSCRIPT: &str = "Start a conversation...";

/// Left padding plus the scrollbar column plus right padding
const CHROME_WIDTH: u16 = 3;

/// Renders a reconciled view: finalized messages, then the live text
pub struct TranscriptRenderer<'a> {
    view: &'a ReconciledView,
}

impl<'a> TranscriptRenderer<'a> {
    pub fn new(view: &'a ReconciledView) -> Self {
        Self { view }
    }

    /// Width available to message text inside `area`
    pub fn content_width(area: Rect) -> usize {
        area.width.saturating_sub(CHROME_WIDTH).max(1) as usize
    }

    /// Lay out the whole transcript, already wrapped to `width`
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.view.is_empty() {
            lines.push(Line::from(Span::styled(EMPTY_TRANSCRIPT, Theme::muted())));
            return lines;
        }

        for (idx, message) in self.view.ordered_messages.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }
            self.render_message(message, width, &mut lines);
        }

        if let Some(live_text) = &self.view.live_text {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::from(vec![
                Theme::role_span("Bot", Role::Bot),
                Span::styled(" (typing...)", Theme::muted()),
            ]));
            push_text(live_text, width, Theme::base(), &mut lines);
            let cursor = Span::styled("█", Theme::base());
            match lines.last_mut() {
                Some(last) => last.spans.push(cursor),
                None => lines.push(Line::from(cursor)),
            }
        }

        lines
    }

    fn render_message(&self, message: &FinalMessage, width: usize, lines: &mut Vec<Line<'static>>) {
        let label = match message.role {
            Role::User => "You:",
            Role::Bot => "Bot:",
        };
        lines.push(Line::from(Theme::role_span(label, message.role)));

        if !message.text.is_empty() {
            push_text(&message.text, width, Theme::base(), lines);
        }

        for attachment in message.attachments.iter().filter_map(describe_attachment) {
            match attachment {
                AttachmentSummary::Card { texts } => {
                    lines.push(Line::from(Span::styled("[card]", Theme::attachment())));
                    let mut card_lines = Vec::new();
                    for text in texts {
                        push_text(&text, width.saturating_sub(2).max(1), Theme::muted(), &mut card_lines);
                    }
                    lines.extend(card_lines.into_iter().map(|mut line| {
                        line.spans.insert(0, Span::styled("  ", Theme::muted()));
                        line
                    }));
                }
                AttachmentSummary::Image { name } => {
                    lines.push(Line::from(Span::styled(format!("[image: {}]", name), Theme::attachment())));
                }
                AttachmentSummary::File { name, url } => {
                    lines.push(Line::from(vec![
                        Span::styled(format!("[file: {}]", name), Theme::attachment()),
                        Span::styled(format!(" {}", url), Theme::muted()),
                    ]));
                }
            }
        }
    }

    /// Render the transcript at the viewport's offset, with a scrollbar on the right edge
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, viewport: &TranscriptViewport) {
        frame.render_widget(Block::default().style(Theme::base()), area);
        if area.width <= CHROME_WIDTH || area.height == 0 {
            return;
        }

        let lines = self.lines(Self::content_width(area));
        let text_area = Rect { x: area.x + 1, width: area.width - CHROME_WIDTH, ..area };
        let paragraph = Paragraph::new(Text::from(lines)).style(Theme::base()).scroll((viewport.offset(), 0));
        frame.render_widget(paragraph, text_area);

        render_scrollbar(frame, area, viewport);
    }
}

/// Wrap `text` to `width`, one source line at a time, with `**bold**` spans.
/// Empty source lines are kept as blank lines.
fn push_text(text: &str, width: usize, style: Style, lines: &mut Vec<Line<'static>>) {
    for source_line in text.split('\n') {
        if source_line.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }

        let mut bold = false;
        for wrapped in textwrap::wrap(source_line, width) {
            let (spans, still_bold) = emphasis_spans(&wrapped, style, bold);
            bold = still_bold;
            lines.push(Line::from(spans));
        }
    }
}

/// Split a line on `**` markers, toggling bold. Returns the spans and whether
/// bold is still open at the end of the line.
fn emphasis_spans(line: &str, style: Style, mut bold: bool) -> (Vec<Span<'static>>, bool) {
    let mut spans = Vec::new();
    for (idx, part) in line.split("**").enumerate() {
        if idx > 0 {
            bold = !bold;
        }
        if part.is_empty() {
            continue;
        }
        let style = if bold { style.add_modifier(Modifier::BOLD) } else { style };
        spans.push(Span::styled(part.to_string(), style));
    }
    (spans, bold)
}

/// Scrollbar indicator on the right edge, hidden when everything fits
fn render_scrollbar(frame: &mut Frame<'_>, area: Rect, viewport: &TranscriptViewport) {
    let visible_height = area.height as usize;
    let content_height = viewport.content_height() as usize;
    if area.height <= 1 || content_height <= visible_height {
        return;
    }

    let max_offset = (content_height - visible_height) as f64;
    let scroll_ratio = f64::from(viewport.offset()) / max_offset;
    let thumb_size = ((visible_height as f64 / content_height as f64) * visible_height as f64).ceil().max(1.0) as u16;
    let thumb_position = (scroll_ratio * f64::from(area.height.saturating_sub(thumb_size))).round() as u16;

    let scrollbar_x = area.x + area.width.saturating_sub(1);
    for y in 0..area.height {
        let is_thumb = y >= thumb_position && y < thumb_position + thumb_size;
        let style = if is_thumb { Style::default().fg(Theme::BLUE) } else { Theme::border() };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("│", style.bg(Theme::BG)))),
            Rect::new(scrollbar_x, area.y + y, 1, 1),
        );
    }
}
