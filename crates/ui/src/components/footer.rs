use crate::{
    layout::{FooterSections, LayoutMode},
    state::AppState,
    theme::Theme,
};

use chatline_core::SuggestedAction;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Footer component: suggested actions, input composer and key hints
///
/// - Row 1: suggested actions of the latest bot message, numbered 1-9
/// - Rows 2-4: input card with blue accent bar
/// - Row 5: transport error or keyboard shortcuts
pub struct Footer<'a> {
    state: &'a AppState,
    suggestions: &'a [SuggestedAction],
    has_card: bool,
    mode: LayoutMode,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, suggestions: &'a [SuggestedAction], has_card: bool, mode: LayoutMode) -> Self {
        Self { state, suggestions, has_card, mode }
    }

    /// Render footer to the given frame
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let sections = FooterSections::new(area);
        frame.render_widget(Block::default().style(Theme::base()), area);

        let suggestions = self.suggestion_spans(sections.suggestions.width);
        frame.render_widget(Paragraph::new(Line::from(suggestions)), sections.suggestions);
        self.render_input_card(frame, sections.input);

        let hints = Paragraph::new(Line::from(self.hint_spans()));
        let hints = if self.state.error.is_some() { hints } else { hints.alignment(Alignment::Right) };
        frame.render_widget(hints, sections.hints);
    }

    /// Numbered suggestions that fit in `width` columns
    fn suggestion_spans(&self, width: u16) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        let mut used = 1;
        spans.push(Span::styled(" ", Theme::base()));

        for (idx, action) in self.suggestions.iter().take(9).enumerate() {
            let key = format!("[{}]", idx + 1);
            let title = format!(" {}  ", action.title);
            let needed = key.width() + title.width();
            if used + needed > width as usize {
                break;
            }
            used += needed;
            spans.push(Span::styled(key, Theme::primary()));
            spans.push(Span::styled(title, Theme::base()));
        }
        spans
    }

    /// Render input card with blue accent bar
    fn render_input_card(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.width < 10 || area.height < 1 {
            return;
        }

        frame.render_widget(Block::default().style(Theme::panel()), area);

        let accent_width = 2;
        let accent_area = Rect { x: area.x, y: area.y, width: accent_width, height: area.height };
        frame.render_widget(Block::default().style(Style::default().bg(Theme::BLUE)), accent_area);

        let input_area = Rect {
            x: area.x + accent_width + 1,
            y: area.y + area.height / 2,
            width: area.width.saturating_sub(accent_width + 2),
            height: 1,
        };

        frame.render_widget(Paragraph::new(Line::from(self.input_spans())), input_area);

        if let Some(position) = self.state.input.history_position() {
            let indicator = Span::styled(format!("history {} ", position), Style::default().fg(Theme::MUTED));
            frame.render_widget(Paragraph::new(indicator).alignment(Alignment::Right), input_area);
        }
    }

    fn input_spans(&self) -> Vec<Span<'static>> {
        let cursor = Span::styled("█", Style::default().fg(Theme::FG).bg(Theme::FG));
        let text_style = Style::default().fg(Theme::FG).bg(Theme::PANEL_BG);

        if self.state.input.is_empty() {
            let placeholder = Style::default().fg(Theme::MUTED).bg(Theme::PANEL_BG);
            return vec![cursor, Span::styled("Type a message...", placeholder)];
        }

        let (before, after) = self.state.input.split_at_cursor();
        let mut spans = Vec::new();
        if !before.is_empty() {
            spans.push(Span::styled(before.to_string(), text_style));
        }
        spans.push(cursor);
        if !after.is_empty() {
            spans.push(Span::styled(after.to_string(), text_style));
        }
        spans
    }

    fn hint_spans(&self) -> Vec<Span<'static>> {
        if let Some(error) = &self.state.error {
            return vec![Span::styled(format!(" {}", error), Theme::error())];
        }

        let mut hints = vec![("[Enter]", " send  ")];
        if self.mode.shows_hints() {
            if !self.suggestions.is_empty() {
                hints.push(("[1-9]", " suggestion  "));
            }
            if self.has_card {
                hints.push(("[Ctrl+S]", " submit card  "));
            }
            hints.push(("[↑↓ PgUp PgDn]", " scroll  "));
        }
        hints.push(("[Esc]", " exit "));

        hints
            .into_iter()
            .flat_map(|(key, label)| [Span::styled(key, Theme::primary()), Span::styled(label, Theme::muted())])
            .collect()
    }
}
