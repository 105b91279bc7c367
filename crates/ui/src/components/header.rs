use crate::{layout::LayoutMode, theme::Theme};

use chatline_core::{AutoscrollState, ReconciledView};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Header component: title, conversation status and scroll state
pub struct Header<'a> {
    view: &'a ReconciledView,
    autoscroll: AutoscrollState,
    mode: LayoutMode,
}

impl<'a> Header<'a> {
    pub fn new(view: &'a ReconciledView, autoscroll: AutoscrollState, mode: LayoutMode) -> Self {
        Self { view, autoscroll, mode }
    }

    /// Render the header to the given frame
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Paragraph::new(Line::from(self.status_spans())).style(Theme::base()), area);
        frame.render_widget(
            Paragraph::new(Line::from(self.scroll_spans())).alignment(Alignment::Right).style(Theme::base()),
            area,
        );
    }

    fn status_spans(&self) -> Vec<Span<'static>> {
        let status = if self.view.is_streaming() {
            Span::styled("streaming", Theme::warning())
        } else {
            Span::styled("connected", Theme::success())
        };

        vec![
            Span::styled(" Chatline", Theme::primary().add_modifier(Modifier::BOLD)),
            Span::styled(" · ", Theme::muted()),
            status,
        ]
    }

    fn scroll_spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        if self.mode == LayoutMode::Full {
            let count = self.view.ordered_messages.len();
            let noun = if count == 1 { "message" } else { "messages" };
            spans.push(Span::styled(format!("{} {}  ", count, noun), Theme::muted()));
        }

        spans.push(match self.autoscroll {
            AutoscrollState::Pinned => Span::styled("● live ", Theme::success()),
            AutoscrollState::Unpinned => Span::styled("↑ scrolled ", Theme::warning()),
        });
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::{Activity, MessageActivity, reconcile};
    use chrono::Utc;

    fn text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_header_idle_status() {
        let view = ReconciledView::default();
        let header = Header::new(&view, AutoscrollState::Pinned, LayoutMode::Full);
        assert_eq!(text(&header.status_spans()), " Chatline · connected");
        assert_eq!(text(&header.scroll_spans()), "0 messages  ● live ");
    }

    #[test]
    fn test_header_streaming_status() {
        let view = reconcile(&[
            Activity::message(MessageActivity::user("hi", Utc::now())),
            Activity::delta("S", 0, "typing"),
        ]);
        let header = Header::new(&view, AutoscrollState::Unpinned, LayoutMode::Full);
        assert!(text(&header.status_spans()).ends_with("streaming"));
        assert_eq!(text(&header.scroll_spans()), "1 message  ↑ scrolled ");
    }

    #[test]
    fn test_header_compact_hides_count() {
        let view = ReconciledView::default();
        let header = Header::new(&view, AutoscrollState::Pinned, LayoutMode::Compact);
        assert_eq!(text(&header.scroll_spans()), "● live ");
    }
}
