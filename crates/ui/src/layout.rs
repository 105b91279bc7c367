use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the footer: suggestions, input card (3 rows) and key hints
pub const FOOTER_HEIGHT: u16 = 5;

/// Layout breakpoints for responsive TUI
///
/// - >= 80 cols: Full layout with key hints and scroll status
/// - < 80 cols: Compact layout, minimal chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Full,
    Compact,
}

impl From<u16> for LayoutMode {
    fn from(width: u16) -> Self {
        if width >= 80 { Self::Full } else { Self::Compact }
    }
}

impl LayoutMode {
    pub fn shows_hints(&self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Calculated layout for the TUI
#[derive(Debug, Clone)]
pub struct TuiLayout {
    /// Layout mode based on terminal width
    pub mode: LayoutMode,
    /// Header area (1 line)
    pub header: Rect,
    /// Main transcript area
    pub transcript: Rect,
    /// Footer area
    pub footer: Rect,
}

impl TuiLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(area);

        Self { mode: LayoutMode::from(area.width), header: chunks[0], transcript: chunks[1], footer: chunks[2] }
    }

    /// Split the footer into its rows
    pub fn footer_sections(&self) -> FooterSections {
        FooterSections::new(self.footer)
    }
}

/// Footer rows, top to bottom
#[derive(Debug, Clone, Copy)]
pub struct FooterSections {
    /// Numbered suggested actions
    pub suggestions: Rect,
    /// Input card with accent bar
    pub input: Rect,
    /// Key hints
    pub hints: Rect,
}

impl FooterSections {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        Self { suggestions: rows[0], input: rows[1], hints: rows[2] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_mode_from_width() {
        assert_eq!(LayoutMode::from(120), LayoutMode::Full);
        assert_eq!(LayoutMode::from(80), LayoutMode::Full);
        assert_eq!(LayoutMode::from(79), LayoutMode::Compact);
        assert!(!LayoutMode::Compact.shows_hints());
    }

    #[test]
    fn test_layout_heights() {
        let layout = TuiLayout::calculate(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, FOOTER_HEIGHT);
        assert_eq!(layout.transcript.height, 30 - 1 - FOOTER_HEIGHT);
        assert_eq!(layout.transcript.y, 1);
    }

    #[test]
    fn test_footer_sections() {
        let layout = TuiLayout::calculate(Rect::new(0, 0, 100, 30));
        let sections = layout.footer_sections();
        assert_eq!(sections.suggestions.height, 1);
        assert_eq!(sections.input.height, 3);
        assert_eq!(sections.hints.height, 1);
        assert_eq!(sections.hints.y, 29);
    }
}
