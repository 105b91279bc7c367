use chatline_core::Role;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Iceberg color theme for the Chatline TUI
///
/// Based on iceberg.vim color scheme (https://github.com/cocopon/iceberg.vim)
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Primary background: deep blue-black (fills terminal)
    pub const BG: Color = Color::Rgb(22, 24, 33);

    /// Foreground: light blue-gray (primary text)
    pub const FG: Color = Color::Rgb(198, 200, 209);

    /// Secondary background: lighter blue-black (input card)
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);

    /// Primary accent: blue (user)
    pub const BLUE: Color = Color::Rgb(132, 160, 198);

    /// Secondary accent: cyan (bot)
    pub const CYAN: Color = Color::Rgb(137, 184, 194);

    /// Tertiary accent: purple (attachments)
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);

    /// Connected / pinned
    pub const GREEN: Color = Color::Rgb(180, 190, 130);

    /// Streaming / scrolled away
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);

    /// Errors
    pub const RED: Color = Color::Rgb(226, 120, 120);

    /// Muted text: dimmed foreground
    pub const MUTED: Color = Color::Rgb(107, 112, 137);

    /// Border color
    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    /// Base style for all text
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn primary() -> Style {
        Style::default().fg(Self::BLUE).bg(Self::BG)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GREEN).bg(Self::BG)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW).bg(Self::BG)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED).bg(Self::BG)
    }

    /// Muted style (for secondary text)
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::BG)
    }

    /// Panel style
    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Attachment summaries
    pub fn attachment() -> Style {
        Style::default().fg(Self::PURPLE).bg(Self::BG)
    }

    /// Accent color for a message author
    pub fn role_color(role: Role) -> Color {
        match role {
            Role::User => Self::BLUE,
            Role::Bot => Self::CYAN,
        }
    }

    /// Bold author label, e.g. `You:`
    pub fn role_span(label: &str, role: Role) -> Span<'static> {
        Span::styled(
            label.to_string(),
            Style::default().fg(Self::role_color(role)).bg(Self::BG).add_modifier(Modifier::BOLD),
        )
    }
}
