//! Terminal chat client: transcript pane with autoscroll, suggested actions
//! and an input composer, driven by an [`chatline_core::ActivityTransport`].

pub mod app;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod state;
pub mod theme;
pub mod transcript;

pub use app::{App, run};
pub use event_handler::{EventHandler, KeyAction};
pub use layout::{LayoutMode, TuiLayout};
pub use state::{AppState, InputState};
pub use theme::Theme;
pub use transcript::{EMPTY_TRANSCRIPT, ROW_HEIGHT, TranscriptRenderer, TranscriptViewport};
