//! Transcript pane: layout of the reconciled view and its scroll state.

mod attachments;
mod renderer;
mod viewport;

pub use attachments::{AttachmentSummary, card_submit_value, card_text_blocks, describe_attachment};
pub use renderer::{EMPTY_TRANSCRIPT, TranscriptRenderer};
pub use viewport::{ROW_HEIGHT, TranscriptViewport};
