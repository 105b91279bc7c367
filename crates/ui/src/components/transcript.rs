use crate::transcript::{TranscriptRenderer, TranscriptViewport};

use chatline_core::ReconciledView;
use ratatui::{Frame, layout::Rect};

/// Transcript component displaying the conversation
///
/// Wraps the renderer with the viewport whose offset it draws at.
pub struct Transcript<'a> {
    view: &'a ReconciledView,
    viewport: &'a TranscriptViewport,
}

impl<'a> Transcript<'a> {
    pub fn new(view: &'a ReconciledView, viewport: &'a TranscriptViewport) -> Self {
        Self { view, viewport }
    }

    /// Render transcript to the given frame
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        TranscriptRenderer::new(self.view).render(frame, area, self.viewport);
    }

    /// Number of rows the transcript needs in `area`
    pub fn content_height(&self, area: Rect) -> u16 {
        let rows = TranscriptRenderer::new(self.view).lines(TranscriptRenderer::content_width(area)).len();
        u16::try_from(rows).unwrap_or(u16::MAX)
    }
}
