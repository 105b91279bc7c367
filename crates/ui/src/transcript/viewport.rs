use chatline_core::{ScrollBehavior, ScrollMetrics, Viewport};

/// Nominal height of one terminal row, so scroll metrics share the unit of the
/// pin threshold.
pub const ROW_HEIGHT: f64 = 20.0;

/// Scroll state of the transcript pane, in rows
///
/// `offset` is the first visible row. Content and visible heights are updated
/// on every render. A smooth scroll to the bottom is spread over
/// `smooth_steps` animation frames, each closing a share of the remaining
/// distance; the target follows the content as it grows.
#[derive(Debug, Clone)]
pub struct TranscriptViewport {
    offset: u16,
    content_height: u16,
    visible_height: u16,
    smooth_steps: u16,
    frames_left: u16,
}

impl TranscriptViewport {
    pub fn new(smooth_steps: u16) -> Self {
        Self { offset: 0, content_height: 0, visible_height: 0, smooth_steps: smooth_steps.max(1), frames_left: 0 }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn content_height(&self) -> u16 {
        self.content_height
    }

    pub fn visible_height(&self) -> u16 {
        self.visible_height
    }

    /// Largest offset that still fills the pane
    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.visible_height)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn is_animating(&self) -> bool {
        self.frames_left > 0
    }

    /// Record the rendered content and pane heights
    pub fn set_dimensions(&mut self, content_height: u16, visible_height: u16) {
        self.content_height = content_height;
        self.visible_height = visible_height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Advance a smooth scroll by one frame. Returns whether it is still running.
    pub fn tick(&mut self) -> bool {
        if self.frames_left == 0 {
            return false;
        }

        let remaining = self.max_offset().saturating_sub(self.offset);
        let step = remaining.div_ceil(self.frames_left);
        self.offset = self.offset.saturating_add(step).min(self.max_offset());
        self.frames_left -= 1;

        if self.frames_left == 0 {
            self.offset = self.max_offset();
        }
        self.is_animating()
    }

    /// User scroll towards older content
    pub fn scroll_up(&mut self, rows: u16) {
        self.frames_left = 0;
        self.offset = self.offset.saturating_sub(rows);
    }

    /// User scroll towards newer content
    pub fn scroll_down(&mut self, rows: u16) {
        self.frames_left = 0;
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_up(self.offset);
    }

    fn page(&self) -> u16 {
        self.visible_height.saturating_sub(1).max(1)
    }
}

impl Default for TranscriptViewport {
    fn default() -> Self {
        Self::new(chatline_core::AutoscrollConfig::default().smooth_steps)
    }
}

impl Viewport for TranscriptViewport {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            f64::from(self.offset) * ROW_HEIGHT,
            f64::from(self.content_height) * ROW_HEIGHT,
            f64::from(self.visible_height) * ROW_HEIGHT,
        )
    }

    fn scroll_to_bottom(&mut self, behavior: ScrollBehavior) {
        match behavior {
            ScrollBehavior::Instant => {
                self.frames_left = 0;
                self.offset = self.max_offset();
            }
            ScrollBehavior::Smooth => self.frames_left = self.smooth_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(content: u16, visible: u16) -> TranscriptViewport {
        let mut viewport = TranscriptViewport::new(4);
        viewport.set_dimensions(content, visible);
        viewport
    }

    #[test]
    fn test_new_viewport_is_at_top() {
        let viewport = viewport(50, 10);
        assert_eq!(viewport.offset(), 0);
        assert_eq!(viewport.max_offset(), 40);
        assert!(!viewport.is_at_bottom());
    }

    #[test]
    fn test_short_content_is_always_at_bottom() {
        let viewport = viewport(5, 10);
        assert_eq!(viewport.max_offset(), 0);
        assert!(viewport.is_at_bottom());
        assert_eq!(viewport.metrics().distance_from_bottom(), -100.0);
    }

    #[test]
    fn test_instant_scroll_to_bottom() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_to_bottom(ScrollBehavior::Instant);
        assert_eq!(viewport.offset(), 40);
        assert!(!viewport.is_animating());
        assert_eq!(viewport.metrics().distance_from_bottom(), 0.0);
    }

    #[test]
    fn test_smooth_scroll_takes_configured_frames() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_to_bottom(ScrollBehavior::Smooth);
        assert_eq!(viewport.offset(), 0);

        let mut frames = 0;
        let mut last = viewport.offset();
        while viewport.tick() {
            frames += 1;
            assert!(viewport.offset() > last);
            last = viewport.offset();
        }
        assert_eq!(frames + 1, 4);
        assert!(viewport.is_at_bottom());
    }

    #[test]
    fn test_smooth_scroll_follows_growing_content() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_to_bottom(ScrollBehavior::Smooth);
        viewport.tick();
        viewport.set_dimensions(80, 10);
        while viewport.tick() {}
        assert_eq!(viewport.offset(), 70);
    }

    #[test]
    fn test_user_scroll_cancels_animation() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_to_bottom(ScrollBehavior::Smooth);
        viewport.scroll_up(1);
        assert!(!viewport.is_animating());
        assert!(!viewport.tick());
    }

    #[test]
    fn test_scroll_bounds() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_up(5);
        assert_eq!(viewport.offset(), 0);

        viewport.scroll_down(100);
        assert_eq!(viewport.offset(), 40);

        viewport.page_up();
        assert_eq!(viewport.offset(), 31);

        viewport.scroll_to_top();
        assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_to_bottom(ScrollBehavior::Instant);
        viewport.set_dimensions(20, 10);
        assert_eq!(viewport.offset(), 10);
    }

    #[test]
    fn test_metrics_use_row_height() {
        let mut viewport = viewport(50, 10);
        viewport.scroll_down(35);
        let metrics = viewport.metrics();
        assert_eq!(metrics.offset, 35.0 * ROW_HEIGHT);
        assert_eq!(metrics.extent, 50.0 * ROW_HEIGHT);
        assert_eq!(metrics.visible, 10.0 * ROW_HEIGHT);
        assert_eq!(metrics.distance_from_bottom(), 100.0);
    }
}
