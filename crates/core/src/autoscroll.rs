//! Autoscroll decisions for the transcript viewport.
//!
//! The controller is pinned to the bottom until the user scrolls further than
//! the threshold away from it. While pinned, growth of the live text is
//! followed with debounced instant scrolls. A new finalized message always
//! brings the view back to the bottom with a smooth scroll, pinned or not.

use crate::config::AutoscrollConfig;
use crate::reconcile::ViewChange;
use crate::timer::CoalescingTimer;

use std::time::Duration;
use tokio::sync::mpsc;

/// Distance from the bottom still considered pinned
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Coalescing window for live-text scrolls
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Scroll position of a viewport, in whatever unit the viewport measures in
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f64,
    /// Total content size
    pub extent: f64,
    /// Size of the visible window
    pub visible: f64,
}

impl ScrollMetrics {
    pub fn new(offset: f64, extent: f64, visible: f64) -> Self {
        Self { offset, extent, visible }
    }

    pub fn distance_from_bottom(&self) -> f64 {
        self.extent - self.offset - self.visible
    }
}

/// How a programmatic scroll moves the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump without animation
    Instant,
    /// Animate towards the target
    Smooth,
}

/// Whether the viewport is anchored to the latest content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoscrollState {
    Pinned,
    Unpinned,
}

/// A scroll the controller decided on. Debounced requests come back through
/// the channel returned by [`AutoscrollController::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub behavior: ScrollBehavior,
    /// Number of live-text triggers seen when this request was issued
    pub trigger: u64,
}

/// The scrollable surface the controller drives
pub trait Viewport {
    fn metrics(&self) -> ScrollMetrics;
    fn scroll_to_bottom(&mut self, behavior: ScrollBehavior);
}

/// Decides when to move the viewport
///
/// Every operation is a no-op while no viewport is attached.
#[derive(Debug)]
pub struct AutoscrollController<V> {
    viewport: Option<V>,
    pinned: bool,
    last_metrics: Option<ScrollMetrics>,
    threshold: f64,
    timer: CoalescingTimer<ScrollRequest>,
    triggers: u64,
    /// Requests with a trigger at or below this were issued before the last
    /// message-list change or detach and are stale even if already delivered
    superseded: u64,
}

impl<V: Viewport> AutoscrollController<V> {
    /// Create a detached controller and the channel its debounced scrolls fire on
    pub fn new(threshold: f64, debounce: Duration) -> (Self, mpsc::UnboundedReceiver<ScrollRequest>) {
        let (timer, rx) = CoalescingTimer::new(debounce);
        let controller = Self {
            viewport: None,
            pinned: true,
            last_metrics: None,
            threshold,
            timer,
            triggers: 0,
            superseded: 0,
        };
        (controller, rx)
    }

    pub fn from_config(config: &AutoscrollConfig) -> (Self, mpsc::UnboundedReceiver<ScrollRequest>) {
        Self::new(config.threshold, config.debounce())
    }

    pub fn attach(&mut self, viewport: V) {
        self.viewport = Some(viewport);
    }

    /// Detach the viewport, dropping any pending scroll
    pub fn detach(&mut self) -> Option<V> {
        self.supersede_pending();
        self.viewport.take()
    }

    pub fn viewport(&self) -> Option<&V> {
        self.viewport.as_ref()
    }

    pub fn viewport_mut(&mut self) -> Option<&mut V> {
        self.viewport.as_mut()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn state(&self) -> AutoscrollState {
        if self.pinned { AutoscrollState::Pinned } else { AutoscrollState::Unpinned }
    }

    pub fn last_metrics(&self) -> Option<ScrollMetrics> {
        self.last_metrics
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Cancel the timer and invalidate requests already sitting in the channel
    fn supersede_pending(&mut self) {
        self.timer.cancel();
        self.superseded = self.triggers;
    }

    /// Whether a debounced scroll is waiting to fire
    pub fn has_pending_scroll(&self) -> bool {
        self.timer.is_pending()
    }

    /// Record the viewport's scroll position and re-evaluate pinning
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        if self.viewport.is_none() {
            return;
        }

        let was_pinned = self.pinned;
        self.pinned = metrics.distance_from_bottom() <= self.threshold;
        self.last_metrics = Some(metrics);

        if was_pinned != self.pinned {
            let distance = metrics.distance_from_bottom();
            tracing::debug!(pinned = self.pinned, distance, "autoscroll state changed");
        }
    }

    /// Read the attached viewport's metrics and feed them to [`Self::on_scroll`]
    pub fn sync_from_viewport(&mut self) {
        if let Some(metrics) = self.viewport.as_ref().map(Viewport::metrics) {
            self.on_scroll(metrics);
        }
    }

    /// Live text grew: schedule a debounced instant scroll when pinned
    pub fn on_live_text_changed(&mut self) {
        if self.viewport.is_none() || !self.pinned {
            return;
        }

        self.triggers += 1;
        self.timer.trigger(ScrollRequest { behavior: ScrollBehavior::Instant, trigger: self.triggers });
    }

    /// A finalized message arrived: smooth scroll to the bottom and re-pin
    pub fn on_message_list_changed(&mut self) {
        let Some(viewport) = self.viewport.as_mut() else {
            return;
        };

        viewport.scroll_to_bottom(ScrollBehavior::Smooth);
        self.supersede_pending();
        self.pinned = true;
    }

    /// Dispatch a reconciled view change. A message list change supersedes
    /// a live text change in the same update.
    pub fn on_view_change(&mut self, change: ViewChange) {
        if change.messages_changed {
            self.on_message_list_changed();
        } else if change.live_text_changed {
            self.on_live_text_changed();
        }
    }

    /// Perform a fired debounced request. Dropped if the user unpinned the
    /// view while it was pending, or if a message-list change or detach
    /// happened after it was issued.
    pub fn apply(&mut self, request: ScrollRequest) {
        if request.trigger <= self.superseded {
            tracing::trace!(trigger = request.trigger, "dropping superseded scroll request");
            return;
        }
        if !self.pinned {
            tracing::trace!(trigger = request.trigger, "dropping scroll request, viewport unpinned");
            return;
        }

        if let Some(viewport) = self.viewport.as_mut() {
            viewport.scroll_to_bottom(request.behavior);
        }
    }
}
