mod event_loop;

pub use event_loop::run;

use crate::components::{Footer, Header, Transcript};
use crate::event_handler::{EventHandler, KeyAction};
use crate::layout::TuiLayout;
use crate::state::AppState;
use crate::transcript::{TranscriptViewport, card_submit_value};

use chatline_core::{
    ActivityTransport, AutoscrollConfig, AutoscrollController, AutoscrollState, FeedSnapshot, OutgoingActivity,
    ReconciledView, Reconciler, Role, ScrollBehavior, ScrollRequest, SuggestedAction, ViewChange, Viewport,
};
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

static EMPTY_VIEW: ReconciledView = ReconciledView { ordered_messages: Vec::new(), live_text: None };

/// Main TUI application
///
/// Owns the feed receiver, the reconciler, the autoscroll controller and the
/// transcript viewport. Every feed revision is reconciled and dispatched to
/// the controller before the next one is read.
pub struct App {
    transport: Arc<dyn ActivityTransport>,
    feed_rx: watch::Receiver<FeedSnapshot>,
    reconciler: Reconciler,
    controller: AutoscrollController<TranscriptViewport>,
    scroll_rx: mpsc::UnboundedReceiver<ScrollRequest>,
    state: AppState,
}

impl App {
    /// Create an application reading from `transport`
    pub fn new(transport: Arc<dyn ActivityTransport>, config: &AutoscrollConfig) -> Self {
        let feed_rx = transport.subscribe();
        let (mut controller, scroll_rx) = AutoscrollController::from_config(config);
        controller.attach(TranscriptViewport::new(config.smooth_steps));

        let mut app =
            Self { transport, feed_rx, reconciler: Reconciler::new(), controller, scroll_rx, state: AppState::new() };
        app.handle_feed_update();
        app
    }

    /// The current reconciled transcript
    pub fn view(&self) -> &ReconciledView {
        self.reconciler.last().unwrap_or(&EMPTY_VIEW)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn autoscroll_state(&self) -> AutoscrollState {
        self.controller.state()
    }

    pub fn viewport(&self) -> Option<&TranscriptViewport> {
        self.controller.viewport()
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.controller.has_pending_scroll()
    }

    pub fn should_exit(&self) -> bool {
        self.state.should_exit
    }

    pub fn is_animating(&self) -> bool {
        self.controller.viewport().is_some_and(TranscriptViewport::is_animating)
    }

    /// Reconcile the latest feed revision and let the controller react to it
    pub fn handle_feed_update(&mut self) {
        let snapshot = self.feed_rx.borrow_and_update().clone();
        if self.reconciler.revision() == Some(snapshot.revision) {
            return;
        }

        let previous = self.reconciler.last().cloned();
        let change = ViewChange::between(previous.as_ref(), self.reconciler.view(&snapshot));
        if change.is_empty() {
            return;
        }

        tracing::trace!(
            revision = snapshot.revision,
            messages_changed = change.messages_changed,
            live_text_changed = change.live_text_changed,
            "transcript changed"
        );
        self.controller.on_view_change(change);
    }

    /// A debounced scroll fired
    pub fn handle_scroll_request(&mut self, request: ScrollRequest) {
        self.controller.apply(request);
    }

    /// Advance a running smooth scroll by one frame
    pub fn tick_animation(&mut self) {
        if let Some(viewport) = self.controller.viewport_mut() {
            viewport.tick();
        }
    }

    /// Suggested actions of the latest message, when a bot sent it
    pub fn suggestions(&self) -> &[SuggestedAction] {
        match self.view().last_message() {
            Some(message) if message.role == Role::Bot => &message.suggested_actions,
            _ => &[],
        }
    }

    /// Submit value of the most recent adaptive card
    pub fn latest_card_submit(&self) -> Option<Value> {
        self.view()
            .ordered_messages
            .iter()
            .rev()
            .flat_map(|message| message.attachments.iter().rev())
            .filter(|attachment| attachment.is_adaptive_card())
            .find_map(|attachment| attachment.content.as_ref().and_then(card_submit_value))
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, event: KeyEvent) {
        if let Some(action) = EventHandler::handle_key_event(event, &mut self.state) {
            self.perform(action).await;
        }
    }

    /// Perform a key action
    pub async fn perform(&mut self, action: KeyAction) {
        match action {
            KeyAction::SendMessage { message } => self.post(OutgoingActivity::message(message)).await,
            KeyAction::SendSuggestion { index } => {
                if let Some(value) = self.suggestions().get(index).map(|action| action.value.clone()) {
                    self.post(OutgoingActivity::message(value)).await;
                }
            }
            KeyAction::SubmitCard => {
                if let Some(value) = self.latest_card_submit() {
                    self.post(OutgoingActivity::CardSubmit { value }).await;
                }
            }
            KeyAction::ScrollUp(rows) => self.user_scroll(|viewport| viewport.scroll_up(rows)),
            KeyAction::ScrollDown(rows) => self.user_scroll(|viewport| viewport.scroll_down(rows)),
            KeyAction::PageUp => self.user_scroll(TranscriptViewport::page_up),
            KeyAction::PageDown => self.user_scroll(TranscriptViewport::page_down),
            KeyAction::ScrollTop => self.user_scroll(TranscriptViewport::scroll_to_top),
            KeyAction::ScrollBottom => {
                self.user_scroll(|viewport| viewport.scroll_to_bottom(ScrollBehavior::Instant));
            }
            KeyAction::Exit => self.state.request_exit(),
        }
    }

    fn user_scroll(&mut self, scroll: impl FnOnce(&mut TranscriptViewport)) {
        if let Some(viewport) = self.controller.viewport_mut() {
            scroll(viewport);
        }
        self.controller.sync_from_viewport();
    }

    async fn post(&mut self, activity: OutgoingActivity) {
        match self.transport.post(activity).await {
            Ok(()) => self.state.clear_error(),
            Err(error) => {
                tracing::warn!(%error, "failed to send activity");
                self.state.set_error(error.to_string());
            }
        }
    }

    /// Measure the transcript for `area` and update the viewport
    pub fn layout_transcript(&mut self, area: Rect) {
        let view = self.view();
        let rows = self.controller.viewport().map(|viewport| Transcript::new(view, viewport).content_height(area));
        let Some(rows) = rows else {
            return;
        };
        if let Some(viewport) = self.controller.viewport_mut() {
            viewport.set_dimensions(rows, area.height);
        }
    }

    /// Draw the UI
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let layout = TuiLayout::calculate(frame.area());
        self.layout_transcript(layout.transcript);

        let view = self.view();
        Header::new(view, self.controller.state(), layout.mode).render(frame, layout.header);

        if let Some(viewport) = self.controller.viewport() {
            Transcript::new(view, viewport).render(frame, layout.transcript);
        }

        let has_card = self.latest_card_submit().is_some();
        Footer::new(&self.state, self.suggestions(), has_card, layout.mode).render(frame, layout.footer);
    }
}
