use crate::scenario::{Reply, Scenario, chunk_words};

use chatline_core::logging::preview;
use chatline_core::{
    Activity, ActivityFeed, ActivityTransport, DemoConfig, Error, FeedSnapshot, MessageActivity, OutgoingActivity,
    Result,
};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// In-process transport that plays the scripted conversation
///
/// Cloning shares the same feed and script state. Every reply runs on its
/// own task and stops early once [`ScriptedTransport::shutdown`] is called.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

struct Inner {
    feed: ActivityFeed,
    config: DemoConfig,
    cancel: CancellationToken,
    next_id: AtomicU64,
    next_stream: AtomicU64,
}

impl ScriptedTransport {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                feed: ActivityFeed::new(),
                config,
                cancel: CancellationToken::new(),
                next_id: AtomicU64::new(1),
                next_stream: AtomicU64::new(1),
            }),
        }
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.inner.feed
    }

    /// Open the conversation: the welcome message arrives after the initial delay
    pub fn start(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if inner.pause(inner.config.initial_delay_ms).await {
                inner.say(&Reply::welcome());
                tracing::info!("demo conversation started");
            }
        })
    }

    /// Stop every in-flight reply
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    fn respond(&self, reply: Reply) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.respond(reply).await });
    }
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("config", &self.inner.config)
            .field("revision", &self.inner.feed.revision())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

impl Inner {
    fn next_id(&self) -> String {
        format!("demo-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Sleep unless the conversation is shut down first. Returns false when cancelled.
    async fn pause(&self, ms: u64) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(Duration::from_millis(ms)) => true,
        }
    }

    fn say(&self, reply: &Reply) {
        let message = reply.to_message(Utc::now()).with_id(self.next_id());
        tracing::debug!(id = ?message.id, text = %preview(&message.text, 40), "bot message");
        self.feed.push(Activity::message(message));
    }

    async fn respond(&self, reply: Reply) {
        if !self.pause(self.config.reply_delay_ms).await {
            return;
        }
        self.feed.push(Activity::Other);

        if !self.pause(self.config.typing_delay_ms).await {
            return;
        }

        match &reply {
            Reply::Message { .. } => self.say(&reply),
            Reply::Streamed { text, follow_up } => {
                if !self.stream(text).await || !self.pause(self.config.follow_up_delay_ms).await {
                    return;
                }
                self.say(follow_up);
            }
        }
    }

    /// Emit `text` as typing deltas, then close the stream with a final message
    async fn stream(&self, text: &str) -> bool {
        let stream_id = format!("stream-{}", self.next_stream.fetch_add(1, Ordering::SeqCst));
        let chunks = chunk_words(text, self.config.words_per_chunk);
        tracing::debug!(%stream_id, chunks = chunks.len(), "streaming reply");

        for (sequence, chunk) in chunks.into_iter().enumerate() {
            self.feed.push(Activity::delta(&stream_id, sequence as u64, chunk));
            if !self.pause(self.config.chunk_delay_ms).await {
                return false;
            }
        }

        if !self.pause(self.config.finalize_delay_ms).await {
            return false;
        }

        let message = MessageActivity::bot(text, Utc::now()).with_id(self.next_id()).with_stream_id(&stream_id);
        self.feed.push(Activity::message(message));
        true
    }
}

#[async_trait::async_trait]
impl ActivityTransport for ScriptedTransport {
    fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.inner.feed.subscribe()
    }

    async fn post(&self, activity: OutgoingActivity) -> Result<()> {
        if self.is_shutdown() {
            return Err(Error::Transport("conversation has ended".to_string()));
        }

        match activity {
            OutgoingActivity::Message { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(Error::Transport("cannot send an empty message".to_string()));
                }

                let message = MessageActivity::user(text, Utc::now()).with_id(self.inner.next_id());
                self.inner.feed.push(Activity::message(message));

                match Scenario::from_text(text) {
                    Some(scenario) => {
                        tracing::debug!(?scenario, "scripted reply");
                        self.respond(scenario.reply());
                    }
                    None => tracing::debug!(text = %preview(text, 40), "unscripted input, no reply"),
                }
            }
            OutgoingActivity::CardSubmit { value } => {
                tracing::debug!(%value, "card submitted");
                self.respond(Reply::for_card_submit(&value));
            }
        }

        Ok(())
    }
}
