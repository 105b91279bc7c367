use crate::error::Result;
use crate::feed::FeedSnapshot;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

/// Something the user sends into the conversation
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingActivity {
    /// Plain text, typed or picked from a suggested action
    Message { text: String },
    /// Values submitted from an interactive card
    CardSubmit { value: Value },
}

impl OutgoingActivity {
    pub fn message(text: impl Into<String>) -> Self {
        OutgoingActivity::Message { text: text.into() }
    }
}

/// The chat session layer feeding the transcript
///
/// Implementations own the activity feed. Posted user messages are expected
/// to be echoed back into the feed as user messages.
#[async_trait]
pub trait ActivityTransport: Send + Sync {
    /// Subscribe to feed revisions
    fn subscribe(&self) -> watch::Receiver<FeedSnapshot>;

    /// Send a user activity
    async fn post(&self, activity: OutgoingActivity) -> Result<()>;
}
