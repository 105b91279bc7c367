use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ActivityError;

/// Content type used by adaptive card attachments
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attachment carried by a message. Opaque to reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Attachment {
    /// Create an adaptive card attachment from its card body
    pub fn adaptive_card(content: Value) -> Self {
        Self {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
            content: Some(content),
            content_url: None,
            name: None,
        }
    }

    /// Create an attachment that points at a URL
    pub fn linked(content_type: impl Into<String>, url: impl Into<String>, name: Option<String>) -> Self {
        Self { content_type: content_type.into(), content: None, content_url: Some(url.into()), name }
    }

    pub fn is_adaptive_card(&self) -> bool {
        self.content_type == ADAPTIVE_CARD_CONTENT_TYPE
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Quick reply offered alongside a bot message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    #[serde(rename = "type", default = "default_action_type")]
    pub action_type: String,
    pub title: String,
    pub value: String,
}

fn default_action_type() -> String {
    "imBack".to_string()
}

impl SuggestedAction {
    /// Suggestion that posts `value` back as a user message
    pub fn im_back(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self { action_type: default_action_type(), title: title.into(), value: value.into() }
    }
}

/// A finalized message as it arrives on the wire
///
/// `id` and `role` are optional on the wire; [`FinalMessage`] is the
/// normalized shape handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<SuggestedAction>,
}

impl MessageActivity {
    pub fn new(role: Role, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            text: text.into(),
            role,
            timestamp,
            stream_id: None,
            attachments: Vec::new(),
            suggested_actions: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Role::User, text, timestamp)
    }

    pub fn bot(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Role::Bot, text, timestamp)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark this message as the terminus of a streamed response
    pub fn with_stream_id(mut self, stream_id: impl Into<String>) -> Self {
        self.stream_id = Some(stream_id.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_suggested_actions(mut self, actions: Vec<SuggestedAction>) -> Self {
        self.suggested_actions = actions;
        self
    }

    /// True when there is neither text nor an attachment to show
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.attachments.is_empty()
    }
}

/// A partial, appendable piece of an in-progress bot response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingDelta {
    pub stream_id: String,
    pub sequence_number: u64,
    pub text_fragment: String,
}

/// A single event from the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Activity {
    FinalMessage(MessageActivity),
    TypingDelta(TypingDelta),
    /// Typing indicators, conversation updates and anything else unrecognized
    #[serde(other)]
    Other,
}

impl Activity {
    pub fn message(message: MessageActivity) -> Self {
        Activity::FinalMessage(message)
    }

    pub fn delta(stream_id: impl Into<String>, sequence_number: u64, text_fragment: impl Into<String>) -> Self {
        Activity::TypingDelta(TypingDelta {
            stream_id: stream_id.into(),
            sequence_number,
            text_fragment: text_fragment.into(),
        })
    }
}

/// Normalized message shape produced by reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalMessage {
    pub id: String,
    pub text: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<SuggestedAction>,
}

impl From<MessageActivity> for FinalMessage {
    fn from(activity: MessageActivity) -> Self {
        let id = activity.id.unwrap_or_else(|| activity.timestamp.to_rfc3339());
        Self {
            id,
            text: activity.text,
            role: activity.role,
            timestamp: activity.timestamp,
            stream_id: activity.stream_id,
            attachments: activity.attachments,
            suggested_actions: activity.suggested_actions,
        }
    }
}

/// Decode one raw activity at the collaborator boundary
pub fn decode_activity(value: &Value) -> Result<Activity, ActivityError> {
    let Some(object) = value.as_object() else {
        return Err(ActivityError::NotAnObject);
    };

    let kind = object.get("kind").and_then(Value::as_str).unwrap_or("unknown").to_string();
    serde_json::from_value(value.clone()).map_err(|e| ActivityError::Invalid { kind, reason: e.to_string() })
}

/// Decode a batch of raw activities, dropping the malformed ones
pub fn decode_feed(values: &[Value]) -> Vec<Activity> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match decode_activity(value) {
            Ok(activity) => Some(activity),
            Err(error) => {
                tracing::warn!(index, %error, "dropping malformed activity");
                None
            }
        })
        .collect()
}
