//! Text summaries of message attachments.

use chatline_core::Attachment;
use serde_json::{Map, Value};

/// How an attachment is shown in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSummary {
    /// Adaptive card with the text of its TextBlocks
    Card { texts: Vec<String> },
    Image { name: String },
    File { name: String, url: String },
}

/// Dispatch on content type: cards, then images, then anything linked.
/// Attachments with neither card content nor a URL are not shown.
pub fn describe_attachment(attachment: &Attachment) -> Option<AttachmentSummary> {
    if attachment.is_adaptive_card() {
        let texts = attachment.content.as_ref().map(card_text_blocks).unwrap_or_default();
        return Some(AttachmentSummary::Card { texts });
    }

    let name = || {
        attachment
            .name
            .clone()
            .or_else(|| attachment.content_url.clone())
            .unwrap_or_else(|| "attachment".to_string())
    };

    if attachment.is_image() {
        return Some(AttachmentSummary::Image { name: name() });
    }

    attachment.content_url.as_ref().map(|url| AttachmentSummary::File { name: name(), url: url.clone() })
}

/// Collect the text of every TextBlock in a card, in document order
pub fn card_text_blocks(card: &Value) -> Vec<String> {
    let mut texts = Vec::new();
    collect_text_blocks(card, &mut texts);
    texts
}

fn collect_text_blocks(element: &Value, texts: &mut Vec<String>) {
    match element {
        Value::Array(items) => items.iter().for_each(|item| collect_text_blocks(item, texts)),
        Value::Object(object) => {
            if object.get("type").and_then(Value::as_str) == Some("TextBlock")
                && let Some(text) = object.get("text").and_then(Value::as_str)
            {
                texts.push(text.to_string());
            }
            for key in ["body", "items", "columns"] {
                if let Some(children) = object.get(key) {
                    collect_text_blocks(children, texts);
                }
            }
        }
        _ => {}
    }
}

/// Value posted when a card's first submit action is used without editing
///
/// The action's `data` merged with each input's default `value`. `None` when
/// the card has no submit action.
pub fn card_submit_value(card: &Value) -> Option<Value> {
    let data = card
        .get("actions")?
        .as_array()?
        .iter()
        .find(|action| action.get("type").and_then(Value::as_str) == Some("Action.Submit"))?
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let mut submitted = Map::new();
    if let Some(body) = card.get("body") {
        collect_input_defaults(body, &mut submitted);
    }
    submitted.extend(data);
    Some(Value::Object(submitted))
}

fn collect_input_defaults(element: &Value, values: &mut Map<String, Value>) {
    match element {
        Value::Array(items) => items.iter().for_each(|item| collect_input_defaults(item, values)),
        Value::Object(object) => {
            let is_input = object.get("type").and_then(Value::as_str).is_some_and(|kind| kind.starts_with("Input."));
            if is_input
                && let (Some(id), Some(value)) = (object.get("id").and_then(Value::as_str), object.get("value"))
            {
                values.insert(id.to_string(), value.clone());
            }
            for key in ["body", "items", "columns"] {
                if let Some(children) = object.get(key) {
                    collect_input_defaults(children, values);
                }
            }
        }
        _ => {}
    }
}
