//! Adaptive cards shown by the scripted conversation.

use chatline_core::Attachment;
use serde_json::{Value, json};

/// Submit action value for the time-off form
pub const SUBMIT_TIME_OFF: &str = "submitTimeOff";

/// Submit action value for the feedback form
pub const SUBMIT_FEEDBACK: &str = "submitFeedback";

/// Leave request form
pub fn time_off_card() -> Value {
    json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [
            { "type": "TextBlock", "text": "Time Off Request", "weight": "Bolder", "size": "Medium" },
            { "type": "TextBlock", "text": "Fill in the details below and submit.", "wrap": true, "isSubtle": true },
            {
                "type": "Input.ChoiceSet",
                "id": "leaveType",
                "label": "Leave type",
                "value": "vacation",
                "choices": [
                    { "title": "Vacation", "value": "vacation" },
                    { "title": "Sick", "value": "sick" },
                    { "title": "Wellness", "value": "wellness" }
                ]
            },
            { "type": "Input.Date", "id": "startDate", "label": "Start date" },
            { "type": "Input.Date", "id": "endDate", "label": "End date" }
        ],
        "actions": [
            { "type": "Action.Submit", "title": "Submit request", "data": { "action": SUBMIT_TIME_OFF } }
        ]
    })
}

/// Five-point rating with optional comments
pub fn feedback_card() -> Value {
    let choices: Vec<Value> = (1..=5)
        .map(|rating| json!({ "title": "★".repeat(rating), "value": rating.to_string() }))
        .collect();

    json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [
            { "type": "TextBlock", "text": "How did we do?", "weight": "Bolder", "size": "Medium" },
            { "type": "Input.ChoiceSet", "id": "rating", "label": "Rating", "style": "expanded", "choices": choices },
            {
                "type": "Input.Text",
                "id": "comments",
                "label": "Comments",
                "isMultiline": true,
                "placeholder": "Optional"
            }
        ],
        "actions": [
            { "type": "Action.Submit", "title": "Send feedback", "data": { "action": SUBMIT_FEEDBACK } }
        ]
    })
}

pub fn time_off_attachment() -> Attachment {
    Attachment::adaptive_card(time_off_card())
}

pub fn feedback_attachment() -> Attachment {
    Attachment::adaptive_card(feedback_card())
}
