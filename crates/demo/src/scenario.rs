//! What the scripted assistant says, independent of pacing.

use crate::cards::{SUBMIT_FEEDBACK, SUBMIT_TIME_OFF, feedback_attachment, time_off_attachment};

use chatline_core::{Attachment, MessageActivity, SuggestedAction};
use chrono::{DateTime, Utc};
use serde_json::Value;

const REQUEST_TIME_OFF: (&str, &str) = ("Request time off", "I want to request time off");
const VIEW_BALANCE: (&str, &str) = ("View leave balance", "What is my leave balance?");
const COMPANY_POLICIES: (&str, &str) = ("Company policies", "Tell me about company policies");
const THANKS: (&str, &str) = ("Thanks!", "That was helpful, thanks!");

const WELCOME: &str = "Hi! I'm your HR assistant. I can help you with time off requests, view your leave balance, and answer questions about company policies.\n\nTry one of the options below to get started!";

const TIME_OFF_TEXT: &str = "I can help you with that! Here's your time off request form:";

const BALANCE_TEXT: &str = "Here's your current leave balance:\n\n| Type | Available | Accrual |\n|------|-----------|----------|\n| **Sick Days** | 24 hours | 8h/quarter |\n| **Wellness** | 40 hours | 5 days/year |\n| **Vacation** | 80 hours | 8h/month |\n\nWould you like to request time off?";

const POLICIES_TEXT: &str = "Our company offers flexible work arrangements, competitive benefits, and a supportive culture. Key policies include **unlimited PTO** (with manager approval), **remote work options**, and comprehensive health coverage. For detailed information, please visit the HR portal or reach out to your HR representative.";

const RESOURCES_TEXT: &str = "Here are some helpful resources:\n\n- [Employee Handbook](https://example.com/handbook)\n- [Benefits Portal](https://example.com/benefits)\n- [IT Support](https://example.com/support)\n\nAnything else I can help with?";

const FEEDBACK_PROMPT: &str = "You're welcome! Before you go, would you mind sharing your feedback?";

const GENERIC_ACK: &str = "Got it! Is there anything else I can help you with?";

fn suggest(options: &[(&str, &str)]) -> Vec<SuggestedAction> {
    options.iter().map(|(title, value)| SuggestedAction::im_back(*title, *value)).collect()
}

fn main_menu() -> Vec<SuggestedAction> {
    suggest(&[REQUEST_TIME_OFF, VIEW_BALANCE, COMPANY_POLICIES])
}

/// A scripted branch, chosen by the exact value of a suggested action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    TimeOff,
    Balance,
    Policies,
    Thanks,
}

impl Scenario {
    /// Match user text against the suggested action values
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unscripted returns `None` and gets no reply.
    pub fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        [Scenario::TimeOff, Scenario::Balance, Scenario::Policies, Scenario::Thanks]
            .into_iter()
            .find(|scenario| scenario.trigger().eq_ignore_ascii_case(text))
    }

    /// The suggested action value that selects this branch
    pub fn trigger(&self) -> &'static str {
        match self {
            Scenario::TimeOff => REQUEST_TIME_OFF.1,
            Scenario::Balance => VIEW_BALANCE.1,
            Scenario::Policies => COMPANY_POLICIES.1,
            Scenario::Thanks => THANKS.1,
        }
    }

    pub fn reply(&self) -> Reply {
        match self {
            Scenario::TimeOff => Reply::message(TIME_OFF_TEXT)
                .with_attachment(time_off_attachment())
                .with_suggestions(suggest(&[VIEW_BALANCE, COMPANY_POLICIES])),
            Scenario::Balance => {
                Reply::message(BALANCE_TEXT).with_suggestions(suggest(&[REQUEST_TIME_OFF, COMPANY_POLICIES, THANKS]))
            }
            Scenario::Policies => Reply::Streamed {
                text: POLICIES_TEXT.to_string(),
                follow_up: Box::new(
                    Reply::message(RESOURCES_TEXT).with_suggestions(suggest(&[REQUEST_TIME_OFF, VIEW_BALANCE, THANKS])),
                ),
            },
            Scenario::Thanks => Reply::message(FEEDBACK_PROMPT).with_attachment(feedback_attachment()),
        }
    }
}

/// One scripted answer
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A single bot message
    Message { text: String, attachments: Vec<Attachment>, suggestions: Vec<SuggestedAction> },
    /// Text delivered as typing deltas, closed by a final message, then a follow-up
    Streamed { text: String, follow_up: Box<Reply> },
}

impl Reply {
    pub fn message(text: impl Into<String>) -> Self {
        Reply::Message { text: text.into(), attachments: Vec::new(), suggestions: Vec::new() }
    }

    /// Greeting sent when the conversation opens
    pub fn welcome() -> Self {
        Reply::message(WELCOME).with_suggestions(main_menu())
    }

    /// Acknowledge an adaptive card submission
    pub fn for_card_submit(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).filter(|s| !s.is_empty());

        match value.get("action").and_then(Value::as_str) {
            Some(SUBMIT_FEEDBACK) => {
                let rating = field("rating").unwrap_or("not specified");
                let comments = field("comments")
                    .map(|comments| format!("\n\nYour comments: \"{}\"", comments))
                    .unwrap_or_default();
                Reply::message(format!(
                    "Thank you for your feedback! You rated us **{}/5**.{}\n\nIs there anything else I can help you with?",
                    rating, comments
                ))
                .with_suggestions(main_menu())
            }
            Some(SUBMIT_TIME_OFF) => Reply::message(format!(
                "Your **{}** request has been submitted!\n\n- **Start:** {}\n- **End:** {}\n\nYou'll receive a confirmation email once approved. Anything else?",
                field("leaveType").unwrap_or("vacation"),
                field("startDate").unwrap_or("Not specified"),
                field("endDate").unwrap_or("Not specified"),
            ))
            .with_suggestions(suggest(&[VIEW_BALANCE, COMPANY_POLICIES, THANKS])),
            _ => Reply::message(GENERIC_ACK).with_suggestions(main_menu()),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        if let Reply::Message { attachments, .. } = &mut self {
            attachments.push(attachment);
        }
        self
    }

    pub fn with_suggestions(mut self, actions: Vec<SuggestedAction>) -> Self {
        if let Reply::Message { suggestions, .. } = &mut self {
            *suggestions = actions;
        }
        self
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Message { text, .. } | Reply::Streamed { text, .. } => text,
        }
    }

    /// Build the bot message for this reply, stamped at `timestamp`
    ///
    /// For a streamed reply this is the terminal message without its stream id.
    pub fn to_message(&self, timestamp: DateTime<Utc>) -> MessageActivity {
        match self {
            Reply::Message { text, attachments, suggestions } => {
                let mut message =
                    MessageActivity::bot(text.clone(), timestamp).with_suggested_actions(suggestions.clone());
                message.attachments = attachments.clone();
                message
            }
            Reply::Streamed { text, .. } => MessageActivity::bot(text.clone(), timestamp),
        }
    }
}

/// Split text into streamed fragments of `words_per_chunk` words
///
/// Every fragment after the first carries its leading space, so the fragments
/// concatenate back to the original text.
pub fn chunk_words(text: &str, words_per_chunk: usize) -> Vec<String> {
    let words: Vec<&str> = text.split(' ').collect();
    words
        .chunks(words_per_chunk.max(1))
        .enumerate()
        .map(|(index, chunk)| {
            let joined = chunk.join(" ");
            if index > 0 { format!(" {}", joined) } else { joined }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_text_matches_button_values() {
        assert_eq!(Scenario::from_text("I want to request time off"), Some(Scenario::TimeOff));
        assert_eq!(Scenario::from_text("  what is my leave balance?  "), Some(Scenario::Balance));
        assert_eq!(Scenario::from_text("TELL ME ABOUT COMPANY POLICIES"), Some(Scenario::Policies));
        assert_eq!(Scenario::from_text("That was helpful, thanks!"), Some(Scenario::Thanks));
    }

    #[test]
    fn test_from_text_ignores_unscripted_input() {
        assert_eq!(Scenario::from_text("hello"), None);
        assert_eq!(Scenario::from_text("request time off"), None);
        assert_eq!(Scenario::from_text(""), None);
    }

    #[test]
    fn test_welcome_offers_main_menu() {
        let Reply::Message { suggestions, .. } = Reply::welcome() else { panic!("welcome is a plain message") };
        let titles: Vec<&str> = suggestions.iter().map(|action| action.title.as_str()).collect();
        assert_eq!(titles, vec!["Request time off", "View leave balance", "Company policies"]);
        assert!(suggestions.iter().all(|action| action.action_type == "imBack"));
    }

    #[test]
    fn test_suggestion_values_round_trip_to_scenarios() {
        let Reply::Message { suggestions, .. } = Scenario::Balance.reply() else { panic!("expected message") };
        for action in suggestions {
            assert!(Scenario::from_text(&action.value).is_some(), "{} is unscripted", action.value);
        }
    }

    #[test]
    fn test_time_off_reply_carries_card() {
        let message = Scenario::TimeOff.reply().to_message(Utc::now());
        assert_eq!(message.attachments.len(), 1);
        assert!(message.attachments[0].is_adaptive_card());
        assert_eq!(message.suggested_actions.len(), 2);
    }

    #[test]
    fn test_policies_reply_is_streamed_with_follow_up() {
        let Reply::Streamed { text, follow_up } = Scenario::Policies.reply() else { panic!("expected stream") };
        assert!(text.starts_with("Our company offers flexible work arrangements"));
        assert!(follow_up.text().starts_with("Here are some helpful resources"));
    }

    #[test]
    fn test_feedback_submit_reply() {
        let reply = Reply::for_card_submit(&json!({ "action": "submitFeedback", "rating": "4", "comments": "Great" }));
        assert!(reply.text().contains("You rated us **4/5**."));
        assert!(reply.text().contains("Your comments: \"Great\""));

        let reply = Reply::for_card_submit(&json!({ "action": "submitFeedback" }));
        assert!(reply.text().contains("**not specified/5**"));
        assert!(!reply.text().contains("Your comments"));
    }

    #[test]
    fn test_time_off_submit_reply() {
        let reply = Reply::for_card_submit(&json!({
            "action": "submitTimeOff",
            "leaveType": "sick",
            "startDate": "2024-06-03"
        }));
        assert!(reply.text().starts_with("Your **sick** request has been submitted!"));
        assert!(reply.text().contains("- **Start:** 2024-06-03"));
        assert!(reply.text().contains("- **End:** Not specified"));
    }

    #[test]
    fn test_unknown_submit_gets_generic_reply() {
        let reply = Reply::for_card_submit(&json!({ "choice": "a" }));
        assert_eq!(reply.text(), GENERIC_ACK);
    }

    #[test]
    fn test_chunk_words_reassembles_text() {
        let chunks = chunk_words(POLICIES_TEXT, 4);
        assert_eq!(chunks.concat(), POLICIES_TEXT);
        assert_eq!(chunks[0], "Our company offers flexible");
        assert_eq!(chunks[1], " work arrangements, competitive benefits,");
    }

    #[test]
    fn test_chunk_words_short_text() {
        assert_eq!(chunk_words("hi there", 4), vec!["hi there".to_string()]);
        assert_eq!(chunk_words("a b c", 1), vec!["a", " b", " c"]);
    }
}
