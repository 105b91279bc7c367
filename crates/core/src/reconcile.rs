//! Stream reconciliation.
//!
//! Turns an interleaved activity feed into the transcript the user sees: the
//! finalized messages in timestamp order plus the live text of at most one
//! in-flight streamed response.
//!
//! Reconciliation is a pure function of the feed snapshot. [`Reconciler`]
//! memoizes the last result by feed revision, which is an optimization only;
//! its output is always identical to calling [`reconcile`] directly.

use crate::activity::{Activity, FinalMessage, MessageActivity, TypingDelta};
use crate::feed::FeedSnapshot;

use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static LINE_BREAK: OnceLock<Regex> = OnceLock::new();

fn line_break_pattern() -> &'static Regex {
    LINE_BREAK.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"))
}

/// Replace literal HTML line breaks (`<br>`, `<br/>`, `<br />`) with `\n`
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    line_break_pattern().replace_all(text, "\n")
}

/// The transcript derived from a feed snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledView {
    /// Finalized messages, timestamp ascending
    pub ordered_messages: Vec<FinalMessage>,
    /// Text of the open stream, if any
    pub live_text: Option<String>,
}

impl ReconciledView {
    pub fn is_empty(&self) -> bool {
        self.ordered_messages.is_empty() && self.live_text.is_none()
    }

    pub fn is_streaming(&self) -> bool {
        self.live_text.is_some()
    }

    pub fn last_message(&self) -> Option<&FinalMessage> {
        self.ordered_messages.last()
    }
}

/// What changed between two consecutive views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewChange {
    pub messages_changed: bool,
    pub live_text_changed: bool,
}

impl ViewChange {
    /// Compare a previous view (if any) against the next one
    pub fn between(previous: Option<&ReconciledView>, next: &ReconciledView) -> Self {
        let Some(previous) = previous else {
            return Self { messages_changed: !next.ordered_messages.is_empty(), live_text_changed: next.is_streaming() };
        };

        let messages_changed = previous.ordered_messages.len() != next.ordered_messages.len()
            || previous
                .ordered_messages
                .iter()
                .zip(&next.ordered_messages)
                .any(|(a, b)| a.id != b.id);

        Self { messages_changed, live_text_changed: previous.live_text != next.live_text }
    }

    pub fn is_empty(&self) -> bool {
        !self.messages_changed && !self.live_text_changed
    }
}

/// Reconcile a full feed snapshot into a [`ReconciledView`]
///
/// Total over its input: unknown activities are ignored, empty messages are
/// skipped, duplicate stream termini are dropped, and deltas for closed
/// streams are discarded. When several streams are open at once, the one
/// whose first delta appears latest in the feed wins and the others are
/// suppressed.
pub fn reconcile(activities: &[Activity]) -> ReconciledView {
    let mut finals: Vec<FinalMessage> = Vec::new();
    let mut closed: HashSet<&str> = HashSet::new();
    let mut streams: Vec<(&str, Vec<&TypingDelta>)> = Vec::new();
    let mut stream_index: HashMap<&str, usize> = HashMap::new();

    for activity in activities {
        match activity {
            Activity::FinalMessage(message) => {
                if let Some(stream_id) = message.stream_id.as_deref()
                    && !closed.insert(stream_id)
                {
                    tracing::trace!(stream_id, "dropping duplicate stream terminus");
                    continue;
                }
                if message.is_empty() {
                    tracing::trace!(id = ?message.id, "skipping empty message");
                    continue;
                }
                finals.push(normalize_message(message));
            }
            Activity::TypingDelta(delta) => {
                let stream_id = delta.stream_id.as_str();
                match stream_index.get(stream_id) {
                    Some(&index) => streams[index].1.push(delta),
                    None => {
                        stream_index.insert(stream_id, streams.len());
                        streams.push((stream_id, vec![delta]));
                    }
                }
            }
            Activity::Other => {}
        }
    }

    finals.sort_by_key(|message| message.timestamp);

    let mut open: Vec<(&str, String)> = streams
        .into_iter()
        .filter(|(stream_id, _)| !closed.contains(stream_id))
        .map(|(stream_id, deltas)| (stream_id, assemble_stream(deltas)))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    if open.len() > 1 {
        let suppressed: Vec<&str> = open[..open.len() - 1].iter().map(|(id, _)| *id).collect();
        tracing::debug!(?suppressed, "multiple open streams, keeping the most recently started");
    }

    let live_text = open.pop().map(|(_, text)| normalize_line_breaks(&text).into_owned());

    ReconciledView { ordered_messages: finals, live_text }
}

fn normalize_message(message: &MessageActivity) -> FinalMessage {
    let mut normalized = FinalMessage::from(message.clone());
    if let Cow::Owned(text) = normalize_line_breaks(&normalized.text) {
        normalized.text = text;
    }
    normalized
}

/// Concatenate a stream's fragments in sequence order. The first arrival wins
/// when a sequence number repeats.
fn assemble_stream(mut deltas: Vec<&TypingDelta>) -> String {
    deltas.sort_by_key(|delta| delta.sequence_number);
    deltas.dedup_by_key(|delta| delta.sequence_number);
    deltas.iter().map(|delta| delta.text_fragment.as_str()).collect()
}

/// Memoizing front for [`reconcile`], keyed by feed revision
#[derive(Debug, Default)]
pub struct Reconciler {
    cached: Option<(u64, ReconciledView)>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciled view for the snapshot, recomputed only when the revision moved
    pub fn view(&mut self, snapshot: &FeedSnapshot) -> &ReconciledView {
        if self.revision() != Some(snapshot.revision) {
            self.cached = None;
        }

        let (_, view) = self
            .cached
            .get_or_insert_with(|| (snapshot.revision, reconcile(&snapshot.activities)));
        view
    }

    /// The most recently computed view, if any
    pub fn last(&self) -> Option<&ReconciledView> {
        self.cached.as_ref().map(|(_, view)| view)
    }

    /// Revision of the cached view
    pub fn revision(&self) -> Option<u64> {
        self.cached.as_ref().map(|(revision, _)| *revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Attachment, Role};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn user(id: &str, text: &str, seconds: i64) -> Activity {
        Activity::message(MessageActivity::user(text, at(seconds)).with_id(id))
    }

    fn bot(id: &str, text: &str, seconds: i64) -> Activity {
        Activity::message(MessageActivity::bot(text, at(seconds)).with_id(id))
    }

    fn stream_final(id: &str, stream_id: &str, text: &str, seconds: i64) -> Activity {
        Activity::message(MessageActivity::bot(text, at(seconds)).with_id(id).with_stream_id(stream_id))
    }

    fn ids(view: &ReconciledView) -> Vec<&str> {
        view.ordered_messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_empty_feed() {
        let view = reconcile(&[]);
        assert!(view.ordered_messages.is_empty());
        assert!(view.live_text.is_none());
        assert!(view.is_empty());
    }

    #[test]
    fn test_stream_then_final_scenario() {
        let mut feed = vec![user("1", "hi", 10), Activity::delta("S", 0, "He"), Activity::delta("S", 1, "llo")];

        let view = reconcile(&feed);
        assert_eq!(ids(&view), vec!["1"]);
        assert_eq!(view.live_text.as_deref(), Some("Hello"));

        feed.push(stream_final("finalS", "S", "Hello!", 20));
        let view = reconcile(&feed);
        assert_eq!(ids(&view), vec!["1", "finalS"]);
        assert_eq!(view.ordered_messages[1].text, "Hello!");
        assert!(view.live_text.is_none());
    }

    #[test]
    fn test_out_of_order_timestamps() {
        let view = reconcile(&[bot("late", "second", 20), bot("early", "first", 10)]);
        assert_eq!(ids(&view), vec!["early", "late"]);
    }

    #[test]
    fn test_order_invariant_with_many_messages() {
        let feed: Vec<Activity> = [50, 10, 40, 30, 20, 60, 5]
            .iter()
            .map(|&t| bot(&format!("m{t}"), "x", t))
            .collect();
        let view = reconcile(&feed);
        let timestamps: Vec<_> = view.ordered_messages.iter().map(|m| m.timestamp).collect();
        assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(timestamps.len(), 7);
    }

    #[test]
    fn test_timestamps_compared_as_instants() {
        // 09:00+02:00 is 07:00Z, so it precedes 08:00Z despite sorting later as a string
        let feed = vec![
            serde_json::from_value::<Activity>(json!({
                "kind": "finalMessage", "id": "b", "text": "b", "timestamp": "2024-05-01T08:00:00Z"
            }))
            .unwrap(),
            serde_json::from_value::<Activity>(json!({
                "kind": "finalMessage", "id": "a", "text": "a", "timestamp": "2024-05-01T09:00:00+02:00"
            }))
            .unwrap(),
        ];
        assert_eq!(ids(&reconcile(&feed)), vec!["a", "b"]);
    }

    #[test]
    fn test_equal_timestamps_keep_feed_order() {
        let view = reconcile(&[bot("first", "a", 10), user("second", "b", 10), bot("third", "c", 10)]);
        assert_eq!(ids(&view), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_delta_ordering_by_sequence_number() {
        let feed = vec![Activity::delta("S", 2, "c"), Activity::delta("S", 0, "a"), Activity::delta("S", 1, "b")];
        assert_eq!(reconcile(&feed).live_text.as_deref(), Some("abc"));
    }

    #[test]
    fn test_fragments_concatenated_without_separator() {
        let feed = vec![Activity::delta("S", 0, "Our company"), Activity::delta("S", 1, " offers flexible")];
        assert_eq!(reconcile(&feed).live_text.as_deref(), Some("Our company offers flexible"));
    }

    #[test]
    fn test_duplicate_sequence_number_first_arrival_wins() {
        let feed = vec![Activity::delta("S", 0, "a"), Activity::delta("S", 1, "b"), Activity::delta("S", 1, "X")];
        assert_eq!(reconcile(&feed).live_text.as_deref(), Some("ab"));
    }

    #[test]
    fn test_stream_closure_discards_late_deltas() {
        let feed = vec![
            Activity::delta("S", 0, "Hel"),
            stream_final("f", "S", "Hello", 20),
            Activity::delta("S", 1, "lo"),
            Activity::delta("S", 2, " again"),
        ];
        let view = reconcile(&feed);
        assert!(view.live_text.is_none());
        assert_eq!(ids(&view), vec!["f"]);
    }

    #[test]
    fn test_duplicate_stream_terminus_dropped() {
        let feed = vec![stream_final("f1", "S", "Hello", 20), stream_final("f2", "S", "Hello", 21)];
        assert_eq!(ids(&reconcile(&feed)), vec!["f1"]);
    }

    #[test]
    fn test_most_recently_started_open_stream_wins() {
        let feed = vec![
            Activity::delta("A", 0, "first"),
            Activity::delta("B", 0, "second"),
            Activity::delta("A", 1, " stream"),
        ];
        assert_eq!(reconcile(&feed).live_text.as_deref(), Some("second"));
    }

    #[test]
    fn test_second_open_stream_does_not_corrupt_first() {
        let feed = vec![
            Activity::delta("A", 0, "one"),
            Activity::delta("B", 0, "two"),
            stream_final("fb", "B", "two", 30),
            Activity::delta("A", 1, " more"),
        ];
        let view = reconcile(&feed);
        assert_eq!(view.live_text.as_deref(), Some("one more"));
        assert_eq!(ids(&view), vec!["fb"]);
    }

    #[test]
    fn test_stream_with_only_empty_fragments_is_not_open() {
        let feed = vec![Activity::delta("S", 0, ""), Activity::delta("S", 1, "")];
        assert!(reconcile(&feed).live_text.is_none());
    }

    #[test]
    fn test_empty_open_stream_does_not_hide_other_stream() {
        let feed = vec![Activity::delta("A", 0, "visible"), Activity::delta("B", 0, "")];
        assert_eq!(reconcile(&feed).live_text.as_deref(), Some("visible"));
    }

    #[test]
    fn test_identical_text_not_deduplicated() {
        let feed = vec![
            Activity::delta("S", 0, "same"),
            bot("plain", "same", 10),
            bot("plain2", "same", 11),
        ];
        let view = reconcile(&feed);
        assert_eq!(view.ordered_messages.len(), 2);
        assert_eq!(view.live_text.as_deref(), Some("same"));
    }

    #[test]
    fn test_other_activities_ignored() {
        let feed = vec![Activity::Other, user("1", "hi", 10), Activity::Other];
        let view = reconcile(&feed);
        assert_eq!(ids(&view), vec!["1"]);
    }

    #[test]
    fn test_empty_message_skipped() {
        let feed = vec![bot("empty", "", 10), bot("full", "text", 11)];
        assert_eq!(ids(&reconcile(&feed)), vec!["full"]);
    }

    #[test]
    fn test_empty_terminus_still_closes_stream() {
        let feed = vec![Activity::delta("S", 0, "partial"), stream_final("f", "S", "", 10)];
        let view = reconcile(&feed);
        assert!(view.live_text.is_none());
        assert!(view.ordered_messages.is_empty());
    }

    #[test]
    fn test_attachment_only_message_kept() {
        let message = MessageActivity::bot("", at(10))
            .with_id("card")
            .with_attachment(Attachment::adaptive_card(json!({"type": "AdaptiveCard"})));
        let view = reconcile(&[Activity::message(message)]);
        assert_eq!(view.ordered_messages.len(), 1);
        assert_eq!(view.ordered_messages[0].attachments.len(), 1);
    }

    #[test]
    fn test_normalization_fills_defaults() {
        let message = MessageActivity::bot("hello", at(10));
        let view = reconcile(&[Activity::message(message)]);
        let normalized = &view.ordered_messages[0];
        assert_eq!(normalized.id, at(10).to_rfc3339());
        assert_eq!(normalized.role, Role::Bot);
        assert!(normalized.attachments.is_empty());
    }

    #[test]
    fn test_line_breaks_normalized_in_messages_and_live_text() {
        let feed = vec![
            bot("1", "one<br>two<BR/>three<br />four", 10),
            Activity::delta("S", 0, "a<Br>"),
            Activity::delta("S", 1, "b"),
        ];
        let view = reconcile(&feed);
        assert_eq!(view.ordered_messages[0].text, "one\ntwo\nthree\nfour");
        assert_eq!(view.live_text.as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_line_break_split_across_fragments() {
        let feed = vec![Activity::delta("S", 0, "a<b"), Activity::delta("S", 1, "r>b")];
        assert_eq!(reconcile(&feed).live_text.as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_normalize_line_breaks_borrows_when_unchanged() {
        assert!(matches!(normalize_line_breaks("plain text"), Cow::Borrowed(_)));
        assert_eq!(normalize_line_breaks("<bR   />"), "\n");
        assert_eq!(normalize_line_breaks("<break>"), "<break>");
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let feed = vec![
            bot("b", "second", 20),
            Activity::delta("S", 1, "llo"),
            user("a", "first", 10),
            Activity::delta("S", 0, "he"),
            Activity::Other,
        ];
        assert_eq!(reconcile(&feed), reconcile(&feed));
    }

    #[test]
    fn test_reconciler_memoizes_by_revision() {
        let snapshot = FeedSnapshot::new(3, vec![user("1", "hi", 10)]);
        let mut reconciler = Reconciler::new();
        assert!(reconciler.last().is_none());

        let first = reconciler.view(&snapshot).clone();
        assert_eq!(reconciler.revision(), Some(3));
        assert_eq!(reconciler.view(&snapshot), &first);

        let next = FeedSnapshot::new(4, vec![user("1", "hi", 10), bot("2", "hello", 11)]);
        assert_eq!(reconciler.view(&next).ordered_messages.len(), 2);
        assert_eq!(reconciler.revision(), Some(4));
    }

    #[test]
    fn test_view_change_detection() {
        let first = reconcile(&[user("1", "hi", 10), Activity::delta("S", 0, "He")]);
        let change = ViewChange::between(None, &first);
        assert!(change.messages_changed);
        assert!(change.live_text_changed);

        let grown = reconcile(&[user("1", "hi", 10), Activity::delta("S", 0, "He"), Activity::delta("S", 1, "y")]);
        let change = ViewChange::between(Some(&first), &grown);
        assert!(!change.messages_changed);
        assert!(change.live_text_changed);

        let change = ViewChange::between(Some(&grown), &grown);
        assert!(change.is_empty());

        let reordered = reconcile(&[user("1", "hi", 10), bot("0", "earlier", 5)]);
        let change = ViewChange::between(Some(&first), &reordered);
        assert!(change.messages_changed);
    }
}
