/// Position in the sent-message history while recalling, plus the draft
/// that was in the composer before recall started
#[derive(Debug, Clone, PartialEq, Eq)]
struct Recall {
    index: usize,
    draft: String,
}

/// State for the input composer
///
/// `cursor` counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub buffer: String,
    pub cursor: usize,
    /// Sent messages, oldest first, without consecutive duplicates
    pub history: Vec<String>,
    recall: Option<Recall>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn byte_at(&self, cursor: usize) -> usize {
        self.buffer.char_indices().nth(cursor).map_or(self.buffer.len(), |(index, _)| index)
    }

    fn len_chars(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) {
        if let Some(cursor) = self.cursor.checked_sub(1) {
            let at = self.byte_at(cursor);
            if at < self.buffer.len() {
                self.buffer.remove(at);
                self.cursor = cursor;
            }
        }
    }

    /// Remove the character under the cursor
    pub fn delete(&mut self) {
        let at = self.byte_at(self.cursor);
        if at < self.buffer.len() {
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len_chars());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len_chars();
    }

    /// Text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.buffer.split_at(self.byte_at(self.cursor))
    }

    fn replace(&mut self, text: String) {
        self.buffer = text;
        self.move_end();
    }

    /// Empty the composer and record the trimmed text in history
    ///
    /// A blank composer is left untouched and yields `None`.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.buffer.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.replace(String::new());
        self.recall = None;
        if self.history.last() != Some(&text) {
            self.history.push(text.clone());
        }
        Some(text)
    }

    /// Show the next older sent message, keeping the draft aside
    pub fn recall_older(&mut self) {
        let index = match self.recall.as_ref().map(|recall| recall.index) {
            Some(index) => index.saturating_sub(1),
            None if self.history.is_empty() => return,
            None => {
                let draft = std::mem::take(&mut self.buffer);
                self.recall = Some(Recall { index: self.history.len(), draft });
                self.history.len() - 1
            }
        };

        if let Some(recall) = self.recall.as_mut() {
            recall.index = index;
        }
        self.replace(self.history[index].clone());
    }

    /// Show the next newer sent message, or the draft after the newest
    pub fn recall_newer(&mut self) {
        let Some(recall) = self.recall.as_mut() else {
            return;
        };

        recall.index += 1;
        match self.history.get(recall.index).cloned() {
            Some(message) => self.replace(message),
            None => {
                let draft = std::mem::take(&mut recall.draft);
                self.recall = None;
                self.replace(draft);
            }
        }
    }

    /// Keep whatever recalled text is in the composer as the new draft
    pub fn stop_recall(&mut self) {
        self.recall = None;
    }

    pub fn is_recalling(&self) -> bool {
        self.recall.is_some()
    }

    /// "n/total" while recalling
    pub fn history_position(&self) -> Option<String> {
        self.recall.as_ref().map(|recall| format!("{}/{}", recall.index + 1, self.history.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputState {
        let mut input = InputState::new();
        text.chars().for_each(|c| input.insert_char(c));
        input
    }

    fn sent(messages: &[&str]) -> InputState {
        let mut input = InputState::new();
        for message in messages {
            input.replace(message.to_string());
            input.submit();
        }
        input
    }

    #[test]
    fn test_editing_at_cursor() {
        let mut input = typed("abc");
        assert_eq!(input.cursor, 3);

        input.move_left();
        input.move_left();
        input.insert_char('X');
        assert_eq!(input.buffer, "aXbc");
        assert_eq!(input.split_at_cursor(), ("aX", "bc"));

        input.delete();
        assert_eq!(input.buffer, "aXc");

        input.backspace();
        assert_eq!(input.buffer, "ac");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = typed("ab");
        input.move_right();
        assert_eq!(input.cursor, 2);

        input.delete();
        assert_eq!(input.buffer, "ab");

        input.move_home();
        input.move_left();
        input.backspace();
        assert_eq!(input.cursor, 0);
        assert_eq!(input.buffer, "ab");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = typed("héllo");
        assert_eq!(input.cursor, 5);

        input.move_home();
        input.move_right();
        input.move_right();
        assert_eq!(input.split_at_cursor(), ("hé", "llo"));

        input.backspace();
        assert_eq!(input.buffer, "hllo");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn test_submit_trims_and_records() {
        let mut input = typed("  hello  ");
        assert_eq!(input.submit(), Some("hello".to_string()));
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
        assert_eq!(input.history, vec!["hello".to_string()]);
    }

    #[test]
    fn test_submit_blank_is_ignored() {
        let mut input = typed("   ");
        assert_eq!(input.submit(), None);
        assert_eq!(input.buffer, "   ");
        assert!(input.history.is_empty());
    }

    #[test]
    fn test_consecutive_duplicates_recorded_once() {
        let input = sent(&["same", "same", "other", "same"]);
        assert_eq!(input.history, vec!["same", "other", "same"]);
    }

    #[test]
    fn test_recall_walks_history_and_restores_draft() {
        let mut input = sent(&["first", "second", "third"]);
        input.replace("draft".to_string());

        input.recall_older();
        assert_eq!(input.buffer, "third");
        assert_eq!(input.history_position(), Some("3/3".to_string()));

        input.recall_older();
        input.recall_older();
        input.recall_older();
        assert_eq!(input.buffer, "first");
        assert_eq!(input.history_position(), Some("1/3".to_string()));

        input.recall_newer();
        assert_eq!(input.buffer, "second");
        assert_eq!(input.cursor, "second".len());

        input.recall_newer();
        input.recall_newer();
        assert_eq!(input.buffer, "draft");
        assert!(!input.is_recalling());
        assert!(input.history_position().is_none());
    }

    #[test]
    fn test_recall_without_history_is_noop() {
        let mut input = typed("draft");
        input.recall_older();
        input.recall_newer();
        assert_eq!(input.buffer, "draft");
        assert!(!input.is_recalling());
    }

    #[test]
    fn test_stop_recall_keeps_recalled_text() {
        let mut input = sent(&["earlier"]);
        input.recall_older();
        input.stop_recall();
        input.insert_char('!');
        assert_eq!(input.buffer, "earlier!");

        input.recall_newer();
        assert_eq!(input.buffer, "earlier!");
    }
}
