use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
    System,
}

/// A single message in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
}

/// Append-only, insertion-ordered log of exchanged messages.
///
/// Messages are never mutated or removed; presentation consumes the log by
/// polling for entries appended since its last read.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return a reference to it
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
        });
        self.messages.last().expect("just pushed")
    }

    /// All messages, in insertion order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages appended at or after the given index
    pub fn messages_since(&self, index: usize) -> &[ChatMessage] {
        if index >= self.messages.len() {
            return &[];
        }
        &self.messages[index..]
    }

    /// Number of messages in the log
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
