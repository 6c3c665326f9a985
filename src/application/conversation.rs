//! Chat conversation state for the health assistant panel.
//!
//! Sending is split in two so the reply can be produced off the UI thread:
//! [`Conversation::begin`] records the user message and marks a reply as
//! pending; [`Conversation::receive`] appends the reply (or the fixed
//! apology) and clears the pending flag.

use chrono::{DateTime, Local};

use crate::adapters::assistant::{ERROR_MESSAGE, WELCOME_MESSAGE};
use crate::domain::Assessment;
use crate::ports::{GatewayError, HealthAssistant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    enabled: bool,
    welcomed: bool,
    awaiting_reply: bool,
    next_id: u64,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while a reply is outstanding ("typing").
    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Enable the chat. The welcome message is posted the first time only.
    pub fn enable(&mut self) {
        self.enabled = true;
        if !self.welcomed {
            self.welcomed = true;
            self.push(Sender::Assistant, WELCOME_MESSAGE.to_string());
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Record a user message.
    ///
    /// Returns the trimmed text to send, or `None` when the input is blank,
    /// the chat is disabled, or a reply is already pending.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || !self.enabled || self.awaiting_reply {
            return None;
        }
        self.push(Sender::User, text.to_string());
        self.awaiting_reply = true;
        Some(text.to_string())
    }

    /// Complete a pending exchange.
    pub fn receive(&mut self, reply: Result<String, GatewayError>) {
        let text = reply.unwrap_or_else(|e| {
            tracing::error!("Assistant failed: {}", e);
            ERROR_MESSAGE.to_string()
        });
        self.push(Sender::Assistant, text);
        self.awaiting_reply = false;
    }

    /// Blocking send: `begin`, ask `assistant`, `receive`.
    ///
    /// Returns `false` if the input was ignored.
    pub fn send<H>(&mut self, input: &str, assistant: &H, context: Option<&Assessment>) -> bool
    where
        H: HealthAssistant + ?Sized,
    {
        match self.begin(input) {
            Some(text) => {
                let reply = assistant.respond(&text, context);
                self.receive(reply);
                true
            }
            None => false,
        }
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            sender,
            text,
            at: Local::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::KeywordAssistant;
    use std::time::Duration;

    struct BrokenAssistant;

    impl HealthAssistant for BrokenAssistant {
        fn respond(&self, _: &str, _: Option<&Assessment>) -> Result<String, GatewayError> {
            Err(GatewayError::Timeout)
        }
    }

    #[test]
    fn test_disabled_until_enabled() {
        let mut chat = Conversation::new();
        let assistant = KeywordAssistant::new(Duration::ZERO);
        assert!(!chat.send("hello", &assistant, None));
        assert!(chat.messages().is_empty());

        chat.enable();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].text, WELCOME_MESSAGE);
    }

    #[test]
    fn test_welcome_posted_once() {
        let mut chat = Conversation::new();
        chat.enable();
        chat.disable();
        chat.enable();
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_blank_input_ignored_and_one_reply_per_message() {
        let mut chat = Conversation::new();
        let assistant = KeywordAssistant::new(Duration::ZERO);
        chat.enable();

        assert!(!chat.send("   ", &assistant, None));
        assert!(chat.send("  tips on diet?  ", &assistant, None));

        let msgs = chat.messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].sender, Sender::User);
        assert_eq!(msgs[1].text, "tips on diet?");
        assert_eq!(msgs[2].sender, Sender::Assistant);
        assert!(!chat.is_awaiting_reply());
    }

    #[test]
    fn test_second_message_ignored_while_pending() {
        let mut chat = Conversation::new();
        chat.enable();
        assert!(chat.begin("first").is_some());
        assert!(chat.is_awaiting_reply());
        assert!(chat.begin("second").is_none());
    }

    #[test]
    fn test_failure_posts_apology() {
        let mut chat = Conversation::new();
        chat.enable();
        assert!(chat.send("anything", &BrokenAssistant, None));
        let last = chat.messages().last().expect("reply");
        assert_eq!(last.text, ERROR_MESSAGE);
        assert_eq!(last.sender, Sender::Assistant);
    }
}
