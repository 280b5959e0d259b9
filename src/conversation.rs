use crate::providers::Message;

pub const DEFAULT_HISTORY_LIMIT: usize = 12;

/// Rolling message history sent to the chat model on every turn.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    limit: usize,
}

impl Conversation {
    pub fn new(limit: usize) -> Self {
        Self {
            messages: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drops the oldest messages until at most `limit` remain.
    pub fn truncate(&mut self) {
        if self.messages.len() > self.limit {
            let excess = self.messages.len() - self.limit;
            self.messages.drain(..excess);
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_the_most_recent_messages() {
        let mut conversation = Conversation::default();
        for i in 0..15 {
            conversation.push(Message::user(format!("m{}", i)));
        }
        assert_eq!(conversation.len(), 15);

        conversation.truncate();

        assert_eq!(conversation.len(), 12);
        assert_eq!(conversation.messages()[0].content, "m3");
        assert_eq!(conversation.messages()[11].content, "m14");
    }

    #[test]
    fn truncate_is_a_no_op_under_the_limit() {
        let mut conversation = Conversation::new(4);
        conversation.push(Message::user("a"));
        conversation.push(Message::assistant("b"));
        conversation.truncate();
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn zero_limit_still_keeps_the_last_message() {
        let mut conversation = Conversation::new(0);
        conversation.push(Message::user("a"));
        conversation.push(Message::user("b"));
        conversation.truncate();
        assert_eq!(conversation.messages(), &[Message::user("b")]);
    }
}
