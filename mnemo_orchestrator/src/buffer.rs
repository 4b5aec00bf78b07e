use std::collections::VecDeque;

use mnemo_core::Message;

/// Soft-capped FIFO of recent messages, per session. Exclusively owned by the orchestrator; the
/// identity collaborator's durable history is a separate, unbounded log.
const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Default)]
pub struct MessageBuffer {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { messages: VecDeque::new(), capacity: DEFAULT_CAPACITY }
    }

    pub fn push(&mut self, message: Message) {
        if self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<Message> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    #[must_use]
    pub fn all(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::Speaker;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut buffer = MessageBuffer { messages: VecDeque::new(), capacity: 3 };
        for i in 0..5 {
            buffer.push(Message::new("s1", Speaker::User, format!("msg {i}")));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.all()[0].content, "msg 2");
    }

    #[test]
    fn tail_returns_last_n() {
        let mut buffer = MessageBuffer::new();
        for i in 0..10 {
            buffer.push(Message::new("s1", Speaker::User, format!("msg {i}")));
        }
        let tail = buffer.tail(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[2].content, "msg 9");
    }
}
