use mnemo_core::Message;

/// Concatenate a conversation window into a labeled transcript, one
/// speaker-tagged line per message.
#[must_use]
pub fn build_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mnemo_core::Speaker;
    use uuid::Uuid;

    #[test]
    fn labels_each_line_with_speaker() {
        let messages = vec![
            Message {
                id: Uuid::now_v7(),
                session_id: "s1".to_string(),
                role: Speaker::User,
                content: "hi".to_string(),
                timestamp: Utc::now(),
            },
            Message {
                id: Uuid::now_v7(),
                session_id: "s1".to_string(),
                role: Speaker::Assistant,
                content: "hello".to_string(),
                timestamp: Utc::now(),
            },
        ];

        let transcript = build_transcript(&messages);
        assert_eq!(transcript, "[user] hi\n[assistant] hello");
    }
}
