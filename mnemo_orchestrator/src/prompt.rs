use mnemo_core::{ChatMessage, ChatRole, Fragment, Message, Role, Speaker};

/// Groups context fragments by speaker, with origin labels, into the memory
/// block inserted into the system prompt.
fn build_memory_block(fragments: &[Fragment]) -> Option<String> {
    if fragments.is_empty() {
        return None;
    }

    let mut user_facts = Vec::new();
    let mut assistant_facts = Vec::new();

    for fragment in fragments {
        let line = format!("- [{}] {}", fragment.fragment_type, fragment.content);
        match fragment.speaker {
            Speaker::User => user_facts.push(line),
            Speaker::Assistant => assistant_facts.push(line),
        }
    }

    let mut block = String::from("# Relevant memories\n");
    if !user_facts.is_empty() {
        block.push_str("\n## From the user\n");
        block.push_str(&user_facts.join("\n"));
        block.push('\n');
    }
    if !assistant_facts.is_empty() {
        block.push_str("\n## From you (the assistant), previously\n");
        block.push_str(&assistant_facts.join("\n"));
        block.push('\n');
    }

    Some(block)
}

fn speaker_to_chat_role(speaker: Speaker) -> ChatRole {
    match speaker {
        Speaker::User => ChatRole::User,
        Speaker::Assistant => ChatRole::Assistant,
    }
}

/// Assembles the full message list for one turn: `[role.system_prompt,
/// memory_block, few_shot_examples, history_tail, user_text]`.
#[must_use]
pub fn build_messages(
    role: &Role,
    fragments: &[Fragment],
    history_tail: &[Message],
    user_text: &str,
) -> Vec<ChatMessage> {
    let mut system_prompt = role.system_prompt.clone();
    if let Some(memory_block) = build_memory_block(fragments) {
        system_prompt.push_str("\n\n");
        system_prompt.push_str(&memory_block);
    }

    let mut messages = vec![ChatMessage { role: ChatRole::System, content: system_prompt }];

    for example in &role.few_shot_examples {
        messages.push(ChatMessage { role: ChatRole::User, content: example.user.clone() });
        messages.push(ChatMessage { role: ChatRole::Assistant, content: example.assistant.clone() });
    }

    for message in history_tail {
        messages.push(ChatMessage {
            role: speaker_to_chat_role(message.role),
            content: message.content.clone(),
        });
    }

    messages.push(ChatMessage { role: ChatRole::User, content: user_text.to_string() });

    messages
}
