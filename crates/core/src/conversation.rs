use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation transcript. Messages are immutable once
/// appended; the caller persists the transcript between requests and
/// resubmits it, so nothing here survives a single call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationMessage, Role};

    #[test]
    fn role_serializes_snake_case() {
        let message = ConversationMessage::user("hello");
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn assistant_constructor_sets_role() {
        assert_eq!(ConversationMessage::assistant("hi").role, Role::Assistant);
    }
}
