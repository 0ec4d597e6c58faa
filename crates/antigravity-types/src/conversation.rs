//! Conversation history entries.
//!
//! Entries are persisted as role-tagged lines (`User: ...` / `Bot: ...`), the
//! same shape they take inside the prompt context block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of entries kept per user.
pub const HISTORY_WINDOW: usize = 20;

/// Who produced a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Line prefix used in stored logs and in the prompt context.
    pub fn tag(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn in a user's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

impl ConversationEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Render as a `Tag: content` line.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.role.tag(), self.content)
    }

    /// Parse a stored `Tag: content` line. Unknown tags yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (tag, content) = line.split_once(": ")?;
        let role = match tag {
            "User" => Role::User,
            "Bot" => Role::Assistant,
            _ => return None,
        };
        Some(Self::new(role, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_uses_tags() {
        assert_eq!(ConversationEntry::new(Role::User, "chào").to_line(), "User: chào");
        assert_eq!(
            ConversationEntry::new(Role::Assistant, "xin chào").to_line(),
            "Bot: xin chào"
        );
    }

    #[test]
    fn parse_line_keeps_colons_in_content() {
        let entry = ConversationEntry::parse_line("Bot: time is 10: 30").unwrap();
        assert_eq!(entry.role, Role::Assistant);
        assert_eq!(entry.content, "time is 10: 30");
    }

    #[test]
    fn parse_line_rejects_unknown_tag() {
        assert!(ConversationEntry::parse_line("System: hi").is_none());
        assert!(ConversationEntry::parse_line("no tag here").is_none());
    }
}
