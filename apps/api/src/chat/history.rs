//! Append-only chat log owned by one caller session.
//!
//! The server keeps no session state: callers send the history with each chat
//! request and receive it back with the new turns appended.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatRole::User, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatRole::Assistant, content.into());
    }

    fn push(&mut self, role: ChatRole, content: String) {
        self.turns.push(ChatTurn { role, content });
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Renders prior turns as `Role: content` lines under `header`.
    /// Returns `None` for an empty history.
    pub fn transcript(&self, header: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut out = String::from(header);
        for turn in &self.turns {
            out.push('\n');
            out.push_str(turn.role.label());
            out.push_str(": ");
            out.push_str(&turn.content);
        }
        Some(out)
    }
}
