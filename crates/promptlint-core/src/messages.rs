//! Chat-style prompts: role-tagged messages plus retrieved context.
//!
//! A conversation is flattened into one prompt text before analysis. Rules
//! see every message joined in order; retrieved context is counted toward
//! input tokens but is not linted, since the prompt author does not write it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Who a message is from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the whole conversation.
    System,
    /// The end user's request (default).
    #[default]
    User,
    /// A previous model reply.
    Assistant,
    /// Output returned by a tool call.
    Tool,
}

/// One message in a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// Message author; defaults to `user`.
    #[serde(default)]
    pub role: Role,
    /// Message text.
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// A message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// A piece of retrieved context sent along with the messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContextChunk {
    /// Chunk text.
    #[serde(default)]
    pub text: String,
    /// Where the chunk came from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ContextChunk {
    /// A chunk with no source.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }
}

/// A conversation flattened into the texts analysis needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedPrompt {
    /// Every trimmed message, newline-joined in order.
    pub joined_text: String,
    /// System messages only.
    pub system_text: String,
    /// User messages only.
    pub user_text: String,
    /// Non-blank context chunks, separated by blank lines.
    pub context_text: String,
}

impl FlattenedPrompt {
    /// Flatten messages and context chunks.
    pub fn new(messages: &[Message], context: &[ContextChunk]) -> Self {
        Self {
            joined_text: join_contents(messages.iter()),
            system_text: join_contents(messages.iter().filter(|m| m.role == Role::System)),
            user_text: join_contents(messages.iter().filter(|m| m.role == Role::User)),
            context_text: context
                .iter()
                .map(|c| c.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    /// Text a rewrite should start from: the user's request, or the whole
    /// conversation when there is no user message.
    pub fn rewrite_base(&self) -> &str {
        if self.user_text.is_empty() {
            &self.joined_text
        } else {
            &self.user_text
        }
    }
}

fn join_contents<'a>(messages: impl Iterator<Item = &'a Message>) -> String {
    messages
        .map(|m| m.content.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
