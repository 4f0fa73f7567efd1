//! Shared conversation types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Category
// =============================================================================

/// Legal topic label attached to a query.
///
/// Wire values are the lowercase English labels used by the analysis
/// gateway contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Civil,
    Criminal,
    Commercial,
    Family,
    Labor,
}

impl Category {
    /// Wire label for the gateway request.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Civil => "civil",
            Category::Criminal => "criminal",
            Category::Commercial => "commercial",
            Category::Family => "family",
            Category::Labor => "labor",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Civil
    }
}

// =============================================================================
// Message
// =============================================================================

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in a conversation.
///
/// Appended once and immutable thereafter; `incomplete` is fixed at
/// creation time from the continuation detector and never re-evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Epoch seconds; monotonically non-decreasing within a session.
    pub created_at: i64,
    /// Set only on assistant turns, true when the answer looks truncated.
    pub incomplete: bool,
}

impl Message {
    pub fn user(content: impl Into<String>, created_at: i64) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            created_at,
            incomplete: false,
        }
    }

    pub fn assistant(content: impl Into<String>, created_at: i64, incomplete: bool) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at,
            incomplete,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
