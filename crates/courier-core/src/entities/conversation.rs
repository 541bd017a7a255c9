//! Conversation entity - a direct pair or a named group

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Kind of conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    /// One-to-one conversation, deduplicated per participant pair
    Direct,
    /// Multi-member conversation, may carry a title and image
    Group,
}

impl ConversationKind {
    /// Database/wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
        }
    }

    /// Parse the database/wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Snowflake,
    pub kind: ConversationKind,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new direct conversation
    pub fn direct(id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind: ConversationKind::Direct,
            title: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new group conversation
    pub fn group(id: Snowflake, title: Option<String>, image_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind: ConversationKind::Group,
            title,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.kind == ConversationKind::Direct
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == ConversationKind::Group
    }

    /// Record activity, moving the conversation to the top of listings
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Canonical key identifying a direct participant pair.
///
/// Symmetric: `direct_pair_key(a, b) == direct_pair_key(b, a)`.
pub fn direct_pair_key(a: Snowflake, b: Snowflake) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}:{hi}")
}
