//! Domain model structs persisted in the local database.

use serde::{Deserialize, Serialize};

use scrub_shared::{MessageId, PeerId};

// ---------------------------------------------------------------------------
// Peer
// ---------------------------------------------------------------------------

/// A known conversation endpoint (user, group, channel or secret chat).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Peer {
    pub id: PeerId,
    /// Server-issued access hash; peers without one cannot be addressed in
    /// remote requests.
    pub access_hash: Option<i64>,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single stored message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Cross-device id, only present on messages exchanged over a secret chat.
    pub globally_unique_id: Option<i64>,
    pub author_id: Option<PeerId>,
    /// Unix seconds.
    pub timestamp: i32,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Cached peer metadata
// ---------------------------------------------------------------------------

/// Points from an upgraded group to the last message it had when it was
/// migrated into its successor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelMigrationReference {
    pub max_message_id: MessageId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedChannelData {
    pub migration_reference: Option<ChannelMigrationReference>,
}

// ---------------------------------------------------------------------------
// Chat list
// ---------------------------------------------------------------------------

/// Whether, and from which point in time, a peer appears in the chat list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PeerChatListInclusion {
    NotIncluded,
    IfHasMessagesOrOneOf {
        pinning_index: Option<u16>,
        min_timestamp: Option<i32>,
    },
}

impl PeerChatListInclusion {
    /// Inclusion that keeps the peer listed at least from `timestamp` on.
    pub fn with_min_timestamp(self, timestamp: i32) -> Self {
        match self {
            Self::NotIncluded => Self::IfHasMessagesOrOneOf {
                pinning_index: None,
                min_timestamp: Some(timestamp),
            },
            Self::IfHasMessagesOrOneOf {
                pinning_index,
                min_timestamp,
            } => Self::IfHasMessagesOrOneOf {
                pinning_index,
                min_timestamp: Some(min_timestamp.map_or(timestamp, |t| t.max(timestamp))),
            },
        }
    }
}
