//! Typed requests and results exchanged with the API server.

use serde::{Deserialize, Serialize};

use scrub_shared::constants::STICKER_SET_FLAG_MASKS;
use scrub_shared::sticker::StickerPackReference;
use scrub_shared::{PeerId, PeerNamespace};

/// Protocol handle of a channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputChannel {
    pub channel_id: i32,
    pub access_hash: i64,
}

impl InputChannel {
    /// Only channels the server gave us an access hash for are addressable.
    pub fn from_peer(peer_id: PeerId, access_hash: Option<i64>) -> Option<Self> {
        match (peer_id.namespace, access_hash) {
            (PeerNamespace::CloudChannel, Some(access_hash)) => Some(Self {
                channel_id: peer_id.id,
                access_hash,
            }),
            _ => None,
        }
    }
}

/// Protocol handle of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputUser {
    pub user_id: i32,
    pub access_hash: i64,
}

impl InputUser {
    pub fn from_peer(peer_id: PeerId, access_hash: Option<i64>) -> Option<Self> {
        match (peer_id.namespace, access_hash) {
            (PeerNamespace::CloudUser, Some(access_hash)) => Some(Self {
                user_id: peer_id.id,
                access_hash,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputStickerSet {
    Id { id: i64, access_hash: i64 },
    ShortName { short_name: String },
}

impl From<&StickerPackReference> for InputStickerSet {
    fn from(reference: &StickerPackReference) -> Self {
        match reference {
            StickerPackReference::Id { id, access_hash } => Self::Id {
                id: *id,
                access_hash: *access_hash,
            },
            StickerPackReference::Name(name) => Self::ShortName {
                short_name: name.clone(),
            },
        }
    }
}

/// All requests the client sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum ApiRequest {
    /// Delete every message `user` wrote in `channel`.  The server works in
    /// batches and reports what is left through `AffectedHistory::offset`.
    DeleteUserHistory {
        channel: InputChannel,
        user: InputUser,
    },

    GetStickerSet { stickerset: InputStickerSet },
}

impl ApiRequest {
    pub fn method(&self) -> &'static str {
        match self {
            Self::DeleteUserHistory { .. } => "delete_user_history",
            Self::GetStickerSet { .. } => "get_sticker_set",
        }
    }
}

/// Progress of a server-side history deletion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AffectedHistory {
    pub pts: i32,
    pub pts_count: i32,
    /// Zero once nothing matching is left on the server.
    pub offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStickerSetInfo {
    pub flags: i32,
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub count: i32,
    pub hash: i32,
}

impl ApiStickerSetInfo {
    pub fn is_masks(&self) -> bool {
        self.flags & STICKER_SET_FLAG_MASKS != 0
    }
}

/// Emoticon and the documents listed under it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStickerPack {
    pub emoticon: String,
    pub documents: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiDocument {
    pub id: i64,
    pub access_hash: i64,
    pub mime_type: String,
    pub size: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStickerSet {
    pub set: ApiStickerSetInfo,
    pub packs: Vec<ApiStickerPack>,
    pub documents: Vec<ApiDocument>,
}

/// All results the server can return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiResponse {
    AffectedHistory(AffectedHistory),
    StickerSet(ApiStickerSet),
}
