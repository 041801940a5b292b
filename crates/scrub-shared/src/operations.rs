use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::secret_chat::SecretChatLayer;
use crate::types::{MessageId, PeerId};

/// Contents of an operation waiting to be sent over a secret chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecretChatOutgoingOperationContents {
    /// Ask the remote side to delete messages by their globally unique ids
    DeleteMessages {
        layer: SecretChatLayer,
        action_id: i64,
        globally_unique_ids: Vec<i64>,
    },

    /// Ask the remote side to clear the whole history
    ClearHistory {
        layer: SecretChatLayer,
        action_id: i64,
    },
}

impl SecretChatOutgoingOperationContents {
    pub fn action_id(&self) -> i64 {
        match self {
            Self::DeleteMessages { action_id, .. } | Self::ClearHistory { action_id, .. } => {
                *action_id
            }
        }
    }
}

/// Entry of the per-peer secret chat outgoing queue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretChatOutgoingOperation {
    pub contents: SecretChatOutgoingOperationContents,
    pub mutable: bool,
    pub delivered: bool,
}

impl SecretChatOutgoingOperation {
    pub fn pending(contents: SecretChatOutgoingOperationContents) -> Self {
        Self {
            contents,
            mutable: true,
            delivered: false,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        Ok(bincode::deserialize(data)?)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CloudChatRemoveMessagesType {
    ForLocalPeer,
    ForEveryone,
}

/// Intent recorded in a cloud peer's local sync log, replayed to the server later
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CloudChatOperation {
    RemoveMessages {
        message_ids: Vec<MessageId>,
        kind: CloudChatRemoveMessagesType,
    },
    ClearHistory {
        peer_id: PeerId,
        explicit_top_message_id: Option<MessageId>,
    },
}

impl CloudChatOperation {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        Ok(bincode::deserialize(data)?)
    }
}

/// Fresh id the remote side uses to de-duplicate a repeated action.
pub fn new_action_id() -> i64 {
    rand::thread_rng().gen()
}
