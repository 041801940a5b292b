//! Negotiation state of an end-to-end encrypted secret chat.
//!
//! The state is created and advanced by the handshake logic; deletion only
//! reads it to pick the protocol layer for new outgoing operations and writes
//! back the bookkeeping that queuing an operation produces.

use serde::{Deserialize, Serialize};

use crate::constants::REKEY_OPERATION_THRESHOLD;
use crate::error::ProtocolError;

/// Protocol layer an outgoing operation is encoded with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SecretChatLayer {
    Layer8,
    Layer46,
    Layer73,
}

impl SecretChatLayer {
    pub fn number(self) -> i32 {
        match self {
            Self::Layer8 => 8,
            Self::Layer46 => 46,
            Self::Layer73 => 73,
        }
    }
}

/// Layers that can be negotiated once sequence numbering is in place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecretChatSequenceBasedLayer {
    Layer46,
    Layer73,
}

impl SecretChatSequenceBasedLayer {
    pub fn secret_chat_layer(self) -> SecretChatLayer {
        match self {
            Self::Layer46 => SecretChatLayer::Layer46,
            Self::Layer73 => SecretChatLayer::Layer73,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretChatLayerNegotiationState {
    pub active_layer: SecretChatSequenceBasedLayer,
    pub locally_requested_layer: Option<i32>,
    pub remotely_requested_layer: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretChatSequenceBasedState {
    pub layer_negotiation_state: SecretChatLayerNegotiationState,
    /// Operations queued under the current key.
    pub outgoing_operations_since_rekey: u32,
    /// Set once the key has been used for enough operations; the rekey
    /// session picks it up.
    pub rekey_requested: bool,
}

impl SecretChatSequenceBasedState {
    pub fn new(active_layer: SecretChatSequenceBasedLayer) -> Self {
        Self {
            layer_negotiation_state: SecretChatLayerNegotiationState {
                active_layer,
                locally_requested_layer: None,
                remotely_requested_layer: None,
            },
            outgoing_operations_since_rekey: 0,
            rekey_requested: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecretChatEmbeddedState {
    Terminated,
    Handshake,
    BasicLayer,
    SequenceBasedLayer(SecretChatSequenceBasedState),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecretChatRole {
    Creator,
    Participant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretChatState {
    pub role: SecretChatRole,
    pub embedded_state: SecretChatEmbeddedState,
}

impl SecretChatState {
    pub fn new(role: SecretChatRole, embedded_state: SecretChatEmbeddedState) -> Self {
        Self {
            role,
            embedded_state,
        }
    }

    /// Layer new outgoing operations must use, or `None` while the chat has no
    /// remote party able to receive them.
    pub fn outgoing_layer(&self) -> Option<SecretChatLayer> {
        match &self.embedded_state {
            SecretChatEmbeddedState::Terminated | SecretChatEmbeddedState::Handshake => None,
            SecretChatEmbeddedState::BasicLayer => Some(SecretChatLayer::Layer8),
            SecretChatEmbeddedState::SequenceBasedLayer(sequence_state) => Some(
                sequence_state
                    .layer_negotiation_state
                    .active_layer
                    .secret_chat_layer(),
            ),
        }
    }

    /// State after one more outgoing operation has been queued.
    pub fn with_outgoing_operation_queued(&self) -> Self {
        match &self.embedded_state {
            SecretChatEmbeddedState::SequenceBasedLayer(sequence_state) => {
                let mut updated = sequence_state.clone();
                updated.outgoing_operations_since_rekey =
                    updated.outgoing_operations_since_rekey.saturating_add(1);
                if updated.outgoing_operations_since_rekey >= REKEY_OPERATION_THRESHOLD {
                    updated.rekey_requested = true;
                }
                Self {
                    role: self.role,
                    embedded_state: SecretChatEmbeddedState::SequenceBasedLayer(updated),
                }
            }
            _ => self.clone(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        Ok(bincode::deserialize(data)?)
    }
}
