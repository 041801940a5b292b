use serde::{Deserialize, Serialize};

// Peer namespace = the deletion/sync regime a peer belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PeerNamespace {
    CloudUser,
    CloudGroup,
    CloudChannel,
    SecretChat,
    Other,
}

impl PeerNamespace {
    pub fn as_raw(self) -> i32 {
        match self {
            Self::CloudUser => 0,
            Self::CloudGroup => 1,
            Self::CloudChannel => 2,
            Self::SecretChat => 3,
            Self::Other => i32::MAX,
        }
    }

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::CloudUser,
            1 => Self::CloudGroup,
            2 => Self::CloudChannel,
            3 => Self::SecretChat,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PeerId {
    pub namespace: PeerNamespace,
    pub id: i32,
}

impl PeerId {
    pub fn new(namespace: PeerNamespace, id: i32) -> Self {
        Self { namespace, id }
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace.as_raw(), self.id)
    }
}

/// Message namespaces partition a peer's timeline (cloud, local).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageNamespace(pub i32);

impl MessageNamespace {
    pub const CLOUD: Self = Self(0);
    pub const LOCAL: Self = Self(1);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId {
    pub peer_id: PeerId,
    pub namespace: MessageNamespace,
    pub id: i32,
}

impl MessageId {
    pub fn new(peer_id: PeerId, namespace: MessageNamespace, id: i32) -> Self {
        Self {
            peer_id,
            namespace,
            id,
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.peer_id, self.namespace.0, self.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageIndex {
    pub id: MessageId,
    pub timestamp: i32,
}

/// The synchronization regime a peer falls under for deletion purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerClass {
    /// Server-synchronized user, group or channel.
    Synced,
    /// End-to-end encrypted secret chat.
    Encrypted,
    /// Anything else; deletion side effects are skipped.
    Unknown,
}

pub fn classify(peer_id: PeerId) -> PeerClass {
    match peer_id.namespace {
        PeerNamespace::CloudUser | PeerNamespace::CloudGroup | PeerNamespace::CloudChannel => {
            PeerClass::Synced
        }
        PeerNamespace::SecretChat => PeerClass::Encrypted,
        PeerNamespace::Other => PeerClass::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_every_namespace() {
        let cases = [
            (PeerNamespace::CloudUser, PeerClass::Synced),
            (PeerNamespace::CloudGroup, PeerClass::Synced),
            (PeerNamespace::CloudChannel, PeerClass::Synced),
            (PeerNamespace::SecretChat, PeerClass::Encrypted),
            (PeerNamespace::Other, PeerClass::Unknown),
        ];
        for (namespace, expected) in cases {
            assert_eq!(classify(PeerId::new(namespace, 7)), expected);
        }
    }

    #[test]
    fn test_unknown_raw_namespace_maps_to_other() {
        assert_eq!(PeerNamespace::from_raw(42), PeerNamespace::Other);
        assert_eq!(PeerNamespace::from_raw(3), PeerNamespace::SecretChat);
        assert_eq!(
            PeerNamespace::from_raw(PeerNamespace::CloudChannel.as_raw()),
            PeerNamespace::CloudChannel
        );
    }
}
