//! Types shared by every scrub crate: peer and message identifiers, the
//! peer classifier, secret chat negotiation state and the operation records
//! queued for synchronization.

pub mod constants;
pub mod error;
pub mod operations;
pub mod secret_chat;
pub mod sticker;
pub mod types;

pub use error::ProtocolError;
pub use types::{
    classify, MessageId, MessageIndex, MessageNamespace, PeerClass, PeerId, PeerNamespace,
};
