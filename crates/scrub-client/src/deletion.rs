//! Interactive message deletion and history clearing.
//!
//! Both operations run inside one store transaction.  The local change always
//! lands; the peer's class only decides which synchronization record is
//! written next to it:
//!
//! - synced peers get an entry in their cloud sync log,
//! - secret chats get an outgoing operation, if the chat can deliver one,
//! - anything else gets nothing.

use std::collections::HashMap;

use scrub_shared::operations::{
    new_action_id, CloudChatOperation, CloudChatRemoveMessagesType,
    SecretChatOutgoingOperationContents,
};
use scrub_shared::{classify, MessageId, MessageNamespace, PeerClass, PeerId};
use scrub_store::{ChannelMigrationReference, Result, Transaction};
use tracing::{debug, warn};

use crate::secret_chat::queue_secret_chat_operation;

/// Who a deletion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionScope {
    /// Only this device's account.
    ForLocalPeer,
    /// Every participant, where the peer supports it.
    ForEveryone,
}

impl From<DeletionScope> for CloudChatRemoveMessagesType {
    fn from(scope: DeletionScope) -> Self {
        match scope {
            DeletionScope::ForLocalPeer => Self::ForLocalPeer,
            DeletionScope::ForEveryone => Self::ForEveryone,
        }
    }
}

/// Group ids by peer, keeping the order peers are first seen in.
fn group_by_peer(ids: &[MessageId]) -> Vec<(PeerId, Vec<MessageId>)> {
    let mut groups: Vec<(PeerId, Vec<MessageId>)> = Vec::new();
    let mut positions: HashMap<PeerId, usize> = HashMap::new();

    for id in ids {
        match positions.get(&id.peer_id) {
            Some(&pos) => groups[pos].1.push(*id),
            None => {
                positions.insert(id.peer_id, groups.len());
                groups.push((id.peer_id, vec![*id]));
            }
        }
    }
    groups
}

/// Delete `ids` locally and record the matching sync side effect per peer.
///
/// Returns the number of messages removed from local storage.
pub fn delete_messages(
    tx: &Transaction<'_>,
    ids: &[MessageId],
    scope: DeletionScope,
) -> Result<usize> {
    for (peer_id, peer_ids) in group_by_peer(ids) {
        match classify(peer_id) {
            PeerClass::Synced => {
                tx.add_cloud_chat_operation(
                    peer_id,
                    &CloudChatOperation::RemoveMessages {
                        message_ids: peer_ids,
                        kind: scope.into(),
                    },
                )?;
            }
            PeerClass::Encrypted => {
                queue_secret_chat_operation(tx, peer_id, |layer| {
                    // Messages that never went through the secret chat have
                    // no globally unique id; the remote side cannot know them.
                    let mut globally_unique_ids = Vec::new();
                    for id in &peer_ids {
                        if let Some(gid) = tx.get_message(*id)?.and_then(|m| m.globally_unique_id)
                        {
                            globally_unique_ids.push(gid);
                        }
                    }
                    Ok(SecretChatOutgoingOperationContents::DeleteMessages {
                        layer,
                        action_id: new_action_id(),
                        globally_unique_ids,
                    })
                })?;
            }
            PeerClass::Unknown => {
                debug!(peer = %peer_id, "Unknown peer namespace, local delete only");
            }
        }
    }

    tx.delete_messages(ids)
}

/// Where `peer_id`'s history continues after a migration, if anywhere.
/// Unreadable cached data counts as no migration.
fn migration_reference(
    tx: &Transaction<'_>,
    peer_id: PeerId,
) -> Result<Option<ChannelMigrationReference>> {
    match tx.get_cached_channel_data(peer_id) {
        Ok(data) => Ok(data.and_then(|data| data.migration_reference)),
        Err(e) if e.is_undecodable() => {
            warn!(peer = %peer_id, error = %e, "Unreadable cached channel data, skipping migration");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Clear the whole history of `peer_id` and record the sync side effect.
pub fn clear_history(tx: &Transaction<'_>, peer_id: PeerId) -> Result<()> {
    match classify(peer_id) {
        PeerClass::Synced => {
            let top_timestamp = tx
                .get_top_message_index(peer_id, MessageNamespace::CLOUD)?
                .map(|index| index.timestamp);

            tx.add_cloud_chat_operation(
                peer_id,
                &CloudChatOperation::ClearHistory {
                    peer_id,
                    explicit_top_message_id: None,
                },
            )?;
            tx.clear_history(peer_id)?;

            if let Some(reference) = migration_reference(tx, peer_id)? {
                let max_id = reference.max_message_id;
                let successor = max_id.peer_id;
                debug!(peer = %peer_id, successor = %successor, max_id = max_id.id, "Clearing migrated history");

                // Cap the successor's clear at what existed when it was migrated.
                let explicit_top_message_id = max_id
                    .id
                    .checked_add(1)
                    .map(|id| MessageId::new(successor, max_id.namespace, id));
                tx.add_cloud_chat_operation(
                    successor,
                    &CloudChatOperation::ClearHistory {
                        peer_id: successor,
                        explicit_top_message_id,
                    },
                )?;
                tx.clear_history(successor)?;
            }

            if let Some(timestamp) = top_timestamp {
                tx.update_peer_chat_inclusion_with_min_timestamp(peer_id, timestamp)?;
            }
        }
        PeerClass::Encrypted => {
            tx.clear_history(peer_id)?;
            queue_secret_chat_operation(tx, peer_id, |layer| {
                Ok(SecretChatOutgoingOperationContents::ClearHistory {
                    layer,
                    action_id: new_action_id(),
                })
            })?;
        }
        PeerClass::Unknown => {
            debug!(peer = %peer_id, "Unknown peer namespace, nothing to clear");
        }
    }
    Ok(())
}
