//! Per-peer chat state, cached metadata and chat-list inclusion.

use rusqlite::{params, OptionalExtension};

use scrub_shared::secret_chat::SecretChatState;
use scrub_shared::PeerId;

use crate::database::Transaction;
use crate::error::Result;
use crate::models::{CachedChannelData, PeerChatListInclusion};

impl Transaction<'_> {
    // ------------------------------------------------------------------
    // Secret chat state
    // ------------------------------------------------------------------

    pub fn get_secret_chat_state(&self, peer_id: PeerId) -> Result<Option<SecretChatState>> {
        let bytes: Option<Vec<u8>> = self
            .conn()
            .query_row(
                "SELECT state FROM peer_chat_states WHERE peer_namespace = ?1 AND peer_id = ?2",
                params![peer_id.namespace.as_raw(), peer_id.id],
                |row| row.get(0),
            )
            .optional()?;

        match bytes {
            Some(bytes) => Ok(Some(SecretChatState::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set_secret_chat_state(&self, peer_id: PeerId, state: &SecretChatState) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO peer_chat_states (peer_namespace, peer_id, state)
             VALUES (?1, ?2, ?3)",
            params![peer_id.namespace.as_raw(), peer_id.id, state.to_bytes()?],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cached metadata
    // ------------------------------------------------------------------

    pub fn get_cached_channel_data(&self, peer_id: PeerId) -> Result<Option<CachedChannelData>> {
        let json: Option<String> = self
            .conn()
            .query_row(
                "SELECT data FROM cached_peer_data WHERE peer_namespace = ?1 AND peer_id = ?2",
                params![peer_id.namespace.as_raw(), peer_id.id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn set_cached_channel_data(&self, peer_id: PeerId, data: &CachedChannelData) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO cached_peer_data (peer_namespace, peer_id, data)
             VALUES (?1, ?2, ?3)",
            params![
                peer_id.namespace.as_raw(),
                peer_id.id,
                serde_json::to_string(data)?
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Chat list
    // ------------------------------------------------------------------

    /// Current inclusion of a peer; peers never recorded are not included.
    pub fn get_chat_list_inclusion(&self, peer_id: PeerId) -> Result<PeerChatListInclusion> {
        let json: Option<String> = self
            .conn()
            .query_row(
                "SELECT inclusion FROM chat_list_inclusion
                 WHERE peer_namespace = ?1 AND peer_id = ?2",
                params![peer_id.namespace.as_raw(), peer_id.id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(PeerChatListInclusion::NotIncluded),
        }
    }

    pub fn set_chat_list_inclusion(
        &self,
        peer_id: PeerId,
        inclusion: PeerChatListInclusion,
    ) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO chat_list_inclusion (peer_namespace, peer_id, inclusion)
             VALUES (?1, ?2, ?3)",
            params![
                peer_id.namespace.as_raw(),
                peer_id.id,
                serde_json::to_string(&inclusion)?
            ],
        )?;
        Ok(())
    }

    /// Keep `peer_id` in the chat list at least from `min_timestamp` on, so a
    /// cleared conversation keeps its place instead of vanishing.
    pub fn update_peer_chat_inclusion_with_min_timestamp(
        &self,
        peer_id: PeerId,
        min_timestamp: i32,
    ) -> Result<()> {
        let current = self.get_chat_list_inclusion(peer_id)?;
        let updated = current.with_min_timestamp(min_timestamp);
        if updated != current {
            self.set_chat_list_inclusion(peer_id, updated)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use scrub_shared::secret_chat::{SecretChatEmbeddedState, SecretChatRole};
    use scrub_shared::{MessageId, MessageNamespace, PeerNamespace};

    use super::*;
    use crate::models::ChannelMigrationReference;
    use crate::Database;

    #[test]
    fn secret_chat_state_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let peer = PeerId::new(PeerNamespace::SecretChat, 4);
        let state = SecretChatState::new(
            SecretChatRole::Participant,
            SecretChatEmbeddedState::BasicLayer,
        );

        assert!(db.transaction(|tx| tx.get_secret_chat_state(peer)).unwrap().is_none());
        db.transaction(|tx| tx.set_secret_chat_state(peer, &state)).unwrap();
        assert_eq!(
            db.transaction(|tx| tx.get_secret_chat_state(peer)).unwrap(),
            Some(state)
        );
    }

    #[test]
    fn cached_channel_data_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let group = PeerId::new(PeerNamespace::CloudGroup, 1);
        let channel = PeerId::new(PeerNamespace::CloudChannel, 2);
        let data = CachedChannelData {
            migration_reference: Some(ChannelMigrationReference {
                max_message_id: MessageId::new(channel, MessageNamespace::CLOUD, 40),
            }),
        };

        db.transaction(|tx| tx.set_cached_channel_data(group, &data)).unwrap();
        assert_eq!(
            db.transaction(|tx| tx.get_cached_channel_data(group)).unwrap(),
            Some(data)
        );
    }

    #[test]
    fn inclusion_keeps_latest_min_timestamp() {
        let mut db = Database::open_in_memory().unwrap();
        let peer = PeerId::new(PeerNamespace::CloudUser, 8);

        db.transaction(|tx| {
            tx.update_peer_chat_inclusion_with_min_timestamp(peer, 500)?;
            tx.update_peer_chat_inclusion_with_min_timestamp(peer, 200)
        })
        .unwrap();

        assert_eq!(
            db.transaction(|tx| tx.get_chat_list_inclusion(peer)).unwrap(),
            PeerChatListInclusion::IfHasMessagesOrOneOf {
                pinning_index: None,
                min_timestamp: Some(500),
            }
        );
    }

    #[test]
    fn inclusion_preserves_pinning() {
        let mut db = Database::open_in_memory().unwrap();
        let peer = PeerId::new(PeerNamespace::CloudGroup, 8);

        db.transaction(|tx| {
            tx.set_chat_list_inclusion(
                peer,
                PeerChatListInclusion::IfHasMessagesOrOneOf {
                    pinning_index: Some(2),
                    min_timestamp: None,
                },
            )?;
            tx.update_peer_chat_inclusion_with_min_timestamp(peer, 70)
        })
        .unwrap();

        assert_eq!(
            db.transaction(|tx| tx.get_chat_list_inclusion(peer)).unwrap(),
            PeerChatListInclusion::IfHasMessagesOrOneOf {
                pinning_index: Some(2),
                min_timestamp: Some(70),
            }
        );
    }
}
