use rusqlite::{params, OptionalExtension};

use scrub_shared::{MessageId, MessageIndex, MessageNamespace, PeerId};

use crate::database::Transaction;
use crate::error::Result;
use crate::models::Message;
use crate::peers::peer_id_at;

const MESSAGE_COLUMNS: &str = "peer_namespace, peer_id, namespace, id, globally_unique_id,
     author_namespace, author_id, timestamp, text";

impl Transaction<'_> {
    pub fn insert_message(&self, message: &Message) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO messages (peer_namespace, peer_id, namespace, id,
                 globally_unique_id, author_namespace, author_id, timestamp, text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                message.id.peer_id.namespace.as_raw(),
                message.id.peer_id.id,
                message.id.namespace.0,
                message.id.id,
                message.globally_unique_id,
                message.author_id.map(|a| a.namespace.as_raw()),
                message.author_id.map(|a| a.id),
                message.timestamp,
                message.text,
            ],
        )?;
        Ok(())
    }

    pub fn get_message(&self, id: MessageId) -> Result<Option<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE peer_namespace = ?1 AND peer_id = ?2 AND namespace = ?3 AND id = ?4"
        );
        let message = self
            .conn()
            .query_row(
                &sql,
                params![id.peer_id.namespace.as_raw(), id.peer_id.id, id.namespace.0, id.id],
                row_to_message,
            )
            .optional()?;
        Ok(message)
    }

    /// All messages of a peer, oldest first.
    pub fn messages_for_peer(&self, peer_id: PeerId) -> Result<Vec<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE peer_namespace = ?1 AND peer_id = ?2
             ORDER BY timestamp ASC, namespace ASC, id ASC"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(
            params![peer_id.namespace.as_raw(), peer_id.id],
            row_to_message,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Index of the latest message of `peer_id` within `namespace`.
    pub fn get_top_message_index(
        &self,
        peer_id: PeerId,
        namespace: MessageNamespace,
    ) -> Result<Option<MessageIndex>> {
        let index = self
            .conn()
            .query_row(
                "SELECT id, timestamp FROM messages
                 WHERE peer_namespace = ?1 AND peer_id = ?2 AND namespace = ?3
                 ORDER BY timestamp DESC, id DESC
                 LIMIT 1",
                params![peer_id.namespace.as_raw(), peer_id.id, namespace.0],
                |row| {
                    Ok(MessageIndex {
                        id: MessageId::new(peer_id, namespace, row.get(0)?),
                        timestamp: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(index)
    }

    /// Delete the given messages.  Ids that are already gone are ignored.
    /// Returns the number of rows removed.
    pub fn delete_messages(&self, ids: &[MessageId]) -> Result<usize> {
        let mut stmt = self.conn().prepare_cached(
            "DELETE FROM messages
             WHERE peer_namespace = ?1 AND peer_id = ?2 AND namespace = ?3 AND id = ?4",
        )?;
        let mut removed = 0;
        for id in ids {
            removed += stmt.execute(params![
                id.peer_id.namespace.as_raw(),
                id.peer_id.id,
                id.namespace.0,
                id.id,
            ])?;
        }
        Ok(removed)
    }

    /// Remove every message of a peer.  Returns the number of rows removed.
    pub fn clear_history(&self, peer_id: PeerId) -> Result<usize> {
        let removed = self.conn().execute(
            "DELETE FROM messages WHERE peer_namespace = ?1 AND peer_id = ?2",
            params![peer_id.namespace.as_raw(), peer_id.id],
        )?;
        Ok(removed)
    }

    /// Remove every message of `peer_id` written by `author_id`.
    pub fn remove_all_messages_with_author(
        &self,
        peer_id: PeerId,
        author_id: PeerId,
    ) -> Result<usize> {
        let removed = self.conn().execute(
            "DELETE FROM messages
             WHERE peer_namespace = ?1 AND peer_id = ?2
               AND author_namespace = ?3 AND author_id = ?4",
            params![
                peer_id.namespace.as_raw(),
                peer_id.id,
                author_id.namespace.as_raw(),
                author_id.id,
            ],
        )?;
        Ok(removed)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let peer_id = peer_id_at(row, 0, 1)?;
    let namespace = MessageNamespace(row.get(2)?);
    let id: i32 = row.get(3)?;
    let globally_unique_id: Option<i64> = row.get(4)?;

    let author_namespace: Option<i32> = row.get(5)?;
    let author_id = match author_namespace {
        Some(_) => Some(peer_id_at(row, 5, 6)?),
        None => None,
    };

    Ok(Message {
        id: MessageId::new(peer_id, namespace, id),
        globally_unique_id,
        author_id,
        timestamp: row.get(7)?,
        text: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use scrub_shared::PeerNamespace;

    use super::*;
    use crate::Database;

    fn message(peer_id: PeerId, id: i32, author: Option<PeerId>, timestamp: i32) -> Message {
        Message {
            id: MessageId::new(peer_id, MessageNamespace::CLOUD, id),
            globally_unique_id: None,
            author_id: author,
            timestamp,
            text: format!("message {id}"),
        }
    }

    #[test]
    fn top_index_picks_latest_in_namespace() {
        let mut db = Database::open_in_memory().unwrap();
        let peer = PeerId::new(PeerNamespace::CloudGroup, 1);

        db.transaction(|tx| {
            tx.insert_message(&message(peer, 1, None, 100))?;
            tx.insert_message(&message(peer, 2, None, 300))?;
            tx.insert_message(&Message {
                id: MessageId::new(peer, MessageNamespace::LOCAL, 3),
                ..message(peer, 3, None, 900)
            })
        })
        .unwrap();

        let top = db
            .transaction(|tx| tx.get_top_message_index(peer, MessageNamespace::CLOUD))
            .unwrap()
            .unwrap();
        assert_eq!(top.id.id, 2);
        assert_eq!(top.timestamp, 300);

        let none = db
            .transaction(|tx| {
                tx.get_top_message_index(
                    PeerId::new(PeerNamespace::CloudGroup, 2),
                    MessageNamespace::CLOUD,
                )
            })
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        let peer = PeerId::new(PeerNamespace::CloudUser, 5);
        let ids = [
            MessageId::new(peer, MessageNamespace::CLOUD, 1),
            MessageId::new(peer, MessageNamespace::CLOUD, 2),
        ];

        db.transaction(|tx| {
            tx.insert_message(&message(peer, 1, None, 10))?;
            tx.insert_message(&message(peer, 2, None, 20))
        })
        .unwrap();

        assert_eq!(db.transaction(|tx| tx.delete_messages(&ids)).unwrap(), 2);
        assert_eq!(db.transaction(|tx| tx.delete_messages(&ids)).unwrap(), 0);
        assert!(db
            .transaction(|tx| tx.get_message(ids[0]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn remove_by_author_keeps_others() {
        let mut db = Database::open_in_memory().unwrap();
        let channel = PeerId::new(PeerNamespace::CloudChannel, 9);
        let other_channel = PeerId::new(PeerNamespace::CloudChannel, 10);
        let spammer = PeerId::new(PeerNamespace::CloudUser, 1);
        let member = PeerId::new(PeerNamespace::CloudUser, 2);

        db.transaction(|tx| {
            tx.insert_message(&message(channel, 1, Some(spammer), 1))?;
            tx.insert_message(&message(channel, 2, Some(member), 2))?;
            tx.insert_message(&message(channel, 3, Some(spammer), 3))?;
            tx.insert_message(&message(channel, 4, None, 4))?;
            tx.insert_message(&message(other_channel, 1, Some(spammer), 5))
        })
        .unwrap();

        let removed = db
            .transaction(|tx| tx.remove_all_messages_with_author(channel, spammer))
            .unwrap();
        assert_eq!(removed, 2);

        let left = db.transaction(|tx| tx.messages_for_peer(channel)).unwrap();
        let ids: Vec<i32> = left.iter().map(|m| m.id.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(left[0].author_id, Some(member));
        assert_eq!(
            db.transaction(|tx| tx.messages_for_peer(other_channel))
                .unwrap()
                .len(),
            1
        );
    }
}
