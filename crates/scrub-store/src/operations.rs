//! Append-only per-peer operation logs.
//!
//! `cloud_chat_operations` records sync intents for server-synchronized peers;
//! a later sync pass replays them to the server.  `secret_outgoing_operations`
//! is the queue of operations waiting to be sent over a secret chat.  Both are
//! ordered by an auto-assigned tag-local index.  Transmission and removal of
//! entries happen elsewhere.

use chrono::Utc;
use rusqlite::params;

use scrub_shared::operations::{CloudChatOperation, SecretChatOutgoingOperation};
use scrub_shared::PeerId;

use crate::database::Transaction;
use crate::error::Result;

impl Transaction<'_> {
    /// Append to the cloud sync log of `peer_id`.  Returns the tag-local index.
    pub fn add_cloud_chat_operation(
        &self,
        peer_id: PeerId,
        operation: &CloudChatOperation,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO cloud_chat_operations (peer_namespace, peer_id, contents, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                peer_id.namespace.as_raw(),
                peer_id.id,
                operation.to_bytes()?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn cloud_chat_operations(&self, peer_id: PeerId) -> Result<Vec<CloudChatOperation>> {
        let blobs = self.operation_blobs(
            "SELECT contents FROM cloud_chat_operations
             WHERE peer_namespace = ?1 AND peer_id = ?2
             ORDER BY tag_local_index ASC",
            peer_id,
        )?;
        let mut operations = Vec::with_capacity(blobs.len());
        for blob in blobs {
            operations.push(CloudChatOperation::from_bytes(&blob)?);
        }
        Ok(operations)
    }

    /// Append to the secret chat outgoing queue of `peer_id`.  Returns the
    /// tag-local index.
    pub fn add_secret_outgoing_operation(
        &self,
        peer_id: PeerId,
        operation: &SecretChatOutgoingOperation,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO secret_outgoing_operations (peer_namespace, peer_id, contents, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                peer_id.namespace.as_raw(),
                peer_id.id,
                operation.to_bytes()?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn secret_outgoing_operations(
        &self,
        peer_id: PeerId,
    ) -> Result<Vec<SecretChatOutgoingOperation>> {
        let blobs = self.operation_blobs(
            "SELECT contents FROM secret_outgoing_operations
             WHERE peer_namespace = ?1 AND peer_id = ?2
             ORDER BY tag_local_index ASC",
            peer_id,
        )?;
        let mut operations = Vec::with_capacity(blobs.len());
        for blob in blobs {
            operations.push(SecretChatOutgoingOperation::from_bytes(&blob)?);
        }
        Ok(operations)
    }

    fn operation_blobs(&self, sql: &str, peer_id: PeerId) -> Result<Vec<Vec<u8>>> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params![peer_id.namespace.as_raw(), peer_id.id], |row| {
            row.get::<_, Vec<u8>>(0)
        })?;

        let mut blobs = Vec::new();
        for row in rows {
            blobs.push(row?);
        }
        Ok(blobs)
    }
}
