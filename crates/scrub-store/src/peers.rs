//! CRUD operations for [`Peer`] records.

use rusqlite::{params, OptionalExtension};

use scrub_shared::{PeerId, PeerNamespace};

use crate::database::Transaction;
use crate::error::Result;
use crate::models::Peer;

impl Transaction<'_> {
    /// Insert a peer, or replace the stored one with the same id.
    pub fn upsert_peer(&self, peer: &Peer) -> Result<()> {
        self.conn().execute(
            "INSERT INTO peers (namespace, id, access_hash, title)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, id) DO UPDATE SET
                 access_hash = excluded.access_hash,
                 title = excluded.title",
            params![
                peer.id.namespace.as_raw(),
                peer.id.id,
                peer.access_hash,
                peer.title,
            ],
        )?;
        Ok(())
    }

    pub fn get_peer(&self, id: PeerId) -> Result<Option<Peer>> {
        let peer = self
            .conn()
            .query_row(
                "SELECT namespace, id, access_hash, title FROM peers
                 WHERE namespace = ?1 AND id = ?2",
                params![id.namespace.as_raw(), id.id],
                |row| {
                    Ok(Peer {
                        id: peer_id_at(row, 0, 1)?,
                        access_hash: row.get(2)?,
                        title: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(peer)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a [`PeerId`] stored as a (namespace, id) column pair.
pub(crate) fn peer_id_at(
    row: &rusqlite::Row<'_>,
    namespace_idx: usize,
    id_idx: usize,
) -> rusqlite::Result<PeerId> {
    Ok(PeerId::new(
        PeerNamespace::from_raw(row.get(namespace_idx)?),
        row.get(id_idx)?,
    ))
}
