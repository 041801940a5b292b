//! The deletion coordinator handed to the rest of the application.

use std::sync::Arc;

use futures::stream::BoxStream;
use scrub_net::{HttpNetwork, Network, StateManager, UpdateGroup, UpdateTracker};
use scrub_shared::sticker::{LoadedStickerPack, StickerPackReference};
use scrub_shared::{MessageId, PeerId};
use scrub_store::Database;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

use crate::author_purge::{self, AuthorPurgeOutcome};
use crate::config::ClientConfig;
use crate::deletion::{self, DeletionScope};
use crate::error::ClientError;
use crate::stickers;

/// Database shared between the coordinator and background tasks.
///
/// The lock is only held for the duration of one transaction, never across
/// a network round trip.
pub type SharedDatabase = Arc<Mutex<Database>>;

pub struct Client {
    db: SharedDatabase,
    network: Arc<dyn Network>,
    state_manager: Arc<dyn StateManager>,
    config: ClientConfig,
}

impl Client {
    pub fn new(
        db: SharedDatabase,
        network: Arc<dyn Network>,
        state_manager: Arc<dyn StateManager>,
        config: ClientConfig,
    ) -> Self {
        Self {
            db,
            network,
            state_manager,
            config,
        }
    }

    /// Open the database and HTTP transport described by `config`.
    ///
    /// The returned receiver yields every update group the client reports;
    /// whoever reconciles the update sequence should drain it.
    pub fn open(
        config: ClientConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<UpdateGroup>), ClientError> {
        let db = match &config.database_path {
            Some(path) => Database::open_at(path)?,
            None => Database::new()?,
        };
        let network = HttpNetwork::new(&config.api_url, config.request_timeout)?;
        let (tracker, updates) = UpdateTracker::new();

        info!(
            api = %network.endpoint(),
            database = ?db.path(),
            "Deletion coordinator ready"
        );

        let client = Self::new(
            Arc::new(Mutex::new(db)),
            Arc::new(network),
            Arc::new(tracker),
            config,
        );
        Ok((client, updates))
    }

    pub fn database(&self) -> &SharedDatabase {
        &self.db
    }

    /// Delete messages locally and queue the matching remote operations.
    ///
    /// Everything happens in one transaction; on failure nothing is applied.
    pub async fn delete_messages(&self, ids: &[MessageId], scope: DeletionScope) {
        if ids.is_empty() {
            return;
        }

        let mut db = self.db.lock().await;
        match db.transaction(|tx| deletion::delete_messages(tx, ids, scope)) {
            Ok(removed) => info!(requested = ids.len(), removed, ?scope, "Deleted messages"),
            Err(e) => error!(requested = ids.len(), error = %e, "Failed to delete messages"),
        }
    }

    /// Clear the history of `peer_id` and queue the matching remote operation.
    pub async fn clear_history(&self, peer_id: PeerId) {
        let mut db = self.db.lock().await;
        match db.transaction(|tx| deletion::clear_history(tx, peer_id)) {
            Ok(()) => info!(peer = %peer_id, "Cleared history"),
            Err(e) => error!(peer = %peer_id, error = %e, "Failed to clear history"),
        }
    }

    /// Delete everything `member_id` wrote in `channel_id`, on the server
    /// first and locally once the server is done.
    pub async fn clear_author_history(
        &self,
        channel_id: PeerId,
        member_id: PeerId,
    ) -> AuthorPurgeOutcome {
        author_purge::clear_author_history(
            &self.db,
            self.network.as_ref(),
            self.state_manager.as_ref(),
            self.config.purge_max_rounds,
            channel_id,
            member_id,
        )
        .await
    }

    pub fn loaded_sticker_pack(
        &self,
        reference: StickerPackReference,
    ) -> BoxStream<'static, LoadedStickerPack> {
        stickers::loaded_sticker_pack(self.db.clone(), self.network.clone(), reference)
    }
}
