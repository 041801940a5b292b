//! Purging every message one member wrote in a channel.
//!
//! The server deletes in batches: each `DeleteUserHistory` round trip reports
//! an `offset`, and the request is repeated until the offset reaches zero.
//! Local messages are only removed after that, in a single transaction, so a
//! failure part way through leaves local state untouched.

use scrub_net::{
    ApiRequest, ApiResponse, InputChannel, InputUser, Network, StateManager, UpdateGroup,
};
use scrub_shared::PeerId;
use scrub_store::{Result, Transaction};
use tracing::{debug, error, info, warn};

use crate::client::SharedDatabase;

/// How a purge finished.  None of these are errors to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorPurgeOutcome {
    /// The server drained the history and local messages were removed.
    Purged { removed: usize },
    /// Channel or member has no protocol handle; nothing was sent.
    Unresolved,
    /// A round trip failed.
    RequestFailed,
    /// The server answered without an affected-history result.
    NoResult,
    /// The server kept reporting work left past the configured round limit.
    RoundLimitReached,
    /// The local store could not be read or written.
    StoreFailed,
}

enum PurgeStep {
    Requesting { round: u32 },
    Completing,
    Done(AuthorPurgeOutcome),
}

fn resolve_handles(
    tx: &Transaction<'_>,
    channel_id: PeerId,
    member_id: PeerId,
) -> Result<Option<(InputChannel, InputUser)>> {
    let channel = tx
        .get_peer(channel_id)?
        .and_then(|peer| InputChannel::from_peer(peer.id, peer.access_hash));
    let user = tx
        .get_peer(member_id)?
        .and_then(|peer| InputUser::from_peer(peer.id, peer.access_hash));

    Ok(channel.zip(user))
}

pub async fn clear_author_history(
    db: &SharedDatabase,
    network: &dyn Network,
    state_manager: &dyn StateManager,
    max_rounds: u32,
    channel_id: PeerId,
    member_id: PeerId,
) -> AuthorPurgeOutcome {
    let resolved = {
        let mut guard = db.lock().await;
        guard.transaction(|tx| resolve_handles(tx, channel_id, member_id))
    };
    let (channel, user) = match resolved {
        Ok(Some(handles)) => handles,
        Ok(None) => {
            debug!(channel = %channel_id, member = %member_id, "Peers not addressable, skipping purge");
            return AuthorPurgeOutcome::Unresolved;
        }
        Err(e) => {
            error!(channel = %channel_id, error = %e, "Failed to resolve purge peers");
            return AuthorPurgeOutcome::StoreFailed;
        }
    };

    let request = ApiRequest::DeleteUserHistory { channel, user };
    let mut step = PurgeStep::Requesting { round: 1 };

    loop {
        step = match step {
            PurgeStep::Requesting { round } if round > max_rounds => {
                warn!(
                    channel = %channel_id,
                    member = %member_id,
                    max_rounds,
                    "Server never finished deleting user history, giving up"
                );
                PurgeStep::Done(AuthorPurgeOutcome::RoundLimitReached)
            }
            PurgeStep::Requesting { round } => match network.request(request.clone()).await {
                Ok(Some(ApiResponse::AffectedHistory(affected))) => {
                    state_manager.add_update_groups(vec![UpdateGroup::UpdatePts {
                        pts: affected.pts,
                        pts_count: affected.pts_count,
                    }]);
                    if affected.offset == 0 {
                        PurgeStep::Completing
                    } else {
                        debug!(round, offset = affected.offset, "User history partially deleted");
                        PurgeStep::Requesting { round: round + 1 }
                    }
                }
                Ok(_) => {
                    warn!(channel = %channel_id, round, "Delete user history returned no result");
                    PurgeStep::Done(AuthorPurgeOutcome::NoResult)
                }
                Err(e) => {
                    warn!(channel = %channel_id, round, error = %e, "Delete user history failed");
                    PurgeStep::Done(AuthorPurgeOutcome::RequestFailed)
                }
            },
            PurgeStep::Completing => {
                let mut guard = db.lock().await;
                let outcome = match guard
                    .transaction(|tx| tx.remove_all_messages_with_author(channel_id, member_id))
                {
                    Ok(removed) => {
                        info!(channel = %channel_id, member = %member_id, removed, "Purged member history");
                        AuthorPurgeOutcome::Purged { removed }
                    }
                    Err(e) => {
                        error!(channel = %channel_id, error = %e, "Failed to purge local member history");
                        AuthorPurgeOutcome::StoreFailed
                    }
                };
                PurgeStep::Done(outcome)
            }
            PurgeStep::Done(outcome) => return outcome,
        };
    }
}
