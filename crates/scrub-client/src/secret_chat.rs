//! Queuing operations for delivery over a secret chat.

use scrub_shared::operations::{SecretChatOutgoingOperation, SecretChatOutgoingOperationContents};
use scrub_shared::secret_chat::{SecretChatLayer, SecretChatState};
use scrub_shared::PeerId;
use scrub_store::{Result, Transaction};
use tracing::{debug, warn};

/// Load the chat state of `peer_id` together with the layer new operations
/// must be encoded with.
///
/// Returns `None` when there is no readable state, or while the chat is terminated or
/// still in its handshake: there is no remote party to deliver to yet.
pub fn ready_secret_chat(
    tx: &Transaction<'_>,
    peer_id: PeerId,
) -> Result<Option<(SecretChatState, SecretChatLayer)>> {
    let state = match tx.get_secret_chat_state(peer_id) {
        Ok(Some(state)) => state,
        Ok(None) => {
            debug!(peer = %peer_id, "No secret chat state, nothing to queue");
            return Ok(None);
        }
        Err(e) if e.is_undecodable() => {
            warn!(peer = %peer_id, error = %e, "Unreadable secret chat state, skipping outgoing operation");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match state.outgoing_layer() {
        Some(layer) => Ok(Some((state, layer))),
        None => {
            debug!(peer = %peer_id, state = ?state.embedded_state, "Secret chat not ready, skipping outgoing operation");
            Ok(None)
        }
    }
}

/// Append `contents` to the outgoing queue of `peer_id` and return the chat
/// state as it must look afterwards.
///
/// The caller persists the returned state if it differs from `state`.
pub fn add_secret_chat_outgoing_operation(
    tx: &Transaction<'_>,
    peer_id: PeerId,
    contents: SecretChatOutgoingOperationContents,
    state: &SecretChatState,
) -> Result<SecretChatState> {
    let action_id = contents.action_id();
    let index = tx.add_secret_outgoing_operation(
        peer_id,
        &SecretChatOutgoingOperation::pending(contents),
    )?;
    debug!(peer = %peer_id, index, action_id, "Queued secret chat operation");

    Ok(state.with_outgoing_operation_queued())
}

/// Queue one operation built for the active layer, writing the state back if
/// queuing changed it.  Returns whether anything was queued.
pub fn queue_secret_chat_operation<F>(
    tx: &Transaction<'_>,
    peer_id: PeerId,
    build: F,
) -> Result<bool>
where
    F: FnOnce(SecretChatLayer) -> Result<SecretChatOutgoingOperationContents>,
{
    let Some((state, layer)) = ready_secret_chat(tx, peer_id)? else {
        return Ok(false);
    };

    let contents = build(layer)?;
    let updated = add_secret_chat_outgoing_operation(tx, peer_id, contents, &state)?;
    if updated != state {
        tx.set_secret_chat_state(peer_id, &updated)?;
    }
    Ok(true)
}
