use scrub_net::NetError;
use scrub_store::StoreError;
use thiserror::Error;

/// Errors raised while setting up a [`Client`](crate::Client).
///
/// Deletion operations themselves never surface errors; they log and
/// carry on.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Network error: {0}")]
    Net(#[from] NetError),
}
