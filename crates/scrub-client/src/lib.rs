pub mod author_purge;
pub mod client;
pub mod config;
pub mod deletion;
pub mod error;
pub mod secret_chat;
pub mod stickers;

#[cfg(test)]
mod testing;

use tracing_subscriber::{fmt, EnvFilter};

pub use author_purge::AuthorPurgeOutcome;
pub use client::{Client, SharedDatabase};
pub use config::ClientConfig;
pub use deletion::DeletionScope;
pub use error::ClientError;

/// Install the global tracing subscriber.  `RUST_LOG` overrides the default
/// filter.  Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("scrub_client=debug,scrub_net=info,scrub_store=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
