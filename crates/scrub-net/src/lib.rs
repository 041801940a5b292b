// Network layer: typed API requests, the HTTP transport and update tracking.

pub mod api;
pub mod error;
pub mod network;
pub mod updates;

pub use api::{AffectedHistory, ApiRequest, ApiResponse, InputChannel, InputStickerSet, InputUser};
pub use error::NetError;
pub use network::{HttpNetwork, Network};
pub use updates::{StateManager, UpdateGroup, UpdateTracker};
