//! Update-sequence tracking.
//!
//! Every server response that reports a `(pts, pts_count)` pair has to be
//! forwarded so the update sequence stays gap-free.  The consumer reconciling
//! the sequence runs in its own task and receives groups over an mpsc channel.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateGroup {
    UpdatePts { pts: i32, pts_count: i32 },
}

pub trait StateManager: Send + Sync {
    fn add_update_groups(&self, groups: Vec<UpdateGroup>);
}

/// [`StateManager`] that forwards groups to a consumer task and remembers
/// the highest pts seen.
#[derive(Clone)]
pub struct UpdateTracker {
    tx: mpsc::UnboundedSender<UpdateGroup>,
    max_pts: Arc<AtomicI32>,
}

impl UpdateTracker {
    /// Create a tracker and the receiving half the consumer reads from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UpdateGroup>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = Self {
            tx,
            max_pts: Arc::new(AtomicI32::new(0)),
        };
        (tracker, rx)
    }

    pub fn max_pts(&self) -> i32 {
        self.max_pts.load(Ordering::Acquire)
    }
}

impl StateManager for UpdateTracker {
    fn add_update_groups(&self, groups: Vec<UpdateGroup>) {
        for group in groups {
            match group {
                UpdateGroup::UpdatePts { pts, pts_count } => {
                    debug!(pts, pts_count, "Tracking pts update");
                    self.max_pts.fetch_max(pts, Ordering::AcqRel);
                }
            }
            if self.tx.send(group).is_err() {
                warn!("Update consumer gone, dropping update group");
            }
        }
    }
}
