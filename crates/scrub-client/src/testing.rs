//! Test doubles for the network and update-tracking collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use scrub_net::{ApiRequest, ApiResponse, NetError, Network, StateManager, UpdateGroup};

type Reply = Result<Option<ApiResponse>, NetError>;

/// Replays a fixed list of replies and records every request it sees.
pub struct ScriptedNetwork {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedNetwork {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn request(&self, request: ApiRequest) -> Result<Option<ApiResponse>, NetError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(NetError::Rpc("no scripted reply left".into())))
    }
}

#[derive(Default)]
pub struct RecordingStateManager {
    groups: Mutex<Vec<UpdateGroup>>,
}

impl RecordingStateManager {
    pub fn groups(&self) -> Vec<UpdateGroup> {
        self.groups.lock().unwrap().clone()
    }
}

impl StateManager for RecordingStateManager {
    fn add_update_groups(&self, groups: Vec<UpdateGroup>) {
        self.groups.lock().unwrap().extend(groups);
    }
}
