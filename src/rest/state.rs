//! API state management for the REST server.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::state::BoardState;
use crate::users::UserDirectory;
use crate::workflow::WorkflowError;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Plan store and notification feed; one lock guards both so each
    /// mutation and its notification land together
    pub board: Arc<RwLock<BoardState>>,
    pub users: Arc<RwLock<UserDirectory>>,
    pub config: Arc<Config>,
}

impl ApiState {
    /// Build state from config, seeding demo plans when enabled
    pub fn new(config: Config) -> Result<Self, WorkflowError> {
        let board = BoardState::load(&config.planning)?;
        let users = UserDirectory::with_demo_users(config.auth.demo_password.clone());
        Ok(Self::with_parts(config, board, users))
    }

    pub fn with_parts(config: Config, board: BoardState, users: UserDirectory) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
            users: Arc::new(RwLock::new(users)),
            config: Arc::new(config),
        }
    }
}
