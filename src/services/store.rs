use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Match, MatchAction, MatchRequest, Meeting, Rating, User};

/// Errors that can occur when talking to a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Outgoing port for everything the engine persists
///
/// Implementations own the authoritative state; the engine works on copies
/// obtained per operation and never caches them across calls. Collection
/// getters return full snapshots; filtering happens in the engine, so
/// adapters stay dumb.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn save_user(&self, user: User) -> Result<(), StoreError>;
    async fn remove_user(&self, username: &str) -> Result<(), StoreError>;
    async fn get_all_users(&self) -> Result<Vec<User>, StoreError>;

    /// Actions performed by the given user, in insertion order
    async fn get_match_actions(&self, username: &str) -> Result<Vec<MatchAction>, StoreError>;
    async fn append_match_action(&self, action: MatchAction) -> Result<(), StoreError>;

    async fn get_all_match_requests(&self) -> Result<Vec<MatchRequest>, StoreError>;
    async fn save_match_requests(&self, requests: Vec<MatchRequest>) -> Result<(), StoreError>;

    async fn get_all_matches(&self) -> Result<Vec<Match>, StoreError>;
    async fn save_matches(&self, matches: Vec<Match>) -> Result<(), StoreError>;

    async fn get_meetings(&self) -> Result<Vec<Meeting>, StoreError>;
    async fn save_meetings(&self, meetings: Vec<Meeting>) -> Result<(), StoreError>;

    /// Ratings received by the given user; empty for unknown users
    async fn get_ratings_for_user(&self, username: &str) -> Result<Vec<Rating>, StoreError>;

    /// Session pointer owned by the store so account removal can clear it
    async fn current_user(&self) -> Result<Option<String>, StoreError>;
    async fn set_current_user(&self, username: Option<String>) -> Result<(), StoreError>;
}
