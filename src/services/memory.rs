use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Match, MatchAction, MatchRequest, Meeting, Rating, User};
use crate::services::store::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<User>,
    actions: Vec<MatchAction>,
    requests: Vec<MatchRequest>,
    matches: Vec<Match>,
    meetings: Vec<Meeting>,
    current_user: Option<String>,
}

/// Reference store backed by process memory
///
/// Keeps users in insertion order so candidate snapshots iterate the same
/// way every time. Ships for tests and for embedding the engine without an
/// external backend; it never reports `StoreError`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn save_user(&self, user: User) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.users.iter_mut().find(|u| u.username == user.username) {
            Some(slot) => *slot = user,
            None => state.users.push(user),
        }
        Ok(())
    }

    async fn remove_user(&self, username: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.users.retain(|u| u.username != username);
        Ok(())
    }

    async fn get_all_users(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.clone())
    }

    async fn get_match_actions(&self, username: &str) -> Result<Vec<MatchAction>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .actions
            .iter()
            .filter(|a| a.from_user == username)
            .cloned()
            .collect())
    }

    async fn append_match_action(&self, action: MatchAction) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.actions.push(action);
        Ok(())
    }

    async fn get_all_match_requests(&self) -> Result<Vec<MatchRequest>, StoreError> {
        let state = self.state.read().await;
        Ok(state.requests.clone())
    }

    async fn save_match_requests(&self, requests: Vec<MatchRequest>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.requests = requests;
        Ok(())
    }

    async fn get_all_matches(&self) -> Result<Vec<Match>, StoreError> {
        let state = self.state.read().await;
        Ok(state.matches.clone())
    }

    async fn save_matches(&self, matches: Vec<Match>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.matches = matches;
        Ok(())
    }

    async fn get_meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        let state = self.state.read().await;
        Ok(state.meetings.clone())
    }

    async fn save_meetings(&self, meetings: Vec<Meeting>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.meetings = meetings;
        Ok(())
    }

    async fn get_ratings_for_user(&self, username: &str) -> Result<Vec<Rating>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.ratings.clone())
            .unwrap_or_default())
    }

    async fn current_user(&self) -> Result<Option<String>, StoreError> {
        let state = self.state.read().await;
        Ok(state.current_user.clone())
    }

    async fn set_current_user(&self, username: Option<String>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.current_user = username;
        Ok(())
    }
}
