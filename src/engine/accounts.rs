use uuid::Uuid;
use validator::Validate;

use super::MatchEngine;
use crate::error::{EngineError, EngineResult};
use crate::models::{AppPreferences, Match, MatchingPreferences, NewUser, PersonalInfo, User};

impl MatchEngine {
    /// Create an account; usernames are unique and immutable
    pub async fn register_user(&self, payload: NewUser) -> EngineResult<User> {
        payload.validate()?;

        let _guard = self.write_lock.lock().await;
        if self.store.get_user(&payload.username).await?.is_some() {
            return Err(EngineError::Validation(format!(
                "username {} is already taken",
                payload.username
            )));
        }

        let mut user = User::new(payload.username);
        user.personal_info = payload.personal_info;
        user.matching_preferences = payload.matching_preferences;
        user.app_preferences = payload.app_preferences;

        self.store.save_user(user.clone()).await?;
        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Replace the profile section wholesale; no partial merges
    pub async fn update_personal_info(
        &self,
        username: &str,
        info: PersonalInfo,
    ) -> EngineResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut user = self.require_user(username).await?;
        user.personal_info = Some(info);
        self.store.save_user(user.clone()).await?;
        tracing::debug!("Updated personal info for {}", username);
        Ok(user)
    }

    /// Replace the hard matching preferences wholesale
    pub async fn update_matching_preferences(
        &self,
        username: &str,
        preferences: MatchingPreferences,
    ) -> EngineResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut user = self.require_user(username).await?;
        user.matching_preferences = Some(preferences);
        self.store.save_user(user.clone()).await?;
        tracing::debug!("Updated matching preferences for {}", username);
        Ok(user)
    }

    /// Replace the interest tag sets wholesale
    pub async fn update_app_preferences(
        &self,
        username: &str,
        preferences: AppPreferences,
    ) -> EngineResult<User> {
        let _guard = self.write_lock.lock().await;
        let mut user = self.require_user(username).await?;
        user.app_preferences = preferences;
        self.store.save_user(user.clone()).await?;
        tracing::debug!("Updated app preferences for {}", username);
        Ok(user)
    }

    /// Delete the account record
    ///
    /// History (actions, requests, matches, meetings) stays; only the user
    /// record goes, and the session pointer is cleared if it referenced them.
    pub async fn remove_account(&self, username: &str) -> EngineResult<()> {
        let _guard = self.write_lock.lock().await;
        self.require_user(username).await?;

        self.store.remove_user(username).await?;
        if self.store.current_user().await?.as_deref() == Some(username) {
            self.store.set_current_user(None).await?;
        }

        tracing::info!("Removed account {}", username);
        Ok(())
    }

    /// Unmatch; the record is kept with `is_active = false`
    pub async fn end_match(&self, id: Uuid, username: &str) -> EngineResult<Match> {
        let _guard = self.write_lock.lock().await;

        let mut matches = self.store.get_all_matches().await?;
        let pos = matches
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("match {}", id)))?;
        if !matches[pos].involves(username) {
            return Err(EngineError::Validation(format!(
                "{} is not part of match {}",
                username, id
            )));
        }
        if !matches[pos].is_active {
            return Err(EngineError::InvalidState(format!(
                "match {} is already ended",
                id
            )));
        }

        matches[pos].is_active = false;
        let ended = matches[pos].clone();
        self.store.save_matches(matches).await?;

        tracing::info!("Match {} ended by {}", id, username);
        Ok(ended)
    }

    /// Active matches involving the user, oldest first
    pub async fn matches_for(&self, username: &str) -> EngineResult<Vec<Match>> {
        let matches = self.store.get_all_matches().await?;
        Ok(matches
            .into_iter()
            .filter(|m| m.is_active && m.involves(username))
            .collect())
    }

    /// The signed-in user, hydrated from the store
    pub async fn current_user(&self) -> EngineResult<Option<User>> {
        match self.store.current_user().await? {
            Some(name) => Ok(self.store.get_user(&name).await?),
            None => Ok(None),
        }
    }

    /// Point the session at a user, or clear it with `None`
    pub async fn set_current_user(&self, username: Option<&str>) -> EngineResult<()> {
        if let Some(name) = username {
            self.require_user(name).await?;
        }
        self.store
            .set_current_user(username.map(String::from))
            .await?;
        Ok(())
    }
}
