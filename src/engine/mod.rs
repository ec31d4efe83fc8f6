// Engine facade and its operation modules
mod accounts;
mod actions;
mod discovery;
mod meetings;
pub mod quota;
mod ratings;
mod requests;

pub use actions::ActionOutcome;
pub use meetings::VerifyOutcome;
pub use quota::QuotaTracker;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::core::Matcher;
use crate::error::{EngineError, EngineResult};
use crate::models::User;
use crate::services::{LoggingGateway, MessageGateway, RecordStore};

/// Facade over every matching, request, meeting and rating operation
///
/// Construction is plain dependency injection; the engine holds no global
/// state beyond its collaborators and caches nothing across calls. Mutating
/// operations serialize their read-modify-write cycle behind one async
/// mutex, so two concurrent accepts of the same request cannot both apply.
pub struct MatchEngine {
    store: Arc<dyn RecordStore>,
    gateway: Arc<dyn MessageGateway>,
    matcher: Matcher,
    quota: QuotaTracker,
    settings: Settings,
    write_lock: Mutex<()>,
}

impl MatchEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        gateway: Arc<dyn MessageGateway>,
        settings: Settings,
    ) -> Self {
        let matcher = Matcher::new(settings.scoring.weights.clone().into());
        let quota = QuotaTracker::new(settings.quota.daily_super_likes);
        Self {
            store,
            gateway,
            matcher,
            quota,
            settings,
            write_lock: Mutex::new(()),
        }
    }

    /// Default settings and a logging gateway; handy for tests and embedding
    pub fn with_defaults(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, Arc::new(LoggingGateway::new()), Settings::default())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn require_user(&self, username: &str) -> EngineResult<User> {
        self.store
            .get_user(username)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {}", username)))
    }
}
