use super::requests::RequestWrite;
use super::MatchEngine;
use crate::error::{EngineError, EngineResult};
use crate::models::{ActionKind, MatchAction, MatchRequest};

/// What recording an action produced
#[derive(Debug)]
pub enum ActionOutcome {
    /// Pass recorded; the candidate simply stops appearing
    Passed,
    /// Like or super-like recorded; the target now has this pending request
    Requested(MatchRequest),
}

impl MatchEngine {
    /// Record a swipe-style action and its consequences
    ///
    /// Super-likes consume from the daily budget before anything is written;
    /// likes and super-likes leave a pending match request behind. The action
    /// log itself is append-only and never deduplicated. A failed write
    /// undoes the whole action: the quota unit comes back and a request this
    /// call opened is removed again.
    pub async fn record_action(
        &self,
        from: &str,
        to: &str,
        kind: ActionKind,
    ) -> EngineResult<ActionOutcome> {
        if from == to {
            return Err(EngineError::Validation(
                "cannot record an action on yourself".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        self.require_user(from).await?;
        self.require_user(to).await?;

        if kind == ActionKind::SuperLike && !self.quota.try_consume(from) {
            tracing::debug!("Super-like budget exhausted for {}", from);
            return Err(EngineError::QuotaExceeded {
                cap: self.quota.cap(),
            });
        }

        // Request before log entry; the append-only log has no compensating
        // delete, so it must be the final write
        let write = match kind {
            ActionKind::Pass => None,
            ActionKind::Like | ActionKind::SuperLike => {
                match self.send_match_request_locked(from, to).await {
                    Ok(write) => Some(write),
                    Err(err) => {
                        if kind == ActionKind::SuperLike {
                            self.quota.refund(from);
                        }
                        return Err(err);
                    }
                }
            }
        };

        let action = MatchAction::new(from, to, kind);
        if let Err(err) = self.store.append_match_action(action).await {
            if kind == ActionKind::SuperLike {
                self.quota.refund(from);
            }
            if let Some(RequestWrite::Created { request, prior }) = write {
                tracing::warn!("Log write failed, removing request {}: {}", request.id, err);
                if let Err(revert) = self.store.save_match_requests(prior).await {
                    tracing::warn!("Removal of request {} failed: {}", request.id, revert);
                }
            }
            return Err(err.into());
        }
        tracing::info!("Recorded {:?} from {} to {}", kind, from, to);

        match write {
            None => Ok(ActionOutcome::Passed),
            Some(write) => Ok(ActionOutcome::Requested(write.into_request())),
        }
    }

    /// Super-likes the user can still spend today
    pub fn remaining_super_likes(&self, username: &str) -> u32 {
        self.quota.remaining(username)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::ActionOutcome;
    use crate::config::Settings;
    use crate::engine::MatchEngine;
    use crate::error::EngineError;
    use crate::models::{ActionKind, MatchRequest, User};
    use crate::services::store::test_support::MockStore;
    use crate::services::store::StoreError;
    use crate::services::{InMemoryStore, LoggingGateway, RecordStore};

    async fn engine_with_users(names: &[&str], settings: Settings) -> MatchEngine {
        let store = Arc::new(InMemoryStore::new());
        for name in names {
            store.save_user(User::new(*name)).await.unwrap();
        }
        MatchEngine::new(store, Arc::new(LoggingGateway::new()), settings)
    }

    #[tokio::test]
    async fn test_pass_leaves_no_request_behind() {
        let engine = engine_with_users(&["ayse", "mert"], Settings::default()).await;

        let outcome = engine
            .record_action("ayse", "mert", ActionKind::Pass)
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::Passed));
        assert!(engine.pending_requests_for("mert").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_like_opens_a_pending_request() {
        let engine = engine_with_users(&["ayse", "mert"], Settings::default()).await;

        let outcome = engine
            .record_action("ayse", "mert", ActionKind::Like)
            .await
            .unwrap();

        let ActionOutcome::Requested(request) = outcome else {
            panic!("like should open a request");
        };
        let pending = engine.pending_requests_for("mert").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, request.id);
    }

    #[tokio::test]
    async fn test_quota_error_carries_the_cap() {
        let mut settings = Settings::default();
        settings.quota.daily_super_likes = 1;
        let engine = engine_with_users(&["ayse", "mert", "inci"], settings).await;

        engine
            .record_action("ayse", "mert", ActionKind::SuperLike)
            .await
            .unwrap();
        let err = engine
            .record_action("ayse", "inci", ActionKind::SuperLike)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::QuotaExceeded { cap: 1 }));
        assert_eq!(engine.remaining_super_likes("ayse"), 0);
    }

    #[tokio::test]
    async fn test_acting_on_yourself_is_rejected() {
        let engine = engine_with_users(&["ayse"], Settings::default()).await;

        let err = engine
            .record_action("ayse", "ayse", ActionKind::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_super_like_refunded_when_log_write_fails() {
        let request_writes: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

        let mut store = MockStore::new();
        store
            .expect_get_user()
            .returning(|name| Ok(Some(User::new(name))));
        store
            .expect_get_all_match_requests()
            .returning(|| Ok(Vec::new()));
        let writes = request_writes.clone();
        store
            .expect_save_match_requests()
            .returning(move |requests| {
                writes.lock().unwrap().push(requests.len());
                Ok(())
            });
        store
            .expect_append_match_action()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));

        let engine = MatchEngine::with_defaults(Arc::new(store));
        assert_eq!(engine.remaining_super_likes("ayse"), 3);

        let err = engine
            .record_action("ayse", "mert", ActionKind::SuperLike)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Storage(_)));
        // The unit came back and the request opened by this call went away
        assert_eq!(engine.remaining_super_likes("ayse"), 3);
        assert_eq!(request_writes.lock().unwrap().clone(), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_super_like_refunded_when_request_write_fails() {
        let mut store = MockStore::new();
        store
            .expect_get_user()
            .returning(|name| Ok(Some(User::new(name))));
        store
            .expect_get_all_match_requests()
            .returning(|| Err(StoreError::Unavailable("down".to_string())));

        let engine = MatchEngine::with_defaults(Arc::new(store));
        let err = engine
            .record_action("ayse", "mert", ActionKind::SuperLike)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Storage(_)));
        assert_eq!(engine.remaining_super_likes("ayse"), 3);
    }

    #[tokio::test]
    async fn test_failed_log_write_keeps_a_preexisting_request() {
        let pending = MatchRequest::new("ayse", "mert");
        let mut store = MockStore::new();
        store
            .expect_get_user()
            .returning(|name| Ok(Some(User::new(name))));
        store
            .expect_get_all_match_requests()
            .returning(move || Ok(vec![pending.clone()]));
        // Nothing to take back out; the pending request predates this action
        store.expect_save_match_requests().times(0);
        store
            .expect_append_match_action()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));

        let engine = MatchEngine::with_defaults(Arc::new(store));
        let err = engine
            .record_action("ayse", "mert", ActionKind::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Storage(_)));
    }
}
