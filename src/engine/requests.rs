use uuid::Uuid;

use super::MatchEngine;
use crate::error::{EngineError, EngineResult};
use crate::models::{Match, MatchRequest, RequestStatus};

/// How a request write settled
///
/// `Created` carries the collection as it was before the insert, so a caller
/// layering further writes on top can restore it without reading the store
/// again.
pub(super) enum RequestWrite {
    /// A pending request for the ordered pair already existed
    Existing(MatchRequest),
    /// A new request was persisted on top of `prior`
    Created {
        request: MatchRequest,
        prior: Vec<MatchRequest>,
    },
}

impl RequestWrite {
    pub(super) fn into_request(self) -> MatchRequest {
        match self {
            RequestWrite::Existing(request) => request,
            RequestWrite::Created { request, .. } => request,
        }
    }
}

impl MatchEngine {
    /// Open a pending request toward another user
    ///
    /// Resending while a pending request for the same ordered pair exists is
    /// a no-op that returns the stored request. The opposite direction is
    /// never inspected; mutual interest still goes through an explicit accept.
    pub async fn send_match_request(&self, from: &str, to: &str) -> EngineResult<MatchRequest> {
        let _guard = self.write_lock.lock().await;
        self.require_user(from).await?;
        self.require_user(to).await?;
        Ok(self.send_match_request_locked(from, to).await?.into_request())
    }

    /// Accept a pending request
    ///
    /// Three effects apply together: the request turns `Accepted`, an active
    /// `Match` is created, and the requester's greeting goes out through the
    /// message gateway. A failure in a later step rolls the earlier writes
    /// back, so no accepted request ever exists without its match.
    pub async fn accept_match_request(&self, id: Uuid) -> EngineResult<Match> {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.store.get_all_match_requests().await?;
        let pos = requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("match request {}", id)))?;
        if requests[pos].status != RequestStatus::Pending {
            return Err(EngineError::InvalidState(format!(
                "request {} is already {:?}",
                id, requests[pos].status
            )));
        }

        let from = requests[pos].from_user.clone();
        let to = requests[pos].to_user.clone();

        requests[pos].status = RequestStatus::Accepted;
        self.store.save_match_requests(requests.clone()).await?;

        // The unwind writes this snapshot back verbatim; the write lock
        // keeps it current for the whole call
        let prior_matches = self.store.get_all_matches().await?;
        let new_match = Match::new(&from, &to);
        let mut matches = prior_matches.clone();
        matches.push(new_match.clone());
        if let Err(err) = self.store.save_matches(matches).await {
            tracing::warn!("Match write failed, reverting request {}: {}", id, err);
            requests[pos].status = RequestStatus::Pending;
            if let Err(revert) = self.store.save_match_requests(requests).await {
                tracing::warn!("Revert of request {} failed too: {}", id, revert);
            }
            return Err(err.into());
        }

        let body = self.settings.greeting.template.replace("{from}", &from);
        if let Err(err) = self.gateway.send_greeting(&from, &to, &body).await {
            tracing::warn!("Greeting undeliverable, unwinding accept of {}: {}", id, err);
            if let Err(revert) = self.store.save_matches(prior_matches).await {
                tracing::warn!("Removal of match {} failed: {}", new_match.id, revert);
            }
            requests[pos].status = RequestStatus::Pending;
            if let Err(revert) = self.store.save_match_requests(requests).await {
                tracing::warn!("Revert of request {} failed too: {}", id, revert);
            }
            return Err(err.into());
        }

        tracing::info!("Request {} accepted, {} and {} are matched", id, from, to);
        Ok(new_match)
    }

    /// Reject a pending request; terminal, with no side effects
    pub async fn reject_match_request(&self, id: Uuid) -> EngineResult<MatchRequest> {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.store.get_all_match_requests().await?;
        let pos = requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("match request {}", id)))?;
        if requests[pos].status != RequestStatus::Pending {
            return Err(EngineError::InvalidState(format!(
                "request {} is already {:?}",
                id, requests[pos].status
            )));
        }

        requests[pos].status = RequestStatus::Rejected;
        let rejected = requests[pos].clone();
        self.store.save_match_requests(requests).await?;

        tracing::info!("Request {} rejected", id);
        Ok(rejected)
    }

    /// Pending requests addressed to the user, oldest first
    pub async fn pending_requests_for(&self, username: &str) -> EngineResult<Vec<MatchRequest>> {
        let requests = self.store.get_all_match_requests().await?;
        Ok(requests
            .into_iter()
            .filter(|r| r.to_user == username && r.status == RequestStatus::Pending)
            .collect())
    }

    /// Shared by `send_match_request` and `record_action`; caller holds the
    /// write lock and has resolved both users
    pub(super) async fn send_match_request_locked(
        &self,
        from: &str,
        to: &str,
    ) -> EngineResult<RequestWrite> {
        if from == to {
            return Err(EngineError::Validation(
                "cannot send a match request to yourself".to_string(),
            ));
        }

        let prior = self.store.get_all_match_requests().await?;
        if let Some(existing) = prior
            .iter()
            .find(|r| r.from_user == from && r.to_user == to && r.status == RequestStatus::Pending)
        {
            tracing::debug!("Pending request {} -> {} already exists", from, to);
            return Ok(RequestWrite::Existing(existing.clone()));
        }

        let request = MatchRequest::new(from, to);
        let mut requests = prior.clone();
        requests.push(request.clone());
        self.store.save_match_requests(requests).await?;

        tracing::info!("Request {} opened from {} to {}", request.id, from, to);
        Ok(RequestWrite::Created { request, prior })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::engine::MatchEngine;
    use crate::error::EngineError;
    use crate::models::{Match, MatchRequest, RequestStatus, User};
    use crate::services::store::test_support::MockStore;
    use crate::services::store::StoreError;
    use crate::services::{GatewayError, InMemoryStore, MessageGateway, RecordStore};

    struct FailingGateway;

    #[async_trait]
    impl MessageGateway for FailingGateway {
        async fn send_greeting(&self, _: &str, _: &str, _: &str) -> Result<(), GatewayError> {
            Err(GatewayError::Delivery("chat backend down".to_string()))
        }
    }

    async fn engine_with_pair() -> (MatchEngine, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        store.save_user(User::new("ayse")).await.unwrap();
        store.save_user(User::new("mert")).await.unwrap();
        (MatchEngine::with_defaults(store.clone()), store)
    }

    #[tokio::test]
    async fn test_duplicate_send_returns_existing_request() {
        let (engine, store) = engine_with_pair().await;

        let first = engine.send_match_request("ayse", "mert").await.unwrap();
        let second = engine.send_match_request("ayse", "mert").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.get_all_match_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_opposite_direction_is_a_separate_request() {
        let (engine, store) = engine_with_pair().await;

        let forward = engine.send_match_request("ayse", "mert").await.unwrap();
        let backward = engine.send_match_request("mert", "ayse").await.unwrap();

        assert_ne!(forward.id, backward.id);
        assert_eq!(store.get_all_match_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_accept_unknown_request_is_not_found() {
        let (engine, _) = engine_with_pair().await;

        let err = engine
            .accept_match_request(uuid::Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_match_write_reverts_the_request() {
        let pending = MatchRequest::new("ayse", "mert");
        let id = pending.id;
        let saved_statuses: Arc<Mutex<Vec<RequestStatus>>> = Arc::new(Mutex::new(Vec::new()));

        let mut store = MockStore::new();
        store
            .expect_get_all_match_requests()
            .returning(move || Ok(vec![pending.clone()]));
        let statuses = saved_statuses.clone();
        store
            .expect_save_match_requests()
            .returning(move |requests| {
                statuses.lock().unwrap().push(requests[0].status);
                Ok(())
            });
        store.expect_get_all_matches().returning(|| Ok(Vec::new()));
        store
            .expect_save_matches()
            .returning(|_| Err(StoreError::Unavailable("disk full".to_string())));

        let engine = MatchEngine::with_defaults(Arc::new(store));
        let err = engine.accept_match_request(id).await.unwrap_err();

        assert!(matches!(err, EngineError::Storage(_)));
        // First write flipped it to Accepted, second write put it back
        let observed = saved_statuses.lock().unwrap().clone();
        assert_eq!(observed, vec![RequestStatus::Accepted, RequestStatus::Pending]);
    }

    #[tokio::test]
    async fn test_greeting_failure_unwinds_the_accept() {
        let store = Arc::new(InMemoryStore::new());
        store.save_user(User::new("ayse")).await.unwrap();
        store.save_user(User::new("mert")).await.unwrap();
        let engine = MatchEngine::new(
            store.clone(),
            Arc::new(FailingGateway),
            crate::config::Settings::default(),
        );

        let request = engine.send_match_request("ayse", "mert").await.unwrap();
        let err = engine.accept_match_request(request.id).await.unwrap_err();

        assert!(matches!(err, EngineError::Storage(_)));
        // The request is pending again and no match survived
        let pending = engine.pending_requests_for("mert").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, request.id);
        assert!(engine.matches_for("ayse").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unwind_leaves_unrelated_matches_in_place() {
        let bystander = Match::new("efe", "inci");
        let bystander_id = bystander.id;
        let pending = MatchRequest::new("ayse", "mert");
        let id = pending.id;
        let match_writes: Arc<Mutex<Vec<Vec<Match>>>> = Arc::new(Mutex::new(Vec::new()));

        let mut store = MockStore::new();
        store
            .expect_get_all_match_requests()
            .returning(move || Ok(vec![pending.clone()]));
        store.expect_save_match_requests().returning(|_| Ok(()));
        // One snapshot read before the insert; the unwind must not depend
        // on reading the collection a second time
        store
            .expect_get_all_matches()
            .times(1)
            .returning(move || Ok(vec![bystander.clone()]));
        let writes = match_writes.clone();
        store.expect_save_matches().returning(move |matches| {
            writes.lock().unwrap().push(matches);
            Ok(())
        });

        let engine = MatchEngine::new(
            Arc::new(store),
            Arc::new(FailingGateway),
            crate::config::Settings::default(),
        );
        let err = engine.accept_match_request(id).await.unwrap_err();
        assert!(matches!(err, EngineError::Storage(_)));

        let observed = match_writes.lock().unwrap();
        assert_eq!(observed.len(), 2);
        assert_eq!(observed[0].len(), 2);
        // The unwind restored the collection exactly as it was
        assert_eq!(observed[1].len(), 1);
        assert_eq!(observed[1][0].id, bystander_id);
    }
}
