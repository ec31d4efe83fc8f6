use std::collections::HashSet;

use super::MatchEngine;
use crate::error::EngineResult;
use crate::models::ScoredCandidate;

impl MatchEngine {
    /// Filtered, scored and ordered candidates for the seeker
    ///
    /// Works on a fresh snapshot of the user collection every call. Anyone
    /// the seeker already liked, passed or super-liked stays hidden for good.
    pub async fn get_potential_matches(&self, seeker: &str) -> EngineResult<Vec<ScoredCandidate>> {
        let user = self.require_user(seeker).await?;

        let candidates = self.store.get_all_users().await?;
        let actions = self.store.get_match_actions(seeker).await?;
        let excluded: HashSet<String> = actions.into_iter().map(|a| a.to_user).collect();

        let result = self.matcher.rank(&user, candidates, &excluded);
        tracing::debug!(
            "Ranked {} of {} candidates for {}",
            result.candidates.len(),
            result.total_candidates,
            seeker
        );

        Ok(result.candidates)
    }
}
