use std::collections::HashSet;

use crate::core::{filters::is_candidate_acceptable, scoring::score_candidate};
use crate::models::{ScoredCandidate, ScoringWeights, User};

/// Result of the ranking process
#[derive(Debug)]
pub struct RankResult {
    pub candidates: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Main matching orchestrator - implements the staged candidate pipeline
///
/// # Pipeline Stages
/// 1. Exclusion of users the seeker already acted on
/// 2. Hard preference filtering
/// 3. Scoring and ranking (stable descending order)
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Rank candidates for a seeker
    ///
    /// # Arguments
    /// * `seeker` - The user asking for matches
    /// * `candidates` - Snapshot of all stored users
    /// * `excluded` - Usernames the seeker already liked, passed or super-liked
    ///
    /// # Returns
    /// RankResult with acceptable candidates in descending score order; ties
    /// keep their encounter order, so the same snapshot always ranks the same.
    pub fn rank(
        &self,
        seeker: &User,
        candidates: Vec<User>,
        excluded: &HashSet<String>,
    ) -> RankResult {
        let total_candidates = candidates.len();

        let mut ranked: Vec<ScoredCandidate> = candidates
            .into_iter()
            // Stage 1: drop everyone the seeker already acted on
            .filter(|candidate| !excluded.contains(&candidate.username))
            // Stage 2: hard preference filter
            .filter(|candidate| is_candidate_acceptable(seeker, candidate))
            // Stage 3: score the survivors; the score orders, never filters
            .map(|candidate| {
                let (score, shared_hobbies, shared_food_preferences) =
                    score_candidate(seeker, &candidate, &self.weights);
                ScoredCandidate {
                    user: candidate,
                    score,
                    shared_hobbies,
                    shared_food_preferences,
                }
            })
            .collect();

        // Stable sort: equal scores keep their snapshot order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        RankResult {
            candidates: ranked,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Gender, GenderPreference, HabitPreference, HabitStatus, MatchingPreferences, PersonalInfo,
        Purpose,
    };
    use chrono::NaiveDate;

    fn create_candidate(username: &str, city: &str, smoking: HabitStatus, hobbies: &[&str]) -> User {
        let mut user = User::new(username);
        user.personal_info = Some(PersonalInfo {
            first_name: format!("User {}", username),
            last_name: "Test".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1993, 6, 2).unwrap(),
            city: city.to_string(),
            occupation: "designer".to_string(),
            smoking,
            drinking: HabitStatus::No,
            gender: Gender::Female,
        });
        user.app_preferences.hobbies = hobbies.iter().map(|h| h.to_string()).collect();
        user
    }

    fn create_seeker() -> User {
        let mut user = create_candidate("seeker", "Istanbul", HabitStatus::No, &["cooking"]);
        user.matching_preferences = Some(MatchingPreferences {
            preferred_gender: GenderPreference::Any,
            smoking: HabitPreference::No,
            drinking: HabitPreference::DontCare,
            purpose: Purpose::Dating,
        });
        user
    }

    #[test]
    fn test_rank_filters_and_orders() {
        let matcher = Matcher::with_default_weights();
        let seeker = create_seeker();

        let candidates = vec![
            create_candidate("far", "Ankara", HabitStatus::No, &[]),
            create_candidate("smoker", "Istanbul", HabitStatus::Yes, &["cooking"]),
            create_candidate("near", "Istanbul", HabitStatus::No, &["cooking"]),
        ];

        let result = matcher.rank(&seeker, candidates, &HashSet::new());

        assert_eq!(result.total_candidates, 3);
        // The smoker is gone entirely, the shared-city cook ranks first
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(result.candidates[0].user.username, "near");
        assert_eq!(result.candidates[0].score, 7);
        assert_eq!(result.candidates[1].user.username, "far");
        assert_eq!(result.candidates[1].score, 0);
    }

    #[test]
    fn test_excluded_users_never_reappear() {
        let matcher = Matcher::with_default_weights();
        let seeker = create_seeker();
        let excluded: HashSet<String> = ["near".to_string()].into_iter().collect();

        let candidates = vec![
            create_candidate("near", "Istanbul", HabitStatus::No, &["cooking"]),
            create_candidate("fresh", "Istanbul", HabitStatus::No, &[]),
        ];

        let result = matcher.rank(&seeker, candidates, &excluded);

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].user.username, "fresh");
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let matcher = Matcher::with_default_weights();
        let seeker = create_seeker();

        let candidates = vec![
            create_candidate("first", "Ankara", HabitStatus::No, &[]),
            create_candidate("second", "Izmir", HabitStatus::No, &[]),
            create_candidate("third", "Bursa", HabitStatus::No, &[]),
        ];

        let result = matcher.rank(&seeker, candidates, &HashSet::new());

        let order: Vec<&str> = result
            .candidates
            .iter()
            .map(|c| c.user.username.as_str())
            .collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_seeker_not_in_own_results() {
        let matcher = Matcher::with_default_weights();
        let seeker = create_seeker();

        let result = matcher.rank(&seeker, vec![seeker.clone()], &HashSet::new());

        assert!(result.candidates.is_empty());
        assert_eq!(result.total_candidates, 1);
    }
}
