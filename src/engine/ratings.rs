use chrono::Utc;
use validator::Validate;

use super::MatchEngine;
use crate::error::{EngineError, EngineResult};
use crate::models::{MeetingStatus, NewRating, Rating, RatingKind, User};

/// Arithmetic mean over the punctuality entries only
fn punctuality_mean(ratings: &[Rating]) -> Option<f64> {
    let scores: Vec<f64> = ratings
        .iter()
        .filter(|r| r.kind == RatingKind::Punctuality)
        .map(|r| r.score)
        .collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

impl MatchEngine {
    /// Rate another user
    ///
    /// Punctuality and experience ratings require a completed meeting between
    /// the two; profile ratings do not. A punctuality rating recomputes the
    /// displayed score from the full history, never incrementally.
    pub async fn add_rating(
        &self,
        from: &str,
        to: &str,
        rating: NewRating,
    ) -> EngineResult<User> {
        rating.validate()?;
        if from == to {
            return Err(EngineError::Validation(
                "cannot rate yourself".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        self.require_user(from).await?;
        let mut target = self.require_user(to).await?;

        let meeting_gated = matches!(rating.kind, RatingKind::Punctuality | RatingKind::Experience);
        if meeting_gated {
            let meetings = self.store.get_meetings().await?;
            let met = meetings.iter().any(|m| {
                m.status == MeetingStatus::Completed && m.involves(from) && m.involves(to)
            });
            if !met {
                return Err(EngineError::InvalidState(format!(
                    "no completed meeting between {} and {}",
                    from, to
                )));
            }
        }

        target.ratings.push(Rating {
            kind: rating.kind,
            score: rating.score,
            comment: rating.comment,
            date: Utc::now(),
        });
        if let Some(mean) = punctuality_mean(&target.ratings) {
            target.punctuality_score = mean;
        }

        self.store.save_user(target.clone()).await?;
        tracing::info!("{} rated {} ({:?}: {})", from, to, rating.kind, rating.score);
        Ok(target)
    }
}
