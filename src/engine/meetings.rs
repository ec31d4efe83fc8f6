use std::collections::HashSet;

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;
use validator::Validate;

use super::MatchEngine;
use crate::error::{EngineError, EngineResult};
use crate::models::{Meeting, MeetingStatus, NewMeeting};

/// Result of presenting a verification code
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Code accepted; the meeting is now completed and rating-eligible
    Verified(Meeting),
    /// Unknown code, expired window, or a meeting no longer awaiting one
    Invalid,
}

// 0, O, 1 and I are left out; codes get typed by hand at a dinner table
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

// Collision retries before the code grows by one symbol
const CODE_ATTEMPTS_PER_LENGTH: usize = 32;

/// Random code absent from `taken`; a length whose space keeps colliding
/// grows by one symbol after a bounded number of retries
fn generate_code(length: usize, taken: &HashSet<String>) -> String {
    let mut rng = rand::thread_rng();
    let mut length = length.max(1);
    loop {
        for _ in 0..CODE_ATTEMPTS_PER_LENGTH {
            let code: String = (0..length)
                .map(|_| {
                    let idx = rng.gen_range(0..CODE_CHARSET.len());
                    CODE_CHARSET[idx] as char
                })
                .collect();
            if !taken.contains(&code) {
                return code;
            }
        }
        length += 1;
    }
}

impl MatchEngine {
    /// Propose a dinner to a matched partner
    ///
    /// Requires an active match between the two users; the proposal starts
    /// `Pending` with no verification code attached yet.
    pub async fn create_meeting(
        &self,
        creator: &str,
        proposal: NewMeeting,
    ) -> EngineResult<Meeting> {
        proposal.validate()?;
        if creator == proposal.participant {
            return Err(EngineError::Validation(
                "cannot schedule a meeting with yourself".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        self.require_user(creator).await?;
        self.require_user(&proposal.participant).await?;

        let matches = self.store.get_all_matches().await?;
        let matched = matches
            .iter()
            .any(|m| m.is_active && m.involves(creator) && m.involves(&proposal.participant));
        if !matched {
            return Err(EngineError::InvalidState(format!(
                "no active match between {} and {}",
                creator, proposal.participant
            )));
        }

        let meeting = Meeting {
            id: Uuid::new_v4(),
            status: MeetingStatus::Pending,
            date: proposal.date,
            location: proposal.location,
            creator: creator.to_string(),
            participant: proposal.participant,
            restaurant_name: proposal.restaurant_name,
            verification_code: None,
            is_verified: false,
        };

        let mut meetings = self.store.get_meetings().await?;
        meetings.push(meeting.clone());
        self.store.save_meetings(meetings).await?;

        tracing::info!(
            "Meeting {} proposed by {} at {}",
            meeting.id,
            meeting.creator,
            meeting.restaurant_name
        );
        Ok(meeting)
    }

    /// Accept a proposed meeting; only the invited participant may do this
    ///
    /// Acceptance issues the verification code. The code stays usable until
    /// the meeting date plus the configured validity window.
    pub async fn accept_meeting(&self, id: Uuid, username: &str) -> EngineResult<Meeting> {
        let _guard = self.write_lock.lock().await;

        let mut meetings = self.store.get_meetings().await?;
        let pos = meetings
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("meeting {}", id)))?;
        if meetings[pos].participant != username {
            return Err(EngineError::Validation(format!(
                "only {} can accept meeting {}",
                meetings[pos].participant, id
            )));
        }
        if meetings[pos].status != MeetingStatus::Pending {
            return Err(EngineError::InvalidState(format!(
                "meeting {} is already {:?}",
                id, meetings[pos].status
            )));
        }

        // Codes are unique across all stored meetings, consumed or not
        let taken: HashSet<String> = meetings
            .iter()
            .filter_map(|m| m.verification_code.clone())
            .collect();
        let code = generate_code(self.settings.meetings.code_length, &taken);

        meetings[pos].status = MeetingStatus::Accepted;
        meetings[pos].verification_code = Some(code);
        let accepted = meetings[pos].clone();
        self.store.save_meetings(meetings).await?;

        tracing::info!("Meeting {} accepted by {}", id, username);
        Ok(accepted)
    }

    /// Decline a proposed meeting; participant only, terminal
    pub async fn reject_meeting(&self, id: Uuid, username: &str) -> EngineResult<Meeting> {
        let _guard = self.write_lock.lock().await;

        let mut meetings = self.store.get_meetings().await?;
        let pos = meetings
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("meeting {}", id)))?;
        if meetings[pos].participant != username {
            return Err(EngineError::Validation(format!(
                "only {} can reject meeting {}",
                meetings[pos].participant, id
            )));
        }
        if meetings[pos].status != MeetingStatus::Pending {
            return Err(EngineError::InvalidState(format!(
                "meeting {} is already {:?}",
                id, meetings[pos].status
            )));
        }

        meetings[pos].status = MeetingStatus::Rejected;
        let rejected = meetings[pos].clone();
        self.store.save_meetings(meetings).await?;

        tracing::info!("Meeting {} rejected by {}", id, username);
        Ok(rejected)
    }

    /// Call off a meeting before it happened; either party, from `Pending`
    /// or `Accepted`
    ///
    /// Cancelling an accepted meeting leaves its code stored but dead; the
    /// code can never verify a cancelled meeting.
    pub async fn cancel_meeting(&self, id: Uuid, username: &str) -> EngineResult<Meeting> {
        let _guard = self.write_lock.lock().await;

        let mut meetings = self.store.get_meetings().await?;
        let pos = meetings
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("meeting {}", id)))?;
        if !meetings[pos].involves(username) {
            return Err(EngineError::Validation(format!(
                "{} is not part of meeting {}",
                username, id
            )));
        }
        match meetings[pos].status {
            MeetingStatus::Pending | MeetingStatus::Accepted => {}
            status => {
                return Err(EngineError::InvalidState(format!(
                    "meeting {} is already {:?}",
                    id, status
                )));
            }
        }

        meetings[pos].status = MeetingStatus::Cancelled;
        let cancelled = meetings[pos].clone();
        self.store.save_meetings(meetings).await?;

        tracing::info!("Meeting {} cancelled by {}", id, username);
        Ok(cancelled)
    }

    /// Redeem a verification code
    ///
    /// A bad code is a negative outcome, not an error; replaying an already
    /// consumed code is. On success the meeting completes and both diners
    /// become eligible to rate each other.
    pub async fn verify_meeting(&self, code: &str) -> EngineResult<VerifyOutcome> {
        let _guard = self.write_lock.lock().await;

        let mut meetings = self.store.get_meetings().await?;
        let pos = match meetings
            .iter()
            .position(|m| m.verification_code.as_deref() == Some(code))
        {
            Some(pos) => pos,
            None => {
                tracing::debug!("Verification code matched no meeting");
                return Ok(VerifyOutcome::Invalid);
            }
        };

        // Replay of a consumed code outranks every other outcome
        if meetings[pos].is_verified || meetings[pos].status == MeetingStatus::Completed {
            return Err(EngineError::AlreadyVerified);
        }

        // Cancelled after acceptance: the stored code is dead
        if meetings[pos].status != MeetingStatus::Accepted {
            return Ok(VerifyOutcome::Invalid);
        }

        let deadline =
            meetings[pos].date + Duration::hours(self.settings.meetings.code_validity_hours);
        if Utc::now() > deadline {
            tracing::debug!("Verification code for meeting {} expired", meetings[pos].id);
            return Ok(VerifyOutcome::Invalid);
        }

        meetings[pos].is_verified = true;
        meetings[pos].status = MeetingStatus::Completed;
        let verified = meetings[pos].clone();
        self.store.save_meetings(meetings).await?;

        tracing::info!(
            "Meeting {} verified, {} and {} can now rate each other",
            verified.id,
            verified.creator,
            verified.participant
        );
        Ok(VerifyOutcome::Verified(verified))
    }

    /// Every meeting the user is part of, oldest first
    pub async fn meetings_for(&self, username: &str) -> EngineResult<Vec<Meeting>> {
        let meetings = self.store.get_meetings().await?;
        Ok(meetings
            .into_iter()
            .filter(|m| m.involves(username))
            .collect())
    }
}
