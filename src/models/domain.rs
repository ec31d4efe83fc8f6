use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A registered user with profile, preferences and rating history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub matching_preferences: Option<MatchingPreferences>,
    #[serde(default)]
    pub app_preferences: AppPreferences,
    #[serde(default = "default_punctuality")]
    pub punctuality_score: f64,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user with the default punctuality score and empty preferences
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            personal_info: None,
            matching_preferences: None,
            app_preferences: AppPreferences::default(),
            punctuality_score: default_punctuality(),
            ratings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Home city, if the user filled in personal info
    pub fn city(&self) -> Option<&str> {
        self.personal_info.as_ref().map(|info| info.city.as_str())
    }
}

fn default_punctuality() -> f64 {
    5.0
}

/// Demographic and lifestyle details shown on a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub city: String,
    pub occupation: String,
    pub smoking: HabitStatus,
    pub drinking: HabitStatus,
    pub gender: Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Female,
    Male,
    NonBinary,
}

/// Whether a user smokes or drinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HabitStatus {
    No,
    Occasionally,
    Yes,
}

/// Hard matching preferences; a user without them accepts every candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPreferences {
    #[serde(default)]
    pub preferred_gender: GenderPreference,
    #[serde(default)]
    pub smoking: HabitPreference,
    #[serde(default)]
    pub drinking: HabitPreference,
    pub purpose: Purpose,
}

/// Gender filter with an explicit "no filter" variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenderPreference {
    #[default]
    Any,
    Female,
    Male,
    NonBinary,
}

/// Smoking/drinking filter; `DontCare` is the explicit permissive default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HabitPreference {
    No,
    #[default]
    DontCare,
    Yes,
}

/// What the user is on Tably for; carried on the profile, not filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Purpose {
    Dating,
    Friendship,
    Networking,
}

/// Soft interest tags used by the scorer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPreferences {
    #[serde(default)]
    pub food_preferences: HashSet<String>,
    #[serde(default)]
    pub hobbies: HashSet<String>,
}

/// One swipe-style interaction, append-only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAction {
    pub from_user: String,
    pub to_user: String,
    pub kind: ActionKind,
    pub timestamp: DateTime<Utc>,
}

impl MatchAction {
    pub fn new(from_user: impl Into<String>, to_user: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            from_user: from_user.into(),
            to_user: to_user.into(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Like,
    SuperLike,
    Pass,
}

/// A one-directional proposal awaiting the target's decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub id: Uuid,
    pub from_user: String,
    pub to_user: String,
    pub timestamp: DateTime<Utc>,
    pub status: RequestStatus,
}

impl MatchRequest {
    pub fn new(from_user: impl Into<String>, to_user: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_user: from_user.into(),
            to_user: to_user.into(),
            timestamp: Utc::now(),
            status: RequestStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A confirmed bidirectional connection; user order carries no meaning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub user_a: String,
    pub user_b: String,
    pub timestamp: DateTime<Utc>,
    pub is_active: bool,
}

impl Match {
    pub fn new(user_a: impl Into<String>, user_b: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_a: user_a.into(),
            user_b: user_b.into(),
            timestamp: Utc::now(),
            is_active: true,
        }
    }

    pub fn involves(&self, username: &str) -> bool {
        self.user_a == username || self.user_b == username
    }

    /// Partner lookup from either side of the match
    pub fn partner_of(&self, username: &str) -> Option<&str> {
        if self.user_a == username {
            Some(&self.user_b)
        } else if self.user_b == username {
            Some(&self.user_a)
        } else {
            None
        }
    }
}

/// A scheduled real-world dinner between two matched users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Uuid,
    pub status: MeetingStatus,
    pub date: DateTime<Utc>,
    pub location: String,
    pub creator: String,
    pub participant: String,
    pub restaurant_name: String,
    #[serde(default)]
    pub verification_code: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl Meeting {
    pub fn involves(&self, username: &str) -> bool {
        self.creator == username || self.participant == username
    }

    /// The other party of the meeting, from either side
    pub fn counterpart_of(&self, username: &str) -> Option<&str> {
        if self.creator == username {
            Some(&self.participant)
        } else if self.participant == username {
            Some(&self.creator)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeetingStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

/// One peer rating, appended to the rated user's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub kind: RatingKind,
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RatingKind {
    Punctuality,
    Profile,
    Experience,
}

/// Integer weights for the interest-overlap scorer
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub shared_hobby: u32,
    pub shared_food: u32,
    pub same_city_bonus: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            shared_hobby: 2,
            shared_food: 2,
            same_city_bonus: 5,
        }
    }
}

/// Ranked discovery result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub user: User,
    pub score: u32,
    pub shared_hobbies: Vec<String>,
    pub shared_food_preferences: Vec<String>,
}
