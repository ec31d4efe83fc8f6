use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::domain::{AppPreferences, MatchingPreferences, PersonalInfo, RatingKind};

/// Request to register a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 32))]
    #[serde(alias = "username", rename = "username")]
    pub username: String,
    #[serde(default)]
    #[serde(alias = "personal_info", rename = "personalInfo")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    #[serde(alias = "matching_preferences", rename = "matchingPreferences")]
    pub matching_preferences: Option<MatchingPreferences>,
    #[serde(default)]
    #[serde(alias = "app_preferences", rename = "appPreferences")]
    pub app_preferences: AppPreferences,
}

impl NewUser {
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            personal_info: None,
            matching_preferences: None,
            app_preferences: AppPreferences::default(),
        }
    }
}

/// Request to propose a meeting to a matched partner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMeeting {
    #[validate(length(min = 1))]
    #[serde(alias = "participant", rename = "participant")]
    pub participant: String,
    #[validate(length(min = 1))]
    #[serde(alias = "restaurant_name", rename = "restaurantName")]
    pub restaurant_name: String,
    #[validate(length(min = 1))]
    #[serde(alias = "location", rename = "location")]
    pub location: String,
    #[serde(alias = "date", rename = "date")]
    pub date: DateTime<Utc>,
}

/// Request to rate a user after a completed meeting
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRating {
    #[serde(alias = "kind", rename = "kind")]
    pub kind: RatingKind,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(alias = "score", rename = "score")]
    pub score: f64,
    #[serde(default)]
    #[validate(length(max = 500))]
    #[serde(alias = "comment", rename = "comment")]
    pub comment: Option<String>,
}
