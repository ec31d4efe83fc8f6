// Model exports
pub mod domain;
pub mod requests;

pub use domain::{
    ActionKind, AppPreferences, Gender, GenderPreference, HabitPreference, HabitStatus, Match,
    MatchAction, MatchRequest, MatchingPreferences, Meeting, MeetingStatus, PersonalInfo, Purpose,
    Rating, RatingKind, RequestStatus, ScoredCandidate, ScoringWeights, User,
};
pub use requests::{NewMeeting, NewRating, NewUser};
