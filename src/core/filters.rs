use crate::models::{Gender, GenderPreference, HabitPreference, HabitStatus, User};

/// Check if a candidate passes the seeker's hard matching preferences
///
/// This is Stage 2 of the matching pipeline, applied after candidates the
/// seeker already acted on have been excluded.
#[inline]
pub fn is_candidate_acceptable(seeker: &User, candidate: &User) -> bool {
    // A user is never their own candidate
    if candidate.username == seeker.username {
        return false;
    }

    // No stated preferences accepts everyone
    let prefs = match &seeker.matching_preferences {
        Some(prefs) => prefs,
        None => return true,
    };

    // Preferences exist but the candidate has nothing to evaluate against
    let info = match &candidate.personal_info {
        Some(info) => info,
        None => return false,
    };

    // Check gender preference
    if !matches_gender(prefs.preferred_gender, info.gender) {
        return false;
    }

    // Check smoking preference
    if !matches_habit(prefs.smoking, info.smoking) {
        return false;
    }

    // Check drinking preference
    if !matches_habit(prefs.drinking, info.drinking) {
        return false;
    }

    true
}

#[inline]
fn matches_gender(wanted: GenderPreference, actual: Gender) -> bool {
    match wanted {
        GenderPreference::Any => true,
        GenderPreference::Female => actual == Gender::Female,
        GenderPreference::Male => actual == Gender::Male,
        GenderPreference::NonBinary => actual == Gender::NonBinary,
    }
}

/// Ternary habit filter; wanting `Yes` also admits `Occasionally`
#[inline]
fn matches_habit(wanted: HabitPreference, actual: HabitStatus) -> bool {
    match wanted {
        HabitPreference::DontCare => true,
        HabitPreference::No => actual == HabitStatus::No,
        HabitPreference::Yes => actual != HabitStatus::No,
    }
}
