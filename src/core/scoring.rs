use std::collections::HashSet;

use crate::models::{ScoringWeights, User};

/// Calculate an affinity score for a candidate against the seeker
///
/// Scoring formula:
/// score = shared_hobby * |shared hobbies|      # default 2 per shared hobby
///       + shared_food * |shared food tags|     # default 2 per shared tag
///       + same_city_bonus                      # default 5, both cities known and equal
///
/// The score orders candidates that already passed the hard filters; it never
/// filters anyone out on its own.
pub fn score_candidate(
    seeker: &User,
    candidate: &User,
    weights: &ScoringWeights,
) -> (u32, Vec<String>, Vec<String>) {
    let shared_hobbies = shared_tags(
        &seeker.app_preferences.hobbies,
        &candidate.app_preferences.hobbies,
    );
    let shared_food = shared_tags(
        &seeker.app_preferences.food_preferences,
        &candidate.app_preferences.food_preferences,
    );

    let mut score = weights.shared_hobby * shared_hobbies.len() as u32
        + weights.shared_food * shared_food.len() as u32;

    // City bonus only when both sides filled in a city
    if same_city(seeker, candidate) {
        score += weights.same_city_bonus;
    }

    (score, shared_hobbies, shared_food)
}

/// Sorted intersection, so equal tag sets always list in the same order
#[inline]
fn shared_tags(ours: &HashSet<String>, theirs: &HashSet<String>) -> Vec<String> {
    let mut shared: Vec<String> = ours.intersection(theirs).cloned().collect();
    shared.sort();
    shared
}

#[inline]
fn same_city(seeker: &User, candidate: &User) -> bool {
    match (seeker.city(), candidate.city()) {
        (Some(ours), Some(theirs)) => ours == theirs,
        _ => false,
    }
}
