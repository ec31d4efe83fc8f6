// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::is_candidate_acceptable;
pub use matcher::{Matcher, RankResult};
pub use scoring::score_candidate;
