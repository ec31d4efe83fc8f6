//! Tably Engine - Matching and meeting verification for the Tably dining app
//!
//! This library provides the core matchmaking logic used by the Tably social
//! dining app: preference filtering, interest-overlap scoring, match request
//! handling, super-like quotas, and verified real-world meetings with peer
//! ratings.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use core::Matcher;
pub use engine::{ActionOutcome, MatchEngine, QuotaTracker, VerifyOutcome};
pub use error::{EngineError, EngineResult};
pub use models::{
    ActionKind, Match, MatchRequest, Meeting, MeetingStatus, RequestStatus, ScoredCandidate, User,
};
pub use services::{InMemoryStore, MessageGateway, RecordStore};
