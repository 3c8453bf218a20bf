//! Matching domain - eligibility filtering and the dispatch engine.

pub mod eligibility;
pub mod engine;
pub mod trigger;

pub use eligibility::{rank_candidates, Candidate, EligibilityFilter};
pub use engine::{MatchOutcome, MatchingEngine, MatchingError};
pub use trigger::run_dispatch;
