use tracing::{debug, error};

use super::engine::{MatchOutcome, MatchingEngine, MatchingError};

/// Run one matching attempt on behalf of an external trigger (the internal
/// endpoint or the scheduler) and log the outcome.
pub async fn run_dispatch(engine: &MatchingEngine) -> Result<MatchOutcome, MatchingError> {
    match engine.run_once().await {
        Ok(outcome) => {
            debug!(?outcome, "dispatch finished");
            Ok(outcome)
        }
        Err(e) => {
            error!(error = %e, "dispatch failed");
            Err(e)
        }
    }
}
