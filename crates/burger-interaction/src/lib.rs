//! Quality oracles for Burger Rush.
//!
//! - [`OpenAIJudge`]: OpenAI vision model over HTTP
//! - [`OfflineJudge`]: no network, every drawing gets a fallback score

pub mod config;
mod offline;
mod openai_judge;

use std::sync::Arc;

use burger_core::config::OracleConfig;
use burger_core::oracle::QualityOracle;

pub use offline::OfflineJudge;
pub use openai_judge::OpenAIJudge;

/// Picks the judge for this run: OpenAI when credentials are available and
/// `offline` is not requested, the offline judge otherwise.
pub fn select_judge(config: &OracleConfig, offline: bool) -> Arc<dyn QualityOracle> {
    if offline {
        return Arc::new(OfflineJudge::new("offline mode requested"));
    }

    match OpenAIJudge::try_from_env(config) {
        Ok(judge) => {
            tracing::info!(model = judge.model(), "Using OpenAI judge");
            Arc::new(judge)
        }
        Err(err) => {
            tracing::warn!(error = %err, "OpenAI judge unavailable, drawings get fallback scores");
            Arc::new(OfflineJudge::new(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_flag_wins() {
        let judge = select_judge(&OracleConfig::default(), true);
        assert_eq!(judge.name(), "offline");
    }
}
