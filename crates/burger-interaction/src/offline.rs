use async_trait::async_trait;
use burger_core::oracle::{JudgeRequest, OracleError, QualityOracle};

/// Judge used when no API key is configured. Always unavailable, so every
/// drawing receives the adapter's fallback score and the game stays playable.
#[derive(Debug, Clone)]
pub struct OfflineJudge {
    reason: String,
}

impl OfflineJudge {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl QualityOracle for OfflineJudge {
    fn name(&self) -> &str {
        "offline"
    }

    async fn evaluate(&self, _request: &JudgeRequest<'_>) -> Result<String, OracleError> {
        Err(OracleError::Unavailable(format!("offline judge: {}", self.reason)))
    }
}
