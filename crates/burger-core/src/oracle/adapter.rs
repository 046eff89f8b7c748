use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use minijinja::{Environment, context};
use rand::Rng;

use super::verdict::parse_verdict;
use super::{
    DrawingArtifact, JudgeRequest, JudgmentSource, MAX_SCORE, OracleError, QualityJudgment,
    QualityOracle,
};
use crate::config::OracleConfig;

pub const FALLBACK_COMMENT: &str =
    "The AI judge could not evaluate this drawing, so a random score was given.";

pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are an expert drawing judge.
The player tried to draw: {{ component }}.

Evaluate the drawing on:
- Colour: are the colours expressive and harmonious?
- Shape: is the form clear rather than blurry or ambiguous?
- Composition: are the elements naturally arranged?
- Detail: is it neither too simple nor needlessly busy?
- Subject match: does the drawing actually show the described subject?

Give one overall score between 0 and 10 and a short comment covering each aspect.
Reply with a single JSON object and nothing else:
{"score": <integer 0-10>, "comment": "<text>"}"#;

/// Wraps a [`QualityOracle`] with the degrade-not-fail policy.
///
/// [`judge`](Self::judge) always produces a judgment: judge errors, timeouts and
/// unparsable replies are replaced by a random score from the fallback range.
#[derive(Clone)]
pub struct QualityOracleAdapter {
    oracle: Arc<dyn QualityOracle>,
    timeout: Duration,
    fallback_range: RangeInclusive<u8>,
    prompt_template: String,
}

impl QualityOracleAdapter {
    pub fn new(oracle: Arc<dyn QualityOracle>, config: &OracleConfig) -> Self {
        Self {
            oracle,
            timeout: config.timeout(),
            fallback_range: fallback_range(config),
            prompt_template: config
                .prompt_template
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
        }
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Scores a drawing of the described component. Never fails.
    pub async fn judge(&self, component_description: &str, drawing: &DrawingArtifact) -> QualityJudgment {
        match self.try_judge(component_description, drawing).await {
            Ok(judgment) => {
                tracing::debug!(
                    oracle = self.oracle.name(),
                    score = judgment.score,
                    "Drawing judged"
                );
                judgment
            }
            Err(err) => {
                let judgment = self.fallback();
                tracing::warn!(
                    oracle = self.oracle.name(),
                    error = %err,
                    score = judgment.score,
                    "Oracle failed, using fallback score"
                );
                judgment
            }
        }
    }

    pub fn render_prompt(&self, component_description: &str) -> Result<String, OracleError> {
        Environment::new()
            .render_str(&self.prompt_template, context! { component => component_description })
            .map_err(|err| OracleError::Prompt(err.to_string()))
    }

    async fn try_judge(
        &self,
        component_description: &str,
        drawing: &DrawingArtifact,
    ) -> Result<QualityJudgment, OracleError> {
        let request = JudgeRequest {
            component_description,
            prompt: self.render_prompt(component_description)?,
            drawing,
        };

        let reply = tokio::time::timeout(self.timeout, self.oracle.evaluate(&request))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        parse_verdict(&reply)
    }

    fn fallback(&self) -> QualityJudgment {
        let score = rand::thread_rng().gen_range(self.fallback_range.clone());
        QualityJudgment::new(i64::from(score), FALLBACK_COMMENT, JudgmentSource::Fallback)
    }
}

/// Ordered fallback bounds capped at [`MAX_SCORE`]; never empty.
fn fallback_range(config: &OracleConfig) -> RangeInclusive<u8> {
    let low = config.fallback_min.min(config.fallback_max).min(MAX_SCORE);
    let high = config.fallback_min.max(config.fallback_max).min(MAX_SCORE);
    low..=high
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Judge that replays a fixed reply and records the prompts it saw.
    struct ScriptedOracle {
        reply: Result<String, OracleError>,
        delay: Option<Duration>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedOracle {
        fn replying(reply: Result<String, OracleError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                delay: None,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl QualityOracle for ScriptedOracle {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn evaluate(&self, request: &JudgeRequest<'_>) -> Result<String, OracleError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone()
        }
    }

    fn drawing() -> DrawingArtifact {
        DrawingArtifact::png(vec![0x89, 0x50, 0x4e, 0x47])
    }

    fn assert_fallback(judgment: &QualityJudgment) {
        assert_eq!(judgment.source, JudgmentSource::Fallback);
        assert!((3..=8).contains(&judgment.score), "score {}", judgment.score);
        assert_eq!(judgment.comment, FALLBACK_COMMENT);
    }

    #[tokio::test]
    async fn test_successful_reply_is_parsed() {
        let oracle = ScriptedOracle::replying(Ok(r#"{"score": 8, "comment": "Tasty"}"#.into()));
        let adapter = QualityOracleAdapter::new(oracle.clone(), &OracleConfig::default());

        let judgment = adapter.judge("a grilled beef patty", &drawing()).await;

        assert_eq!(judgment.score, 8);
        assert_eq!(judgment.source, JudgmentSource::Oracle);
        let prompts = oracle.prompts.lock().unwrap();
        assert!(prompts[0].contains("The player tried to draw: a grilled beef patty."));
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        for err in [
            OracleError::Unavailable("connection refused".into()),
            OracleError::Auth("bad key".into()),
        ] {
            let adapter =
                QualityOracleAdapter::new(ScriptedOracle::replying(Err(err)), &OracleConfig::default());
            for _ in 0..20 {
                assert_fallback(&adapter.judge("bun", &drawing()).await);
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let oracle = ScriptedOracle::replying(Ok("I'd give it an 8!".into()));
        let adapter = QualityOracleAdapter::new(oracle, &OracleConfig::default());
        assert_fallback(&adapter.judge("bun", &drawing()).await);
    }

    #[tokio::test]
    async fn test_out_of_range_reply_is_clamped() {
        let oracle = ScriptedOracle::replying(Ok(r#"{"score": 99}"#.into()));
        let adapter = QualityOracleAdapter::new(oracle, &OracleConfig::default());
        assert_eq!(adapter.judge("bun", &drawing()).await.score, 10);
    }

    #[tokio::test]
    async fn test_slow_oracle_times_out() {
        let oracle = Arc::new(ScriptedOracle {
            reply: Ok(r#"{"score": 10}"#.into()),
            delay: Some(Duration::from_secs(5)),
            prompts: Mutex::new(Vec::new()),
        });
        let mut adapter = QualityOracleAdapter::new(oracle, &OracleConfig::default());
        adapter.timeout = Duration::from_millis(20);

        assert_fallback(&adapter.judge("bun", &drawing()).await);
    }

    #[tokio::test]
    async fn test_broken_template_falls_back() {
        let config = OracleConfig {
            prompt_template: Some("Draw {{ component".into()),
            ..OracleConfig::default()
        };
        let oracle = ScriptedOracle::replying(Ok(r#"{"score": 10}"#.into()));
        let adapter = QualityOracleAdapter::new(oracle.clone(), &config);

        assert_fallback(&adapter.judge("bun", &drawing()).await);
        assert!(oracle.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_fallback_range() {
        let config = OracleConfig {
            fallback_min: 6,
            fallback_max: 6,
            ..OracleConfig::default()
        };
        let adapter =
            QualityOracleAdapter::new(ScriptedOracle::replying(Ok(String::new())), &config);
        assert_eq!(adapter.fallback().score, 6);
    }

    #[tokio::test]
    async fn test_inverted_fallback_bounds_still_fall_back() {
        let config = OracleConfig {
            fallback_min: 8,
            fallback_max: 3,
            ..OracleConfig::default()
        };
        let oracle = ScriptedOracle::replying(Err(OracleError::Unavailable("down".into())));
        let adapter = QualityOracleAdapter::new(oracle, &config);
        for _ in 0..20 {
            assert_fallback(&adapter.judge("bun", &drawing()).await);
        }
    }

    #[test]
    fn test_fallback_bounds_capped_at_max_score() {
        let config = OracleConfig {
            fallback_min: 12,
            fallback_max: 40,
            ..OracleConfig::default()
        };
        assert_eq!(fallback_range(&config), 10..=10);
    }
}
