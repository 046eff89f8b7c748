//! Quality oracle: the external judge that scores a component drawing.
//!
//! The core only depends on the [`QualityOracle`] trait. Concrete judges (an HTTP vision
//! model, an offline stub) live outside the core. [`QualityOracleAdapter`] wraps any
//! judge and guarantees the game always receives a [`QualityJudgment`].

mod adapter;
mod verdict;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

pub use adapter::{DEFAULT_PROMPT_TEMPLATE, FALLBACK_COMMENT, QualityOracleAdapter};
pub use verdict::parse_verdict;

/// Highest score a judgment can carry.
pub const MAX_SCORE: u8 = 10;

/// A raw drawing as captured by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl DrawingArtifact {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// A PNG drawing, the format drawing canvases usually export.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Evaluation request handed to a judge.
#[derive(Debug)]
pub struct JudgeRequest<'a> {
    /// What the player was asked to draw
    pub component_description: &'a str,
    /// Fully rendered instruction text for the judge
    pub prompt: String,
    pub drawing: &'a DrawingArtifact,
}

/// Where a judgment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JudgmentSource {
    Oracle,
    Fallback,
}

/// Score and comment for one drawing. The score is always within `0..=10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityJudgment {
    pub score: u8,
    pub comment: String,
    pub source: JudgmentSource,
}

impl QualityJudgment {
    /// Builds a judgment from an arbitrary integer score, clamping it to `0..=10`.
    pub fn new(score: i64, comment: impl Into<String>, source: JudgmentSource) -> Self {
        Self {
            score: score.clamp(0, i64::from(MAX_SCORE)) as u8,
            comment: comment.into(),
            source,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == JudgmentSource::Fallback
    }
}

/// Failures of a judge. These never reach the game: the adapter turns every one of
/// them into a fallback judgment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle rejected credentials: {0}")]
    Auth(String),

    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("failed to render judge prompt: {0}")]
    Prompt(String),
}

/// An external judge that scores a drawing.
///
/// Implementations return the judge's raw reply text; parsing and the fallback
/// policy belong to [`QualityOracleAdapter`].
#[async_trait]
pub trait QualityOracle: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn evaluate(&self, request: &JudgeRequest<'_>) -> Result<String, OracleError>;
}
