//! Error types for the Burger Rush core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the game core.
///
/// Command rejections (expired session, invalid push, ...) are ordinary outcomes for the
/// driver, not crashes: the game state is left untouched whenever one of them is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurgerError {
    /// The session time budget ran out; only a reset is accepted.
    #[error("Session expired: only reset is allowed")]
    SessionExpired,

    /// A game command was issued before the session was started.
    #[error("Session not active: start a session first")]
    SessionNotActive,

    /// `start` was called while a session is already running or has expired.
    #[error("Session already started")]
    SessionAlreadyStarted,

    /// The component is not pending unlock for the current order.
    #[error("Component '{component}' is not waiting to be unlocked for this order")]
    ComponentNotRequired { component: String },

    /// No unused unlocked unit of the component is available.
    #[error("Component '{component}' has no unlocked unit available")]
    ComponentNotUnlocked { component: String },

    /// A drawing without any content was submitted.
    #[error("Drawing is empty: draw something first")]
    EmptyDrawing,

    /// Configuration error (invalid values, invalid catalog)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl BurgerError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn component_not_required(component: impl Into<String>) -> Self {
        Self::ComponentNotRequired {
            component: component.into(),
        }
    }

    pub fn component_not_unlocked(component: impl Into<String>) -> Self {
        Self::ComponentNotUnlocked {
            component: component.into(),
        }
    }

    /// Check if this is the expired-session signal
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true for rejections of a player command, as opposed to
    /// infrastructure failures (config, IO, serialization).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired
                | Self::SessionNotActive
                | Self::SessionAlreadyStarted
                | Self::ComponentNotRequired { .. }
                | Self::ComponentNotUnlocked { .. }
                | Self::EmptyDrawing
        )
    }
}

impl From<std::io::Error> for BurgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BurgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BurgerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BurgerError>`.
pub type Result<T> = std::result::Result<T, BurgerError>;
