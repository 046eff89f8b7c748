use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{BurgerError, Result};

/// Lifecycle state of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Active,
    Expired,
}

/// Time-boxed session: `Idle -> Active -> Expired -> (reset) -> Idle`.
///
/// Only the start instant is stored. Status and remaining time are derived from the
/// `now` passed in, so every query is free of side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    started_at: Option<Instant>,
    budget: Duration,
}

impl Session {
    pub fn new(budget: Duration) -> Self {
        Self {
            started_at: None,
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Starts the countdown. Only valid from `Idle`.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        if self.started_at.is_some() {
            return Err(BurgerError::SessionAlreadyStarted);
        }
        self.started_at = Some(now);
        Ok(())
    }

    /// Time left in whole seconds, never negative. The full budget while idle.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            None => Duration::from_secs(self.budget.as_secs()),
            Some(start) => {
                let elapsed = now.saturating_duration_since(start).as_secs();
                Duration::from_secs(self.budget.as_secs().saturating_sub(elapsed))
            }
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.started_at.is_some() && self.remaining(now).is_zero()
    }

    pub fn status(&self, now: Instant) -> SessionStatus {
        match self.started_at {
            None => SessionStatus::Idle,
            Some(_) if self.is_expired(now) => SessionStatus::Expired,
            Some(_) => SessionStatus::Active,
        }
    }

    /// Succeeds only while the session is running.
    pub fn ensure_active(&self, now: Instant) -> Result<()> {
        match self.status(now) {
            SessionStatus::Active => Ok(()),
            SessionStatus::Idle => Err(BurgerError::SessionNotActive),
            SessionStatus::Expired => Err(BurgerError::SessionExpired),
        }
    }

    /// Back to `Idle`, from any state.
    pub fn reset(&mut self) {
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUDGET: Duration = Duration::from_secs(180);

    #[test]
    fn test_idle_session() {
        let session = Session::new(BUDGET);
        let now = Instant::now();
        assert_eq!(session.status(now), SessionStatus::Idle);
        assert_eq!(session.remaining(now), BUDGET);
        assert!(!session.is_expired(now));
        assert_eq!(session.ensure_active(now), Err(BurgerError::SessionNotActive));
    }

    #[test]
    fn test_remaining_floors_elapsed_seconds() {
        let mut session = Session::new(BUDGET);
        let start = Instant::now();
        session.start(start).unwrap();

        assert_eq!(session.remaining(start), BUDGET);
        assert_eq!(session.remaining(start + Duration::from_millis(999)), BUDGET);
        assert_eq!(
            session.remaining(start + Duration::from_millis(1500)),
            Duration::from_secs(179)
        );
    }

    #[test]
    fn test_remaining_decreases_then_clamps() {
        let mut session = Session::new(BUDGET);
        let start = Instant::now();
        session.start(start).unwrap();

        let mut previous = session.remaining(start);
        for secs in 1..=180 {
            let remaining = session.remaining(start + Duration::from_secs(secs));
            assert!(remaining < previous);
            previous = remaining;
        }
        assert!(previous.is_zero());
        assert!(session.remaining(start + Duration::from_secs(10_000)).is_zero());
    }

    #[test]
    fn test_expiry_is_sticky_until_reset() {
        let mut session = Session::new(BUDGET);
        let start = Instant::now();
        session.start(start).unwrap();

        assert_eq!(session.status(start + Duration::from_secs(179)), SessionStatus::Active);
        let end = start + BUDGET;
        assert!(session.is_expired(end));
        assert_eq!(session.status(end), SessionStatus::Expired);
        assert_eq!(session.ensure_active(end), Err(BurgerError::SessionExpired));
        assert!(session.is_expired(end + Duration::from_secs(60)));
        assert_eq!(session.start(end), Err(BurgerError::SessionAlreadyStarted));

        session.reset();
        assert_eq!(session.status(end), SessionStatus::Idle);
        assert!(session.start(end).is_ok());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut session = Session::new(BUDGET);
        let now = Instant::now();
        session.start(now).unwrap();
        assert_eq!(session.start(now), Err(BurgerError::SessionAlreadyStarted));
        assert_eq!(session.started_at(), Some(now));
    }
}
