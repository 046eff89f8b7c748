//! Read models handed to drivers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::SessionStatus;

/// Everything a driver needs to render the game at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub session_id: Uuid,
    pub session_status: SessionStatus,
    /// Wall-clock time the session was started
    pub started_at: Option<DateTime<Utc>>,
    pub order_name: Option<String>,
    pub remaining_seconds: u64,
    /// Components still to be drawn, in recipe order
    pub remaining_to_unlock: Vec<String>,
    pub unlocked_components: Vec<String>,
    pub assembly_contents: Vec<String>,
    pub last_judgment_score: Option<u8>,
    pub cumulative_satisfaction: u32,
    pub customers_served: u32,
}

/// Final tally shown when time runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub customers_served: u32,
    pub cumulative_satisfaction: u32,
}

impl SessionSummary {
    pub fn average_satisfaction(&self) -> Option<f64> {
        if self.customers_served == 0 {
            return None;
        }
        Some(f64::from(self.cumulative_satisfaction) / f64::from(self.customers_served))
    }
}
