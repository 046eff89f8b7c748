use serde::{Deserialize, Serialize};

/// Running totals for a session. Survives every order; only a reset clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub cumulative_satisfaction: u32,
    pub customers_served: u32,
}

impl Scoreboard {
    /// Credits one served customer.
    pub fn record(&mut self, satisfaction: u32) {
        self.cumulative_satisfaction = self.cumulative_satisfaction.saturating_add(satisfaction);
        self.customers_served = self.customers_served.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let mut board = Scoreboard::default();
        board.record(26);
        board.record(16);
        assert_eq!(board.cumulative_satisfaction, 42);
        assert_eq!(board.customers_served, 2);

        board.reset();
        assert_eq!(board, Scoreboard::default());
    }
}
