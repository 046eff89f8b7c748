use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scoreboard::Scoreboard;
use super::snapshot::{GameSnapshot, SessionSummary};
use crate::config::GameConfig;
use crate::error::{BurgerError, Result};
use crate::oracle::{DrawingArtifact, QualityJudgment, QualityOracle, QualityOracleAdapter};
use crate::order::{Order, UnlockLedger, UnlockOutcome, ValidationOutcome, remaining_to_unlock, validate};
use crate::recipe::RecipeCatalog;
use crate::session::{Clock, Session, SessionStatus, SystemClock};

/// Result of a drawing submission: the judgment and what it unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingResult {
    pub judgment: QualityJudgment,
    pub unlock: UnlockOutcome,
}

/// The state of one player's game.
///
/// `GameState` owns the session, the scoreboard and the active order, and exposes
/// one method per player command. Every command checks the session first: before
/// `start_session` and after the time budget runs out, commands return a
/// [`BurgerError`] rejection and leave the state untouched. Only
/// [`reset_session`](Self::reset_session) works in every state.
///
/// Instances are fully independent; run one per player.
pub struct GameState {
    id: Uuid,
    catalog: Arc<RecipeCatalog>,
    oracle: QualityOracleAdapter,
    ledger: UnlockLedger,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    session: Session,
    started_wall: Option<DateTime<Utc>>,
    scoreboard: Scoreboard,
    order: Option<Order>,
}

impl GameState {
    /// Creates an idle game using the system clock and an entropy-seeded RNG.
    pub fn new(
        config: &GameConfig,
        catalog: Arc<RecipeCatalog>,
        oracle: Arc<dyn QualityOracle>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            oracle: QualityOracleAdapter::new(oracle, &config.oracle),
            ledger: UnlockLedger::new(config.unlock_threshold),
            clock: Arc::new(SystemClock),
            rng: StdRng::from_entropy(),
            session: Session::new(config.session_duration()),
            started_wall: None,
            scoreboard: Scoreboard::default(),
            order: None,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Makes order dealing reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ============================================================================
    // Commands
    // ============================================================================

    /// Starts the countdown and deals the first order. Only valid while idle.
    pub fn start_session(&mut self) -> Result<&Order> {
        self.session.start(self.clock.now())?;
        self.started_wall = Some(Utc::now());
        tracing::info!(session_id = %self.id, "Session started");
        Ok(self.deal_order())
    }

    /// Sends a drawing of `component` to the judge and applies the unlock rule.
    ///
    /// The component must still be waiting to be unlocked. The judgment is computed
    /// in full before the order is touched; if the session ran out while the judge
    /// was working, the judgment is discarded and `SessionExpired` is returned.
    pub async fn submit_drawing(
        &mut self,
        component: &str,
        drawing: &DrawingArtifact,
    ) -> Result<DrawingResult> {
        let order = self.active_order()?;
        if !remaining_to_unlock(order).iter().any(|c| c == component) {
            return Err(BurgerError::component_not_required(component));
        }
        if drawing.is_empty() {
            return Err(BurgerError::EmptyDrawing);
        }

        let description = self.catalog.describe(component).to_string();
        let judgment = self.oracle.judge(&description, drawing).await;

        let ledger = self.ledger;
        let order = self.active_order_mut()?;
        let unlock = ledger.attempt_unlock(order, component, &judgment);
        tracing::info!(
            session_id = %self.id,
            component,
            score = judgment.score,
            source = %judgment.source,
            granted = unlock.is_granted(),
            "Drawing judged"
        );

        Ok(DrawingResult { judgment, unlock })
    }

    /// Places an unlocked component on the stack.
    pub fn push_component(&mut self, component: &str) -> Result<()> {
        self.active_order_mut()?.push_component(component)
    }

    /// Serves the current stack to the customer.
    ///
    /// Accepted orders add their satisfaction to the scoreboard. Whatever the
    /// outcome, the next order is dealt and the current progress is dropped.
    pub fn submit_assembly(&mut self) -> Result<ValidationOutcome> {
        let order = self.active_order()?;
        let outcome = validate(order);
        let served = order.name().to_string();

        match outcome {
            ValidationOutcome::Accepted { satisfaction } => {
                self.scoreboard.record(satisfaction);
                tracing::info!(
                    session_id = %self.id,
                    order = %served,
                    satisfaction,
                    total = self.scoreboard.cumulative_satisfaction,
                    "Order accepted"
                );
            }
            ValidationOutcome::Rejected { reason } => {
                tracing::info!(
                    session_id = %self.id,
                    order = %served,
                    reason = %reason,
                    "Order rejected"
                );
            }
        }

        self.deal_order();
        Ok(outcome)
    }

    /// Returns to idle from any state, dropping the order and zeroing the scoreboard.
    pub fn reset_session(&mut self) {
        self.session.reset();
        self.started_wall = None;
        self.order = None;
        self.scoreboard.reset();
        tracing::info!(session_id = %self.id, "Session reset");
    }

    // ============================================================================
    // Read accessors
    // ============================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn session_status(&self) -> SessionStatus {
        self.session.status(self.clock.now())
    }

    pub fn is_expired(&self) -> bool {
        self.session.is_expired(self.clock.now())
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.session.remaining(self.clock.now()).as_secs()
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn order_name(&self) -> Option<&str> {
        self.order.as_ref().map(Order::name)
    }

    pub fn remaining_to_unlock(&self) -> Vec<String> {
        self.order.as_ref().map(remaining_to_unlock).unwrap_or_default()
    }

    pub fn unlocked_components(&self) -> &[String] {
        self.order.as_ref().map(Order::unlocked).unwrap_or(&[])
    }

    pub fn assembly(&self) -> &[String] {
        self.order.as_ref().map(Order::assembly).unwrap_or(&[])
    }

    pub fn last_judgment_score(&self) -> Option<u8> {
        self.order.as_ref().and_then(Order::last_quality_score)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            customers_served: self.scoreboard.customers_served,
            cumulative_satisfaction: self.scoreboard.cumulative_satisfaction,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let now = self.clock.now();
        GameSnapshot {
            session_id: self.id,
            session_status: self.session.status(now),
            started_at: self.started_wall,
            order_name: self.order_name().map(str::to_string),
            remaining_seconds: self.session.remaining(now).as_secs(),
            remaining_to_unlock: self.remaining_to_unlock(),
            unlocked_components: self.unlocked_components().to_vec(),
            assembly_contents: self.assembly().to_vec(),
            last_judgment_score: self.last_judgment_score(),
            cumulative_satisfaction: self.scoreboard.cumulative_satisfaction,
            customers_served: self.scoreboard.customers_served,
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn active_order(&self) -> Result<&Order> {
        self.session.ensure_active(self.clock.now())?;
        self.order.as_ref().ok_or(BurgerError::SessionNotActive)
    }

    fn active_order_mut(&mut self) -> Result<&mut Order> {
        self.session.ensure_active(self.clock.now())?;
        self.order.as_mut().ok_or(BurgerError::SessionNotActive)
    }

    fn deal_order(&mut self) -> &Order {
        let recipe = self.catalog.random_recipe(&mut self.rng).clone();
        tracing::debug!(session_id = %self.id, order = %recipe.name, "Order dealt");
        self.order.insert(Order::new(recipe))
    }
}
