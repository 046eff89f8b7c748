//! Order validation and satisfaction scoring.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::Order;
use crate::recipe::BOUNDARY_MARKER;

/// Why a submitted assembly was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectionReason {
    TooFewComponents,
    BoundaryMismatch,
    IngredientMismatch,
}

impl RejectionReason {
    /// Message shown to the player.
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooFewComponents => "A burger needs at least two components!",
            Self::BoundaryMismatch => "A burger must always start and end with a bun!",
            Self::IngredientMismatch => "The burger does not contain everything the customer ordered!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted { satisfaction: u32 },
    Rejected { reason: RejectionReason },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn satisfaction(&self) -> Option<u32> {
        match self {
            Self::Accepted { satisfaction } => Some(*satisfaction),
            Self::Rejected { .. } => None,
        }
    }
}

/// Checks the order's assembly against its recipe. Rules apply in order and the
/// first failure wins:
///
/// 1. at least two components,
/// 2. a bun at the bottom and at the top,
/// 3. every interior component of the recipe present at least once between the buns.
///    Extra or repeated components are tolerated.
///
/// An accepted order earns `last score * 2 + stack height * 2`; no judgment yet counts
/// as a score of zero.
pub fn validate(order: &Order) -> ValidationOutcome {
    let assembly = order.assembly();

    if assembly.len() < 2 {
        return ValidationOutcome::Rejected {
            reason: RejectionReason::TooFewComponents,
        };
    }

    let (first, last) = (&assembly[0], &assembly[assembly.len() - 1]);
    if first != BOUNDARY_MARKER || last != BOUNDARY_MARKER {
        return ValidationOutcome::Rejected {
            reason: RejectionReason::BoundaryMismatch,
        };
    }

    let interior = &assembly[1..assembly.len() - 1];
    let complete = order
        .recipe()
        .interior()
        .iter()
        .all(|required| interior.contains(required));
    if !complete {
        return ValidationOutcome::Rejected {
            reason: RejectionReason::IngredientMismatch,
        };
    }

    let score = u32::from(order.last_quality_score().unwrap_or(0));
    ValidationOutcome::Accepted {
        satisfaction: score * 2 + assembly.len() as u32 * 2,
    }
}
