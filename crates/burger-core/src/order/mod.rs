//! Order domain module.
//!
//! # Module Structure
//!
//! - `model`: the active order and its progress (`Order`)
//! - `ledger`: unlock policy (`UnlockLedger`, `remaining_to_unlock`)
//! - `assembly`: stack operations on `Order`
//! - `validator`: submission rules and satisfaction (`validate`)

mod assembly;
mod ledger;
mod model;
mod validator;

pub use ledger::{UnlockLedger, UnlockOutcome, remaining_to_unlock};
pub use model::Order;
pub use validator::{RejectionReason, ValidationOutcome, validate};
