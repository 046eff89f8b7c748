//! Recipe catalog: the menu orders are dealt from.

mod catalog;
mod model;

pub use catalog::RecipeCatalog;
pub use model::{BOUNDARY_MARKER, Recipe};
