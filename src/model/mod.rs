//! Style model shared by template analysis and generation.
//!
//! Template scanning produces an ordered list of [`LineAnalysis`] observations
//! which is folded once into a [`StyleRegistry`]. Generation only reads the
//! registry.

mod analysis;
mod page;
mod role;
mod style;

pub use analysis::*;
pub use page::*;
pub use role::*;
pub use style::*;
