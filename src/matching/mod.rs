//! Candidate scoring and final match selection

mod dedup;
mod score;

pub use dedup::*;
pub use score::*;
