//! Tagger-side reconstruction
//!
//! Layer classification of tagger hits and candidate track building.

mod candidates;
mod classify;

pub use candidates::*;
pub use classify::*;
