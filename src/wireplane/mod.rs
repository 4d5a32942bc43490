//! Wire-plane reconstruction
//!
//! Space points from triple-plane coincidences and their height index.

mod index;
mod intersect;

pub use index::*;
pub use intersect::*;
