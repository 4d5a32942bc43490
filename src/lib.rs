//! tagmatch: cosmic-ray tagger to wire-plane track matching
//!
//! Reconstructs straight cosmic tracks through a two-half wire-plane detector by
//! pairing tagger-layer hits into candidate lines and scoring each line against
//! space points rebuilt from triple-plane wire coincidences.
//!
//! # Pipeline
//!
//! - [`tagger::HitClassifier`]: splits tagger hits into top/mid/bottom layers
//! - [`tagger::CandidateTrackBuilder`]: builds 2- and 3-endpoint candidate lines
//! - [`wireplane::WirePlaneIntersector`]: rebuilds space points per detector half
//! - [`wireplane::HeightIndex`]: height-binned lookup over those points
//! - [`matching::TrackScorer`]: support fraction of each candidate
//! - [`matching::TrackDeduplicator`]: resolves candidates sharing endpoints
//!
//! [`pipeline::EventProcessor`] wires the stages together for one event.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod matching;
pub mod pipeline;
pub mod tagger;
pub mod types;
pub mod wireplane;

pub mod prelude {
    pub use crate::config::*;
    pub use crate::matching::*;
    pub use crate::pipeline::*;
    pub use crate::tagger::*;
    pub use crate::types::geometry::*;
    pub use crate::types::hits::*;
    pub use crate::types::points::*;
    pub use crate::types::track::*;
    pub use crate::wireplane::*;
}

/// Error types for the library
#[derive(Debug, Clone, PartialEq)]
pub enum TagMatchError {
    /// A configuration value is out of its valid range
    InvalidConfig(&'static str),
    /// A wire geometry line could not be parsed (1-based line number)
    MalformedGeometry { line: usize },
    /// The wire geometry table holds no wires
    EmptyGeometry,
}

#[cfg(feature = "std")]
impl std::error::Error for TagMatchError {}

impl ::core::fmt::Display for TagMatchError {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            TagMatchError::InvalidConfig(reason) => write!(f, "Invalid configuration: {}", reason),
            TagMatchError::MalformedGeometry { line } => {
                write!(f, "Malformed wire geometry at line {}", line)
            }
            TagMatchError::EmptyGeometry => write!(f, "Wire geometry table is empty"),
        }
    }
}

pub type Result<T> = ::core::result::Result<T, TagMatchError>;
