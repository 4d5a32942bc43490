//! Space points rebuilt from wire coincidences

use super::hits::DetectorHalf;
use super::Position;

/// Index of a point within its half's point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

/// An inferred ionization location in one detector half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructedPoint {
    pub position: Position,
    pub half: DetectorHalf,
}

impl ReconstructedPoint {
    #[inline]
    pub fn new(position: Position, half: DetectorHalf) -> Self {
        Self { position, half }
    }
}
