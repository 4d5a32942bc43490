//! Height-binned lookup of space points
//!
//! The vertical extent is cut into equal-width bins. A lookup at height `y`
//! returns the bin holding `y` plus the neighbouring bin on the side of the
//! nearer boundary, so every point within half a bin width of `y` is seen.

use alloc::vec::Vec;
use num_traits::Float;

use crate::config::VerticalExtent;
use crate::types::hits::DetectorHalf;
use crate::types::points::{PointId, ReconstructedPoint};

// ============================================================================
// Height Bin View
// ============================================================================

/// Read-only view of one bin's points.
#[derive(Debug, Clone, Copy)]
pub struct HeightBin<'a> {
    points: &'a [ReconstructedPoint],
    members: &'a [PointId],
}

impl<'a> HeightBin<'a> {
    /// Number of points in the bin.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Ids of the points in the bin, in insertion order.
    #[inline]
    pub fn ids(&self) -> &'a [PointId] {
        self.members
    }

    /// Iterates over the points in the bin.
    pub fn iter(&self) -> impl Iterator<Item = &'a ReconstructedPoint> + 'a {
        let (points, members) = (self.points, self.members);
        members.iter().map(move |id| &points[id.0])
    }
}

/// Result of a height lookup.
#[derive(Debug, Clone, Copy)]
pub struct HeightLookup<'a> {
    /// Bin containing the queried height
    pub exact: HeightBin<'a>,
    /// Neighbour across the nearer bin boundary, if it exists
    pub near: Option<HeightBin<'a>>,
}

impl<'a> HeightLookup<'a> {
    /// Iterates over the exact bin, then the neighbour.
    pub fn iter(&self) -> impl Iterator<Item = &'a ReconstructedPoint> + 'a {
        self.exact.iter().chain(self.near.into_iter().flat_map(|bin| bin.iter()))
    }
}

// ============================================================================
// Height Index
// ============================================================================

/// Space points of one detector half binned by height.
///
/// Points outside the extent are kept in the first or last bin.
#[derive(Debug, Clone)]
pub struct HeightIndex {
    half: DetectorHalf,
    points: Vec<ReconstructedPoint>,
    bins: Vec<Vec<PointId>>,
    lower: f64,
    bin_width: f64,
}

impl HeightIndex {
    /// Bins `points` into `num_bins` slices of `extent`.
    ///
    /// # Panics
    /// Panics if `num_bins` is zero.
    pub fn new(
        half: DetectorHalf,
        points: Vec<ReconstructedPoint>,
        extent: VerticalExtent,
        num_bins: usize,
    ) -> Self {
        assert!(num_bins > 0, "height index needs at least one bin");
        let mut index = Self {
            half,
            points,
            bins: (0..num_bins).map(|_| Vec::new()).collect(),
            lower: extent.lower,
            bin_width: extent.span() / num_bins as f64,
        };
        for (i, point) in index.points.iter().enumerate() {
            let (bin, _) = index.locate(point.position.y);
            index.bins[bin].push(PointId(i));
        }
        index
    }

    /// Bin holding `y` and the offset of `y` inside it, in bin widths.
    fn locate(&self, y: f64) -> (usize, f64) {
        let scaled = (y - self.lower) / self.bin_width;
        let last = self.bins.len() - 1;
        if !(scaled > 0.0) {
            return (0, scaled);
        }
        let bin = (Float::floor(scaled) as usize).min(last);
        (bin, scaled - bin as f64)
    }

    /// Points near height `y`.
    pub fn at(&self, y: f64) -> HeightLookup<'_> {
        let (bin, offset) = self.locate(y);
        let neighbour = if offset < 0.5 {
            bin.checked_sub(1)
        } else if bin + 1 < self.bins.len() {
            Some(bin + 1)
        } else {
            None
        };

        HeightLookup {
            exact: self.bin(bin),
            near: neighbour.map(|b| self.bin(b)),
        }
    }

    fn bin(&self, bin: usize) -> HeightBin<'_> {
        HeightBin {
            points: &self.points,
            members: &self.bins[bin],
        }
    }

    /// Detector half the points belong to.
    pub fn half(&self) -> DetectorHalf {
        self.half
    }

    /// All indexed points, indexable by [`PointId`].
    pub fn points(&self) -> &[ReconstructedPoint] {
        &self.points
    }

    pub fn point(&self, id: PointId) -> Option<&ReconstructedPoint> {
        self.points.get(id.0)
    }

    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The two per-half height indices of one event.
#[derive(Debug, Clone)]
pub struct DetectorIndex {
    halves: [HeightIndex; 2],
}

impl DetectorIndex {
    /// Pairs a negative-half and a positive-half index.
    ///
    /// # Panics
    /// Panics if the indices are not for the negative and positive half respectively.
    pub fn new(negative: HeightIndex, positive: HeightIndex) -> Self {
        assert_eq!(negative.half(), DetectorHalf::Negative);
        assert_eq!(positive.half(), DetectorHalf::Positive);
        Self {
            halves: [negative, positive],
        }
    }

    /// Index for one detector half.
    #[inline]
    pub fn half(&self, half: DetectorHalf) -> &HeightIndex {
        &self.halves[half.id()]
    }

    /// Index for the half containing x.
    #[inline]
    pub fn for_x(&self, x: f64) -> &HeightIndex {
        self.half(DetectorHalf::of_x(x))
    }

    /// Total number of points over both halves.
    pub fn len(&self) -> usize {
        self.halves.iter().map(HeightIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all points, negative half first.
    pub fn points(&self) -> impl Iterator<Item = &ReconstructedPoint> {
        self.halves.iter().flat_map(|index| index.points().iter())
    }
}
