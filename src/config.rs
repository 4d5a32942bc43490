//! Reconstruction thresholds
//!
//! Every tunable constant of the matching pipeline lives here so that a run is
//! fully described by one value supplied at startup.

use crate::{Result, TagMatchError};

// ============================================================================
// Grouped Parameters
// ============================================================================

/// Calibrated heights of the three tagger layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerHeights {
    /// Height of the upper tagger plane
    pub top: f64,
    /// Height of the middle tagger plane
    pub mid: f64,
    /// Height of the plane below the detector
    pub bottom: f64,
    /// Maximum |y - height| for a hit to belong to a layer
    pub tolerance: f64,
}

impl Default for LayerHeights {
    fn default() -> Self {
        Self {
            top: 618.0,
            mid: 358.0,
            bottom: -361.0,
            tolerance: 0.1,
        }
    }
}

/// Closed interval of allowed peak-time differences between adjacent planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoincidenceWindow {
    /// Smallest accepted difference, in ticks
    pub min: f64,
    /// Largest accepted difference, in ticks
    pub max: f64,
}

impl CoincidenceWindow {
    /// Creates a window accepting differences in `[min, max]`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `diff` lies inside the closed window.
    #[inline]
    pub fn contains(&self, diff: f64) -> bool {
        !(diff < self.min || diff > self.max)
    }
}

impl Default for CoincidenceWindow {
    fn default() -> Self {
        Self::new(3.0, 4.0)
    }
}

/// Vertical range covered by the wire planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalExtent {
    pub lower: f64,
    pub upper: f64,
}

impl VerticalExtent {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Height of the range.
    #[inline]
    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Default for VerticalExtent {
    fn default() -> Self {
        Self::new(-200.0, 200.0)
    }
}

/// Maximum number of hits of each kind taken from one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitCapacity {
    pub tagger_hits: usize,
    pub wire_hits: usize,
}

impl Default for HitCapacity {
    fn default() -> Self {
        Self {
            tagger_hits: 1_000,
            wire_hits: 50_000,
        }
    }
}

// ============================================================================
// Reconstruction Config
// ============================================================================

/// Full configuration of the reconstruction-and-matching pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionConfig {
    /// Tagger layer calibration
    pub heights: LayerHeights,
    /// Maximum distance between a projected top-mid line and a bottom hit
    pub completion_distance: f64,
    /// Number of equal-width bins in each height index
    pub height_bins: usize,
    /// Vertical range of the wire planes
    pub extent: VerticalExtent,
    /// Vertical distance between samples along a candidate track
    pub sampling_step: f64,
    /// Maximum (y, z) distance for a space point to support a sample
    pub match_distance: f64,
    /// Peak-time coincidence window between adjacent planes
    pub coincidence: CoincidenceWindow,
    /// Scores at or below this value are never accepted
    pub score_epsilon: f64,
    /// Per-event hit limits
    pub capacity: HitCapacity,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            heights: LayerHeights::default(),
            completion_distance: 600.0,
            height_bins: 40,
            extent: VerticalExtent::default(),
            sampling_step: 5.0,
            match_distance: 5.0,
            coincidence: CoincidenceWindow::default(),
            score_epsilon: 1e-6,
            capacity: HitCapacity::default(),
        }
    }
}

impl ReconstructionConfig {
    /// Replaces the tagger layer calibration.
    pub fn with_heights(mut self, heights: LayerHeights) -> Self {
        self.heights = heights;
        self
    }

    /// Replaces the number of height bins.
    pub fn with_height_bins(mut self, bins: usize) -> Self {
        self.height_bins = bins;
        self
    }

    /// Replaces the vertical extent.
    pub fn with_extent(mut self, extent: VerticalExtent) -> Self {
        self.extent = extent;
        self
    }

    /// Replaces the coincidence window.
    pub fn with_coincidence(mut self, window: CoincidenceWindow) -> Self {
        self.coincidence = window;
        self
    }

    /// Replaces the per-event hit limits.
    pub fn with_capacity(mut self, capacity: HitCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Replaces the sampling step and match distance.
    pub fn with_sampling(mut self, step: f64, match_distance: f64) -> Self {
        self.sampling_step = step;
        self.match_distance = match_distance;
        self
    }

    /// Width of one height bin.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        self.extent.span() / self.height_bins as f64
    }

    /// Checks that every threshold is usable.
    ///
    /// A non-positive sampling step would never leave the detector, so it is
    /// rejected here rather than at scoring time.
    pub fn validate(&self) -> Result<()> {
        if !(self.heights.tolerance > 0.0) {
            return Err(TagMatchError::InvalidConfig("layer tolerance must be positive"));
        }
        if !(self.completion_distance > 0.0) {
            return Err(TagMatchError::InvalidConfig("completion distance must be positive"));
        }
        if self.height_bins == 0 {
            return Err(TagMatchError::InvalidConfig("height index needs at least one bin"));
        }
        if !(self.extent.upper > self.extent.lower) {
            return Err(TagMatchError::InvalidConfig("vertical extent is empty"));
        }
        if !(self.sampling_step > 0.0) {
            return Err(TagMatchError::InvalidConfig("sampling step must be positive"));
        }
        if !(self.match_distance > 0.0) {
            return Err(TagMatchError::InvalidConfig("match distance must be positive"));
        }
        if !(self.coincidence.max >= self.coincidence.min) {
            return Err(TagMatchError::InvalidConfig("coincidence window is inverted"));
        }
        if !(self.score_epsilon >= 0.0) {
            return Err(TagMatchError::InvalidConfig("score epsilon must not be negative"));
        }
        if self.capacity.tagger_hits == 0 || self.capacity.wire_hits == 0 {
            return Err(TagMatchError::InvalidConfig("hit capacities must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReconstructionConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.bin_width() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_is_closed() {
        let window = CoincidenceWindow::default();
        assert!(window.contains(3.0));
        assert!(window.contains(4.0));
        assert!(window.contains(3.5));
        assert!(!window.contains(2.9));
        assert!(!window.contains(4.1));
    }

    #[test]
    fn test_rejects_zero_bins() {
        let config = ReconstructionConfig::default().with_height_bins(0);
        assert_eq!(
            config.validate(),
            Err(TagMatchError::InvalidConfig("height index needs at least one bin"))
        );
    }

    #[test]
    fn test_rejects_degenerate_sampling() {
        let config = ReconstructionConfig::default().with_sampling(0.0, 5.0);
        assert!(config.validate().is_err());

        let config = ReconstructionConfig::default().with_sampling(f64::NAN, 5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let config = ReconstructionConfig::default().with_extent(VerticalExtent::new(10.0, -10.0));
        assert!(config.validate().is_err());

        let config =
            ReconstructionConfig::default().with_coincidence(CoincidenceWindow::new(4.0, 3.0));
        assert!(config.validate().is_err());
    }
}
