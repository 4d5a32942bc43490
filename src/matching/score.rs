//! Track scoring against reconstructed space points
//!
//! A candidate is walked downward from its topmost endpoint in fixed height
//! steps. Every space point near each sample's height, in the half matching
//! the sample's x, is examined; it supports the track when its (y, z) distance
//! to the sample is below the match distance. The score is the supported
//! fraction of examined points.

use alloc::vec::Vec;

use crate::config::{ReconstructionConfig, VerticalExtent};
use crate::types::track::CandidateTrack;
use crate::types::Position;
use crate::wireplane::DetectorIndex;

/// Support counts of one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackScore {
    /// Examined points within the match distance
    pub matched: usize,
    /// Examined points
    pub examined: usize,
}

impl TrackScore {
    /// Supported fraction in [0, 1]; 0 when nothing was examined.
    pub fn fraction(&self) -> f64 {
        if self.examined == 0 {
            0.0
        } else {
            self.matched as f64 / self.examined as f64
        }
    }
}

/// Scores candidate tracks against a [`DetectorIndex`].
#[derive(Debug, Clone)]
pub struct TrackScorer {
    step: f64,
    match_distance: f64,
    extent: VerticalExtent,
}

impl TrackScorer {
    /// Creates a scorer.
    ///
    /// # Panics
    /// Panics if `step` is not positive, since the walk would never end.
    pub fn new(step: f64, match_distance: f64, extent: VerticalExtent) -> Self {
        assert!(step > 0.0, "sampling step must be positive");
        Self {
            step,
            match_distance,
            extent,
        }
    }

    pub fn from_config(config: &ReconstructionConfig) -> Self {
        Self::new(config.sampling_step, config.match_distance, config.extent)
    }

    /// Heights visited along `track`, from its topmost endpoint down.
    ///
    /// Samples above the extent are skipped; the walk ends once a sample is
    /// at or below the lower bound.
    pub fn samples<'t>(&self, track: &'t CandidateTrack) -> impl Iterator<Item = Position> + 't {
        let step = Position::new(track.slope_x() * self.step, self.step, track.slope_z() * self.step);
        let (lower, upper) = (self.extent.lower, self.extent.upper);
        core::iter::successors(Some(track.topmost()), move |pt| Some(pt - step))
            .take_while(move |pt| pt.y > lower)
            .filter(move |pt| !(pt.y > upper))
    }

    /// Counts supporting and examined points for one track.
    pub fn score(&self, track: &CandidateTrack, index: &DetectorIndex) -> TrackScore {
        let mut score = TrackScore::default();
        for sample in self.samples(track) {
            let lookup = index.for_x(sample.x).at(sample.y);
            for point in lookup.iter() {
                score.examined += 1;
                let mut projected = sample;
                projected.x = point.position.x;
                if (projected - point.position).norm() < self.match_distance {
                    score.matched += 1;
                }
            }
        }
        score
    }

    /// Scores every track, indexed like `tracks`.
    pub fn score_all(&self, tracks: &[CandidateTrack], index: &DetectorIndex) -> Vec<f64> {
        tracks
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let score = self.score(track, index);
                tracing::trace!(
                    track = i,
                    matched = score.matched,
                    examined = score.examined,
                    "scored candidate"
                );
                score.fraction()
            })
            .collect()
    }
}
