//! Candidate track building
//!
//! Every top-mid pair seeds a line. When the event has bottom hits, each seed
//! is extrapolated to every bottom hit and replaced by the completions that
//! land close enough on the same side; seeds with no completion are dropped.
//! Top-bottom and mid-bottom pairs are always added as fallbacks, except where
//! a completion already covers the same bottom hit together with the same top
//! or mid hit.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use super::classify::ClassifiedHits;
use crate::types::track::{CandidateTrack, EndpointKey};
use crate::types::Position;

/// Builds candidate tracks from classified tagger hits.
#[derive(Debug, Clone)]
pub struct CandidateTrackBuilder {
    /// Maximum distance between an extrapolated seed and a bottom hit
    completion_distance: f64,
}

impl CandidateTrackBuilder {
    pub fn new(completion_distance: f64) -> Self {
        Self { completion_distance }
    }

    /// Builds the candidate list in generation order.
    ///
    /// Order: completions (seed-major, bottom-minor) or, without bottom hits,
    /// the bare seeds; then for each bottom hit its top-bottom pairs followed
    /// by its mid-bottom pairs, minus the redundant ones.
    pub fn build(&self, hits: &ClassifiedHits) -> Vec<CandidateTrack> {
        let pending = seeds(hits);

        let mut tracks = if hits.bottom.is_empty() {
            pending
        } else {
            self.complete(pending, hits)
        };
        let completed = tracks.len();

        let covered = CoveredPairs::from_completions(&tracks[..completed]);
        let mut redundant = 0usize;
        for bottom in &hits.bottom {
            let fallbacks = hits
                .top
                .iter()
                .map(|top| CandidateTrack::top_bottom(top.position, bottom.position))
                .chain(
                    hits.mid
                        .iter()
                        .map(|mid| CandidateTrack::mid_bottom(mid.position, bottom.position)),
                );
            for pair in fallbacks {
                if covered.subsumes(&pair) {
                    redundant += 1;
                } else {
                    tracks.push(pair);
                }
            }
        }

        tracing::debug!(
            completed,
            fallbacks = tracks.len() - completed,
            redundant,
            "built candidate tracks"
        );
        tracks
    }

    /// Replaces each seed by its accepted bottom completions.
    fn complete(&self, pending: Vec<CandidateTrack>, hits: &ClassifiedHits) -> Vec<CandidateTrack> {
        let mut completions = Vec::with_capacity(pending.len());
        for seed in pending {
            for bottom in &hits.bottom {
                let target = bottom.position;
                let projected = seed.project_y(target.y);
                if let Some(end) = self.accept_completion(&projected, &target) {
                    completions.push(seed.completed_with(end));
                }
            }
        }
        completions
    }

    /// Checks a projected seed against a bottom hit.
    ///
    /// Returns the bottom endpoint (projected x, hit y and z) when the
    /// projection is on the hit's side of the detector and within range.
    fn accept_completion(&self, projected: &Position, target: &Position) -> Option<Position> {
        let same_side = projected.x.is_sign_negative() == target.x.is_sign_negative();
        let distance = (target - projected).norm();
        if same_side && distance < self.completion_distance {
            Some(Position::new(projected.x, target.y, target.z))
        } else {
            None
        }
    }
}

fn seeds(hits: &ClassifiedHits) -> Vec<CandidateTrack> {
    let mut seeds = Vec::with_capacity(hits.top.len() * hits.mid.len());
    for top in &hits.top {
        for mid in &hits.mid {
            seeds.push(CandidateTrack::top_mid(top.position, mid.position));
        }
    }
    seeds
}

/// (bottom, upper) endpoint pairs already joined by a completed track.
struct CoveredPairs {
    pairs: BTreeSet<(EndpointKey, EndpointKey)>,
}

impl CoveredPairs {
    fn from_completions(tracks: &[CandidateTrack]) -> Self {
        let mut pairs = BTreeSet::new();
        for track in tracks.iter().filter(|t| t.is_complete()) {
            if let Some(bottom) = track.bottom {
                for upper in [track.top, track.mid].into_iter().flatten() {
                    pairs.insert((bottom.key, upper.key));
                }
            }
        }
        Self { pairs }
    }

    fn subsumes(&self, pair: &CandidateTrack) -> bool {
        let Some(bottom) = pair.bottom else {
            return false;
        };
        [pair.top, pair.mid]
            .into_iter()
            .flatten()
            .any(|upper| self.pairs.contains(&(bottom.key, upper.key)))
    }
}
