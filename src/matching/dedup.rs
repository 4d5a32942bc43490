//! Conflict resolution between scored candidates
//!
//! Candidates sharing an endpoint compete. A track is accepted when its score
//! clears the epsilon and no sibling scores higher. Ties are settled by a
//! single set of already-accepted score values: a tied track is rejected once
//! any earlier accepted track carried the same score, whether or not that
//! track is related to it. Tracks are visited in generation order, which
//! therefore decides every tie.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::types::track::{CandidateTrack, EndpointKey, TrackId};

/// Tracks grouped by shared endpoint.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    by_endpoint: BTreeMap<EndpointKey, Vec<TrackId>>,
}

impl EndpointTable {
    /// Indexes every endpoint of every track.
    pub fn build(tracks: &[CandidateTrack]) -> Self {
        let mut by_endpoint: BTreeMap<EndpointKey, Vec<TrackId>> = BTreeMap::new();
        for (i, track) in tracks.iter().enumerate() {
            for key in track.endpoint_keys() {
                by_endpoint.entry(key).or_default().push(TrackId(i));
            }
        }
        Self { by_endpoint }
    }

    /// Tracks that contain the endpoint.
    pub fn tracks_at(&self, key: &EndpointKey) -> &[TrackId] {
        self.by_endpoint.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct endpoints.
    pub fn len(&self) -> usize {
        self.by_endpoint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_endpoint.is_empty()
    }
}

/// Score values of already-accepted tracks.
#[derive(Debug, Clone, Default)]
pub struct UsedScores {
    bits: BTreeSet<u64>,
}

impl UsedScores {
    pub fn contains(&self, score: f64) -> bool {
        self.bits.contains(&score.to_bits())
    }

    pub fn insert(&mut self, score: f64) {
        self.bits.insert(score.to_bits());
    }
}

/// Selects the final matches among scored candidates.
#[derive(Debug, Clone)]
pub struct TrackDeduplicator {
    epsilon: f64,
}

impl TrackDeduplicator {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Accepted tracks in generation order.
    ///
    /// # Panics
    /// Panics if `scores` is shorter than `tracks`.
    pub fn select(&self, tracks: &[CandidateTrack], scores: &[f64]) -> Vec<TrackId> {
        assert!(scores.len() >= tracks.len(), "every track needs a score");
        let table = EndpointTable::build(tracks);
        let mut used = UsedScores::default();
        let mut accepted = Vec::new();

        for (i, track) in tracks.iter().enumerate() {
            let id = TrackId(i);
            if self.is_best(id, track, scores, &table, &used) {
                used.insert(scores[i]);
                accepted.push(id);
            }
        }

        tracing::debug!(
            candidates = tracks.len(),
            accepted = accepted.len(),
            "resolved candidate conflicts"
        );
        accepted
    }

    fn is_best(
        &self,
        id: TrackId,
        track: &CandidateTrack,
        scores: &[f64],
        table: &EndpointTable,
        used: &UsedScores,
    ) -> bool {
        let score = scores[id.0];
        if !(score > self.epsilon) {
            return false;
        }

        track
            .endpoint_keys()
            .flat_map(|key| table.tracks_at(&key).iter())
            .filter(|&&sibling| sibling != id)
            .all(|sibling| {
                let other = scores[sibling.0];
                if score < other {
                    false
                } else if score == other {
                    !used.contains(score)
                } else {
                    true
                }
            })
    }
}
