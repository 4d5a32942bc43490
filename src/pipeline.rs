//! Per-event reconstruction pipeline
//!
//! Runs classification, candidate building, wire intersection, height
//! indexing, scoring and deduplication for one event, and aggregates the
//! per-event counters used for reporting.
//!
//! Events are independent apart from the read-only [`WireTable`]; with the
//! `std` feature a window of events is processed on the rayon pool and the
//! results come back in input order.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::config::{HitCapacity, ReconstructionConfig};
use crate::matching::{TrackDeduplicator, TrackScorer};
use crate::tagger::{CandidateTrackBuilder, HitClassifier};
use crate::types::geometry::WireTable;
use crate::types::hits::{DetectorHalf, TaggerHit, WireHit};
use crate::types::points::ReconstructedPoint;
use crate::types::track::{CandidateTrack, TrackId};
use crate::wireplane::{DetectorIndex, HeightIndex, WirePlaneIntersector};
use crate::Result;

// ============================================================================
// Event Input
// ============================================================================

/// All hits of one event.
#[derive(Debug, Clone, Default)]
pub struct EventHits {
    pub tagger_hits: Vec<TaggerHit>,
    pub wire_hits: Vec<WireHit>,
}

/// Number of hits dropped from an oversized event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Truncation {
    pub tagger_hits: usize,
    pub wire_hits: usize,
}

impl Truncation {
    /// Returns true if nothing was dropped.
    pub fn is_empty(&self) -> bool {
        self.tagger_hits == 0 && self.wire_hits == 0
    }
}

impl EventHits {
    pub fn new(tagger_hits: Vec<TaggerHit>, wire_hits: Vec<WireHit>) -> Self {
        Self {
            tagger_hits,
            wire_hits,
        }
    }

    /// Cuts each hit list down to its capacity, keeping the first hits.
    pub fn enforce_capacity(&mut self, capacity: &HitCapacity) -> Truncation {
        let truncation = Truncation {
            tagger_hits: self.tagger_hits.len().saturating_sub(capacity.tagger_hits),
            wire_hits: self.wire_hits.len().saturating_sub(capacity.wire_hits),
        };
        self.tagger_hits.truncate(capacity.tagger_hits);
        self.wire_hits.truncate(capacity.wire_hits);
        truncation
    }
}

/// Supplier of per-event hit batches.
pub trait HitSource {
    /// Next event, or `None` when the source is exhausted.
    fn next_event(&mut self) -> Option<EventHits>;
}

/// Hit source replaying events held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHitSource {
    events: VecDeque<EventHits>,
}

impl MemoryHitSource {
    pub fn new(events: impl IntoIterator<Item = EventHits>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Number of events not yet handed out.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl HitSource for MemoryHitSource {
    fn next_event(&mut self) -> Option<EventHits> {
        self.events.pop_front()
    }
}

// ============================================================================
// Event Output
// ============================================================================

/// Per-event counters for external histogramming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSummary {
    /// Tagger hits processed (after truncation)
    pub tagger_hits: usize,
    /// Tagger hits that are an endpoint of some accepted match
    pub real_hits: usize,
    /// Accepted matches
    pub matches: usize,
}

impl EventSummary {
    /// Fraction of tagger hits explained by matches; `None` without hits.
    pub fn real_fraction(&self) -> Option<f64> {
        if self.tagger_hits == 0 {
            None
        } else {
            Some(self.real_hits as f64 / self.tagger_hits as f64)
        }
    }
}

/// Counters summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub tagger_hits: usize,
    pub real_hits: usize,
    pub matches: usize,
}

impl RunSummary {
    pub fn add(&mut self, event: &EventSummary) {
        self.events += 1;
        self.tagger_hits += event.tagger_hits;
        self.real_hits += event.real_hits;
        self.matches += event.matches;
    }

    pub fn from_results(results: &[EventResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.add(&result.summary);
        }
        summary
    }

    /// Fraction of all tagger hits explained by matches.
    pub fn real_fraction(&self) -> Option<f64> {
        if self.tagger_hits == 0 {
            None
        } else {
            Some(self.real_hits as f64 / self.tagger_hits as f64)
        }
    }
}

/// Everything reconstructed for one event.
#[derive(Debug, Clone)]
pub struct EventResult {
    /// Candidates in generation order; [`TrackId`]s index this list
    pub tracks: Vec<CandidateTrack>,
    /// Score of each candidate
    pub scores: Vec<f64>,
    /// Space points of both halves
    pub index: DetectorIndex,
    /// Accepted matches in generation order
    pub matches: Vec<TrackId>,
    /// Hits dropped to respect the capacity
    pub truncation: Truncation,
    pub summary: EventSummary,
}

impl EventResult {
    pub fn track(&self, id: TrackId) -> Option<&CandidateTrack> {
        self.tracks.get(id.0)
    }

    pub fn score(&self, id: TrackId) -> Option<f64> {
        self.scores.get(id.0).copied()
    }

    /// Accepted tracks in generation order.
    pub fn matched_tracks(&self) -> impl Iterator<Item = &CandidateTrack> + '_ {
        self.matches.iter().filter_map(move |id| self.track(*id))
    }
}

// ============================================================================
// Event Processor
// ============================================================================

/// Runs the full matching pipeline on events.
///
/// Holds only read-only state, so one processor can serve many threads.
#[derive(Debug, Clone)]
pub struct EventProcessor<'g> {
    config: ReconstructionConfig,
    wires: &'g WireTable,
    classifier: HitClassifier,
    builder: CandidateTrackBuilder,
    scorer: TrackScorer,
    dedup: TrackDeduplicator,
}

impl<'g> EventProcessor<'g> {
    /// Creates a processor after validating `config`.
    pub fn new(config: ReconstructionConfig, wires: &'g WireTable) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: HitClassifier::new(config.heights),
            builder: CandidateTrackBuilder::new(config.completion_distance),
            scorer: TrackScorer::from_config(&config),
            dedup: TrackDeduplicator::new(config.score_epsilon),
            config,
            wires,
        })
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstructs and matches one event.
    pub fn process(&self, mut hits: EventHits) -> EventResult {
        let truncation = hits.enforce_capacity(&self.config.capacity);
        if truncation.tagger_hits > 0 {
            tracing::warn!(
                dropped = truncation.tagger_hits,
                capacity = self.config.capacity.tagger_hits,
                "tagger hit batch exceeds capacity, extra hits ignored"
            );
        }
        if truncation.wire_hits > 0 {
            tracing::warn!(
                dropped = truncation.wire_hits,
                capacity = self.config.capacity.wire_hits,
                "wire hit batch exceeds capacity, extra hits ignored"
            );
        }

        let classified = self.classifier.classify(&hits.tagger_hits);
        tracing::debug!(
            top = classified.top.len(),
            mid = classified.mid.len(),
            bottom = classified.bottom.len(),
            "classified tagger hits"
        );
        let tracks = self.builder.build(&classified);

        hits.wire_hits.sort_by(time_then_plane);
        let (negative, positive) = self.intersect_halves(&hits.wire_hits);
        let index = DetectorIndex::new(
            self.height_index(DetectorHalf::Negative, negative),
            self.height_index(DetectorHalf::Positive, positive),
        );

        let scores = self.scorer.score_all(&tracks, &index);
        let matches = self.dedup.select(&tracks, &scores);

        let summary = summarize(&hits.tagger_hits, &tracks, &matches);
        tracing::debug!(
            candidates = tracks.len(),
            points = index.len(),
            matches = summary.matches,
            real_hits = summary.real_hits,
            "event processed"
        );

        EventResult {
            tracks,
            scores,
            index,
            matches,
            truncation,
            summary,
        }
    }

    /// Processes every event of `source` in order.
    pub fn run<S: HitSource>(&self, source: &mut S) -> Vec<EventResult> {
        let mut results = Vec::new();
        while let Some(hits) = source.next_event() {
            tracing::debug!(event = results.len(), "processing event");
            results.push(self.process(hits));
        }
        results
    }

    fn height_index(&self, half: DetectorHalf, points: Vec<ReconstructedPoint>) -> HeightIndex {
        HeightIndex::new(half, points, self.config.extent, self.config.height_bins)
    }

    #[cfg(feature = "std")]
    fn intersect_halves(&self, wire_hits: &[WireHit]) -> (Vec<ReconstructedPoint>, Vec<ReconstructedPoint>) {
        let intersector = WirePlaneIntersector::new(self.wires, self.config.coincidence);
        rayon::join(
            || intersector.intersect(DetectorHalf::Negative, wire_hits),
            || intersector.intersect(DetectorHalf::Positive, wire_hits),
        )
    }

    #[cfg(not(feature = "std"))]
    fn intersect_halves(&self, wire_hits: &[WireHit]) -> (Vec<ReconstructedPoint>, Vec<ReconstructedPoint>) {
        let intersector = WirePlaneIntersector::new(self.wires, self.config.coincidence);
        (
            intersector.intersect(DetectorHalf::Negative, wire_hits),
            intersector.intersect(DetectorHalf::Positive, wire_hits),
        )
    }
}

#[cfg(feature = "std")]
impl<'g> EventProcessor<'g> {
    /// Processes a window of events concurrently, returning results in input order.
    pub fn process_batch(&self, events: Vec<EventHits>) -> Vec<EventResult> {
        use rayon::prelude::*;

        events.into_par_iter().map(|hits| self.process(hits)).collect()
    }

    /// Processes every event of `source`, `window` events at a time.
    ///
    /// A `window` of zero uses the size of the rayon pool.
    pub fn run_parallel<S: HitSource>(&self, source: &mut S, window: usize) -> Vec<EventResult> {
        let window = if window == 0 {
            rayon::current_num_threads()
        } else {
            window
        };

        let mut results = Vec::new();
        loop {
            let batch: Vec<EventHits> = core::iter::from_fn(|| source.next_event()).take(window).collect();
            if batch.is_empty() {
                break;
            }
            tracing::debug!(first = results.len(), events = batch.len(), "processing event window");
            results.extend(self.process_batch(batch));
        }
        results
    }
}

/// Peak time ascending, then plane id descending.
fn time_then_plane(a: &WireHit, b: &WireHit) -> Ordering {
    a.peak_time
        .total_cmp(&b.peak_time)
        .then_with(|| b.plane.cmp(&a.plane))
}

fn summarize(hits: &[TaggerHit], tracks: &[CandidateTrack], matches: &[TrackId]) -> EventSummary {
    let real_hits = hits
        .iter()
        .filter(|hit| {
            matches
                .iter()
                .any(|id| tracks[id.0].contains_hit(&hit.position))
        })
        .count();

    EventSummary {
        tagger_hits: hits.len(),
        real_hits,
        matches: matches.len(),
    }
}
