//! Layer classification of tagger hits

use alloc::vec::Vec;
use num_traits::Float;

use crate::config::LayerHeights;
use crate::types::hits::{Layer, TaggerHit};

/// Tagger hits of one event split by layer, each in input order.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedHits {
    pub top: Vec<TaggerHit>,
    pub mid: Vec<TaggerHit>,
    pub bottom: Vec<TaggerHit>,
}

impl ClassifiedHits {
    /// Total number of classified hits.
    pub fn len(&self) -> usize {
        self.top.len() + self.mid.len() + self.bottom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hits of a single layer.
    pub fn layer(&self, layer: Layer) -> &[TaggerHit] {
        match layer {
            Layer::Top => &self.top,
            Layer::Mid => &self.mid,
            Layer::Bottom => &self.bottom,
        }
    }
}

/// Assigns tagger hits to layers by calibrated height.
#[derive(Debug, Clone)]
pub struct HitClassifier {
    heights: LayerHeights,
}

impl HitClassifier {
    pub fn new(heights: LayerHeights) -> Self {
        Self { heights }
    }

    #[inline]
    fn near(&self, y: f64, height: f64) -> bool {
        Float::abs(y - height) < self.heights.tolerance
    }

    /// Layer of a hit at height `y`.
    ///
    /// Top wins over mid; anything matching neither is bottom.
    pub fn layer_of(&self, y: f64) -> Layer {
        if self.near(y, self.heights.top) {
            Layer::Top
        } else if self.near(y, self.heights.mid) {
            Layer::Mid
        } else {
            Layer::Bottom
        }
    }

    /// Returns true if `y` matches one of the three calibrated heights.
    pub fn is_calibrated(&self, y: f64) -> bool {
        self.near(y, self.heights.top)
            || self.near(y, self.heights.mid)
            || self.near(y, self.heights.bottom)
    }

    /// Splits an event's tagger hits into layers.
    pub fn classify(&self, hits: &[TaggerHit]) -> ClassifiedHits {
        let mut classified = ClassifiedHits::default();
        let mut uncalibrated = 0usize;

        for hit in hits {
            let y = hit.position.y;
            match self.layer_of(y) {
                Layer::Top => classified.top.push(*hit),
                Layer::Mid => classified.mid.push(*hit),
                Layer::Bottom => {
                    if !self.is_calibrated(y) {
                        uncalibrated += 1;
                    }
                    classified.bottom.push(*hit);
                }
            }
        }

        if uncalibrated > 0 {
            tracing::debug!(uncalibrated, "tagger hits off every layer height defaulted to bottom");
        }
        classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HitClassifier {
        HitClassifier::new(LayerHeights::default())
    }

    #[test]
    fn test_layer_by_height() {
        let c = classifier();
        assert_eq!(c.layer_of(618.05), Layer::Top);
        assert_eq!(c.layer_of(617.95), Layer::Top);
        assert_eq!(c.layer_of(358.0), Layer::Mid);
        assert_eq!(c.layer_of(-361.0), Layer::Bottom);
        // Off every height
        assert_eq!(c.layer_of(0.0), Layer::Bottom);
        assert_eq!(c.layer_of(618.2), Layer::Bottom);
    }

    #[test]
    fn test_top_wins_overlap() {
        let heights = LayerHeights {
            top: 10.0,
            mid: 10.05,
            bottom: -10.0,
            tolerance: 0.1,
        };
        let c = HitClassifier::new(heights);
        assert_eq!(c.layer_of(10.02), Layer::Top);
        assert_eq!(c.layer_of(10.12), Layer::Mid);
    }

    #[test]
    fn test_classify_keeps_order() {
        let hits = [
            TaggerHit::new(1.0, 618.0, 0.0, 0.0),
            TaggerHit::new(2.0, -361.0, 0.0, 0.0),
            TaggerHit::new(3.0, 618.0, 0.0, 0.0),
            TaggerHit::new(4.0, 358.0, 0.0, 0.0),
            TaggerHit::new(5.0, 42.0, 0.0, 0.0),
        ];
        let classified = classifier().classify(&hits);

        assert_eq!(classified.len(), 5);
        assert_eq!(classified.top.len(), 2);
        assert_eq!(classified.top[1].position.x, 3.0);
        assert_eq!(classified.layer(Layer::Mid).len(), 1);
        let bottom_x: Vec<f64> = classified.bottom.iter().map(|h| h.position.x).collect();
        assert_eq!(bottom_x, vec![2.0, 5.0]);
    }

    #[test]
    fn test_no_hits() {
        let classified = classifier().classify(&[]);
        assert!(classified.is_empty());
    }
}
