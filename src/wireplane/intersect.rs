//! Space points from triple-plane wire coincidences
//!
//! A point is rebuilt from one hit on each plane, Y then V then U, when each
//! adjacent pair of peak times differs by an amount inside the coincidence
//! window. The induction wires are treated as lines at ±60° stereo angle in
//! the (y, z) plane and intersected algebraically.

use alloc::vec::Vec;
use core::cmp::Ordering;
use num_traits::Float;

use crate::config::CoincidenceWindow;
use crate::types::geometry::{Wire, WireTable};
use crate::types::hits::{DetectorHalf, Plane, WireHit};
use crate::types::points::ReconstructedPoint;
use crate::types::Position;

/// Margin around the window when locating candidate ranges in a sorted plane.
///
/// The exact closed-window test is still applied to every pair inside the range.
const WINDOW_SLACK: f64 = 1e-6;

/// Intersects wire hits of one detector half.
#[derive(Debug, Clone)]
pub struct WirePlaneIntersector<'g> {
    wires: &'g WireTable,
    window: CoincidenceWindow,
}

impl<'g> WirePlaneIntersector<'g> {
    pub fn new(wires: &'g WireTable, window: CoincidenceWindow) -> Self {
        Self { wires, window }
    }

    /// Rebuilds all space points from the wire hits of `half`.
    ///
    /// Hits from the other half are ignored. Points come out in the input
    /// order of their Y hits, then by V and U peak time.
    pub fn intersect(&self, half: DetectorHalf, hits: &[WireHit]) -> Vec<ReconstructedPoint> {
        let buckets = PlaneBuckets::split(hits.iter().filter(|h| h.half == half));
        let mut points = Vec::new();
        let mut missing_wires = 0usize;

        for p2 in &buckets.y {
            let Some(w2) = self.wires.get(p2.channel) else {
                missing_wires += 1;
                continue;
            };
            for p1 in self.coincident(&buckets.v, p2.peak_time) {
                let Some(w1) = self.wires.get(p1.channel) else {
                    missing_wires += 1;
                    continue;
                };
                for p0 in self.coincident(&buckets.u, p1.peak_time) {
                    let Some(w0) = self.wires.get(p0.channel) else {
                        missing_wires += 1;
                        continue;
                    };
                    if let Some(position) = intersection(w2, w1, w0) {
                        points.push(ReconstructedPoint::new(position, half));
                    }
                }
            }
        }

        if missing_wires > 0 {
            tracing::debug!(?half, missing_wires, "wire hits on channels absent from the wire table");
        }
        tracing::debug!(?half, points = points.len(), "reconstructed space points");
        points
    }

    /// Hits of a time-sorted plane whose time `t` satisfies `later - t` in the window.
    fn coincident<'a>(&self, sorted: &'a [WireHit], later: f64) -> impl Iterator<Item = &'a WireHit> + 'a {
        let window = self.window;
        let earliest = later - window.max - WINDOW_SLACK;
        let latest = later - window.min + WINDOW_SLACK;
        let start = sorted.partition_point(|h| h.peak_time < earliest);
        sorted[start..]
            .iter()
            .take_while(move |h| h.peak_time <= latest)
            .filter(move |h| window.contains(later - h.peak_time))
    }
}

/// Hits of one half split by plane. V and U are sorted by peak time.
struct PlaneBuckets {
    y: Vec<WireHit>,
    v: Vec<WireHit>,
    u: Vec<WireHit>,
}

impl PlaneBuckets {
    fn split<'a>(hits: impl Iterator<Item = &'a WireHit>) -> Self {
        let mut buckets = Self {
            y: Vec::new(),
            v: Vec::new(),
            u: Vec::new(),
        };
        for hit in hits {
            match hit.plane {
                Plane::Y => buckets.y.push(*hit),
                Plane::V => buckets.v.push(*hit),
                Plane::U => buckets.u.push(*hit),
            }
        }
        buckets.v.sort_by(by_time);
        buckets.u.sort_by(by_time);
        buckets
    }
}

fn by_time(a: &WireHit, b: &WireHit) -> Ordering {
    a.peak_time.total_cmp(&b.peak_time)
}

/// Point where a Y, a V and a U wire cross.
///
/// Returns `None` unless the wires lie on planes Y, V and U respectively.
/// x is the U wire's x (constant over a half); y comes from crossing the V and
/// U lines; z is taken from the Y wire's first endpoint rather than from the
/// crossing.
pub fn intersection(plane2: &Wire, plane1: &Wire, plane0: &Wire) -> Option<Position> {
    if plane2.plane != Plane::Y || plane1.plane != Plane::V || plane0.plane != Plane::U {
        return None;
    }

    let x = plane0.start.x;

    // V slope is opposite to the U wire's rise along z
    let mut m1 = 1.0 / Float::sqrt(3.0f64);
    let (low_z_y, high_z_y) = if plane0.start.z < plane0.end.z {
        (plane0.start.y, plane0.end.y)
    } else {
        (plane0.end.y, plane0.start.y)
    };
    if high_z_y > low_z_y {
        m1 = -m1;
    }

    let z = (m1 * (plane1.start.z + plane0.start.z) + plane0.start.y - plane1.start.y) / (2.0 * m1);
    let y = m1 * (z - plane1.start.z) + plane1.start.y;

    Some(Position::new(x, y, plane2.start.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOPE: f64 = 0.577_350_269_189_625_8;

    /// Three wires crossing at (x, y, z): U falls along z, V rises.
    fn crossing(first_channel: u32, x: f64, y: f64, z: f64) -> [Wire; 3] {
        [
            Wire::new(
                first_channel,
                Plane::U,
                Position::new(x, y + 10.0 * SLOPE, z - 10.0),
                Position::new(x, y - 10.0 * SLOPE, z + 10.0),
            ),
            Wire::new(
                first_channel + 1,
                Plane::V,
                Position::new(x, y - 10.0 * SLOPE, z - 10.0),
                Position::new(x, y + 10.0 * SLOPE, z + 10.0),
            ),
            Wire::new(
                first_channel + 2,
                Plane::Y,
                Position::new(x, -200.0, z),
                Position::new(x, 200.0, z),
            ),
        ]
    }

    fn hits(half: DetectorHalf, first_channel: u32, t0: f64, t1: f64, t2: f64) -> Vec<WireHit> {
        vec![
            WireHit::new(first_channel, half, Plane::U, 0, t0),
            WireHit::new(first_channel + 1, half, Plane::V, 0, t1),
            WireHit::new(first_channel + 2, half, Plane::Y, 0, t2),
        ]
    }

    #[test]
    fn test_intersection_recovers_crossing() {
        let [u, v, y] = crossing(0, -150.0, 42.0, 300.0);
        let point = intersection(&y, &v, &u).unwrap();

        assert_eq!(point.x, -150.0);
        assert!((point.y - 42.0).abs() < 1e-9, "y = {}", point.y);
        assert_eq!(point.z, 300.0);
    }

    #[test]
    fn test_intersection_z_from_collection_wire() {
        let [u, v, _] = crossing(0, -150.0, 42.0, 300.0);
        let [_, _, shifted] = crossing(3, -150.0, 42.0, 310.0);

        let point = intersection(&shifted, &v, &u).unwrap();
        // y is still solved from U and V, z is the collection wire's
        assert!((point.y - 42.0).abs() < 1e-9);
        assert_eq!(point.z, 310.0);
    }

    #[test]
    fn test_intersection_wrong_planes() {
        let [u, v, y] = crossing(0, -150.0, 42.0, 300.0);
        assert!(intersection(&v, &y, &u).is_none());
        assert!(intersection(&y, &u, &v).is_none());
    }

    #[test]
    fn test_window_edges_accepted() {
        let table = WireTable::from_wires(crossing(0, -150.0, 42.0, 300.0)).unwrap();
        let intersector = WirePlaneIntersector::new(&table, CoincidenceWindow::default());

        // t2 - t1 = 3, t1 - t0 = 4
        let points = intersector.intersect(DetectorHalf::Negative, &hits(DetectorHalf::Negative, 0, 3.0, 7.0, 10.0));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].half, DetectorHalf::Negative);
    }

    #[test]
    fn test_window_misses_rejected() {
        let table = WireTable::from_wires(crossing(0, -150.0, 42.0, 300.0)).unwrap();
        let intersector = WirePlaneIntersector::new(&table, CoincidenceWindow::default());

        // t2 - t1 = 2.9
        let early = hits(DetectorHalf::Negative, 0, 3.1, 7.1, 10.0);
        assert!(intersector.intersect(DetectorHalf::Negative, &early).is_empty());

        // t1 - t0 = 4.1
        let late = hits(DetectorHalf::Negative, 0, 2.9, 7.0, 10.0);
        assert!(intersector.intersect(DetectorHalf::Negative, &late).is_empty());
    }

    #[test]
    fn test_other_half_ignored() {
        let table = WireTable::from_wires(crossing(0, 150.0, 42.0, 300.0)).unwrap();
        let intersector = WirePlaneIntersector::new(&table, CoincidenceWindow::default());
        let event = hits(DetectorHalf::Positive, 0, 3.0, 6.5, 10.0);

        assert!(intersector.intersect(DetectorHalf::Negative, &event).is_empty());
        assert_eq!(intersector.intersect(DetectorHalf::Positive, &event).len(), 1);
    }

    #[test]
    fn test_unknown_channel_skipped() {
        let table = WireTable::from_wires(crossing(0, -150.0, 42.0, 300.0)).unwrap();
        let intersector = WirePlaneIntersector::new(&table, CoincidenceWindow::default());
        let mut event = hits(DetectorHalf::Negative, 0, 3.0, 6.5, 10.0);
        event.push(WireHit::new(99, DetectorHalf::Negative, Plane::U, 1, 3.2));

        assert_eq!(intersector.intersect(DetectorHalf::Negative, &event).len(), 1);
    }

    #[test]
    fn test_combinatorics_within_window() {
        let table = WireTable::from_wires(crossing(0, -150.0, 42.0, 300.0)).unwrap();
        let intersector = WirePlaneIntersector::new(&table, CoincidenceWindow::default());
        // Two U hits in window, one outside; two V hits in window
        let event = vec![
            WireHit::new(0, DetectorHalf::Negative, Plane::U, 0, 2.0),
            WireHit::new(0, DetectorHalf::Negative, Plane::U, 0, 2.5),
            WireHit::new(0, DetectorHalf::Negative, Plane::U, 0, 0.0),
            WireHit::new(1, DetectorHalf::Negative, Plane::V, 0, 6.0),
            WireHit::new(1, DetectorHalf::Negative, Plane::V, 0, 6.2),
            WireHit::new(2, DetectorHalf::Negative, Plane::Y, 0, 9.5),
        ];

        // V 6.0 pairs with U 2.0 and 2.5; V 6.2 with U 2.5 only (6.2 - 2.0 = 4.2)
        assert_eq!(intersector.intersect(DetectorHalf::Negative, &event).len(), 3);
    }
}
