//! Common helpers for pipeline integration tests

#![allow(dead_code)]

use tagmatch::pipeline::EventHits;
use tagmatch::types::geometry::{Wire, WireTable};
use tagmatch::types::hits::{DetectorHalf, Plane, TaggerHit, WireHit};
use tagmatch::types::Position;

pub const TOP_Y: f64 = 618.0;
pub const MID_Y: f64 = 358.0;
pub const BOTTOM_Y: f64 = -361.0;

/// Rise of an induction wire per unit z.
const STEREO_SLOPE: f64 = 0.577_350_269_189_625_8;

/// Straight cosmic track, x and z linear in y.
#[derive(Debug, Clone, Copy)]
pub struct Cosmic {
    pub x0: f64,
    pub z0: f64,
    pub slope_x: f64,
    pub slope_z: f64,
}

impl Cosmic {
    pub fn new(x0: f64, z0: f64, slope_x: f64, slope_z: f64) -> Self {
        Self {
            x0,
            z0,
            slope_x,
            slope_z,
        }
    }

    pub fn at(&self, y: f64) -> Position {
        Position::new(self.x0 + self.slope_x * y, y, self.z0 + self.slope_z * y)
    }

    pub fn tagger_hits(&self) -> [TaggerHit; 3] {
        [TOP_Y, MID_Y, BOTTOM_Y].map(|y| {
            let p = self.at(y);
            TaggerHit::new(p.x, p.y, p.z, 0.0)
        })
    }
}

/// Builds a wire table and matching hits for synthetic events.
///
/// Each space point gets its own U, V and Y wire, hit at times t, t + 3.5 and
/// t + 7; consecutive points are 20 time units apart so no wires from
/// different points fall into the coincidence window.
#[derive(Debug, Default)]
pub struct DetectorBuilder {
    wires: Vec<Wire>,
    wire_hits: Vec<WireHit>,
    tagger_hits: Vec<TaggerHit>,
    time: f64,
}

impl DetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the tagger hits of `cosmic` and space points along it every `spacing` in y.
    pub fn cosmic(mut self, cosmic: &Cosmic, plane_x: f64, spacing: f64) -> Self {
        self.tagger_hits.extend(cosmic.tagger_hits());
        let mut y = 200.0 - spacing / 2.0;
        while y > -200.0 {
            let z = cosmic.at(y).z;
            self = self.space_point(plane_x, y, z);
            y -= spacing;
        }
        self
    }

    pub fn tagger_hit(mut self, x: f64, y: f64, z: f64) -> Self {
        self.tagger_hits.push(TaggerHit::new(x, y, z, 0.0));
        self
    }

    /// Adds three wires crossing at (x, y, z) and their coincident hits.
    pub fn space_point(mut self, x: f64, y: f64, z: f64) -> Self {
        let channel = self.wires.len() as u32;
        let half = DetectorHalf::of_x(x);
        let rise = 10.0 * STEREO_SLOPE;
        self.wires.extend([
            Wire::new(channel, Plane::U, Position::new(x, y + rise, z - 10.0), Position::new(x, y - rise, z + 10.0)),
            Wire::new(channel + 1, Plane::V, Position::new(x, y - rise, z - 10.0), Position::new(x, y + rise, z + 10.0)),
            Wire::new(channel + 2, Plane::Y, Position::new(x, -200.0, z), Position::new(x, 200.0, z)),
        ]);
        self.wire_hits.extend([
            WireHit::new(channel, half, Plane::U, channel, self.time),
            WireHit::new(channel + 1, half, Plane::V, channel + 1, self.time + 3.5),
            WireHit::new(channel + 2, half, Plane::Y, channel + 2, self.time + 7.0),
        ]);
        self.time += 20.0;
        self
    }

    pub fn build(self) -> (WireTable, EventHits) {
        let table = WireTable::from_wires(self.wires).expect("builder made no wires");
        (table, EventHits::new(self.tagger_hits, self.wire_hits))
    }
}

/// A negative-half cosmic used across tests.
pub fn negative_cosmic() -> Cosmic {
    Cosmic::new(-60.0, 300.0, 0.05, 0.1)
}

/// A positive-half cosmic well separated from [`negative_cosmic`] in z.
pub fn positive_cosmic() -> Cosmic {
    Cosmic::new(80.0, -150.0, -0.03, -0.05)
}
