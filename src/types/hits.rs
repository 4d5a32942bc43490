//! Per-event detector hits
//!
//! Tagger hits are points on one of three horizontal layers; wire hits are
//! timed pulses on a single sense wire.

use super::Position;

// ============================================================================
// Tagger Hits
// ============================================================================

/// Horizontal tagger layer a hit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Upper plane above the detector
    Top,
    /// Lower plane above the detector
    Mid,
    /// Plane below the detector; has no x resolution
    Bottom,
}

/// A hit recorded by the cosmic-ray tagger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggerHit {
    pub position: Position,
    pub time: f64,
}

impl TaggerHit {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, time: f64) -> Self {
        Self {
            position: Position::new(x, y, z),
            time,
        }
    }
}

// ============================================================================
// Wire Hits
// ============================================================================

/// One of the two mirrored drift volumes, split by the sign of x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetectorHalf {
    /// Half 0, at negative x
    Negative = 0,
    /// Half 1, at positive x
    Positive = 1,
}

impl DetectorHalf {
    /// Both halves in id order.
    pub const ALL: [DetectorHalf; 2] = [DetectorHalf::Negative, DetectorHalf::Positive];

    /// Maps a half id to a half. Ids other than 0 and 1 are rejected.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(DetectorHalf::Negative),
            1 => Some(DetectorHalf::Positive),
            _ => None,
        }
    }

    /// Half containing a point with the given x.
    ///
    /// Uses the sign bit, so `-0.0` belongs to the negative half.
    #[inline]
    pub fn of_x(x: f64) -> Self {
        if x.is_sign_negative() {
            DetectorHalf::Negative
        } else {
            DetectorHalf::Positive
        }
    }

    #[inline]
    pub fn id(self) -> usize {
        self as usize
    }
}

/// Wire orientation plane.
///
/// Planes `U` and `V` are induction planes at opposite 60° stereo angles;
/// `Y` is the collection plane with vertical wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Plane {
    U = 0,
    V = 1,
    Y = 2,
}

impl Plane {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Plane::U),
            1 => Some(Plane::V),
            2 => Some(Plane::Y),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// A pulse on one sense wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireHit {
    /// Readout channel, also the key into the wire table
    pub channel: u32,
    pub half: DetectorHalf,
    pub plane: Plane,
    /// Wire number within its plane
    pub wire: u32,
    /// Peak time in ticks
    pub peak_time: f64,
}

impl WireHit {
    pub fn new(channel: u32, half: DetectorHalf, plane: Plane, wire: u32, peak_time: f64) -> Self {
        Self {
            channel,
            half,
            plane,
            wire,
            peak_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_from_sign() {
        assert_eq!(DetectorHalf::of_x(-12.0), DetectorHalf::Negative);
        assert_eq!(DetectorHalf::of_x(-0.0), DetectorHalf::Negative);
        assert_eq!(DetectorHalf::of_x(0.0), DetectorHalf::Positive);
        assert_eq!(DetectorHalf::of_x(180.0), DetectorHalf::Positive);
    }

    #[test]
    fn test_ids_roundtrip() {
        assert_eq!(DetectorHalf::from_id(1), Some(DetectorHalf::Positive));
        assert_eq!(DetectorHalf::from_id(2), None);
        assert_eq!(Plane::from_id(2).map(Plane::id), Some(2));
        assert_eq!(Plane::from_id(3), None);
    }
}
