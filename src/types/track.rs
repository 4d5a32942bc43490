//! Candidate straight-line tracks built from tagger hits
//!
//! A track joins two or three tagger layers. Endpoints are compared through
//! [`EndpointKey`]s, which capture exact coordinate equality as integers so
//! they can key ordered maps and sets.

use super::Position;

// ============================================================================
// Identifiers
// ============================================================================

/// Position of a track in its event's candidate list (generation order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub usize);

impl core::fmt::Display for TrackId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Exact-value identity of an endpoint.
///
/// Two keys are equal iff the coordinates compare equal as `f64`; signed zeros
/// are folded together so `-0.0` and `0.0` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey([u64; 3]);

impl EndpointKey {
    /// Key of a top or mid endpoint.
    pub fn of(position: &Position) -> Self {
        Self([
            canonical_bits(position.x),
            canonical_bits(position.y),
            canonical_bits(position.z),
        ])
    }

    /// Key of a bottom endpoint, whose x is a placeholder and reads as 0.
    pub fn without_x(position: &Position) -> Self {
        Self([
            canonical_bits(0.0),
            canonical_bits(position.y),
            canonical_bits(position.z),
        ])
    }
}

#[inline]
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// A tagger hit used as one end of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    /// Stored position. For bottom endpoints of completed tracks, x is the
    /// projected x of the upper segment.
    pub position: Position,
    pub key: EndpointKey,
}

impl Endpoint {
    fn upper(position: Position) -> Self {
        Self {
            position,
            key: EndpointKey::of(&position),
        }
    }

    fn bottom(position: Position) -> Self {
        Self {
            position,
            key: EndpointKey::without_x(&position),
        }
    }
}

// ============================================================================
// Candidate Track
// ============================================================================

/// A straight candidate trajectory through two or three tagger layers.
///
/// The line passes through `base` with constant slopes dx/dy and dz/dy taken
/// from the topmost endpoint and the base point.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTrack {
    pub base: Position,
    pub top: Option<Endpoint>,
    pub mid: Option<Endpoint>,
    pub bottom: Option<Endpoint>,
    slope_x: f64,
    slope_z: f64,
}

impl CandidateTrack {
    fn through(base: Position, top: Option<Endpoint>, mid: Option<Endpoint>, bottom: Option<Endpoint>) -> Self {
        let mut track = Self {
            base,
            top,
            mid,
            bottom,
            slope_x: 0.0,
            slope_z: 0.0,
        };
        let topmost = track.topmost();
        let dy = topmost.y - base.y;
        track.slope_x = (topmost.x - base.x) / dy;
        track.slope_z = (topmost.z - base.z) / dy;
        track
    }

    /// Track from a top hit to a mid hit, based at the mid hit.
    pub fn top_mid(top: Position, mid: Position) -> Self {
        Self::through(mid, Some(Endpoint::upper(top)), Some(Endpoint::upper(mid)), None)
    }

    /// Track from a top hit to a bottom hit, based at the bottom hit.
    pub fn top_bottom(top: Position, bottom: Position) -> Self {
        Self::through(bottom, Some(Endpoint::upper(top)), None, Some(Endpoint::bottom(bottom)))
    }

    /// Track from a mid hit to a bottom hit, based at the bottom hit.
    pub fn mid_bottom(mid: Position, bottom: Position) -> Self {
        Self::through(bottom, None, Some(Endpoint::upper(mid)), Some(Endpoint::bottom(bottom)))
    }

    /// Extends this track with a bottom endpoint, keeping its base and slopes.
    ///
    /// `bottom` carries the projected x together with the bottom hit's y and z.
    pub fn completed_with(&self, bottom: Position) -> Self {
        Self {
            bottom: Some(Endpoint::bottom(bottom)),
            ..self.clone()
        }
    }

    /// Point on the line at height `y`.
    pub fn project_y(&self, y: f64) -> Position {
        let dy = y - self.base.y;
        Position::new(self.base.x + self.slope_x * dy, y, self.base.z + self.slope_z * dy)
    }

    /// Highest endpoint: top if present, else mid, else bottom.
    pub fn topmost(&self) -> Position {
        self.top
            .or(self.mid)
            .or(self.bottom)
            .map(|e| e.position)
            .unwrap_or(self.base)
    }

    /// dx/dy of the line.
    #[inline]
    pub fn slope_x(&self) -> f64 {
        self.slope_x
    }

    /// dz/dy of the line.
    #[inline]
    pub fn slope_z(&self) -> f64 {
        self.slope_z
    }

    /// Number of present endpoints.
    pub fn num_endpoints(&self) -> usize {
        [self.top, self.mid, self.bottom].iter().filter(|e| e.is_some()).count()
    }

    /// Returns true if the track has top, mid and bottom endpoints.
    pub fn is_complete(&self) -> bool {
        self.num_endpoints() == 3
    }

    /// Keys of the present endpoints, in top, mid, bottom order.
    pub fn endpoint_keys(&self) -> impl Iterator<Item = EndpointKey> + '_ {
        [self.top, self.mid, self.bottom].into_iter().flatten().map(|e| e.key)
    }

    /// Returns true if a tagger hit at `position` is one of this track's ends.
    pub fn contains_hit(&self, position: &Position) -> bool {
        let upper = EndpointKey::of(position);
        let lower = EndpointKey::without_x(position);
        self.top.map_or(false, |e| e.key == upper)
            || self.mid.map_or(false, |e| e.key == upper)
            || self.bottom.map_or(false, |e| e.key == lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_mid_projection() {
        let track = CandidateTrack::top_mid(Position::new(10.0, 600.0, 0.0), Position::new(0.0, 400.0, 20.0));

        assert!((track.slope_x() - 0.05).abs() < 1e-12);
        assert!((track.slope_z() + 0.1).abs() < 1e-12);

        let below = track.project_y(-400.0);
        assert!((below.x + 40.0).abs() < 1e-9);
        assert_eq!(below.y, -400.0);
        assert!((below.z - 100.0).abs() < 1e-9);
        assert!(!track.is_complete());
    }

    #[test]
    fn test_completion_keeps_line() {
        let track = CandidateTrack::top_mid(Position::new(10.0, 600.0, 0.0), Position::new(0.0, 400.0, 20.0));
        let done = track.completed_with(Position::new(-40.0, -400.0, 98.0));

        assert!(done.is_complete());
        assert_eq!(done.base, track.base);
        assert_eq!(done.slope_x(), track.slope_x());
        assert_eq!(done.topmost(), Position::new(10.0, 600.0, 0.0));
    }

    #[test]
    fn test_bottom_key_ignores_x() {
        let bottom = Position::new(-35.0, -400.0, 98.0);
        let pair = CandidateTrack::mid_bottom(Position::new(0.0, 400.0, 20.0), bottom);
        let projected = Position::new(-40.0, -400.0, 98.0);

        assert_eq!(pair.bottom.unwrap().key, EndpointKey::without_x(&projected));
        assert!(pair.contains_hit(&projected));
        assert!(!pair.contains_hit(&Position::new(0.0, 400.0, 20.5)));
        assert_eq!(pair.topmost().y, 400.0);
    }

    #[test]
    fn test_signed_zero_shares_key() {
        assert_eq!(
            EndpointKey::of(&Position::new(-0.0, 1.0, 2.0)),
            EndpointKey::of(&Position::new(0.0, 1.0, 2.0))
        );
        assert_ne!(
            EndpointKey::of(&Position::new(1.0, 1.0, 2.0)),
            EndpointKey::without_x(&Position::new(1.0, 1.0, 2.0))
        );
    }
}
