//! Static wire geometry
//!
//! The wire table is loaded once per run and shared read-only by every event.

use alloc::collections::BTreeMap;

use super::hits::Plane;
use super::Position;
use crate::{Result, TagMatchError};

/// A straight sense wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wire {
    pub channel: u32,
    pub plane: Plane,
    pub start: Position,
    pub end: Position,
}

impl Wire {
    pub fn new(channel: u32, plane: Plane, start: Position, end: Position) -> Self {
        Self {
            channel,
            plane,
            start,
            end,
        }
    }
}

/// Channel-keyed table of wires.
#[derive(Debug, Clone, Default)]
pub struct WireTable {
    wires: BTreeMap<u32, Wire>,
}

impl WireTable {
    /// Builds a table from wires in any order.
    ///
    /// A channel listed twice keeps the later wire.
    pub fn from_wires(wires: impl IntoIterator<Item = Wire>) -> Result<Self> {
        let mut table = Self::default();
        for wire in wires {
            table.insert(wire);
        }
        if table.is_empty() {
            return Err(TagMatchError::EmptyGeometry);
        }
        Ok(table)
    }

    /// Parses a whitespace-separated wire dump.
    ///
    /// Each non-empty line not starting with `#` holds
    /// `channel plane x1 y1 z1 x2 y2 z2`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut table = Self::default();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let wire = parse_wire(line).ok_or(TagMatchError::MalformedGeometry { line: index + 1 })?;
            table.insert(wire);
        }
        if table.is_empty() {
            return Err(TagMatchError::EmptyGeometry);
        }
        Ok(table)
    }

    fn insert(&mut self, wire: Wire) {
        self.wires.insert(wire.channel, wire);
    }

    /// Looks up the wire read out on `channel`.
    #[inline]
    pub fn get(&self, channel: u32) -> Option<&Wire> {
        self.wires.get(&channel)
    }

    /// Number of wires in the table.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Iterates over wires in channel order.
    pub fn iter(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }
}

fn parse_wire(line: &str) -> Option<Wire> {
    let mut fields = line.split_whitespace();
    let channel = fields.next()?.parse::<u32>().ok()?;
    let plane = Plane::from_id(fields.next()?.parse::<u8>().ok()?)?;

    let mut coords = [0.0f64; 6];
    for coord in coords.iter_mut() {
        *coord = fields.next()?.parse::<f64>().ok()?;
    }
    if fields.next().is_some() {
        return None;
    }

    Some(Wire::new(
        channel,
        plane,
        Position::new(coords[0], coords[1], coords[2]),
        Position::new(coords[3], coords[4], coords[5]),
    ))
}
