//! Example usage of the tagmatch library
//!
//! Builds a synthetic event with two straight cosmic tracks, one in each
//! detector half, plus an uncorrelated tagger hit, and matches it.
//! Set `RUST_LOG=tagmatch=debug` to follow the individual stages.

use tagmatch::prelude::*;
use tagmatch::types::Position;
use tracing_subscriber::EnvFilter;

/// Rise of an induction wire per unit z.
const STEREO_SLOPE: f64 = 0.577_350_269_189_625_8;

/// Straight line parameterised by height.
struct Cosmic {
    x0: f64,
    z0: f64,
    slope_x: f64,
    slope_z: f64,
}

impl Cosmic {
    fn at(&self, y: f64) -> Position {
        Position::new(self.x0 + self.slope_x * y, y, self.z0 + self.slope_z * y)
    }
}

#[derive(Default)]
struct SyntheticEvent {
    wires: Vec<Wire>,
    hits: EventHits,
    time: f64,
}

impl SyntheticEvent {
    /// Adds tagger hits on all three layers and space points every 2.5 units of height.
    fn add_cosmic(&mut self, cosmic: &Cosmic, plane_x: f64) {
        for y in [618.0, 358.0, -361.0] {
            let p = cosmic.at(y);
            self.hits.tagger_hits.push(TaggerHit::new(p.x, p.y, p.z, self.time));
        }

        let half = DetectorHalf::of_x(plane_x);
        let mut y = 197.5;
        while y > -200.0 {
            let z = cosmic.at(y).z;
            self.add_crossing(half, plane_x, y, z);
            y -= 2.5;
        }
    }

    /// Three wires crossing at (x, y, z), hit in coincidence.
    fn add_crossing(&mut self, half: DetectorHalf, x: f64, y: f64, z: f64) {
        let channel = self.wires.len() as u32;
        let rise = 10.0 * STEREO_SLOPE;
        self.wires.extend([
            Wire::new(channel, Plane::U, Position::new(x, y + rise, z - 10.0), Position::new(x, y - rise, z + 10.0)),
            Wire::new(channel + 1, Plane::V, Position::new(x, y - rise, z - 10.0), Position::new(x, y + rise, z + 10.0)),
            Wire::new(channel + 2, Plane::Y, Position::new(x, -200.0, z), Position::new(x, 200.0, z)),
        ]);
        self.hits.wire_hits.extend([
            WireHit::new(channel, half, Plane::U, channel, self.time),
            WireHit::new(channel + 1, half, Plane::V, channel + 1, self.time + 3.5),
            WireHit::new(channel + 2, half, Plane::Y, channel + 2, self.time + 7.0),
        ]);
        self.time += 20.0;
    }
}

fn main() -> tagmatch::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("tagmatch: Tagger to Wire-Plane Track Matching");
    println!("=============================================\n");

    let mut event = SyntheticEvent::default();
    event.add_cosmic(
        &Cosmic {
            x0: -60.0,
            z0: 300.0,
            slope_x: 0.05,
            slope_z: 0.1,
        },
        -180.0,
    );
    event.add_cosmic(
        &Cosmic {
            x0: 80.0,
            z0: -150.0,
            slope_x: -0.03,
            slope_z: -0.05,
        },
        180.0,
    );
    event
        .hits
        .tagger_hits
        .push(TaggerHit::new(10.0, 618.0, 500.0, 0.0));

    let wires = WireTable::from_wires(event.wires)?;
    let config = ReconstructionConfig::default();
    let processor = EventProcessor::new(config, &wires)?;

    println!(
        "Geometry: {} wires, {} height bins of {:.1}\n",
        wires.len(),
        processor.config().height_bins,
        processor.config().bin_width()
    );

    // The same event twice, processed as one parallel window
    let mut source = MemoryHitSource::new([event.hits.clone(), event.hits]);
    let results = processor.run_parallel(&mut source, 0);

    for (n, result) in results.iter().enumerate() {
        println!(
            "Event {}: {} tagger hits, {} candidates, {} space points",
            n,
            result.summary.tagger_hits,
            result.tracks.len(),
            result.index.len()
        );
        for half in DetectorHalf::ALL {
            let index = result.index.half(half);
            println!("  {:?} half: {} points in {} bins", half, index.len(), index.num_bins());
        }
        for &id in &result.matches {
            let Some(track) = result.track(id) else {
                continue;
            };
            let top = track.topmost();
            println!(
                "  Match {}: {} endpoints, top=({:.1}, {:.1}, {:.1}), slope=({:.3}, {:.3}), score={:.3}",
                id,
                track.num_endpoints(),
                top.x,
                top.y,
                top.z,
                track.slope_x(),
                track.slope_z(),
                result.score(id).unwrap_or(0.0)
            );
        }
        println!();
    }

    let summary = RunSummary::from_results(&results);
    println!(
        "Run complete: {} events, {} matches, real hit fraction {:.2}",
        summary.events,
        summary.matches,
        summary.real_fraction().unwrap_or(0.0)
    );

    Ok(())
}
