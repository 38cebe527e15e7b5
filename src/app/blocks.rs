use quarry_geom::Vec3;
use quarry_runtime::StoreStats;

use super::App;

/// Reach of the downward ray cast each frame.
const GROUND_REACH: f32 = 256.0;

#[derive(Clone, Debug, PartialEq)]
pub struct BlocksSummary {
    pub frames: u64,
    pub resident: usize,
    pub created: usize,
    pub ground_hits: u64,
    /// Meshes submitted over all frames.
    pub draw_calls: u64,
    pub stats: StoreStats,
    pub live_meshes: usize,
}

/// Walks the focal point along +X at `speed` blocks per frame, streaming and
/// casting a ray at the ground below it each frame.
pub fn run_blocks(app: &mut App, frames: u64, speed: f32) -> BlocksSummary {
    let mut created = 0;
    let mut ground_hits = 0;
    let mut draw_calls = 0;
    for _ in 0..frames {
        app.focal += Vec3::new(speed, 0.0, 0.0);
        let report = app.step();
        created += report.created.len();
        draw_calls += app.draw_list().len() as u64;

        let hit = app.cast(app.focal, Vec3::new(0.0, -GROUND_REACH, 0.0));
        match hit {
            Some(h) => {
                ground_hits += 1;
                log::trace!(
                    "frame {}: ground {:?} at {:?}, t={:.2}",
                    app.frame,
                    h.block.kind(),
                    h.pos,
                    h.t
                );
            }
            None => log::trace!("frame {}: no ground below {:?}", app.frame, app.focal),
        }
    }

    let summary = BlocksSummary {
        frames,
        resident: app.store.len(),
        created,
        ground_hits,
        draw_calls,
        stats: app.store.stats(),
        live_meshes: app.builder.live_count(),
    };
    log::info!(
        "blocks: {} frames, {} resident, {} created ({} recycled), {} remeshes, {} live meshes",
        summary.frames,
        summary.resident,
        summary.created,
        summary.stats.recycled,
        summary.stats.remeshed,
        summary.live_meshes
    );
    summary
}
