use quarry_geom::Vec3;
use quarry_runtime::RayHit;

use super::App;

#[derive(Clone, Debug, PartialEq)]
pub struct RaycastSummary {
    pub frames: u64,
    pub resident: usize,
    pub hit: Option<RayHit>,
}

/// Streams around `origin` until the window is loaded, then casts `ray`
/// from it. The ray's length is its reach.
pub fn run_raycast(app: &mut App, origin: Vec3, ray: Vec3) -> RaycastSummary {
    app.focal = origin;
    // one chunk per frame at worst, plus the idle frame
    let window = 2 * u64::from(app.config.stream.radius) * (u64::from(app.config.stream.radius) + 1) + 1;
    let frames = app.fill_window(window + 1);
    let hit = app.cast(origin, ray);
    match &hit {
        Some(h) => log::info!(
            "raycast: {:?} at {:?}, normal {:?}, t={:.3}, place at {:?}",
            h.block.kind(),
            h.pos,
            h.normal,
            h.t,
            h.place_pos()
        ),
        None => log::info!("raycast: no hit within {:.1}", ray.length()),
    }
    RaycastSummary {
        frames,
        resident: app.store.len(),
        hit,
    }
}
