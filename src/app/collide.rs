use std::path::Path;
use std::sync::Arc;

use quarry_geom::{Transform, Vec3};
use quarry_gjk::{Shape, ShapeInstance, gjk_with_limit};
use quarry_io::{BmfError, load_bmf};
use quarry_mesh_cpu::{HeadlessMeshBuilder, MeshBuilder, MeshId, shape_color_vertices};

/// A placed shape together with the mesh used to draw it.
pub struct DemoBody {
    pub instance: ShapeInstance,
    pub mesh: Option<MeshId>,
}

impl DemoBody {
    pub fn new(shape: Arc<Shape>, at: Vec3, color: u32, builder: &mut HeadlessMeshBuilder) -> Self {
        let verts = shape_color_vertices(&shape.positions, &shape.indices, color);
        let mesh = (!verts.is_empty()).then(|| builder.build_color_mesh(&verts));
        Self {
            instance: ShapeInstance::new(shape, Transform::from_translation(at)),
            mesh,
        }
    }

    pub fn move_to(&mut self, at: Vec3) {
        self.instance.set_transform(Transform::from_translation(at));
    }

    /// Largest |x| of the template, used to size the sweep.
    fn x_extent(&self) -> f32 {
        self.instance
            .shape
            .positions
            .iter()
            .fold(0.0f32, |m, p| m.max(p.x.abs()))
    }

    pub fn release(&mut self, builder: &mut HeadlessMeshBuilder) {
        if let Some(h) = self.mesh.take() {
            builder.destroy_mesh(h);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GjkSweep {
    pub steps: usize,
    pub hits: usize,
    /// `(step, now_intersecting)` for every change of the overlap state.
    pub transitions: Vec<(usize, bool)>,
    pub exhausted: usize,
}

/// Sweeps a moving body through a unit box at the origin along X. The moving
/// body is the first box collider of `bmf` (or its vertex hull when it has
/// none), or a unit box without a file.
pub fn run_gjk(bmf: Option<&Path>, steps: usize, max_iterations: u32) -> Result<GjkSweep, BmfError> {
    let moving_shape = match bmf {
        Some(path) => {
            let model = load_bmf(path)?;
            match model.collider_shapes().into_iter().next() {
                Some(s) => s,
                None => {
                    log::warn!("{} has no box colliders, using its vertex hull", path.display());
                    Arc::new(model.hull_shape())
                }
            }
        }
        None => Arc::new(Shape::cuboid(Vec3::splat(1.0))),
    };

    let mut builder = HeadlessMeshBuilder::new();
    let mut fixed = DemoBody::new(Arc::new(Shape::cuboid(Vec3::splat(1.0))), Vec3::ZERO, 0xff_80_80_80, &mut builder);
    let mut moving = DemoBody::new(moving_shape, Vec3::ZERO, 0xff_20_c0_20, &mut builder);

    let steps = steps.max(2);
    let span = fixed.x_extent() + moving.x_extent() + 1.0;
    let mut sweep = GjkSweep {
        steps,
        ..GjkSweep::default()
    };
    let mut prev = None;
    for i in 0..steps {
        let x = -span + 2.0 * span * i as f32 / (steps - 1) as f32;
        moving.move_to(Vec3::new(x, 0.0, 0.0));
        let r = gjk_with_limit(&moving.instance, &fixed.instance, max_iterations);
        if r.exhausted {
            sweep.exhausted += 1;
        }
        if r.intersecting {
            sweep.hits += 1;
        }
        if prev.is_some_and(|p| p != r.intersecting) {
            log::info!("gjk: step {} x={:.3} -> {}", i, x, r.intersecting);
            sweep.transitions.push((i, r.intersecting));
        }
        prev = Some(r.intersecting);
    }

    fixed.release(&mut builder);
    moving.release(&mut builder);
    log::info!(
        "gjk: {} steps, {} overlapping, {} transitions, {} capped",
        sweep.steps,
        sweep.hits,
        sweep.transitions.len(),
        sweep.exhausted
    );
    Ok(sweep)
}
