use quarry_geom::Vec3;

/// What the walker found in one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit<T> {
    Empty,
    Hit(T),
    /// Leave the walk without a hit, e.g. the cell is not loaded.
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelHit<T> {
    pub value: T,
    pub pos: [i32; 3],
    /// Points back out of the entered face. Zero when the ray starts inside.
    pub normal: [i32; 3],
    /// Distance from the origin to the entry point.
    pub t: f32,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

#[inline]
fn sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Grid walk (DDA) from `origin` along `dir` for at most `max_dist`. Cells
/// are visited in order until `visit` reports a hit or asks to stop.
pub fn raycast_visit<T, F>(origin: Vec3, dir: Vec3, max_dist: f32, mut visit: F) -> Option<VoxelHit<T>>
where
    F: FnMut([i32; 3]) -> Visit<T>,
{
    let len = dir.length();
    if len < 1e-6 || !max_dist.is_finite() || !origin.length_sq().is_finite() {
        return None;
    }
    let d = dir / len;

    let mut cell = [
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    ];
    let step = [sign(d.x), sign(d.y), sign(d.z)];
    let inv = [inv_or_max(d.x), inv_or_max(d.y), inv_or_max(d.z)];
    let o = origin.to_array();
    let mut t_delta = [f32::MAX; 3];
    let mut t_max = [f32::MAX; 3];
    for a in 0..3 {
        let f = o[a] - o[a].floor();
        if step[a] > 0 {
            t_max[a] = (1.0 - f) * inv[a];
            t_delta[a] = inv[a];
        } else if step[a] < 0 {
            t_max[a] = f * inv[a];
            t_delta[a] = inv[a];
        }
    }

    let mut normal = [0i32; 3];
    let mut t = 0.0f32;
    // Each step crosses one cell boundary; three axes bound the count.
    let max_steps = (max_dist as usize).saturating_add(2).saturating_mul(3);
    for _ in 0..max_steps {
        if t > max_dist {
            break;
        }
        match visit(cell) {
            Visit::Hit(value) => {
                return Some(VoxelHit {
                    value,
                    pos: cell,
                    normal,
                    t,
                });
            }
            Visit::Stop => return None,
            Visit::Empty => {}
        }
        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        cell[axis] = cell[axis].saturating_add(step[axis]);
        t = t_max[axis];
        t_max[axis] += t_delta[axis];
        normal = [0; 3];
        normal[axis] = -step[axis];
    }
    None
}

/// First solid cell along the ray.
pub fn raycast_first_hit<F>(origin: Vec3, dir: Vec3, max_dist: f32, mut is_solid: F) -> Option<VoxelHit<()>>
where
    F: FnMut(i32, i32, i32) -> bool,
{
    raycast_visit(origin, dir, max_dist, |[x, y, z]| {
        if is_solid(x, y, z) {
            Visit::Hit(())
        } else {
            Visit::Empty
        }
    })
}
