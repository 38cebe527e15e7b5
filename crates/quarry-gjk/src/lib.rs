//! Convex shape intersection via GJK.
#![forbid(unsafe_code)]

mod shape;
mod simplex;

pub use shape::{Shape, ShapeInstance};
pub use simplex::{Simplex, next_simplex};

use quarry_geom::Vec3;

pub const DEFAULT_MAX_ITERATIONS: u32 = 64;

/// Relative slack on the progress test, so a support point lying on the
/// contact plane counts as no progress.
const CONTACT_EPS: f32 = 1e-6;

/// A convex point set that can answer support queries.
pub trait Support {
    /// Farthest point along `dir`.
    fn support_point(&self, dir: Vec3) -> Vec3;
    /// A point inside the hull, used to seed the search direction.
    fn reference_point(&self) -> Vec3;
}

/// Index of the point with the greatest projection onto `dir`. The first
/// maximum wins on ties; an empty slice yields 0.
pub fn support(points: &[Vec3], dir: Vec3) -> usize {
    let mut best = 0;
    let mut max_d = f32::MIN;
    for (i, p) in points.iter().enumerate() {
        let d = p.dot(dir);
        if d > max_d {
            max_d = d;
            best = i;
        }
    }
    best
}

impl Support for [Vec3] {
    fn support_point(&self, dir: Vec3) -> Vec3 {
        self.get(support(self, dir)).copied().unwrap_or(Vec3::ZERO)
    }

    fn reference_point(&self) -> Vec3 {
        shape::centroid(self)
    }
}

impl Support for Vec<Vec3> {
    fn support_point(&self, dir: Vec3) -> Vec3 {
        self.as_slice().support_point(dir)
    }

    fn reference_point(&self) -> Vec3 {
        self.as_slice().reference_point()
    }
}

impl Support for Shape {
    fn support_point(&self, dir: Vec3) -> Vec3 {
        self.positions.support_point(dir)
    }

    fn reference_point(&self) -> Vec3 {
        self.centroid()
    }
}

impl Support for ShapeInstance {
    fn support_point(&self, dir: Vec3) -> Vec3 {
        self.positions().support_point(dir)
    }

    fn reference_point(&self) -> Vec3 {
        self.transform.translation
    }
}

/// Support point of the Minkowski difference `a - b`.
#[inline]
pub fn minkowski_support<A, B>(a: &A, b: &B, dir: Vec3) -> Vec3
where
    A: Support + ?Sized,
    B: Support + ?Sized,
{
    a.support_point(dir) - b.support_point(-dir)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GjkResult {
    pub intersecting: bool,
    pub iterations: u32,
    /// The iteration cap was hit before a decision.
    pub exhausted: bool,
}

/// `true` when the convex hulls of `a` and `b` overlap with positive depth.
/// Shapes that only touch, at a vertex, an edge or a face, are reported as
/// separated.
pub fn gjk<A, B>(a: &A, b: &B) -> bool
where
    A: Support + ?Sized,
    B: Support + ?Sized,
{
    gjk_with_limit(a, b, DEFAULT_MAX_ITERATIONS).intersecting
}

pub fn gjk_with_limit<A, B>(a: &A, b: &B, max_iterations: u32) -> GjkResult
where
    A: Support + ?Sized,
    B: Support + ?Sized,
{
    let mut dir = a.reference_point() - b.reference_point();
    if dir.length_sq() == 0.0 {
        dir = Vec3::X;
    }

    let first = minkowski_support(a, b, dir);
    let mut simplex = Simplex::new();
    simplex.push_front(first);
    dir = -first;

    for iteration in 1..=max_iterations {
        let p = minkowski_support(a, b, dir);
        if p.dot(dir) <= CONTACT_EPS * p.length() * dir.length() {
            return GjkResult {
                intersecting: false,
                iterations: iteration,
                exhausted: false,
            };
        }
        simplex.push_front(p);
        if next_simplex(&mut simplex, &mut dir) {
            return GjkResult {
                intersecting: true,
                iterations: iteration,
                exhausted: false,
            };
        }
    }

    log::debug!(
        "gjk: no decision after {} iterations (simplex len {})",
        max_iterations,
        simplex.len()
    );
    GjkResult {
        intersecting: false,
        iterations: max_iterations,
        exhausted: true,
    }
}
