use proptest::prelude::*;
use quarry_geom::{Aabb, Vec3};
use quarry_gjk::{DEFAULT_MAX_ITERATIONS, gjk_with_limit};

fn near_boundary(d: f32, reach: f32) -> bool {
    (d.abs() - reach).abs() < 0.05
}

proptest! {
    #[test]
    fn agrees_with_aabb_overlap(
        dx in -4.0f32..4.0, dy in -4.0f32..4.0, dz in -4.0f32..4.0,
        ha in 0.25f32..2.0, hb in 0.25f32..2.0,
    ) {
        let reach = ha + hb;
        prop_assume!(!near_boundary(dx, reach) && !near_boundary(dy, reach) && !near_boundary(dz, reach));

        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(ha));
        let b = Aabb::from_center_half_extents(Vec3::new(dx, dy, dz), Vec3::splat(hb));
        let r = gjk_with_limit(&a.corners()[..], &b.corners()[..], DEFAULT_MAX_ITERATIONS);
        prop_assert!(!r.exhausted);
        prop_assert_eq!(r.intersecting, a.intersects(&b));
    }

    #[test]
    fn result_is_symmetric(dx in -3.0f32..3.0, dy in -3.0f32..3.0, dz in -3.0f32..3.0) {
        prop_assume!(!near_boundary(dx, 2.0) && !near_boundary(dy, 2.0) && !near_boundary(dz, 2.0));
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0)).corners();
        let b = Aabb::from_center_half_extents(Vec3::new(dx, dy, dz), Vec3::splat(1.0)).corners();
        let ab = gjk_with_limit(&a[..], &b[..], DEFAULT_MAX_ITERATIONS).intersecting;
        let ba = gjk_with_limit(&b[..], &a[..], DEFAULT_MAX_ITERATIONS).intersecting;
        prop_assert_eq!(ab, ba);
    }
}
