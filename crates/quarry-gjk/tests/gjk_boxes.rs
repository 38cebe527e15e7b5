use std::sync::Arc;

use quarry_geom::{Aabb, Quat, Transform, Vec3};
use quarry_gjk::{DEFAULT_MAX_ITERATIONS, Shape, ShapeInstance, gjk, gjk_with_limit};

fn unit_box_at(shape: &Arc<Shape>, at: Vec3) -> ShapeInstance {
    ShapeInstance::new(shape.clone(), Transform::from_translation(at))
}

#[test]
fn separated_boxes_do_not_intersect() {
    let shape = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let a = unit_box_at(&shape, Vec3::ZERO);
    let b = unit_box_at(&shape, Vec3::new(3.0, 0.0, 0.0));
    assert!(!gjk(&a, &b));
    assert!(!gjk(&b, &a));
}

#[test]
fn overlapping_boxes_intersect() {
    let shape = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let a = unit_box_at(&shape, Vec3::ZERO);
    let b = unit_box_at(&shape, Vec3::new(0.5, 0.3, 0.2));
    let r = gjk_with_limit(&a, &b, DEFAULT_MAX_ITERATIONS);
    assert!(r.intersecting);
    assert!(!r.exhausted);
    assert!(gjk(&b, &a));
}

#[test]
fn corner_contact_is_not_an_intersection() {
    let shape = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let a = unit_box_at(&shape, Vec3::ZERO);
    let b = unit_box_at(&shape, Vec3::splat(2.0));
    assert!(!gjk(&a, &b));
}

#[test]
fn offset_face_contact_is_not_an_intersection() {
    let shape = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let a = unit_box_at(&shape, Vec3::ZERO);
    for at in [
        Vec3::new(2.0, 0.5, 0.3),
        Vec3::new(-2.0, 0.25, -0.75),
        Vec3::new(0.5, 2.0, 0.5),
        Vec3::new(0.3, -0.6, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
    ] {
        let b = unit_box_at(&shape, at);
        assert!(!gjk(&a, &b), "face contact at {:?}", at);
        assert!(!gjk(&b, &a), "face contact at {:?} (swapped)", at);
    }
    // a sliver of real overlap is still found
    let b = unit_box_at(&shape, Vec3::new(1.9, 0.5, 0.3));
    assert!(gjk(&a, &b));
}

#[test]
fn sweep_enters_and_leaves_once() {
    let shape = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let a = unit_box_at(&shape, Vec3::ZERO);
    let mut b = unit_box_at(&shape, Vec3::ZERO);

    let mut states = Vec::new();
    for i in 0..42 {
        let x = -4.1 + 0.2 * i as f32;
        b.set_transform(Transform::from_translation(Vec3::new(x, 0.3, 0.2)));
        let expected = x.abs() < 2.0;
        let hit = gjk(&a, &b);
        assert_eq!(hit, expected, "x = {x}");
        states.push(hit);
    }
    let transitions = states.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(transitions, 2);
    assert!(!states[0] && !states[states.len() - 1]);
}

#[test]
fn rotated_box_reaches_farther_along_diagonal() {
    let big = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let small = Arc::new(Shape::cuboid(Vec3::splat(0.5)));
    let rot = Quat::from_axis_angle(Vec3::UP, std::f32::consts::FRAC_PI_4);
    let a = ShapeInstance::new(big, Transform::from_rotation_translation(rot, Vec3::ZERO));

    let near = unit_box_at(&small, Vec3::new(1.6, 0.0, 0.0));
    assert!(gjk(&a, &near));

    let far = unit_box_at(&small, Vec3::new(2.0, 0.0, 0.0));
    assert!(!gjk(&a, &far));
}

#[test]
fn raw_point_sets_work_without_instances() {
    let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0)).corners();
    let b: Vec<Vec3> = Aabb::from_center_half_extents(Vec3::new(1.5, 0.0, 0.0), Vec3::splat(1.0))
        .corners()
        .to_vec();
    assert!(gjk(&a[..], &b));
}

#[test]
fn box_collider_shape_matches_cuboid_instance() {
    let pos = Vec3::new(0.0, 4.0, 0.0);
    let collider = Shape::from_box_collider(Vec3::splat(1.0), Quat::IDENTITY, pos);
    let shape = Arc::new(Shape::cuboid(Vec3::splat(1.0)));
    let probe = unit_box_at(&shape, Vec3::new(0.0, 5.5, 0.0));
    assert!(gjk(&collider, &probe));
    let probe = unit_box_at(&shape, Vec3::new(0.0, 6.5, 0.0));
    assert!(!gjk(&collider, &probe));
}
