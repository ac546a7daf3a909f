use glam::{Vec2, Vec3};
use panotour_engine::{
    pick_sphere_point, ray_sphere_intersection, snap_to_sphere, PanoCamera, SPHERE_RADIUS,
};
use winit::dpi::PhysicalSize;

const VIEWPORT: PhysicalSize<u32> = PhysicalSize::new(1000, 500);

fn camera() -> PanoCamera {
    PanoCamera::new(75.0_f32.to_radians())
}

#[test]
fn center_of_screen_hits_straight_ahead() {
    let point = pick_sphere_point(&camera(), Vec2::ZERO, VIEWPORT, SPHERE_RADIUS)
        .expect("center ray must hit the enclosing sphere");
    assert!((point - Vec3::new(0.0, 0.0, -SPHERE_RADIUS)).length() < 1e-2, "got {point}");
}

#[test]
fn every_ndc_sample_lands_exactly_on_the_sphere() {
    let camera = camera();
    for &ndc in &[
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-0.97, 0.42),
        Vec2::new(0.5, -0.5),
        Vec2::new(0.0, 0.99),
    ] {
        let point = pick_sphere_point(&camera, ndc, VIEWPORT, SPHERE_RADIUS)
            .unwrap_or_else(|| panic!("ray from {ndc} missed from inside the sphere"));
        assert!(
            (point.length() - SPHERE_RADIUS).abs() < 1e-2,
            "|{point}| = {} for ndc {ndc}",
            point.length()
        );
    }
}

#[test]
fn repeated_picks_are_identical() {
    let camera = camera();
    let ndc = Vec2::new(0.31, -0.64);
    let a = pick_sphere_point(&camera, ndc, VIEWPORT, SPHERE_RADIUS).unwrap();
    let b = pick_sphere_point(&camera, ndc, VIEWPORT, SPHERE_RADIUS).unwrap();
    assert_eq!(a, b);
}

#[test]
fn picks_follow_the_camera_orientation() {
    let mut camera = camera();
    camera.yaw_radians = std::f32::consts::FRAC_PI_2;
    let point = pick_sphere_point(&camera, Vec2::ZERO, VIEWPORT, SPHERE_RADIUS).unwrap();
    let expected = camera.forward() * SPHERE_RADIUS;
    assert!((point - expected).length() < 1e-2, "got {point}, expected {expected}");
}

#[test]
fn ray_from_outside_can_miss() {
    // Grazing ray well outside a small sphere.
    let hit = ray_sphere_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Z, Vec3::ZERO, 1.0);
    assert_eq!(hit, None);
}

#[test]
fn ray_behind_the_origin_is_rejected() {
    // Sphere entirely behind the ray start.
    let hit = ray_sphere_intersection(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::ZERO, 1.0);
    assert_eq!(hit, None);
}

#[test]
fn snap_rescales_and_rejects_degenerate_points() {
    let snapped = snap_to_sphere(Vec3::new(3.0, 4.0, 0.0), SPHERE_RADIUS).unwrap();
    assert!((snapped.length() - SPHERE_RADIUS).abs() < 1e-3);
    assert!((snapped.normalize() - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-6);
    assert_eq!(snap_to_sphere(Vec3::ZERO, SPHERE_RADIUS), None);
}
