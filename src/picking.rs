use crate::camera::PanoCamera;
use glam::{Vec2, Vec3};
use winit::dpi::PhysicalSize;

/// Distance along the ray to the first sphere hit, or `None` on a miss.
pub fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let mut t = -b - sqrt_d;
    if t < 0.0 {
        t = -b + sqrt_d;
    }
    if t < 0.0 {
        return None;
    }
    Some(t)
}

/// Rescales a point to lie exactly on the sphere of `radius` around the
/// origin. `None` for a degenerate (zero-length) input.
pub fn snap_to_sphere(point: Vec3, radius: f32) -> Option<Vec3> {
    let dir = point.normalize_or_zero();
    if dir.length_squared() < f32::EPSILON {
        return None;
    }
    Some(dir * radius)
}

/// Maps a pointer position in NDC onto the panorama sphere. The camera sits
/// at the sphere center so rays hit the interior surface; the result is
/// snapped back to the radius to correct floating-point drift from the
/// intersection itself.
pub fn pick_sphere_point(
    camera: &PanoCamera,
    ndc: Vec2,
    viewport: PhysicalSize<u32>,
    radius: f32,
) -> Option<Vec3> {
    let (origin, dir) = camera.screen_ray(ndc, viewport)?;
    let t = ray_sphere_intersection(origin, dir, Vec3::ZERO, radius)?;
    snap_to_sphere(origin + dir * t, radius)
}
