use glam::{Mat4, Vec2, Vec3, Vec4};
use winit::dpi::PhysicalSize;

const DEFAULT_UP: Vec3 = Vec3::Y;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// First-person camera fixed at the sphere center, looking outward. Yaw 0 /
/// pitch 0 faces -Z.
#[derive(Debug, Clone)]
pub struct PanoCamera {
    pub yaw_radians: f32,
    pub pitch_radians: f32,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl PanoCamera {
    pub fn new(fov_y_radians: f32) -> Self {
        Self { yaw_radians: 0.0, pitch_radians: 0.0, fov_y_radians, near: 0.1, far: 2000.0 }
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw_radians.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch_radians.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(Vec3::ZERO, self.forward(), DEFAULT_UP)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    fn aspect(viewport: PhysicalSize<u32>) -> f32 {
        if viewport.height > 0 {
            viewport.width as f32 / viewport.height as f32
        } else {
            1.0
        }
    }

    /// World-space ray from the camera through a pointer position given in
    /// normalized device coordinates (x and y in [-1, 1], y up).
    pub fn screen_ray(&self, ndc: Vec2, viewport: PhysicalSize<u32>) -> Option<(Vec3, Vec3)> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let clip = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let inv_view_proj = (self.projection_matrix(Self::aspect(viewport)) * self.view_matrix()).inverse();
        let world = inv_view_proj * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let dir = (world.truncate() / world.w).normalize_or_zero();
        if dir.length_squared() < f32::EPSILON {
            return None;
        }
        Some((Vec3::ZERO, dir))
    }

    /// Projects a world point to pixel coordinates. `None` when the point is
    /// behind the camera, so markers on the far hemisphere are culled.
    pub fn project_point(&self, point: Vec3, viewport: PhysicalSize<u32>) -> Option<Vec2> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let clip = self.projection_matrix(Self::aspect(viewport)) * self.view_matrix() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height as f32;
        Some(Vec2::new(x, y))
    }
}

/// Pointer-driven look-around control. Suspended while a hotspot drag is
/// active so the two never fight over the same pointer samples.
#[derive(Debug, Clone)]
pub struct LookControl {
    pub sensitivity: f32,
    pub zoom_step_radians: f32,
    pub fov_min_radians: f32,
    pub fov_max_radians: f32,
    suspended: bool,
}

impl LookControl {
    pub fn new(sensitivity: f32, fov_min_radians: f32, fov_max_radians: f32) -> Self {
        Self {
            sensitivity,
            zoom_step_radians: 2.0_f32.to_radians(),
            fov_min_radians,
            fov_max_radians,
            suspended: false,
        }
    }

    pub fn suspended(&self) -> bool {
        self.suspended
    }

    // Both are idempotent; teardown paths call resume unconditionally.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Applies a pointer delta in pixels. Dragging right pans the view left,
    /// matching grab-the-world panorama controls.
    pub fn drag(&mut self, delta_px: Vec2, camera: &mut PanoCamera) {
        if self.suspended {
            return;
        }
        camera.yaw_radians -= delta_px.x * self.sensitivity;
        camera.pitch_radians =
            (camera.pitch_radians + delta_px.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, wheel_delta: f32, camera: &mut PanoCamera) {
        if self.suspended {
            return;
        }
        camera.fov_y_radians = (camera.fov_y_radians - wheel_delta * self.zoom_step_radians)
            .clamp(self.fov_min_radians, self.fov_max_radians);
    }
}
