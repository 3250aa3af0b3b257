use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Half-line used for picking. `dir` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance along the ray to the first hit on a sphere, if any.
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sqrt_d;
        (far >= 0.0).then_some(far)
    }
}

/// Perspective camera with a look-at target. Y is up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 50.0, 80.0),
            target: Vec3::ZERO,
            fov_y_deg: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1_000_000.0,
        }
    }
}

impl Camera3D {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            near,
            far,
            ..Default::default()
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio from a viewport size. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// OpenGL-style clip space (z in [-1, 1]), matching the browser renderer.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
        }
    }

    /// Camera basis (forward, right, up) in world space.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Ray from the camera through normalized device coordinates
    /// (x right, y up, both in [-1, 1]).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let (forward, right, up) = self.basis();
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let dir = forward
            + right * (ndc.x * tan_half * self.aspect)
            + up * (ndc.y * tan_half);
        Ray::new(self.position, dir)
    }

    /// Rotate the camera on a sphere around `pivot` and look at it.
    /// The polar angle is clamped to [min_polar, PI - min_polar].
    /// Returns false when the camera sits too close to the pivot to orbit.
    pub fn orbit_around(&mut self, pivot: Vec3, d_azimuth: f32, d_polar: f32, min_polar: f32) -> bool {
        let rel = self.position - pivot;
        let radius = rel.length();
        if radius < 0.1 {
            return false;
        }
        let azimuth = rel.z.atan2(rel.x) + d_azimuth;
        let polar = ((rel.y / radius).clamp(-1.0, 1.0).acos() + d_polar)
            .clamp(min_polar, std::f32::consts::PI - min_polar);

        self.position = pivot
            + Vec3::new(
                radius * polar.sin() * azimuth.cos(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.sin(),
            );
        self.target = pivot;
        true
    }

    /// Move toward (direction < 0) or away from (direction > 0) `pivot` by
    /// `step` of the current distance. The move is applied only if the new
    /// distance lies strictly inside `(min, max)`.
    pub fn zoom_around(&mut self, pivot: Vec3, direction: f32, step: f32, min: f32, max: f32) -> bool {
        let rel = self.position - pivot;
        let radius = rel.length();
        if radius <= f32::EPSILON {
            return false;
        }
        let new_radius = radius + direction.signum() * step * radius;
        if new_radius <= min || new_radius >= max {
            return false;
        }
        self.position = pivot + rel * (new_radius / radius);
        self.target = pivot;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_on() -> Camera3D {
        let mut cam = Camera3D::new(60.0, 1.0, 0.1, 1000.0);
        cam.position = Vec3::new(0.0, 0.0, 10.0);
        cam.target = Vec3::ZERO;
        cam
    }

    #[test]
    fn center_ray_points_at_target() {
        let ray = head_on().ray_from_ndc(Vec2::ZERO);
        assert!((ray.dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn edge_ray_matches_field_of_view() {
        let ray = head_on().ray_from_ndc(Vec2::new(0.0, 1.0));
        // 60 degree vertical fov: top edge is 30 degrees above forward.
        let angle = ray.dir.angle_between(Vec3::new(0.0, 0.0, -1.0));
        assert!((angle - 30f32.to_radians()).abs() < 1e-4, "angle = {angle}");
        assert!(ray.dir.y > 0.0);
    }

    #[test]
    fn ray_hits_sphere_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn sphere_behind_ray_is_missed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn orbit_keeps_radius_and_clamps_polar() {
        let mut cam = Camera3D::default();
        let radius = cam.position.length();
        assert!(cam.orbit_around(Vec3::ZERO, 0.3, -10.0, 0.1));
        assert!((cam.position.length() - radius).abs() < 1e-3);
        let polar = (cam.position.y / radius).acos();
        assert!((polar - 0.1).abs() < 1e-4, "polar = {polar}");
    }

    #[test]
    fn orbit_refuses_near_pivot() {
        let mut cam = Camera3D::default();
        cam.position = Vec3::new(0.05, 0.0, 0.0);
        assert!(!cam.orbit_around(Vec3::ZERO, 1.0, 0.0, 0.1));
    }

    #[test]
    fn zoom_respects_range() {
        let mut cam = head_on();
        assert!(cam.zoom_around(Vec3::ZERO, -1.0, 0.1, 1.0, 150.0));
        assert!((cam.position.z - 9.0).abs() < 1e-5);
        // 9 * 1.1 = 9.9 is inside, 9 * 0.9 = 8.1 is outside a (8.5, 20) range.
        assert!(!cam.zoom_around(Vec3::ZERO, -1.0, 0.1, 8.5, 20.0));
        assert!((cam.position.z - 9.0).abs() < 1e-5);
    }

    #[test]
    fn viewport_updates_aspect() {
        let mut cam = Camera3D::default();
        cam.set_viewport(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.set_viewport(100.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
