use flyview_camera::Camera;
use glam::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 640.0 / 480.0,
            near: 0.1,
            far: 10.0,
        }
    }
}

impl Projection {
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let mut projection = Self::default();
        projection.resize(width, height);
        projection
    }

    /// Track a new viewport size. A zero height is treated as one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Right-handed perspective with a `[0, 1]` depth range.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

/// Constant per-frame rotation of the drawn object about world Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Current angle in radians.
    pub angle: f32,
    /// Radians added every frame.
    pub step: f32,
}

impl Default for Spin {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Spin {
    pub fn new(step: f32) -> Self {
        Self { angle: 0.0, step }
    }

    pub fn advance(&mut self) {
        self.angle += self.step;
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle)
    }
}

/// Projection and model state combined with the camera view once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTransforms {
    pub projection: Projection,
    pub spin: Spin,
}

impl FrameTransforms {
    pub fn new(projection: Projection, spin: Spin) -> Self {
        Self { projection, spin }
    }

    /// `projection * view * model` for the current spin angle.
    pub fn combined(&self, view: Mat4) -> Mat4 {
        self.projection.matrix() * view * self.spin.model()
    }

    /// Advance the spin, then build the combined matrix for `camera`.
    pub fn next_frame(&mut self, camera: &Camera) -> Mat4 {
        self.spin.advance();
        self.combined(camera.view_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn default_projection() {
        let p = Projection::default();
        assert_eq!(p.fov_y_degrees, 45.0);
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 10.0);
        assert!((p.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn resize_guards_zero_height() {
        let mut p = Projection::for_viewport(1280, 720);
        assert!((p.aspect - 16.0 / 9.0).abs() < 1e-6);
        p.resize(800, 0);
        assert_eq!(p.aspect, 800.0);
    }

    #[test]
    fn projection_depth_range_is_zero_to_one() {
        let m = Projection::default().matrix();
        let near = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = m * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn spin_advances_by_step() {
        let mut spin = Spin::default();
        assert_eq!(spin.model(), Mat4::IDENTITY);
        for _ in 0..100 {
            spin.advance();
        }
        assert!((spin.angle - 1.0).abs() < 1e-4);
    }

    #[test]
    fn combined_is_projection_view_model() {
        let mut transforms = FrameTransforms::default();
        transforms.spin.angle = 0.7;
        let view = Camera::default().view_matrix();
        let expected =
            transforms.projection.matrix() * view * Mat4::from_rotation_y(0.7);
        assert!(transforms.combined(view).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn next_frame_spins_before_combining() {
        let mut transforms = FrameTransforms::default();
        let camera = Camera::default();
        let m = transforms.next_frame(&camera);
        assert!((transforms.spin.angle - 0.01).abs() < 1e-7);
        assert!(m.abs_diff_eq(transforms.combined(camera.view_matrix()), 1e-6));
    }

    #[test]
    fn origin_lands_in_view_volume() {
        let mut transforms = FrameTransforms::default();
        let clip = transforms.next_frame(&Camera::default()) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
