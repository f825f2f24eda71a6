use glam::{Mat4, Quat, Vec3};

/// Degrees of yaw applied per pixel of horizontal mouse motion.
pub const LOOK_SENSITIVITY: f32 = 0.1;

/// Squared cross-product length below which `facing` and `up` count as parallel.
const COLLINEAR_EPSILON: f32 = 1e-6;

/// Reasons a camera basis is rejected by [`Camera::checked`] and [`Camera::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("{field} has a non-finite component: {value}")]
    NonFinite { field: &'static str, value: Vec3 },
    #[error("{field} has zero length")]
    ZeroLength { field: &'static str },
    #[error("facing {facing} is parallel to up {up}")]
    Collinear { facing: Vec3, up: Vec3 },
}

/// Free-fly camera: an eye position looking along `facing`, oriented by `up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    facing: Vec3,
    up: Vec3,
}

impl Default for Camera {
    /// Five units back from the origin, looking at it.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            facing: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl Camera {
    /// Build a camera from raw vectors. Nothing is normalized or validated; a
    /// non-unit or degenerate triple produces an undefined view matrix.
    pub fn new(position: Vec3, facing: Vec3, up: Vec3) -> Self {
        Self {
            position,
            facing,
            up,
        }
    }

    /// Build a camera after rejecting non-finite, zero-length or collinear input.
    /// `facing` and `up` are stored normalized.
    pub fn checked(position: Vec3, facing: Vec3, up: Vec3) -> Result<Self, CameraError> {
        let camera = Self {
            position,
            facing: facing.normalize_or_zero(),
            up: up.normalize_or_zero(),
        };
        check_finite("position", position)?;
        check_finite("facing", facing)?;
        check_finite("up", up)?;
        camera.validate()?;
        Ok(camera)
    }

    /// Check that the current state yields a well-defined view basis.
    pub fn validate(&self) -> Result<(), CameraError> {
        check_finite("position", self.position)?;
        check_finite("facing", self.facing)?;
        check_finite("up", self.up)?;
        if self.facing.length_squared() == 0.0 {
            return Err(CameraError::ZeroLength { field: "facing" });
        }
        if self.up.length_squared() == 0.0 {
            return Err(CameraError::ZeroLength { field: "up" });
        }
        let cross = self.facing.normalize().cross(self.up.normalize());
        if cross.length_squared() < COLLINEAR_EPSILON {
            return Err(CameraError::Collinear {
                facing: self.facing,
                up: self.up,
            });
        }
        Ok(())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The point the camera looks at: one `facing` step ahead of the eye.
    pub fn target(&self) -> Vec3 {
        self.position + self.facing
    }

    /// Right-handed look-at view matrix, column-major like `Mat4::perspective_rh`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target(), self.up)
    }

    /// Yaw `facing` around `up` by `-delta_x` pixels times [`LOOK_SENSITIVITY`] degrees.
    ///
    /// Deltas are relative motion since the previous call. `delta_y` is accepted
    /// for symmetry with the input layer but has no effect.
    pub fn look(&mut self, delta_x: f32, _delta_y: f32) {
        let angle = (-delta_x * LOOK_SENSITIVITY).to_radians();
        let yaw = Quat::from_axis_angle(self.up.normalize(), angle);
        self.facing = (yaw * self.facing).normalize();
    }

    /// Step towards world -Z.
    pub fn move_forward(&mut self, speed: f32) {
        self.position.z -= speed;
    }

    /// Step towards world +Z.
    pub fn move_backward(&mut self, speed: f32) {
        self.position.z += speed;
    }

    /// Step towards world -X.
    pub fn move_left(&mut self, speed: f32) {
        self.position.x -= speed;
    }

    /// Step towards world +X.
    pub fn move_right(&mut self, speed: f32) {
        self.position.x += speed;
    }
}

fn check_finite(field: &'static str, value: Vec3) -> Result<(), CameraError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CameraError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, EPS), "{a} != {b}");
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.facing(), Vec3::NEG_Z);
        assert_eq!(cam.up(), Vec3::Y);
        assert_eq!(cam.target(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn default_view_matrix_matches_look_at() {
        let expected = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::Y,
        );
        assert!(Camera::default().view_matrix().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn default_view_moves_origin_five_units_ahead() {
        let origin = Camera::default().view_matrix().transform_point3(Vec3::ZERO);
        assert_vec_near(origin, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn forward_then_backward_restores_position() {
        for d in [0.0, 0.1, 1.5, 42.0, -3.25] {
            let mut cam = Camera::default();
            let start = cam.position();
            cam.move_forward(d);
            cam.move_backward(d);
            assert_vec_near(cam.position(), start);
        }
    }

    #[test]
    fn strafing_only_touches_x() {
        let mut cam = Camera::default();
        cam.move_left(0.5);
        assert_eq!(cam.position(), Vec3::new(-0.5, 0.0, 5.0));
        cam.move_right(2.0);
        assert_eq!(cam.position(), Vec3::new(1.5, 0.0, 5.0));
    }

    #[test]
    fn forward_backward_only_touch_z() {
        let mut cam = Camera::default();
        cam.move_forward(1.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 4.0));
        cam.move_backward(3.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 7.0));
    }

    #[test]
    fn movement_ignores_facing() {
        let mut cam = Camera::default();
        cam.look(900.0, 0.0);
        cam.move_forward(1.0);
        assert_vec_near(cam.position(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn look_never_moves_position() {
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z, Vec3::Y);
        for dx in [10.0, -250.0, 3600.0, 0.5] {
            cam.look(dx, 7.0);
            assert_eq!(cam.position(), Vec3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn look_keeps_facing_unit_length() {
        let mut cam = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0), Vec3::Y);
        for dx in [1.0, -17.0, 123.0, 4096.0, -0.25, 1e4] {
            cam.look(dx, 0.0);
            assert!((cam.facing().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn positive_delta_x_turns_right() {
        let mut cam = Camera::default();
        // 900 px * 0.1 deg/px = 90 degrees
        cam.look(900.0, 0.0);
        assert_vec_near(cam.facing(), Vec3::X);
    }

    #[test]
    fn yaw_preserves_component_along_up() {
        let facing = Vec3::new(0.3, 0.5, -1.0).normalize();
        let mut cam = Camera::new(Vec3::ZERO, facing, Vec3::Y);
        let before = cam.facing().dot(cam.up());
        cam.look(137.0, 0.0);
        let after = cam.facing().dot(cam.up());
        assert!((before - after).abs() < EPS);
        assert!(!cam.facing().abs_diff_eq(facing, EPS));
    }

    #[test]
    fn delta_y_is_ignored() {
        let mut a = Camera::default();
        let mut b = Camera::default();
        a.look(40.0, 0.0);
        b.look(40.0, -300.0);
        assert_vec_near(a.facing(), b.facing());
    }

    #[test]
    fn view_basis_is_orthonormal() {
        let mut cam = Camera::new(
            Vec3::new(-2.0, 1.0, 8.0),
            Vec3::new(0.2, -0.4, -1.0).normalize(),
            Vec3::Y,
        );
        for dx in [0.0, 33.0, -512.0, 1800.0] {
            cam.look(dx, 0.0);
            let view = cam.view_matrix();
            let rows = [view.row(0).truncate(), view.row(1).truncate(), view.row(2).truncate()];
            for (i, a) in rows.iter().enumerate() {
                assert!((a.length() - 1.0).abs() < EPS);
                for b in &rows[i + 1..] {
                    assert!(a.dot(*b).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn new_does_not_normalize() {
        let cam = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(cam.facing(), Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(cam.up(), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn checked_normalizes_valid_input() {
        let cam = Camera::checked(Vec3::ONE, Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        assert_vec_near(cam.facing(), Vec3::NEG_Z);
        assert_vec_near(cam.up(), Vec3::Y);
        assert_eq!(cam.position(), Vec3::ONE);
    }

    #[test]
    fn checked_rejects_collinear_basis() {
        let err = Camera::checked(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, -3.0, 0.0)).unwrap_err();
        assert!(matches!(err, CameraError::Collinear { .. }));
    }

    #[test]
    fn checked_rejects_zero_and_non_finite() {
        let err = Camera::checked(Vec3::ZERO, Vec3::ZERO, Vec3::Y).unwrap_err();
        assert_eq!(err, CameraError::ZeroLength { field: "facing" });

        let err = Camera::checked(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::NEG_Z, Vec3::Y)
            .unwrap_err();
        assert!(matches!(err, CameraError::NonFinite { field: "position", .. }));
    }

    #[test]
    fn validate_catches_nan_look() {
        let mut cam = Camera::default();
        assert!(cam.validate().is_ok());
        cam.look(f32::NAN, 0.0);
        assert!(cam.validate().is_err());
    }
}
