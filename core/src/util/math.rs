use glam::{EulerRot, Mat4, Quat, Vec3};

/// Canonical camera axes before any rotation is applied. The frame is right
/// handed, so `direction x up` is `right` and lines up with screen `+X` under
/// [`Basis::view_matrix`].
pub const FORWARD: Vec3 = Vec3::NEG_Z;
pub const RIGHT: Vec3 = Vec3::X;
pub const UP: Vec3 = Vec3::Y;

/// Builds a rotation from Euler angles in degrees.
///
/// `x` is pitch, `y` is yaw and `z` is roll. The rotations are composed as
/// `Ry(yaw) * Rx(pitch) * Rz(roll)`.
#[inline]
pub fn euler_rotation(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Orthonormal frame of a rotated observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub direction: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self {
            direction: FORWARD,
            right: RIGHT,
            up: UP,
        }
    }
}

impl Basis {
    pub fn from_euler(degrees: Vec3) -> Self {
        let rotation = euler_rotation(degrees);
        Self {
            direction: (rotation * FORWARD).normalize(),
            right: (rotation * RIGHT).normalize(),
            up: (rotation * UP).normalize(),
        }
    }

    /// Right handed view matrix looking from `eye` along `direction`.
    #[inline]
    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        Mat4::look_at_rh(eye, eye + self.direction, self.up)
    }
}

/// `translate * rotate_x * rotate_y * rotate_z * scale`, angles in degrees.
pub fn model_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_x(rotation.x.to_radians())
        * Mat4::from_rotation_y(rotation.y.to_radians())
        * Mat4::from_rotation_z(rotation.z.to_radians())
        * Mat4::from_scale(scale)
}

#[derive(Debug, Clone, Copy)]
pub struct PerspectiveProjection {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveProjection {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16. / 9.,
            near: 0.001,
            far: 100.,
        }
    }
}

impl PerspectiveProjection {
    #[inline]
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect_ratio, self.near, self.far)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrthographicProjection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicProjection {
    pub fn symmetric(width: f32, height: f32, near: f32, far: f32) -> Self {
        Self {
            left: -width * 0.5,
            right: width * 0.5,
            bottom: -height * 0.5,
            top: height * 0.5,
            near,
            far,
        }
    }

    #[inline]
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod test {
    use glam::Vec4;

    use super::*;

    #[test]
    fn identity_rotation_keeps_canonical_axes() {
        let basis = Basis::from_euler(Vec3::ZERO);
        assert!(basis.direction.abs_diff_eq(FORWARD, 1e-6));
        assert!(basis.right.abs_diff_eq(RIGHT, 1e-6));
        assert!(basis.up.abs_diff_eq(UP, 1e-6));
    }

    #[test]
    fn positive_yaw_turns_left() {
        let basis = Basis::from_euler(Vec3::new(0., 90., 0.));
        assert!(basis.direction.abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!(basis.right.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(basis.up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn right_is_direction_cross_up() {
        for degrees in [Vec3::ZERO, Vec3::new(30., -70., 15.), Vec3::new(-80., 140., -45.)] {
            let basis = Basis::from_euler(degrees);
            assert!(basis
                .direction
                .cross(basis.up)
                .abs_diff_eq(basis.right, 1e-5));
        }
    }

    #[test]
    fn right_lands_on_screen_right() {
        let eye = Vec3::new(1., -2., 3.);
        let basis = Basis::from_euler(Vec3::new(20., 35., -10.));
        let view = basis.view_matrix(eye);

        let ahead = view.transform_point3(eye + basis.direction * 5.);
        assert!(ahead.abs_diff_eq(Vec3::new(0., 0., -5.), 1e-4));

        let p = view.transform_point3(eye + basis.direction * 5. + basis.right);
        assert!(p.abs_diff_eq(Vec3::new(1., 0., -5.), 1e-4));
        let q = view.transform_point3(eye + basis.direction * 5. + basis.up);
        assert!(q.abs_diff_eq(Vec3::new(0., 1., -5.), 1e-4));
    }

    #[test]
    fn model_matrix_applies_scale_before_translation() {
        let m = model_matrix(Vec3::new(1., 2., 3.), Vec3::ZERO, Vec3::splat(2.));
        let p = m * Vec4::new(1., 1., 1., 1.);
        assert!(p.truncate().abs_diff_eq(Vec3::new(3., 4., 5.), 1e-6));
    }

    #[test]
    fn model_matrix_rotates_x_last() {
        // translate * Rx * Ry * Rz: the z rotation hits the point first.
        let m = model_matrix(Vec3::ZERO, Vec3::new(90., 0., 90.), Vec3::ONE);
        let p = m.transform_point3(Vec3::X);
        // Rz(90) maps X to Y, then Rx(90) maps Y to Z.
        assert!(p.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn symmetric_ortho_maps_extents_to_clip_edges() {
        let ortho = OrthographicProjection::symmetric(4., 2., 0.5, 10.);
        let m = ortho.compute_matrix();
        let corner = m.project_point3(Vec3::new(2., 1., -1.));
        assert!((corner.x - 1.).abs() < 1e-6);
        assert!((corner.y - 1.).abs() < 1e-6);
    }
}
