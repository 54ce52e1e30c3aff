use glam::{Mat4, Vec3};

use crate::util::math::{Basis, OrthographicProjection, PerspectiveProjection};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// A free flying camera with cached view and projection matrices.
///
/// Rotation is stored as Euler angles in degrees: `x` is pitch, `y` is yaw and
/// `z` is roll, composed as `Ry(yaw) * Rx(pitch) * Rz(roll)`. With no rotation
/// the camera looks along `-Z`, with `+X` as right and `+Y` as up, which are
/// also the screen axes after the view transform.
///
/// Every mutator refreshes the derived state it affects, so the getters never
/// recompute anything.
///
/// The projection is only well formed for `aspect_ratio > 0` and
/// `0 < near < far`; other values produce NaN or infinite matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    rotation: Vec3,
    mode: ProjectionMode,
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,

    basis: Basis,
    view: Mat4,
    proj: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec3::ZERO,
            Vec3::ZERO,
            ProjectionMode::Perspective,
            45.,
            16. / 9.,
        )
    }
}

macro_rules! impl_local_move {
    ($method: ident, $axis: ident) => {
        #[inline]
        pub fn $method(&mut self, delta: f32) {
            self.position += self.basis.$axis * delta;
            self.update_view_matrix();
        }
    };
}

impl Camera {
    pub const DEFAULT_NEAR: f32 = 0.001;
    pub const DEFAULT_FAR: f32 = 100.;

    pub fn new(
        position: Vec3,
        rotation: Vec3,
        mode: ProjectionMode,
        fov: f32,
        aspect_ratio: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            rotation,
            mode,
            fov,
            aspect_ratio,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            basis: Basis::default(),
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        camera.update_view_matrix();
        camera.update_proj_matrix();
        camera
    }

    fn update_view_matrix(&mut self) {
        self.basis = Basis::from_euler(self.rotation);
        self.view = self.basis.view_matrix(self.position);
    }

    fn update_proj_matrix(&mut self) {
        self.proj = match self.mode {
            ProjectionMode::Perspective => PerspectiveProjection {
                fov: self.fov.to_radians(),
                aspect_ratio: self.aspect_ratio,
                near: self.near,
                far: self.far,
            }
            .compute_matrix(),
            // The box is tied to the near plane: half width `aspect * near`,
            // half height `near`.
            ProjectionMode::Orthographic => OrthographicProjection::symmetric(
                2. * self.aspect_ratio * self.near,
                2. * self.near,
                self.near,
                self.far,
            )
            .compute_matrix(),
        };
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view_matrix();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.update_view_matrix();
    }

    pub fn set_position_rotation(&mut self, position: Vec3, rotation: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.update_view_matrix();
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
        self.update_proj_matrix();
    }

    /// Vertical field of view in degrees.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.update_proj_matrix();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_proj_matrix();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_proj_matrix();
    }

    impl_local_move!(move_forward, direction);
    impl_local_move!(move_right, right);
    impl_local_move!(move_up, up);

    /// Moves along the local axes (`x` right, `y` up, `z` forward) and then
    /// adds `rotation_delta` to the Euler angles. The view is refreshed once.
    pub fn move_rotate(&mut self, move_delta: Vec3, rotation_delta: Vec3) {
        self.position += self.basis.right * move_delta.x;
        self.position += self.basis.up * move_delta.y;
        self.position += self.basis.direction * move_delta.z;
        self.rotation += rotation_delta;
        self.update_view_matrix();
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn proj_matrix(&self) -> Mat4 {
        self.proj
    }

    #[inline]
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.proj * self.view
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.basis.direction
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.basis.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.basis.up
    }

    #[inline]
    pub fn projection_mode(&self) -> ProjectionMode {
        self.mode
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f32 {
        self.far
    }
}
