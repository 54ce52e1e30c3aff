use glam::{Mat4, Vec2, Vec3};

use crate::scene::{
    camera::Camera,
    component::Geometry,
    resource::{Resources, ShaderId, TextureId},
};

pub mod record;
pub mod shader;

pub use novo_derive::Uniforms;

/// Number of light slots declared by the built-in lit shader.
pub const MAX_LIGHTS: usize = 16;

pub const LIGHT_COLORS: &str = "light_colors";
pub const LIGHT_POSITIONS: &str = "light_positions";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Mat4(Mat4),
}

macro_rules! impl_uniform_from {
    ($ty: ty, $variant: ident) => {
        impl From<$ty> for Uniform {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

impl_uniform_from!(i32, Int);
impl_uniform_from!(f32, Float);
impl_uniform_from!(Vec2, Vec2);
impl_uniform_from!(Vec3, Vec3);
impl_uniform_from!(Mat4, Mat4);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    #[default]
    None,
    /// Cull front faces, counter clockwise winding is front.
    Front,
    Back,
}

/// The graphics API seen by the scene.
///
/// Uniform names are resolved per shader. A name that doesn't resolve, such as
/// an array index past the declared array length, is silently skipped.
/// Every uniform write must happen between `load_shader` and `unload_shader`
/// of the same shader.
pub trait RenderBackend {
    fn load_shader(&mut self, shader: ShaderId);
    fn unload_shader(&mut self);
    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: Uniform);
    fn set_uniform_array(&mut self, shader: ShaderId, name: &str, index: usize, value: Uniform);
    fn bind_texture(&mut self, texture: TextureId, slot: u32);
    fn set_cull_mode(&mut self, mode: CullMode);
    fn draw(&mut self, geometry: &Geometry);
}

/// A group of uniforms written together, usually derived with
/// `#[derive(Uniforms)]`.
pub trait UniformBlock {
    fn write_uniforms(&self, backend: &mut dyn RenderBackend, shader: ShaderId);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RenderOptions {
    /// Also zero the `light_positions` slot of hidden lights. When unset the
    /// slot keeps whatever was written while the light was visible.
    pub zero_hidden_light_positions: bool,
}

/// Everything a draw call needs besides the entity itself.
pub struct RenderContext<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub camera: &'a Camera,
    pub resources: &'a Resources,
    pub options: RenderOptions,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        backend: &'a mut dyn RenderBackend,
        camera: &'a Camera,
        resources: &'a Resources,
    ) -> Self {
        Self {
            backend,
            camera,
            resources,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}
