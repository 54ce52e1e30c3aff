use glam::{Mat4, Vec2, Vec3};
use palette::LinSrgb;

use crate::{
    render::{CullMode, RenderContext, UniformBlock},
    scene::{
        component::Geometry,
        resource::{MaterialId, Resources, ShaderId, TextureId},
    },
    util::{ext::RgbToVec3, math},
};

/// Position, Euler rotation in degrees and scale. Nothing is cached, the
/// model matrix is rebuilt on every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[inline]
    pub fn compute_matrix(&self) -> Mat4 {
        math::model_matrix(self.position, self.rotation, self.scale)
    }

    #[inline]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshKind {
    Box,
    Plane,
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
}

impl MeshKind {
    pub fn build_geometry(&self, uv: Vec2) -> Geometry {
        match *self {
            MeshKind::Box => Geometry::cube(uv),
            MeshKind::Plane => Geometry::plane(uv),
            MeshKind::Triangle { a, b, c } => Geometry::triangle(a, b, c, uv),
        }
    }

    pub fn cull_mode(&self) -> CullMode {
        match self {
            MeshKind::Box => CullMode::Front,
            MeshKind::Plane | MeshKind::Triangle { .. } => CullMode::None,
        }
    }
}

macro_rules! impl_transform_access {
    () => {
        #[inline]
        pub fn transform(&self) -> &Transform {
            &self.transform
        }

        #[inline]
        pub fn transform_mut(&mut self) -> &mut Transform {
            &mut self.transform
        }

        #[inline]
        pub fn position(&self) -> Vec3 {
            self.transform.position
        }

        #[inline]
        pub fn set_position(&mut self, position: Vec3) {
            self.transform.position = position;
        }

        #[inline]
        pub fn rotation(&self) -> Vec3 {
            self.transform.rotation
        }

        #[inline]
        pub fn set_rotation(&mut self, rotation: Vec3) {
            self.transform.rotation = rotation;
        }

        #[inline]
        pub fn size(&self) -> Vec3 {
            self.transform.scale
        }

        #[inline]
        pub fn set_size(&mut self, size: Vec3) {
            self.transform.scale = size;
        }

        #[inline]
        pub fn uv(&self) -> Vec2 {
            self.uv
        }

        /// Rebuilds the geometry with the new uv scale. The previous geometry
        /// is dropped.
        pub fn set_uv(&mut self, uv: Vec2) {
            self.uv = uv;
            self.reload();
        }

        #[inline]
        pub fn is_visible(&self) -> bool {
            self.visible
        }

        #[inline]
        pub fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        #[inline]
        pub fn shader(&self) -> ShaderId {
            self.shader
        }

        #[inline]
        pub fn set_shader(&mut self, shader: ShaderId) {
            self.shader = shader;
        }

        #[inline]
        pub fn geometry(&self) -> &Geometry {
            &self.geometry
        }
    };
}

/// A textured, lit object.
#[derive(Debug, Clone)]
pub struct Mesh {
    kind: MeshKind,
    transform: Transform,
    shader: ShaderId,
    texture: TextureId,
    material: MaterialId,
    uv: Vec2,
    visible: bool,
    geometry: Geometry,
}

impl Mesh {
    pub fn new(
        kind: MeshKind,
        shader: ShaderId,
        texture: TextureId,
        material: MaterialId,
        transform: Transform,
    ) -> Self {
        let uv = Vec2::ONE;
        Self {
            geometry: kind.build_geometry(uv),
            kind,
            transform,
            shader,
            texture,
            material,
            uv,
            visible: true,
        }
    }

    impl_transform_access!();

    #[inline]
    pub fn kind(&self) -> &MeshKind {
        &self.kind
    }

    #[inline]
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    #[inline]
    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = texture;
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    #[inline]
    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    pub fn reload(&mut self) {
        self.geometry = self.kind.build_geometry(self.uv);
    }

    pub fn draw(&self, ctx: &mut RenderContext) {
        if !self.visible {
            return;
        }

        let backend = &mut *ctx.backend;
        backend.set_cull_mode(self.kind.cull_mode());
        backend.load_shader(self.shader);
        backend.bind_texture(self.texture, 0);

        backend.set_uniform(self.shader, "model", self.transform.compute_matrix().into());
        backend.set_uniform(
            self.shader,
            "view_projection",
            ctx.camera.view_proj_matrix().into(),
        );
        backend.set_uniform(self.shader, "camera_position", ctx.camera.position().into());
        match ctx.resources.material_by_id(self.material) {
            Some(material) => material.write_uniforms(backend, self.shader),
            None => log::warn!("Material {} is gone, drawing without it.", self.material),
        }

        backend.draw(&self.geometry);
        backend.unload_shader();
    }
}

/// A point light drawn as a small box in its own color.
#[derive(Debug, Clone)]
pub struct Light {
    color: LinSrgb,
    transform: Transform,
    shader: ShaderId,
    uv: Vec2,
    visible: bool,
    geometry: Geometry,
}

impl Light {
    pub fn new(color: LinSrgb, shader: ShaderId, transform: Transform) -> Self {
        let uv = Vec2::ONE;
        Self {
            color,
            transform,
            shader,
            uv,
            visible: true,
            geometry: Geometry::cube(uv),
        }
    }

    impl_transform_access!();

    #[inline]
    pub fn color(&self) -> LinSrgb {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: LinSrgb) {
        self.color = color;
    }

    pub fn reload(&mut self) {
        self.geometry = Geometry::cube(self.uv);
    }

    pub fn draw(&self, ctx: &mut RenderContext) {
        if !self.visible {
            return;
        }

        let backend = &mut *ctx.backend;
        backend.set_cull_mode(CullMode::Front);
        backend.load_shader(self.shader);
        // Slot 0 would otherwise keep the previous mesh's texture.
        if let Ok(white) = ctx.resources.texture(Resources::WHITE_TEXTURE) {
            backend.bind_texture(white, 0);
        }

        backend.set_uniform(self.shader, "model", self.transform.compute_matrix().into());
        backend.set_uniform(
            self.shader,
            "view_projection",
            ctx.camera.view_proj_matrix().into(),
        );
        backend.set_uniform(self.shader, "light_color", self.color.to_vec3().into());

        backend.draw(&self.geometry);
        backend.unload_shader();
    }
}
