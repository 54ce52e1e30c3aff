use std::{fmt, path::PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    render::{RenderContext, LIGHT_COLORS, LIGHT_POSITIONS},
    scene::{
        entity::{Light, Mesh},
        resource::{ResourceError, ResourceKind},
    },
    util::ext::RgbToVec3,
};

pub mod camera;
pub mod component;
pub mod entity;
pub mod format;
pub mod resource;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("Failed to access scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed scene: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Object `{object}` references unknown {kind} `{name}`.")]
    MissingReference {
        object: String,
        kind: ResourceKind,
        name: String,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Handle of an object or light, unique within its scene and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Named objects and lights, both kept in insertion order.
///
/// A light's position in the light sequence is the slot it occupies in the
/// `light_colors` and `light_positions` arrays of every object shader.
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    objects: IndexMap<EntityId, (Mesh, String)>,
    lights: IndexMap<EntityId, (Light, String)>,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Scene")
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: IndexMap::new(),
            lights: IndexMap::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    fn generate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_object(&mut self, mesh: Mesh) -> EntityId {
        let name = format!("Scene object #{}", self.objects.len());
        self.add_object_named(mesh, name)
    }

    pub fn add_object_named(&mut self, mesh: Mesh, name: impl Into<String>) -> EntityId {
        let id = self.generate_id();
        self.objects.insert(id, (mesh, name.into()));
        id
    }

    pub fn add_light(&mut self, light: Light) -> EntityId {
        let name = format!("Light #{}", self.lights.len());
        self.add_light_named(light, name)
    }

    pub fn add_light_named(&mut self, light: Light, name: impl Into<String>) -> EntityId {
        let id = self.generate_id();
        self.lights.insert(id, (light, name.into()));
        id
    }

    /// Keeps the order of the remaining objects.
    pub fn remove_object(&mut self, id: EntityId) -> Option<Mesh> {
        self.objects.shift_remove(&id).map(|(mesh, _)| mesh)
    }

    /// Every light after the removed one moves down a slot.
    pub fn remove_light(&mut self, id: EntityId) -> Option<Light> {
        self.lights.shift_remove(&id).map(|(light, _)| light)
    }

    /// Renames an object or a light. Returns `false` if neither exists.
    pub fn rename(&mut self, id: EntityId, name: impl Into<String>) -> bool {
        if let Some((_, n)) = self.objects.get_mut(&id) {
            *n = name.into();
            true
        } else if let Some((_, n)) = self.lights.get_mut(&id) {
            *n = name.into();
            true
        } else {
            false
        }
    }

    pub fn entity_name(&self, id: EntityId) -> Option<&str> {
        self.objects
            .get(&id)
            .map(|(_, n)| n.as_str())
            .or_else(|| self.lights.get(&id).map(|(_, n)| n.as_str()))
    }

    pub fn reload_all(&mut self) {
        for (mesh, _) in self.objects.values_mut() {
            mesh.reload();
        }
        for (light, _) in self.lights.values_mut() {
            light.reload();
        }
    }

    /// Drops every entity. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.lights.clear();
    }

    pub fn objects(&self) -> impl Iterator<Item = (EntityId, &Mesh, &str)> {
        self.objects
            .iter()
            .map(|(id, (mesh, name))| (*id, mesh, name.as_str()))
    }

    pub fn lights(&self) -> impl Iterator<Item = (EntityId, &Light, &str)> {
        self.lights
            .iter()
            .map(|(id, (light, name))| (*id, light, name.as_str()))
    }

    #[inline]
    pub fn object(&self, id: EntityId) -> Option<&Mesh> {
        self.objects.get(&id).map(|(mesh, _)| mesh)
    }

    #[inline]
    pub fn object_mut(&mut self, id: EntityId) -> Option<&mut Mesh> {
        self.objects.get_mut(&id).map(|(mesh, _)| mesh)
    }

    #[inline]
    pub fn light(&self, id: EntityId) -> Option<&Light> {
        self.lights.get(&id).map(|(light, _)| light)
    }

    #[inline]
    pub fn light_mut(&mut self, id: EntityId) -> Option<&mut Light> {
        self.lights.get_mut(&id).map(|(light, _)| light)
    }

    /// Uniform array slot of a light for the next render.
    #[inline]
    pub fn light_slot(&self, id: EntityId) -> Option<usize> {
        self.lights.get_index_of(&id)
    }

    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Pushes every light into every object shader, then draws the object.
    ///
    /// Visible lights are drawn once per object. A hidden light has its color
    /// slot zeroed, its position slot is left as last written unless
    /// `zero_hidden_light_positions` is set.
    pub fn render(&self, ctx: &mut RenderContext) {
        log::trace!(
            "Rendering `{}`: {} objects, {} lights.",
            self.name,
            self.objects.len(),
            self.lights.len()
        );

        for (object, _) in self.objects.values() {
            let shader = object.shader();

            for (index, (light, _)) in self.lights.values().enumerate() {
                if light.is_visible() {
                    light.draw(ctx);
                    ctx.backend.load_shader(shader);
                    ctx.backend.set_uniform_array(
                        shader,
                        LIGHT_COLORS,
                        index,
                        light.color().to_vec3().into(),
                    );
                    ctx.backend.set_uniform_array(
                        shader,
                        LIGHT_POSITIONS,
                        index,
                        light.position().into(),
                    );
                    ctx.backend.unload_shader();
                } else {
                    ctx.backend.load_shader(shader);
                    ctx.backend
                        .set_uniform_array(shader, LIGHT_COLORS, index, glam::Vec3::ZERO.into());
                    if ctx.options.zero_hidden_light_positions {
                        ctx.backend.set_uniform_array(
                            shader,
                            LIGHT_POSITIONS,
                            index,
                            glam::Vec3::ZERO.into(),
                        );
                    }
                    ctx.backend.unload_shader();
                }
            }

            object.draw(ctx);
        }
    }
}

#[cfg(test)]
mod test {
    use glam::{Vec2, Vec3};
    use palette::LinSrgb;

    use crate::{
        render::{record::FrameRecorder, RenderOptions, Uniform},
        scene::{
            camera::Camera,
            entity::{MeshKind, Transform},
            resource::{Resources, ShaderId},
        },
    };

    use super::*;

    struct Fixture {
        resources: Resources,
        camera: Camera,
        lit: ShaderId,
        light: ShaderId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut resources = Resources::new(".");
            resources.install_builtins();
            Self {
                lit: resources.shader(Resources::LIT_SHADER).unwrap(),
                light: resources.shader(Resources::LIGHT_SHADER).unwrap(),
                resources,
                camera: Camera::default(),
            }
        }

        fn mesh(&self, kind: MeshKind) -> Mesh {
            Mesh::new(
                kind,
                self.lit,
                self.resources.texture(Resources::WHITE_TEXTURE).unwrap(),
                self.resources.material(Resources::DEFAULT_MATERIAL).unwrap(),
                Transform::default(),
            )
        }

        fn light(&self, color: LinSrgb, position: Vec3) -> Light {
            Light::new(
                color,
                self.light,
                Transform::default().with_position(position),
            )
        }

        fn render(&self, scene: &Scene, recorder: &mut FrameRecorder) {
            recorder.begin_frame();
            scene.render(&mut RenderContext::new(recorder, &self.camera, &self.resources));
        }
    }

    #[test]
    fn no_lights_no_array_writes() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        scene.add_object(fx.mesh(MeshKind::Box));
        scene.add_object(fx.mesh(MeshKind::Plane));
        scene.add_object(fx.mesh(MeshKind::Box));

        let mut recorder = FrameRecorder::default();
        fx.render(&scene, &mut recorder);

        assert_eq!(recorder.array_writes(LIGHT_COLORS), 0);
        assert_eq!(recorder.array_writes(LIGHT_POSITIONS), 0);
        assert_eq!(recorder.draw_count(), 3);
        assert_eq!(recorder.draws_with(fx.lit), 3);
    }

    #[test]
    fn every_light_reaches_every_object() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        for _ in 0..2 {
            scene.add_object(fx.mesh(MeshKind::Box));
        }
        scene.add_light(fx.light(LinSrgb::new(1., 0., 0.), Vec3::X));
        let hidden = scene.add_light(fx.light(LinSrgb::new(0., 1., 0.), Vec3::Y));
        scene.add_light(fx.light(LinSrgb::new(0., 0., 1.), Vec3::Z));
        scene.light_mut(hidden).unwrap().set_visible(false);

        let mut recorder = FrameRecorder::default();
        fx.render(&scene, &mut recorder);

        assert_eq!(recorder.draws_with(fx.lit), 2);
        // Two visible lights drawn once per object.
        assert_eq!(recorder.draws_with(fx.light), 4);
        assert_eq!(recorder.array_writes_on(fx.lit, LIGHT_COLORS), 2 * 3);
        assert_eq!(recorder.array_writes_on(fx.lit, LIGHT_POSITIONS), 2 * 2);
        assert_eq!(recorder.unbracketed_writes(), 0);

        assert_eq!(
            recorder.uniform_array(fx.lit, LIGHT_COLORS, 2),
            Some(Uniform::Vec3(Vec3::Z))
        );
        assert_eq!(
            recorder.uniform_array(fx.lit, LIGHT_POSITIONS, 0),
            Some(Uniform::Vec3(Vec3::X))
        );
    }

    #[test]
    fn hidden_light_leaves_position_stale() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        scene.add_object(fx.mesh(MeshKind::Box));
        let light = scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::new(4., 5., 6.)));

        let mut recorder = FrameRecorder::default();
        fx.render(&scene, &mut recorder);

        scene.light_mut(light).unwrap().set_visible(false);
        fx.render(&scene, &mut recorder);

        assert_eq!(
            recorder.uniform_array(fx.lit, LIGHT_COLORS, 0),
            Some(Uniform::Vec3(Vec3::ZERO))
        );
        assert_eq!(
            recorder.uniform_array(fx.lit, LIGHT_POSITIONS, 0),
            Some(Uniform::Vec3(Vec3::new(4., 5., 6.)))
        );
        assert_eq!(recorder.draws_with(fx.light), 0);
    }

    #[test]
    fn hidden_light_position_zeroed_on_request() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        scene.add_object(fx.mesh(MeshKind::Box));
        let light = scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::ONE));

        let mut recorder = FrameRecorder::default();
        fx.render(&scene, &mut recorder);
        scene.light_mut(light).unwrap().set_visible(false);

        recorder.begin_frame();
        let options = RenderOptions {
            zero_hidden_light_positions: true,
        };
        scene.render(
            &mut RenderContext::new(&mut recorder, &fx.camera, &fx.resources).with_options(options),
        );

        assert_eq!(
            recorder.uniform_array(fx.lit, LIGHT_POSITIONS, 0),
            Some(Uniform::Vec3(Vec3::ZERO))
        );
        assert_eq!(recorder.unbracketed_writes(), 0);
    }

    #[test]
    fn lights_past_capacity_are_skipped() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        scene.add_object(fx.mesh(MeshKind::Box));
        for i in 0..3 {
            scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::splat(i as f32)));
        }

        let mut recorder = FrameRecorder::new(2);
        fx.render(&scene, &mut recorder);

        assert_eq!(recorder.array_writes_on(fx.lit, LIGHT_COLORS), 3);
        assert_eq!(recorder.unresolved_writes(), 2);
        assert!(recorder.uniform_array(fx.lit, LIGHT_COLORS, 2).is_none());
        assert_eq!(recorder.draws_with(fx.lit), 1);
    }

    #[test]
    fn default_names_count_the_collection() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        let a = scene.add_object(fx.mesh(MeshKind::Box));
        let b = scene.add_object(fx.mesh(MeshKind::Plane));
        let l = scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::ZERO));

        assert_eq!(scene.entity_name(a), Some("Scene object #0"));
        assert_eq!(scene.entity_name(b), Some("Scene object #1"));
        assert_eq!(scene.entity_name(l), Some("Light #0"));

        assert!(scene.rename(b, "Floor"));
        assert_eq!(scene.entity_name(b), Some("Floor"));
        assert!(!scene.rename(EntityId::from_raw(99), "Nothing"));
    }

    #[test]
    fn removing_a_light_shifts_slots() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        let first = scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::ZERO));
        let second = scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::ZERO));
        let third = scene.add_light(fx.light(LinSrgb::new(1., 1., 1.), Vec3::ZERO));
        assert_eq!(scene.light_slot(third), Some(2));

        scene.remove_light(first);
        assert_eq!(scene.light_slot(second), Some(0));
        assert_eq!(scene.light_slot(third), Some(1));
        assert_eq!(scene.light_slot(first), None);
        assert_eq!(scene.light_count(), 2);
    }

    #[test]
    fn reload_all_keeps_uv() {
        let fx = Fixture::new();
        let mut scene = Scene::default();
        let id = scene.add_object(fx.mesh(MeshKind::Plane));
        scene.object_mut(id).unwrap().set_uv(Vec2::splat(2.));
        let before = scene.object(id).unwrap().geometry().clone();

        scene.reload_all();
        assert_eq!(scene.object(id).unwrap().geometry(), &before);

        scene.clear();
        assert_eq!(scene.object_count(), 0);
        let next = scene.add_object(fx.mesh(MeshKind::Box));
        assert_ne!(next, id);
    }
}
