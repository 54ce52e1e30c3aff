use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use novo_core::{
    render::RenderOptions,
    scene::{
        camera::Camera,
        resource::{ResourceError, Resources},
        EntityId, Scene, SceneError,
    },
    util::ext::Vec3ToRgb,
};
use thiserror::Error;

use crate::{
    command::{Command, MaterialField, Property, HELP},
    render::Renderer,
    resource,
    scene::{CameraConfig, ControllableCamera},
};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Command(String),
    #[error("Nothing selected, use `select <id>`.")]
    NoSelection,
    #[error("No object or light with id {0}.")]
    UnknownEntity(EntityId),
}

pub type EditorResult<T> = Result<T, EditorError>;

pub struct Application {
    resources: Resources,
    scene: Scene,
    main_camera: ControllableCamera,
    renderer: Renderer,
    selected: Option<EntityId>,
}

impl Application {
    pub fn new(
        resources: Resources,
        scene: Scene,
        camera: Camera,
        config: CameraConfig,
        options: RenderOptions,
    ) -> Self {
        Self {
            resources,
            scene,
            main_camera: ControllableCamera::new(camera, config),
            renderer: Renderer::new(options),
            selected: None,
        }
    }

    /// Loads `scene_path` if given, otherwise builds the primitive scene.
    pub fn open(
        exe_path: impl AsRef<Path>,
        scene_path: Option<PathBuf>,
        config: CameraConfig,
        options: RenderOptions,
    ) -> EditorResult<Self> {
        let mut resources = Resources::from_exe_path(exe_path);
        resources.install_builtins();

        let scene = match scene_path {
            Some(path) => {
                let mut scene = Scene::default();
                scene.load_from_json(&mut resources, path)?;
                scene
            }
            None => resource::load_primitives(&resources)?,
        };

        let mut camera = Camera::default();
        camera.set_position(glam::Vec3::new(0., 1., 5.));
        Ok(Self::new(resources, scene, camera, config, options))
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.main_camera.camera
    }

    #[inline]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Runs commands from `input` until it ends or `quit` is read. Command
    /// failures are reported and skipped.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        log::info!("Editor ready, type `help` for commands.");

        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("{}", err);
                    writeln!(output, "error: {}", err)?;
                    continue;
                }
            };

            match self.execute(command, &mut output) {
                Ok(true) => {}
                Ok(false) => break,
                Err(EditorError::Io(err)) => return Err(err),
                Err(err) => {
                    log::error!("{}", err);
                    writeln!(output, "error: {}", err)?;
                }
            }
        }

        log::info!("Editor closed after {} frames.", self.renderer.recorder.frames());
        Ok(())
    }

    /// Returns `false` once the editor should stop.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> EditorResult<bool> {
        match command {
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Key(action, state) => {
                log::debug!("{:?} {}", action, state);
                self.main_camera.control(action, state);
            }
            Command::Tick(seconds) => self.main_camera.update(seconds),
            Command::Render(frames) => {
                for _ in 0..frames {
                    self.renderer
                        .draw(&self.scene, &self.main_camera.camera, &self.resources);
                }
                let recorder = &self.renderer.recorder;
                writeln!(
                    out,
                    "frame {}: {} draws, {} commands",
                    recorder.frames(),
                    recorder.draw_count(),
                    recorder.commands().len()
                )?;
            }
            Command::ShowCamera => {
                let camera = &self.main_camera.camera;
                writeln!(
                    out,
                    "position {} rotation {} direction {} {:?} fov {}",
                    camera.position(),
                    camera.rotation(),
                    camera.direction(),
                    camera.projection_mode(),
                    camera.fov()
                )?;
            }
            Command::CameraPosition(p) => self.main_camera.camera.set_position(p),
            Command::CameraRotation(r) => self.main_camera.camera.set_rotation(r),
            Command::CameraFov(fov) => self.main_camera.camera.set_fov(fov),
            Command::CameraMode(mode) => self.main_camera.camera.set_projection_mode(mode),
            Command::List => self.list(out)?,
            Command::Select(id) => {
                let name = self
                    .scene
                    .entity_name(id)
                    .ok_or(EditorError::UnknownEntity(id))?;
                writeln!(out, "selected {} `{}`", id, name)?;
                self.selected = Some(id);
            }
            Command::Set(property, value) => {
                let id = self.selection()?;
                if let Some(mesh) = self.scene.object_mut(id) {
                    match property {
                        Property::Position => mesh.set_position(value),
                        Property::Rotation => mesh.set_rotation(value),
                        Property::Size => mesh.set_size(value),
                    }
                } else if let Some(light) = self.scene.light_mut(id) {
                    match property {
                        Property::Position => light.set_position(value),
                        Property::Rotation => light.set_rotation(value),
                        Property::Size => light.set_size(value),
                    }
                }
            }
            Command::SetUv(uv) => {
                let id = self.selection()?;
                if let Some(mesh) = self.scene.object_mut(id) {
                    mesh.set_uv(uv);
                } else if let Some(light) = self.scene.light_mut(id) {
                    light.set_uv(uv);
                }
            }
            Command::SetColor(color) => {
                let id = self.selection()?;
                let light = self.scene.light_mut(id).ok_or_else(|| {
                    EditorError::Command(format!("{} isn't a light.", id))
                })?;
                light.set_color(color.to_rgb());
            }
            Command::Visible(visible) => {
                let id = self.selection()?;
                if let Some(mesh) = self.scene.object_mut(id) {
                    mesh.set_visible(visible);
                } else if let Some(light) = self.scene.light_mut(id) {
                    light.set_visible(visible);
                }
            }
            Command::Material(name, field, value) => {
                let id = self.resources.material(&name)?;
                if let Some(material) = self.resources.material_by_id_mut(id) {
                    match field {
                        MaterialField::Ambient => material.ambient_factor = value,
                        MaterialField::Diffuse => material.diffuse_factor = value,
                        MaterialField::Specular => material.specular_factor = value,
                        MaterialField::Shininess => material.shininess = value,
                    }
                }
            }
            Command::Remove => {
                let id = self.selection()?;
                if self.scene.remove_object(id).is_none() {
                    self.scene.remove_light(id);
                }
                self.selected = None;
                writeln!(out, "removed {}", id)?;
            }
            Command::Reload => self.scene.reload_all(),
            Command::Clear => {
                self.scene.clear();
                self.selected = None;
            }
            Command::Open(path) => {
                let mut scene = Scene::default();
                scene.load_from_json(&mut self.resources, path)?;
                self.scene = scene;
                self.selected = None;
                writeln!(
                    out,
                    "opened `{}`: {} objects, {} lights",
                    self.scene.name(),
                    self.scene.object_count(),
                    self.scene.light_count()
                )?;
            }
            Command::Save(path) => {
                self.scene.save_to_json(&self.resources, &path)?;
                writeln!(out, "saved {}", path.display())?;
            }
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    fn selection(&self) -> EditorResult<EntityId> {
        let id = self.selected.ok_or(EditorError::NoSelection)?;
        if self.scene.entity_name(id).is_none() {
            return Err(EditorError::UnknownEntity(id));
        }
        Ok(id)
    }

    fn list(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "scene `{}`", self.scene.name())?;
        for (id, mesh, name) in self.scene.objects() {
            writeln!(
                out,
                "  {:>3} {:<24} {:?} at {}{}",
                id,
                name,
                mesh.kind(),
                mesh.position(),
                if mesh.is_visible() { "" } else { " (hidden)" }
            )?;
        }
        for (id, light, name) in self.scene.lights() {
            writeln!(
                out,
                "  {:>3} {:<24} light slot {} at {}{}",
                id,
                name,
                self.scene.light_slot(id).unwrap_or_default(),
                light.position(),
                if light.is_visible() { "" } else { " (hidden)" }
            )?;
        }
        Ok(())
    }
}
