use std::{fs, path::PathBuf};

use glam::{Vec2, Vec3};
use palette::LinSrgb;
use serde::{Deserialize, Serialize};

use crate::scene::{
    entity::{Light, Mesh, MeshKind, Transform},
    resource::{Material, ResourceKind, ResourceResult, Resources},
    Scene, SceneError, SceneResult,
};

/// On-disk layout of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shaders: Vec<ShaderRecord>,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub textures: Vec<TextureRecord>,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderRecord {
    pub name: String,
    pub vs: PathBuf,
    pub fs: PathBuf,
}

/// Either a path to a material file or the factors inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub inline: Material,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRecord {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Box,
    Plane,
    Triangle,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub name: String,
    #[serde(rename = "type.id")]
    pub kind: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(rename = "uv.x", default = "one")]
    pub uv_x: f32,
    #[serde(rename = "uv.y", default = "one")]
    pub uv_y: f32,
    #[serde(default)]
    pub transform: TransformRecord,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub other: OtherRecord,
}

fn one() -> f32 {
    1.
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Vec3Record {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3Record> for Vec3 {
    fn from(v: Vec3Record) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformRecord {
    pub position: Vec3Record,
    pub rotation: Vec3Record,
    pub scale: Vec3Record,
}

impl Default for TransformRecord {
    fn default() -> Self {
        Transform::default().into()
    }
}

impl From<Transform> for TransformRecord {
    fn from(t: Transform) -> Self {
        Self {
            position: t.position.into(),
            rotation: t.rotation.into(),
            scale: t.scale.into(),
        }
    }
}

impl From<TransformRecord> for Transform {
    fn from(t: TransformRecord) -> Self {
        Self {
            position: t.position.into(),
            rotation: t.rotation.into(),
            scale: t.scale.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRecord {
    pub color: ColorRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleRecord {
    pub a: Vec3Record,
    pub b: Vec3Record,
    pub c: Vec3Record,
}

/// Per type properties, keyed by type name.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OtherRecord {
    #[serde(rename = "Light", default, skip_serializing_if = "Option::is_none")]
    pub light: Option<LightRecord>,
    #[serde(rename = "Triangle", default, skip_serializing_if = "Option::is_none")]
    pub triangle: Option<TriangleRecord>,
}

/// Resolves an optional reference, falling back to a built-in name when the
/// record leaves it out.
fn reference<I>(
    object: &str,
    name: Option<&str>,
    fallback: &str,
    kind: ResourceKind,
    find: impl Fn(&str) -> ResourceResult<I>,
) -> SceneResult<I> {
    let name = name.unwrap_or(fallback);
    find(name).map_err(|_| SceneError::MissingReference {
        object: object.to_string(),
        kind,
        name: name.to_string(),
    })
}

/// Unregistered ids are written without a reference and load back as the
/// built-in fallback.
fn saved_name(object: &str, kind: ResourceKind, name: Option<&str>) -> Option<String> {
    if name.is_none() {
        log::warn!(
            "`{}` refers to an unregistered {}, saving it without one",
            object,
            kind
        );
    }
    name.map(str::to_string)
}

impl Scene {
    /// Collects the scene and the resources it can refer to. Built-in shaders
    /// and textures have no source file and are left out, as is the default
    /// material while it holds its default factors.
    pub fn to_file(&self, resources: &Resources) -> SceneFile {
        let shaders = resources
            .shaders()
            .filter_map(|(name, _, source)| {
                Some(ShaderRecord {
                    name: name.to_string(),
                    vs: source.vertex_path.clone()?,
                    fs: source.fragment_path.clone()?,
                })
            })
            .collect();
        let materials = resources
            .materials()
            .filter(|(name, _, material, path)| {
                path.is_some()
                    || *name != Resources::DEFAULT_MATERIAL
                    || **material != Material::default()
            })
            .map(|(name, _, material, path)| MaterialRecord {
                name: name.to_string(),
                path: path.map(|p| p.to_path_buf()),
                inline: *material,
            })
            .collect();
        let textures = resources
            .textures()
            .filter_map(|(name, _, texture)| {
                Some(TextureRecord {
                    name: name.to_string(),
                    path: texture.path.clone()?,
                })
            })
            .collect();

        let meshes = self.objects().map(|(_, mesh, name)| {
            let triangle = match *mesh.kind() {
                MeshKind::Triangle { a, b, c } => Some(TriangleRecord {
                    a: a.into(),
                    b: b.into(),
                    c: c.into(),
                }),
                _ => None,
            };
            ObjectRecord {
                name: name.to_string(),
                kind: match mesh.kind() {
                    MeshKind::Box => ObjectType::Box,
                    MeshKind::Plane => ObjectType::Plane,
                    MeshKind::Triangle { .. } => ObjectType::Triangle,
                },
                shader: saved_name(name, ResourceKind::Shader, resources.shader_name(mesh.shader())),
                material: saved_name(
                    name,
                    ResourceKind::Material,
                    resources.material_name(mesh.material()),
                ),
                texture: saved_name(
                    name,
                    ResourceKind::Texture,
                    resources.texture_name(mesh.texture()),
                ),
                uv_x: mesh.uv().x,
                uv_y: mesh.uv().y,
                transform: (*mesh.transform()).into(),
                visible: mesh.is_visible(),
                other: OtherRecord {
                    light: None,
                    triangle,
                },
            }
        });
        let lights = self.lights().map(|(_, light, name)| {
            let color = light.color();
            ObjectRecord {
                name: name.to_string(),
                kind: ObjectType::Light,
                shader: saved_name(name, ResourceKind::Shader, resources.shader_name(light.shader())),
                material: None,
                texture: None,
                uv_x: light.uv().x,
                uv_y: light.uv().y,
                transform: (*light.transform()).into(),
                visible: light.is_visible(),
                other: OtherRecord {
                    light: Some(LightRecord {
                        color: ColorRecord {
                            r: color.red,
                            g: color.green,
                            b: color.blue,
                        },
                    }),
                    triangle: None,
                },
            }
        });

        SceneFile {
            name: self.name.clone(),
            shaders,
            materials,
            textures,
            objects: meshes.chain(lights).collect(),
        }
    }

    /// Loads the resources listed in `file` and appends its objects in order.
    ///
    /// Objects are only added once every reference resolved, a failing file
    /// leaves the scene untouched.
    pub fn from_file(&mut self, resources: &mut Resources, file: SceneFile) -> SceneResult<()> {
        for shader in &file.shaders {
            resources.load_shader(&shader.name, &shader.vs, &shader.fs)?;
        }
        for material in &file.materials {
            match &material.path {
                Some(path) => resources.load_material(&material.name, path)?,
                None => resources.add_material(&material.name, material.inline),
            };
        }
        for texture in &file.textures {
            resources.load_texture(&texture.name, &texture.path)?;
        }

        let mut meshes = Vec::new();
        let mut lights = Vec::new();
        for record in file.objects {
            let transform = Transform::from(record.transform);
            let uv = Vec2::new(record.uv_x, record.uv_y);

            let kind = match record.kind {
                ObjectType::Box => MeshKind::Box,
                ObjectType::Plane => MeshKind::Plane,
                ObjectType::Triangle => {
                    let t = record.other.triangle.unwrap_or(TriangleRecord {
                        a: Vec3::new(-1., -1., 0.).into(),
                        b: Vec3::new(1., -1., 0.).into(),
                        c: Vec3::new(0., 1., 0.).into(),
                    });
                    MeshKind::Triangle {
                        a: t.a.into(),
                        b: t.b.into(),
                        c: t.c.into(),
                    }
                }
                ObjectType::Light => {
                    let shader = reference(
                        &record.name,
                        record.shader.as_deref(),
                        Resources::LIGHT_SHADER,
                        ResourceKind::Shader,
                        |n| resources.shader(n),
                    )?;
                    let color = record
                        .other
                        .light
                        .map(|l| LinSrgb::new(l.color.r, l.color.g, l.color.b))
                        .unwrap_or_else(|| LinSrgb::new(1., 1., 1.));

                    let mut light = Light::new(color, shader, transform);
                    light.set_uv(uv);
                    light.set_visible(record.visible);
                    lights.push((light, record.name));
                    continue;
                }
            };
            let shader = reference(
                &record.name,
                record.shader.as_deref(),
                Resources::LIT_SHADER,
                ResourceKind::Shader,
                |n| resources.shader(n),
            )?;
            let texture = reference(
                &record.name,
                record.texture.as_deref(),
                Resources::WHITE_TEXTURE,
                ResourceKind::Texture,
                |n| resources.texture(n),
            )?;
            let material = reference(
                &record.name,
                record.material.as_deref(),
                Resources::DEFAULT_MATERIAL,
                ResourceKind::Material,
                |n| resources.material(n),
            )?;

            let mut mesh = Mesh::new(kind, shader, texture, material, transform);
            mesh.set_uv(uv);
            mesh.set_visible(record.visible);
            meshes.push((mesh, record.name));
        }

        if !file.name.is_empty() {
            self.name = file.name;
        }
        for (mesh, name) in meshes {
            self.add_object_named(mesh, name);
        }
        for (light, name) in lights {
            self.add_light_named(light, name);
        }
        log::info!(
            "Loaded scene `{}`: {} objects, {} lights.",
            self.name,
            self.object_count(),
            self.light_count()
        );
        Ok(())
    }

    /// Reads a scene file relative to the resource root.
    pub fn load_from_json(
        &mut self,
        resources: &mut Resources,
        path: impl Into<PathBuf>,
    ) -> SceneResult<()> {
        let path = resources.resolve(path.into());
        let source = fs::read_to_string(&path).map_err(|source| {
            log::error!("Failed to open scene {}", path.display());
            SceneError::Io {
                path: path.clone(),
                source,
            }
        })?;
        let file = serde_json::from_str(&source)?;
        self.from_file(resources, file)
    }

    /// Writes the scene relative to the resource root and returns what was
    /// written.
    pub fn save_to_json(
        &self,
        resources: &Resources,
        path: impl Into<PathBuf>,
    ) -> SceneResult<serde_json::Value> {
        let json = serde_json::to_value(self.to_file(resources))?;
        let path = resources.resolve(path.into());
        fs::write(&path, serde_json::to_string_pretty(&json)?).map_err(|source| {
            log::error!("Failed to write scene {}", path.display());
            SceneError::Io { path, source }
        })?;
        Ok(json)
    }
}
