use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::render::{shader::ShaderSource, Uniforms};

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode texture {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No {kind} named `{name}`.")]
    NotFound { kind: ResourceKind, name: String },
}

pub type ResourceResult<T> = Result<T, ResourceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Shader,
    Texture,
    Material,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Shader => "shader",
            ResourceKind::Texture => "texture",
            ResourceKind::Material => "material",
        })
    }
}

pub trait ResourceId: Copy + Eq {
    fn generate() -> Self;
}

macro_rules! define_id {
    ($name: ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ResourceId for $name {
            fn generate() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(ShaderId);
define_id!(TextureId);
define_id!(MaterialId);

/// Lighting response of a surface, shared by every mesh referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Uniforms)]
#[uniforms(prefix = "material")]
#[serde(default)]
pub struct Material {
    pub ambient_factor: f32,
    pub diffuse_factor: f32,
    pub specular_factor: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient_factor: 0.1,
            diffuse_factor: 10.,
            specular_factor: 1.,
            shininess: 32.,
        }
    }
}

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// Channel count of the source image before expansion to RGBA.
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            path: None,
            width: 1,
            height: 1,
            channels: 4,
            pixels: rgba.to_vec(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> ResourceResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| ResourceError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let channels = image.color().channel_count();
        let rgba = image.flipv().into_rgba8();

        Ok(Self {
            path: None,
            width: rgba.width(),
            height: rgba.height(),
            channels,
            pixels: rgba.into_raw(),
        })
    }
}

/// Name keyed, insertion ordered storage with stable ids.
#[derive(Debug)]
struct Table<I, T> {
    entries: IndexMap<String, (I, T)>,
}

impl<I, T> Default for Table<I, T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<I: ResourceId, T> Table<I, T> {
    /// Replaces the value under an existing name but keeps its id.
    fn insert(&mut self, name: &str, value: T) -> I {
        if let Some((id, old)) = self.entries.get_mut(name) {
            *old = value;
            return *id;
        }

        let id = I::generate();
        self.entries.insert(name.to_string(), (id, value));
        id
    }

    fn id(&self, name: &str) -> Option<I> {
        self.entries.get(name).map(|(id, _)| *id)
    }

    fn name(&self, id: I) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, (i, _))| *i == id)
            .map(|(name, _)| name.as_str())
    }

    fn get(&self, id: I) -> Option<&T> {
        self.entries.values().find(|(i, _)| *i == id).map(|(_, v)| v)
    }

    fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.entries
            .values_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, v)| v)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, I, &T)> {
        self.entries
            .iter()
            .map(|(name, (id, v))| (name.as_str(), *id, v))
    }
}

#[derive(Debug, Clone)]
struct MaterialEntry {
    material: Material,
    path: Option<PathBuf>,
}

/// Shaders, textures and materials by name, with file paths resolved against
/// a root directory.
#[derive(Debug)]
pub struct Resources {
    root: PathBuf,
    shaders: Table<ShaderId, ShaderSource>,
    textures: Table<TextureId, Texture>,
    materials: Table<MaterialId, MaterialEntry>,
}

impl Resources {
    pub const LIT_SHADER: &'static str = "lit";
    pub const LIGHT_SHADER: &'static str = "light";
    pub const DEFAULT_MATERIAL: &'static str = "default";
    pub const WHITE_TEXTURE: &'static str = "white";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            shaders: Default::default(),
            textures: Default::default(),
            materials: Default::default(),
        }
    }

    /// Uses the directory holding `exe_path` as root.
    pub fn from_exe_path(exe_path: impl AsRef<Path>) -> Self {
        let root = exe_path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(root)
    }

    /// Registers the built-in shaders, material and texture.
    pub fn install_builtins(&mut self) {
        self.add_shader(Self::LIT_SHADER, ShaderSource::builtin_lit());
        self.add_shader(Self::LIGHT_SHADER, ShaderSource::builtin_light());
        self.add_material(Self::DEFAULT_MATERIAL, Material::default());
        self.add_texture(Self::WHITE_TEXTURE, Texture::solid([255; 4]));
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> ResourceResult<String> {
        let path = self.resolve(path);
        fs::read_to_string(&path).map_err(|source| {
            log::error!("Failed to open file {}", path.display());
            ResourceError::Io { path, source }
        })
    }

    pub fn write_string(&self, path: impl AsRef<Path>, contents: &str) -> ResourceResult<()> {
        let path = self.resolve(path);
        fs::write(&path, contents).map_err(|source| {
            log::error!("Failed to write file {}", path.display());
            ResourceError::Io { path, source }
        })
    }

    pub fn load_shader(
        &mut self,
        name: &str,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> ResourceResult<ShaderId> {
        let source = ShaderSource {
            vertex: self.read_to_string(&vertex_path)?,
            fragment: self.read_to_string(&fragment_path)?,
            vertex_path: Some(vertex_path.as_ref().to_path_buf()),
            fragment_path: Some(fragment_path.as_ref().to_path_buf()),
        };
        log::debug!("Loaded shader `{}`.", name);
        Ok(self.add_shader(name, source))
    }

    pub fn add_shader(&mut self, name: &str, source: ShaderSource) -> ShaderId {
        self.shaders.insert(name, source)
    }

    pub fn load_texture(&mut self, name: &str, path: impl AsRef<Path>) -> ResourceResult<TextureId> {
        let mut texture = Texture::load(self.resolve(&path)).map_err(|e| {
            log::error!("Failed to load texture {}: {}", path.as_ref().display(), e);
            e
        })?;
        texture.path = Some(path.as_ref().to_path_buf());
        log::debug!(
            "Loaded texture `{}` ({}x{}, {} channels).",
            name,
            texture.width,
            texture.height,
            texture.channels
        );
        Ok(self.add_texture(name, texture))
    }

    pub fn add_texture(&mut self, name: &str, texture: Texture) -> TextureId {
        self.textures.insert(name, texture)
    }

    /// Reads a JSON file holding material factors. Missing factors take their
    /// default value.
    pub fn load_material(&mut self, name: &str, path: impl AsRef<Path>) -> ResourceResult<MaterialId> {
        let source = self.read_to_string(&path)?;
        let material = serde_json::from_str(&source).map_err(|source| {
            log::error!("Failed to parse material {}", path.as_ref().display());
            ResourceError::Json {
                path: path.as_ref().to_path_buf(),
                source,
            }
        })?;
        Ok(self.materials.insert(
            name,
            MaterialEntry {
                material,
                path: Some(path.as_ref().to_path_buf()),
            },
        ))
    }

    pub fn add_material(&mut self, name: &str, material: Material) -> MaterialId {
        self.materials.insert(
            name,
            MaterialEntry {
                material,
                path: None,
            },
        )
    }

    pub fn shader(&self, name: &str) -> ResourceResult<ShaderId> {
        lookup(self.shaders.id(name), ResourceKind::Shader, name)
    }

    pub fn texture(&self, name: &str) -> ResourceResult<TextureId> {
        lookup(self.textures.id(name), ResourceKind::Texture, name)
    }

    pub fn material(&self, name: &str) -> ResourceResult<MaterialId> {
        lookup(self.materials.id(name), ResourceKind::Material, name)
    }

    pub fn shader_name(&self, id: ShaderId) -> Option<&str> {
        self.shaders.name(id)
    }

    pub fn texture_name(&self, id: TextureId) -> Option<&str> {
        self.textures.name(id)
    }

    pub fn material_name(&self, id: MaterialId) -> Option<&str> {
        self.materials.name(id)
    }

    pub fn shader_source(&self, id: ShaderId) -> Option<&ShaderSource> {
        self.shaders.get(id)
    }

    pub fn texture_by_id(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id)
    }

    pub fn material_by_id(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id).map(|e| &e.material)
    }

    /// Editing a material detaches it from the file it was loaded from, so a
    /// saved scene carries the edited factors inline.
    pub fn material_by_id_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id).map(|e| {
            e.path = None;
            &mut e.material
        })
    }

    pub fn shaders(&self) -> impl Iterator<Item = (&str, ShaderId, &ShaderSource)> {
        self.shaders.iter()
    }

    pub fn textures(&self) -> impl Iterator<Item = (&str, TextureId, &Texture)> {
        self.textures.iter()
    }

    /// Materials with the file they were loaded from, if any.
    pub fn materials(&self) -> impl Iterator<Item = (&str, MaterialId, &Material, Option<&Path>)> {
        self.materials
            .iter()
            .map(|(name, id, e)| (name, id, &e.material, e.path.as_deref()))
    }
}

fn lookup<I>(id: Option<I>, kind: ResourceKind, name: &str) -> ResourceResult<I> {
    id.ok_or_else(|| {
        log::error!("Failed to find {} {}", kind, name);
        ResourceError::NotFound {
            kind,
            name: name.to_string(),
        }
    })
}

#[cfg(test)]
mod test {
    use crate::render::{record::FrameRecorder, RenderBackend, Uniform, UniformBlock};

    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("novo-{}-{}", tag, Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn reinserting_a_name_keeps_its_id() {
        let mut resources = Resources::new(".");
        let a = resources.add_material("m", Material::default());
        let b = resources.add_material(
            "m",
            Material {
                shininess: 8.,
                ..Default::default()
            },
        );
        assert_eq!(a, b);
        assert_eq!(resources.material_by_id(a).unwrap().shininess, 8.);
        assert_eq!(resources.material_name(a), Some("m"));
    }

    #[test]
    fn unknown_names_are_errors() {
        let resources = Resources::new(".");
        let err = resources.texture("brick").unwrap_err();
        assert!(matches!(
            err,
            ResourceError::NotFound {
                kind: ResourceKind::Texture,
                ..
            }
        ));
        assert_eq!(err.to_string(), "No texture named `brick`.");
    }

    #[test]
    fn exe_path_root_is_its_directory() {
        let resources = Resources::from_exe_path("/opt/novo/bin/novo_editor");
        assert_eq!(resources.root(), Path::new("/opt/novo/bin"));
        assert_eq!(
            resources.resolve("scenes/a.json"),
            PathBuf::from("/opt/novo/bin/scenes/a.json")
        );
    }

    #[test]
    fn loads_shader_and_material_files() {
        let root = temp_root("res");
        fs::write(root.join("a.vert"), "void main() {}").unwrap();
        fs::write(root.join("a.frag"), "void main() { }").unwrap();
        fs::write(root.join("m.json"), r#"{ "shininess": 4.0 }"#).unwrap();

        let mut resources = Resources::new(&root);
        let shader = resources.load_shader("a", "a.vert", "a.frag").unwrap();
        let source = resources.shader_source(shader).unwrap();
        assert_eq!(source.vertex, "void main() {}");
        assert_eq!(source.vertex_path.as_deref(), Some(Path::new("a.vert")));

        let material = resources.load_material("m", "m.json").unwrap();
        let m = resources.material_by_id(material).unwrap();
        assert_eq!(m.shininess, 4.);
        assert_eq!(m.ambient_factor, Material::default().ambient_factor);

        let missing = resources.load_shader("b", "missing.vert", "a.frag");
        assert!(matches!(missing, Err(ResourceError::Io { .. })));

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn loads_textures_flipped() {
        let root = temp_root("tex");
        let mut img = image::RgbImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        img.save(root.join("t.png")).unwrap();

        let mut resources = Resources::new(&root);
        let id = resources.load_texture("t", "t.png").unwrap();
        let texture = resources.texture_by_id(id).unwrap();
        assert_eq!((texture.width, texture.height, texture.channels), (1, 2, 3));
        // Bottom row (blue) comes first.
        assert_eq!(&texture.pixels[..4], &[0, 0, 255, 255]);
        assert_eq!(texture.path.as_deref(), Some(Path::new("t.png")));

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn material_writes_prefixed_uniforms() {
        let shader = ShaderId::new();
        let mut recorder = FrameRecorder::default();
        recorder.load_shader(shader);
        Material::default().write_uniforms(&mut recorder, shader);
        recorder.unload_shader();

        assert_eq!(
            recorder.uniform(shader, "material.shininess"),
            Some(Uniform::Float(32.))
        );
        assert_eq!(
            recorder.uniform(shader, "material.diffuse_factor"),
            Some(Uniform::Float(10.))
        );
        assert_eq!(recorder.unbracketed_writes(), 0);
    }
}
