use std::path::PathBuf;

/// GLSL sources of a shader program. Compiling them is up to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Where the sources came from, relative to the resource root. Built-in
    /// shaders have no paths.
    pub vertex_path: Option<PathBuf>,
    pub fragment_path: Option<PathBuf>,
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex_path: None,
            fragment_path: None,
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Textured Phong shader reading `light_colors` and `light_positions`.
    pub fn builtin_lit() -> Self {
        Self::new(
            include_str!("shaders/lit.vert"),
            include_str!("shaders/lit.frag"),
        )
    }

    /// Flat shader used to draw light sources in their own color.
    pub fn builtin_light() -> Self {
        Self::new(
            include_str!("shaders/light.vert"),
            include_str!("shaders/light.frag"),
        )
    }

    pub fn is_builtin(&self) -> bool {
        self.vertex_path.is_none() && self.fragment_path.is_none()
    }
}
