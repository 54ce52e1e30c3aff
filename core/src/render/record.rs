use std::collections::HashMap;

use crate::{
    render::{CullMode, RenderBackend, Uniform, MAX_LIGHTS},
    scene::{
        component::Geometry,
        resource::{ShaderId, TextureId},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    LoadShader(ShaderId),
    UnloadShader,
    SetUniform {
        shader: ShaderId,
        name: String,
        value: Uniform,
    },
    SetUniformArray {
        shader: ShaderId,
        name: String,
        index: usize,
        value: Uniform,
    },
    BindTexture {
        texture: TextureId,
        slot: u32,
    },
    SetCullMode(CullMode),
    Draw {
        /// The shader loaded when the draw was issued.
        shader: Option<ShaderId>,
        vertex_count: u32,
        index_count: u32,
    },
}

/// A backend without a GPU.
///
/// Records every command of the current frame and keeps the resolved uniform
/// state of each shader across frames, the way a real program object would.
#[derive(Debug)]
pub struct FrameRecorder {
    commands: Vec<RenderCommand>,
    bound: Option<ShaderId>,
    uniforms: HashMap<(ShaderId, String), Uniform>,
    arrays: HashMap<(ShaderId, String, usize), Uniform>,
    capacities: HashMap<String, usize>,
    default_capacity: usize,
    unbracketed: usize,
    unresolved: usize,
    frames: u64,
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new(MAX_LIGHTS)
    }
}

impl FrameRecorder {
    /// `default_capacity` is the declared length of any uniform array without
    /// an explicit capacity.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            commands: Vec::new(),
            bound: None,
            uniforms: HashMap::new(),
            arrays: HashMap::new(),
            capacities: HashMap::new(),
            default_capacity,
            unbracketed: 0,
            unresolved: 0,
            frames: 0,
        }
    }

    pub fn with_array_capacity(mut self, name: impl Into<String>, capacity: usize) -> Self {
        self.capacities.insert(name.into(), capacity);
        self
    }

    /// Starts a new frame. Commands are dropped, uniform state is kept.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { .. }))
            .count()
    }

    pub fn draws_with(&self, shader: ShaderId) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { shader: Some(s), .. } if *s == shader))
            .count()
    }

    /// Array writes to `name` issued this frame, resolved or not.
    pub fn array_writes(&self, name: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::SetUniformArray { name: n, .. } if n == name))
            .count()
    }

    /// Array writes to `name` on `shader` issued this frame.
    pub fn array_writes_on(&self, shader: ShaderId, name: &str) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    RenderCommand::SetUniformArray { shader: s, name: n, .. }
                        if *s == shader && n == name
                )
            })
            .count()
    }

    pub fn uniform(&self, shader: ShaderId, name: &str) -> Option<Uniform> {
        self.uniforms.get(&(shader, name.to_string())).copied()
    }

    pub fn uniform_array(&self, shader: ShaderId, name: &str, index: usize) -> Option<Uniform> {
        self.arrays.get(&(shader, name.to_string(), index)).copied()
    }

    /// Uniform writes issued while a different shader (or none) was loaded.
    pub fn unbracketed_writes(&self) -> usize {
        self.unbracketed
    }

    /// Array writes past the declared array length.
    pub fn unresolved_writes(&self) -> usize {
        self.unresolved
    }

    fn check_bracket(&mut self, shader: ShaderId, name: &str) {
        if self.bound != Some(shader) {
            log::warn!("Uniform `{}` written while shader {} isn't loaded.", name, shader);
            self.unbracketed += 1;
        }
    }

    fn capacity(&self, name: &str) -> usize {
        self.capacities
            .get(name)
            .copied()
            .unwrap_or(self.default_capacity)
    }
}

impl RenderBackend for FrameRecorder {
    fn load_shader(&mut self, shader: ShaderId) {
        self.bound = Some(shader);
        self.commands.push(RenderCommand::LoadShader(shader));
    }

    fn unload_shader(&mut self) {
        self.bound = None;
        self.commands.push(RenderCommand::UnloadShader);
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: Uniform) {
        self.check_bracket(shader, name);
        self.uniforms.insert((shader, name.to_string()), value);
        self.commands.push(RenderCommand::SetUniform {
            shader,
            name: name.to_string(),
            value,
        });
    }

    fn set_uniform_array(&mut self, shader: ShaderId, name: &str, index: usize, value: Uniform) {
        self.check_bracket(shader, name);
        if index < self.capacity(name) {
            self.arrays.insert((shader, name.to_string(), index), value);
        } else {
            log::trace!("`{}[{}]` doesn't resolve, write skipped.", name, index);
            self.unresolved += 1;
        }
        self.commands.push(RenderCommand::SetUniformArray {
            shader,
            name: name.to_string(),
            index,
            value,
        });
    }

    fn bind_texture(&mut self, texture: TextureId, slot: u32) {
        self.commands
            .push(RenderCommand::BindTexture { texture, slot });
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        self.commands.push(RenderCommand::SetCullMode(mode));
    }

    fn draw(&mut self, geometry: &Geometry) {
        self.commands.push(RenderCommand::Draw {
            shader: self.bound,
            vertex_count: geometry.vertex_count(),
            index_count: geometry.index_count(),
        });
    }
}
