use std::path::PathBuf;

use glam::{Vec2, Vec3};
use novo_core::scene::{camera::ProjectionMode, EntityId};

use crate::scene::{Action, KeyState};

pub const HELP: &str = "\
Commands:
  help                                  show this text
  key <action> <down|up>                press or release a camera action
  tick <seconds>                        advance the camera controller
  render [frames]                       render one or more frames
  camera                                print the camera state
  camera pos|rot <x> <y> <z>            place the camera
  camera fov <degrees>
  camera mode <perspective|orthographic>
  list                                  list objects and lights
  select <id>
  set position|rotation|size <x> <y> <z>
  set uv <u> <v>
  set color <r> <g> <b>                 lights only
  show | hide
  material <name> <ambient|diffuse|specular|shininess> <value>
  remove | reload | clear
  open <path> | save <path>
  quit
Actions: forward back left right up down pitch+ pitch- yaw+ yaw- roll+ roll- boost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Position,
    Rotation,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialField {
    Ambient,
    Diffuse,
    Specular,
    Shininess,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Key(Action, KeyState),
    Tick(f32),
    Render(u32),
    ShowCamera,
    CameraPosition(Vec3),
    CameraRotation(Vec3),
    CameraFov(f32),
    CameraMode(ProjectionMode),
    List,
    Select(EntityId),
    Set(Property, Vec3),
    SetUv(Vec2),
    SetColor(Vec3),
    Visible(bool),
    Material(String, MaterialField, f32),
    Remove,
    Reload,
    Clear,
    Open(PathBuf),
    Save(PathBuf),
    Quit,
}

fn number<T: std::str::FromStr>(word: Option<&str>, what: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("Missing {}", what))?;
    word.parse()
        .map_err(|_| format!("Expected a number for {}, got `{}`", what, word))
}

fn vec3<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Vec3, String> {
    Ok(Vec3::new(
        number(words.next(), "x")?,
        number(words.next(), "y")?,
        number(words.next(), "z")?,
    ))
}

fn path<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<PathBuf, String> {
    words
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| "Missing path".to_string())
}

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        if head.starts_with('#') {
            return Ok(None);
        }

        let command = match head {
            "help" => Self::Help,
            "key" => {
                let action: Action = words
                    .next()
                    .ok_or_else(|| "Missing action".to_string())?
                    .parse()?;
                let state = match words.next() {
                    Some("down") => KeyState::Pressed,
                    Some("up") => KeyState::Released,
                    other => {
                        return Err(format!(
                            "Expected `down` or `up`, got `{}`",
                            other.unwrap_or_default()
                        ))
                    }
                };
                Self::Key(action, state)
            }
            "tick" => Self::Tick(number(words.next(), "seconds")?),
            "render" => match words.next() {
                Some(n) => Self::Render(number(Some(n), "frames")?),
                None => Self::Render(1),
            },
            "camera" => match words.next() {
                None => Self::ShowCamera,
                Some("pos") => Self::CameraPosition(vec3(&mut words)?),
                Some("rot") => Self::CameraRotation(vec3(&mut words)?),
                Some("fov") => Self::CameraFov(number(words.next(), "fov")?),
                Some("mode") => Self::CameraMode(match words.next() {
                    Some("perspective") => ProjectionMode::Perspective,
                    Some("orthographic") => ProjectionMode::Orthographic,
                    _ => return Err("Expected `perspective` or `orthographic`".to_string()),
                }),
                Some(other) => return Err(format!("Unknown camera property `{}`", other)),
            },
            "list" => Self::List,
            "select" => Self::Select(EntityId::from_raw(number(words.next(), "id")?)),
            "set" => match words.next() {
                Some("position") => Self::Set(Property::Position, vec3(&mut words)?),
                Some("rotation") => Self::Set(Property::Rotation, vec3(&mut words)?),
                Some("size") => Self::Set(Property::Size, vec3(&mut words)?),
                Some("uv") => Self::SetUv(Vec2::new(
                    number(words.next(), "u")?,
                    number(words.next(), "v")?,
                )),
                Some("color") => Self::SetColor(vec3(&mut words)?),
                Some(other) => return Err(format!("Unknown property `{}`", other)),
                None => return Err("Missing property".to_string()),
            },
            "show" => Self::Visible(true),
            "hide" => Self::Visible(false),
            "material" => {
                let name = words
                    .next()
                    .ok_or_else(|| "Missing material name".to_string())?;
                let field = match words.next() {
                    Some("ambient") => MaterialField::Ambient,
                    Some("diffuse") => MaterialField::Diffuse,
                    Some("specular") => MaterialField::Specular,
                    Some("shininess") => MaterialField::Shininess,
                    _ => return Err("Expected ambient, diffuse, specular or shininess".to_string()),
                };
                Self::Material(name.to_string(), field, number(words.next(), "value")?)
            }
            "remove" => Self::Remove,
            "reload" => Self::Reload,
            "clear" => Self::Clear,
            "open" => Self::Open(path(&mut words)?),
            "save" => Self::Save(path(&mut words)?),
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("Unknown command `{}`, try `help`", other)),
        };

        if let Some(extra) = words.next() {
            log::warn!("Ignoring trailing input starting at `{}`.", extra);
        }
        Ok(Some(command))
    }
}
