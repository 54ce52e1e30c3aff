use std::{collections::HashSet, fmt, str::FromStr};

use glam::Vec3;
use novo_core::scene::camera::Camera;

/// Degrees per second per unit of rotation sensitivity.
const ROTATION_RATE: f32 = 75.;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
    Boost,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "forward" => Self::Forward,
            "back" => Self::Back,
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "pitch+" => Self::PitchUp,
            "pitch-" => Self::PitchDown,
            "yaw+" => Self::YawLeft,
            "yaw-" => Self::YawRight,
            "roll+" => Self::RollRight,
            "roll-" => Self::RollLeft,
            "boost" => Self::Boost,
            _ => return Err(format!("Unknown action `{}`", s)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyState::Pressed => "down",
            KeyState::Released => "up",
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Units per second.
    pub speed: f32,
    pub sensitivity: f32,
    pub boost: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 10.,
            sensitivity: 3.,
            boost: 5.,
        }
    }
}

pub struct ControllableCamera {
    pub camera: Camera,
    held: HashSet<Action>,
    pub config: CameraConfig,
}

impl ControllableCamera {
    pub fn new(camera: Camera, config: CameraConfig) -> Self {
        Self {
            camera,
            held: HashSet::new(),
            config,
        }
    }

    pub fn control(&mut self, action: Action, state: KeyState) {
        match state {
            KeyState::Pressed => self.held.insert(action),
            KeyState::Released => self.held.remove(&action),
        };
    }

    fn axis(&self, positive: Action, negative: Action) -> f32 {
        self.held.contains(&positive) as i32 as f32 - self.held.contains(&negative) as i32 as f32
    }

    /// Movement along (right, up, forward), one unit per held key.
    fn velocity(&self) -> Vec3 {
        Vec3::new(
            self.axis(Action::Right, Action::Left),
            self.axis(Action::Up, Action::Down),
            self.axis(Action::Forward, Action::Back),
        )
    }

    /// Rotation along (pitch, yaw, roll), one unit per held key.
    fn spin(&self) -> Vec3 {
        Vec3::new(
            self.axis(Action::PitchUp, Action::PitchDown),
            self.axis(Action::YawLeft, Action::YawRight),
            self.axis(Action::RollRight, Action::RollLeft),
        )
    }

    pub fn is_moving(&self) -> bool {
        self.velocity() != Vec3::ZERO || self.spin() != Vec3::ZERO
    }

    pub fn update(&mut self, delta: f32) {
        if !self.is_moving() {
            return;
        }

        let boost = if self.held.contains(&Action::Boost) {
            self.config.boost
        } else {
            1.
        };
        self.camera.move_rotate(
            self.velocity() * self.config.speed * boost * delta,
            self.spin() * self.config.sensitivity * ROTATION_RATE * delta,
        );
    }
}
