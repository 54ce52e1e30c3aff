extern crate self as novo_core;

pub use glam;
pub use log;
pub use palette;

pub mod render;
pub mod scene;
pub mod util;
