pub mod ext;
pub mod math;
