use glam::Vec3;
use palette::{rgb::Rgb, LinSrgb};

pub trait RgbToVec3 {
    fn to_vec3(self) -> Vec3;
}

macro_rules! impl_rgb_to_vec3 {
    ($ty: ident) => {
        impl RgbToVec3 for $ty {
            fn to_vec3(self) -> Vec3 {
                Vec3 {
                    x: self.red,
                    y: self.green,
                    z: self.blue,
                }
            }
        }
    };
}

impl_rgb_to_vec3!(Rgb);
impl_rgb_to_vec3!(LinSrgb);

pub trait Vec3ToRgb {
    fn to_rgb(self) -> LinSrgb;
}

impl Vec3ToRgb for Vec3 {
    fn to_rgb(self) -> LinSrgb {
        LinSrgb::new(self.x, self.y, self.z)
    }
}
