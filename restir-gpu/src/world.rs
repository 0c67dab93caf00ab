use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct World {
    /// x - environment radiance r
    /// y - environment radiance g
    /// z - environment radiance b
    /// w - unused
    pub environment: Vec4,
}

impl World {
    /// Radiance carried by rays that escape the scene.
    pub fn environment(&self) -> Vec3 {
        self.environment.xyz()
    }
}
