use glam::Vec3;

use crate::gpu;

#[derive(Clone, Debug)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub albedo: Vec3,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], albedo: Vec3) -> Self {
        Self { positions, albedo }
    }

    pub(crate) fn serialize(&self) -> gpu::Triangle {
        gpu::Triangle::new(self.positions, self.albedo)
    }
}
