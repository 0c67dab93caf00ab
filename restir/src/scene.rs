use derivative::Derivative;
use glam::Vec3;

use crate::{gpu, Camera, Light, Triangle};

/// Everything the stages need to know about the world, apart from the
/// G-buffer.
#[derive(Clone, Default, Derivative)]
#[derivative(Debug)]
pub struct Scene {
    pub camera: Option<Camera>,

    #[derivative(Debug = "ignore")]
    pub lights: Vec<Light>,

    #[derivative(Debug = "ignore")]
    pub triangles: Vec<Triangle>,

    /// Radiance of rays that escape the scene.
    pub environment: Vec3,
}

impl Scene {
    pub(crate) fn serialize_lights(&self) -> Vec<gpu::Light> {
        self.lights.iter().map(Light::serialize).collect()
    }

    pub(crate) fn serialize_triangles(&self) -> Vec<gpu::Triangle> {
        self.triangles.iter().map(Triangle::serialize).collect()
    }

    pub(crate) fn serialize_world(&self) -> gpu::World {
        gpu::World {
            environment: self.environment.extend(0.0),
        }
    }
}
