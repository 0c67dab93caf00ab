use glam::Vec3;

use crate::gpu;

#[derive(Clone, Debug)]
pub enum Light {
    Point {
        position: Vec3,
        color: Vec3,
        intensity: f32,
    },

    Spot {
        position: Vec3,
        color: Vec3,
        intensity: f32,
        direction: Vec3,
        angle: f32,
    },
}

impl Light {
    pub(crate) fn serialize(&self) -> gpu::Light {
        match *self {
            Light::Point {
                position,
                color,
                intensity,
            } => gpu::Light::point(position, color, intensity),

            Light::Spot {
                position,
                color,
                intensity,
                direction,
                angle,
            } => gpu::Light::spot(position, color, intensity, direction, angle),
        }
    }
}
