use core::ops::{Deref, DerefMut};

use glam::{vec4, Vec4};

use crate::{LightId, LightsView, Reservoir, Surface, Vec3Ext};

/// Reservoir over direct lights, stored as a single texel per pixel.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct LightReservoir {
    pub reservoir: Reservoir<LightSample>,
}

impl LightReservoir {
    /// Number of texels (`Vec4`s) a single reservoir takes.
    pub const STRIDE: usize = 1;

    pub fn new(reservoir: Reservoir<LightSample>) -> Self {
        Self { reservoir }
    }

    /// x - (as u32) light id
    /// y - w_sum
    /// z - (as u32) m
    /// w - W
    pub fn encode(&self) -> [Vec4; Self::STRIDE] {
        [vec4(
            f32::from_bits(self.sample.light_id.get()),
            self.w_sum,
            f32::from_bits(self.m),
            self.w,
        )]
    }

    pub fn decode(data: [Vec4; Self::STRIDE]) -> Self {
        let [d0] = data;

        Self {
            reservoir: Reservoir {
                sample: LightSample {
                    light_id: LightId::new(d0.x.to_bits()),
                },
                w_sum: d0.y,
                m: d0.z.to_bits(),
                w: d0.w,
            },
        }
    }

    pub fn read(buffer: &[Vec4], idx: usize) -> Self {
        Self::decode([buffer[idx]])
    }

    pub fn write(&self, buffer: &mut [Vec4], idx: usize) {
        let [d0] = self.encode();

        buffer[idx] = d0;
    }
}

impl Deref for LightReservoir {
    type Target = Reservoir<LightSample>;

    fn deref(&self) -> &Self::Target {
        &self.reservoir
    }
}

impl DerefMut for LightReservoir {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reservoir
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct LightSample {
    pub light_id: LightId,
}

impl LightSample {
    pub fn new(light_id: LightId) -> Self {
        Self { light_id }
    }

    pub fn is_valid(&self, lights: LightsView) -> bool {
        !self.light_id.is_none() && lights.contains(self.light_id)
    }

    /// Target function: luminance of the unshadowed contribution of this
    /// sample's light on given surface.
    pub fn p_hat(&self, lights: LightsView, surface: Surface) -> f32 {
        if self.is_valid(lights) {
            lights.get(self.light_id).contribution(surface).luma()
        } else {
            0.0
        }
    }
}
