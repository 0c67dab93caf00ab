use core::ops::{Deref, DerefMut};

use glam::{Vec3, Vec4, Vec4Swizzles};

use crate::{F32Ext, Normal, Reservoir, Surface, Vec3Ext};

/// Reservoir over indirect (one-bounce) lighting, stored as two texels per
/// pixel.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct IndirectReservoir {
    pub reservoir: Reservoir<IndirectSample>,
}

impl IndirectReservoir {
    /// Number of texels (`Vec4`s) a single reservoir takes.
    pub const STRIDE: usize = 2;

    pub fn new(reservoir: Reservoir<IndirectSample>) -> Self {
        Self { reservoir }
    }

    /// d0.xyz - radiance
    /// d0.w - w_sum
    /// d1.xy - direction (octahedron-encoded)
    /// d1.z - (as u32) m
    /// d1.w - W
    pub fn encode(&self) -> [Vec4; Self::STRIDE] {
        let direction = if self.w_sum > 0.0 {
            Normal::encode(self.sample.direction)
        } else {
            Default::default()
        };

        [
            self.sample.radiance.extend(self.w_sum),
            direction
                .extend(f32::from_bits(self.m))
                .extend(self.w),
        ]
    }

    pub fn decode(data: [Vec4; Self::STRIDE]) -> Self {
        let [d0, d1] = data;
        let w_sum = d0.w;

        let sample = if w_sum > 0.0 {
            IndirectSample {
                direction: Normal::decode(d1.xy()),
                radiance: d0.xyz(),
            }
        } else {
            IndirectSample::default()
        };

        Self {
            reservoir: Reservoir {
                sample,
                w_sum,
                m: d1.z.to_bits(),
                w: d1.w,
            },
        }
    }

    pub fn read(buffer: &[Vec4], idx: usize) -> Self {
        let idx = Self::STRIDE * idx;

        Self::decode([buffer[idx], buffer[idx + 1]])
    }

    pub fn write(&self, buffer: &mut [Vec4], idx: usize) {
        let idx = Self::STRIDE * idx;
        let [d0, d1] = self.encode();

        buffer[idx] = d0;
        buffer[idx + 1] = d1;
    }
}

impl Deref for IndirectReservoir {
    type Target = Reservoir<IndirectSample>;

    fn deref(&self) -> &Self::Target {
        &self.reservoir
    }
}

impl DerefMut for IndirectReservoir {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reservoir
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct IndirectSample {
    /// Direction of the bounce ray, in world space.
    pub direction: Vec3,

    /// Radiance arriving along `direction`.
    pub radiance: Vec3,
}

impl IndirectSample {
    pub fn cosine(&self, surface: Surface) -> f32 {
        surface.normal.dot(self.direction).saturate()
    }

    /// Target function: luminance of the incoming radiance, weighted by the
    /// cosine term at given surface.
    pub fn p_hat(&self, surface: Surface) -> f32 {
        if surface.is_none() {
            return 0.0;
        }

        self.radiance.luma() * self.cosine(surface)
    }

    /// Diffuse light reflected by given surface (without the `W` factor).
    pub fn contribution(&self, surface: Surface) -> Vec3 {
        if surface.is_none() {
            return Vec3::ZERO;
        }

        surface.diffuse / core::f32::consts::PI
            * self.radiance
            * self.cosine(surface)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn target(idx: usize) -> IndirectReservoir {
        IndirectReservoir::new(Reservoir {
            sample: IndirectSample {
                direction: vec3(0.3, 1.0, -0.2 * idx as f32).normalize(),
                radiance: vec3(1.0, 2.0, 3.0 + idx as f32),
            },
            w_sum: 0.5 + idx as f32,
            m: 3 + idx as u32,
            w: 1.25,
        })
    }

    #[test]
    fn serialization() {
        let mut buffer = [Vec4::ZERO; 8 * IndirectReservoir::STRIDE];

        for idx in 0..8 {
            target(idx).write(&mut buffer, idx);
        }

        for idx in 0..8 {
            let expected = target(idx);
            let actual = IndirectReservoir::read(&buffer, idx);

            assert_eq!(expected.m, actual.m);
            assert_eq!(expected.w_sum, actual.w_sum);
            assert_eq!(expected.w, actual.w);
            assert_eq!(expected.sample.radiance, actual.sample.radiance);

            assert!(expected
                .sample
                .direction
                .abs_diff_eq(actual.sample.direction, 0.001));
        }
    }

    #[test]
    fn empty_roundtrips() {
        let mut buffer = [Vec4::ONE; IndirectReservoir::STRIDE];

        IndirectReservoir::default().write(&mut buffer, 0);

        assert_eq!(
            IndirectReservoir::default(),
            IndirectReservoir::read(&buffer, 0)
        );
    }

    #[test]
    fn p_hat() {
        let sample = IndirectSample {
            direction: Vec3::Y,
            radiance: Vec3::ONE,
        };

        let surface = Surface {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            diffuse: Vec3::ONE,
            is_hit: true,
        };

        assert_relative_eq!(1.0, sample.p_hat(surface), epsilon = 0.0001);

        let surface = Surface {
            normal: -Vec3::Y,
            ..surface
        };

        assert_eq!(0.0, sample.p_hat(surface));
        assert_eq!(0.0, sample.p_hat(Surface::default()));
    }
}
