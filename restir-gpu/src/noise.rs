use core::f32::consts::PI;

use glam::{vec2, vec3, UVec2, Vec2, Vec3};

/// Per-pixel pseudorandom stream (PCG hash).
#[derive(Copy, Clone, Debug)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        ((self.sample_int() >> 8) as f32) / ((1u32 << 24) as f32)
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }

    /// Generates a uniform sample inside of a disk.
    pub fn sample_disk(&mut self) -> Vec2 {
        let radius = self.sample().sqrt();

        self.sample_circle() * radius
    }

    /// Generates a uniform sample on a hemisphere around given normal.
    ///
    /// Probability density of each direction is `1 / (2 * PI)`.
    pub fn sample_hemisphere(&mut self, normal: Vec3) -> Vec3 {
        let cos_theta = self.sample();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let angle = 2.0 * PI * self.sample();
        let (t, b) = Self::basis(normal);

        (t * (sin_theta * angle.cos())
            + b * (sin_theta * angle.sin())
            + normal * cos_theta)
            .normalize()
    }

    /// Generates a cosine-weighted sample on a hemisphere around given normal.
    ///
    /// Probability density of each direction is `cos(theta) / PI`.
    pub fn sample_cosine_hemisphere(&mut self, normal: Vec3) -> Vec3 {
        let disk = self.sample_disk();
        let z = (1.0 - disk.length_squared()).max(0.0).sqrt();
        let (t, b) = Self::basis(normal);

        (t * disk.x + b * disk.y + normal * z).normalize()
    }

    fn basis(normal: Vec3) -> (Vec3, Vec3) {
        let up = if normal.z.abs() < 0.999 {
            vec3(0.0, 0.0, 1.0)
        } else {
            vec3(1.0, 0.0, 0.0)
        };

        let t = up.cross(normal).normalize();
        let b = normal.cross(t);

        (t, b)
    }
}
