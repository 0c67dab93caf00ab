use core::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec3, Vec4, Vec4Swizzles};

use crate::{F32Ext, Ray, Surface, TrianglesView, RESTIR_EPSILON};

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable, Debug, PartialEq)]
pub struct Light {
    /// x - position x
    /// y - position y
    /// z - position z
    /// w - (as u32) light type: 0 - point light, 1 - spot light
    pub d0: Vec4,

    /// x - color r
    /// y - color g
    /// z - color b
    /// w - intensity
    pub d1: Vec4,

    /// x - if it's a spot light: direction x
    /// y - if it's a spot light: direction y
    /// z - if it's a spot light: direction z
    /// w - if it's a spot light: angle
    pub d2: Vec4,
}

impl Light {
    pub const TYPE_POINT: u32 = 0;
    pub const TYPE_SPOT: u32 = 1;

    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            d0: position.extend(f32::from_bits(Self::TYPE_POINT)),
            d1: color.extend(intensity),
            d2: Vec4::ZERO,
        }
    }

    pub fn spot(
        position: Vec3,
        color: Vec3,
        intensity: f32,
        direction: Vec3,
        angle: f32,
    ) -> Self {
        let direction = direction.normalize_or_zero();

        Self {
            d0: position.extend(f32::from_bits(Self::TYPE_SPOT)),
            d1: color.extend(intensity),
            d2: vec4(direction.x, direction.y, direction.z, angle),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn color(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn intensity(&self) -> f32 {
        self.d1.w
    }

    pub fn radiance(&self) -> Vec3 {
        self.color() * self.intensity()
    }

    pub fn is_spot(&self) -> bool {
        self.d0.w.to_bits() == Self::TYPE_SPOT
    }

    pub fn spot_direction(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn spot_angle(&self) -> f32 {
        self.d2.w
    }

    /// Returns unshadowed Lambertian contribution of this light on given
    /// surface.
    ///
    /// Note that this function doesn't perform visibility check (see:
    /// [`Self::is_occluded()`]).
    pub fn contribution(&self, surface: Surface) -> Vec3 {
        if surface.is_none() {
            return Vec3::ZERO;
        }

        let cone_factor = if self.is_spot() {
            let angle = self
                .spot_direction()
                .angle_between(surface.position - self.center());

            (1.0 - (angle / self.spot_angle().max(RESTIR_EPSILON)).powf(3.0))
                .saturate()
        } else {
            1.0
        };

        if cone_factor <= 0.0 {
            return Vec3::ZERO;
        }

        // ---

        let to_light = self.center() - surface.position;
        let distance_squared = to_light.length_squared().max(RESTIR_EPSILON);
        let l = to_light / distance_squared.sqrt();
        let n_o_l = surface.normal.dot(l).saturate();

        surface.diffuse / PI * self.radiance() * n_o_l * cone_factor
            / distance_squared
    }

    /// Casts a shadow ray from given surface towards this light and returns
    /// whether anything stands in between.
    pub fn is_occluded(
        &self,
        triangles: TrianglesView,
        surface: Surface,
        min_t: f32,
    ) -> bool {
        let ray = Ray::between(surface.ray_origin(min_t), self.center(), min_t);

        triangles.trace_any(ray)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LightId(u32);

impl LightId {
    /// Marks a reservoir that hasn't seen any candidate yet.
    pub const NONE: Self = Self(u32::MAX);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl Default for LightId {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use crate::Triangle;

    use super::*;

    fn surface() -> Surface {
        Surface {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            diffuse: Vec3::ONE,
            is_hit: true,
        }
    }

    #[test]
    fn point_contribution() {
        let target = Light::point(vec3(0.0, 2.0, 0.0), Vec3::ONE, 4.0);
        let actual = target.contribution(surface());

        // 1/pi * 4 * cos(0) / 2^2
        assert_relative_eq!(1.0 / PI, actual.x, epsilon = 0.0001);
        assert_relative_eq!(1.0 / PI, actual.y, epsilon = 0.0001);
    }

    #[test]
    fn below_horizon() {
        let target = Light::point(vec3(0.0, -2.0, 0.0), Vec3::ONE, 4.0);

        assert_eq!(Vec3::ZERO, target.contribution(surface()));
    }

    #[test]
    fn spot_cone() {
        let target = Light::spot(
            vec3(0.0, 2.0, 0.0),
            Vec3::ONE,
            4.0,
            vec3(1.0, 0.0, 0.0),
            0.3,
        );

        assert_eq!(Vec3::ZERO, target.contribution(surface()));
        assert!(target.is_spot());
    }

    #[test]
    fn background_gets_nothing() {
        let target = Light::point(vec3(0.0, 2.0, 0.0), Vec3::ONE, 4.0);

        assert_eq!(Vec3::ZERO, target.contribution(Surface::default()));
    }

    #[test]
    fn occlusion() {
        let target = Light::point(vec3(0.0, 2.0, 0.0), Vec3::ONE, 4.0);

        let blocker = [Triangle::new(
            [
                vec3(-5.0, 1.0, -5.0),
                vec3(5.0, 1.0, -5.0),
                vec3(0.0, 1.0, 5.0),
            ],
            Vec3::ONE,
        )];

        assert!(target.is_occluded(
            TrianglesView::new(&blocker),
            surface(),
            0.001
        ));

        assert!(!target.is_occluded(TrianglesView::new(&[]), surface(), 0.001));
    }
}
