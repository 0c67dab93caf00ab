use bytemuck::{Pod, Zeroable};
use glam::{vec3, Vec3, Vec4, Vec4Swizzles};

use crate::Ray;

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug, PartialEq)]
pub struct Triangle {
    /// x, y, z - position of the first vertex
    /// w - albedo r
    pub d0: Vec4,

    /// x, y, z - position of the second vertex
    /// w - albedo g
    pub d1: Vec4,

    /// x, y, z - position of the third vertex
    /// w - albedo b
    pub d2: Vec4,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], albedo: Vec3) -> Self {
        Self {
            d0: positions[0].extend(albedo.x),
            d1: positions[1].extend(albedo.y),
            d2: positions[2].extend(albedo.z),
        }
    }

    pub fn position0(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn position1(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn position2(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn albedo(&self) -> Vec3 {
        vec3(self.d0.w, self.d1.w, self.d2.w)
    }

    /// Möller-Trumbore intersection; returns the distance along `ray`, if
    /// the ray hits this triangle before reaching its length.
    pub fn hit(&self, ray: Ray) -> Option<f32> {
        let v0v1 = self.position1() - self.position0();
        let v0v2 = self.position2() - self.position0();

        // ---

        let pvec = ray.dir().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < f32::EPSILON {
            return None;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.position0();
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.dir().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= 0.0)
            | (distance >= ray.len())
        {
            return None;
        }

        Some(distance)
    }

    /// Geometric normal, facing against given direction.
    pub fn normal_facing(&self, dir: Vec3) -> Vec3 {
        let normal = (self.position1() - self.position0())
            .cross(self.position2() - self.position0())
            .normalize_or_zero();

        if normal.dot(dir) > 0.0 {
            -normal
        } else {
            normal
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TriangleId(u32);

impl TriangleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn target() -> Triangle {
        Triangle::new(
            [
                vec3(-1.0, -1.0, 0.0),
                vec3(1.0, -1.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ],
            vec3(0.1, 0.2, 0.3),
        )
    }

    #[test]
    fn hit() {
        let ray = Ray::new(vec3(0.0, 0.0, -2.0), Vec3::Z);

        assert_relative_eq!(
            2.0,
            target().hit(ray).unwrap(),
            epsilon = 0.0001
        );
        assert_eq!(vec3(0.0, 0.0, -1.0), target().normal_facing(ray.dir()));
    }

    #[test]
    fn miss() {
        let ray = Ray::new(vec3(5.0, 0.0, -2.0), Vec3::Z);

        assert!(target().hit(ray).is_none());
    }

    #[test]
    fn too_short() {
        let ray = Ray::new(vec3(0.0, 0.0, -2.0), Vec3::Z).with_len(1.5);

        assert!(target().hit(ray).is_none());
    }

    #[test]
    fn albedo() {
        assert_eq!(vec3(0.1, 0.2, 0.3), target().albedo());
    }
}
