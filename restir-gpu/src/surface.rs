use glam::{Vec3, Vec4, Vec4Swizzles};

/// Shading point read from the G-buffer.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Surface {
    pub position: Vec3,
    pub normal: Vec3,
    pub diffuse: Vec3,
    pub is_hit: bool,
}

impl Surface {
    /// Unpacks a G-buffer entry; `position.w == 0` marks a background pixel.
    pub fn new(position: Vec4, normal: Vec4, diffuse: Vec4) -> Self {
        let is_hit = position.w != 0.0;

        Self {
            position: position.xyz(),
            normal: if is_hit {
                normal.xyz().normalize_or_zero()
            } else {
                Vec3::ZERO
            },
            diffuse: diffuse.xyz(),
            is_hit,
        }
    }

    pub fn read(
        positions: &[Vec4],
        normals: &[Vec4],
        diffuses: &[Vec4],
        idx: usize,
    ) -> Self {
        Self::new(positions[idx], normals[idx], diffuses[idx])
    }

    pub fn is_some(&self) -> bool {
        self.is_hit
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Point nudged along the normal, used as origin of secondary rays.
    pub fn ray_origin(&self, min_t: f32) -> Vec3 {
        self.position + self.normal * min_t
    }

    pub fn depth(&self, camera_origin: Vec3) -> f32 {
        self.position.distance(camera_origin)
    }
}

#[cfg(test)]
mod tests {
    use glam::vec4;

    use super::*;

    #[test]
    fn background() {
        let target = Surface::new(
            Vec4::ZERO,
            Vec4::ZERO,
            vec4(0.2, 0.3, 0.4, 1.0),
        );

        assert!(target.is_none());
        assert_eq!(Vec3::ZERO, target.normal);
    }

    #[test]
    fn hit() {
        let target = Surface::new(
            vec4(1.0, 2.0, 3.0, 1.0),
            vec4(0.0, 2.0, 0.0, 0.0),
            vec4(0.5, 0.5, 0.5, 1.0),
        );

        assert!(target.is_some());
        assert_eq!(Vec3::Y, target.normal);
        assert_eq!(Vec3::new(1.0, 2.0, 3.0), target.position);
    }
}
