use glam::Vec3;

use crate::{Ray, Surface, Triangle, TriangleId};

/// Nearest intersection of a ray with the scene.
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    pub triangle_id: TriangleId,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
}

impl TriangleHit {
    pub fn as_surface(&self) -> Surface {
        Surface {
            position: self.point,
            normal: self.normal,
            diffuse: self.albedo,
            is_hit: true,
        }
    }
}

#[derive(Clone, Copy)]
pub struct TrianglesView<'a> {
    items: &'a [Triangle],
}

impl<'a> TrianglesView<'a> {
    pub fn new(items: &'a [Triangle]) -> Self {
        Self { items }
    }

    pub fn get(&self, id: TriangleId) -> Triangle {
        self.items[id.get() as usize]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Traces given ray and returns its nearest hit.
    pub fn trace_nearest(&self, ray: Ray) -> Option<TriangleHit> {
        let mut nearest: Option<(usize, f32)> = None;
        let mut ray = ray;

        for (idx, triangle) in self.items.iter().enumerate() {
            if let Some(distance) = triangle.hit(ray) {
                nearest = Some((idx, distance));
                ray = ray.with_len(distance);
            }
        }

        let (idx, distance) = nearest?;
        let triangle = self.items[idx];

        Some(TriangleHit {
            triangle_id: TriangleId::new(idx as u32),
            distance,
            point: ray.at(distance),
            normal: triangle.normal_facing(ray.dir()),
            albedo: triangle.albedo(),
        })
    }

    /// Returns whether given ray hits anything before reaching its length.
    pub fn trace_any(&self, ray: Ray) -> bool {
        self.items
            .iter()
            .any(|triangle| triangle.hit(ray).is_some())
    }
}
