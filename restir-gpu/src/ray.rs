use glam::Vec3;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    origin: Vec3,
    dir: Vec3,
    len: f32,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir,
            len: f32::MAX,
        }
    }

    /// Creates a ray going from `origin` towards `target`, stopping right
    /// before it.
    pub fn between(origin: Vec3, target: Vec3, min_t: f32) -> Self {
        let dir = target - origin;
        let len = dir.length();

        Self::new(origin, dir / len.max(crate::RESTIR_EPSILON))
            .with_len((len - min_t).max(0.0))
    }

    pub fn with_len(mut self, len: f32) -> Self {
        self.len = len;
        self
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn len(&self) -> f32 {
        self.len
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.dir * distance
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}
