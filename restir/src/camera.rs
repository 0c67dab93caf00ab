use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World-to-view transformation.
    pub view: Mat4,

    /// View-to-clip transformation.
    pub projection: Mat4,
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Camera's position in world space.
    pub fn origin(&self) -> Vec3 {
        self.view.inverse().transform_point3(Vec3::ZERO)
    }
}
