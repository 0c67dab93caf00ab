use glam::{IVec2, UVec2};

/// Dimensions of the launched grid; used to index screen-space structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    size: UVec2,
}

impl Screen {
    pub fn new(size: UVec2) -> Self {
        Self { size }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Given a point in screen-coordinates, returns a unique index for it.
    pub fn idx(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize
    }

    /// Inverse of [`Self::idx()`].
    pub fn pos(&self, idx: usize) -> UVec2 {
        let idx = idx as u32;

        UVec2::new(idx % self.size.x, idx / self.size.x)
    }

    /// Clips given point to the screen's borders.
    pub fn clamp(&self, pos: IVec2) -> UVec2 {
        let max = self.size.as_ivec2() - IVec2::ONE;

        pos.clamp(IVec2::ZERO, max.max(IVec2::ZERO)).as_uvec2()
    }
}
