use bytemuck::{Pod, Zeroable};

/// Frame counter; drives per-pixel pseudorandom streams.
///
/// Wraps silently, which is fine for sampling purposes.
#[repr(C)]
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable, Debug,
)]
pub struct Frame(u32);

impl Frame {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps() {
        assert_eq!(Frame::new(0), Frame::new(u32::MAX).next());
        assert_eq!(0x1338, Frame::new(0x1337).next().get());
    }
}
