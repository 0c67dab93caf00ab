use derivative::Derivative;
use glam::{UVec2, Vec4};
use log::debug;

/// CPU-side texture: `stride` texels (`Vec4`s) per pixel, row-major.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Texture {
    size: UVec2,
    stride: usize,
    #[derivative(Debug = "ignore")]
    data: Vec<Vec4>,
}

impl Texture {
    pub fn new(size: UVec2, stride: usize) -> Self {
        debug!("Allocating texture; size={size:?}, stride={stride}");

        Self {
            size,
            stride,
            data: vec![Vec4::ZERO; (size.x * size.y) as usize * stride],
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Fills every pixel with given texels; `value` is repeated if it's
    /// shorter than the stride.
    pub fn clear(&mut self, value: &[Vec4]) {
        if value.is_empty() {
            self.data.fill(Vec4::ZERO);
            return;
        }

        for (idx, texel) in self.data.iter_mut().enumerate() {
            *texel = value[(idx % self.stride) % value.len()];
        }
    }

    pub fn pixel(&self, pos: UVec2) -> &[Vec4] {
        let idx = self.offset(pos);

        &self.data[idx..idx + self.stride]
    }

    pub fn pixel_mut(&mut self, pos: UVec2) -> &mut [Vec4] {
        let idx = self.offset(pos);

        &mut self.data[idx..idx + self.stride]
    }

    pub fn data(&self) -> &[Vec4] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Vec4] {
        &mut self.data
    }

    /// Returns the raw bytes of this texture; handy for bit-exact
    /// comparisons, since reservoirs store integers inside floats.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    fn offset(&self, pos: UVec2) -> usize {
        (pos.y * self.size.x + pos.x) as usize * self.stride
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec4};

    use super::*;

    #[test]
    fn clear_and_pixels() {
        let mut target = Texture::new(uvec2(3, 2), 2);

        assert_eq!(12, target.data().len());

        target.clear(&[Vec4::ONE, Vec4::X]);

        assert_eq!(&[Vec4::ONE, Vec4::X], target.pixel(uvec2(2, 1)));

        target.pixel_mut(uvec2(1, 0))[1] = vec4(1.0, 2.0, 3.0, 4.0);

        assert_eq!(vec4(1.0, 2.0, 3.0, 4.0), target.data()[3]);
    }
}
