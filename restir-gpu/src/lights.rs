use crate::{Light, LightId, WhiteNoise};

#[derive(Clone, Copy)]
pub struct LightsView<'a> {
    items: &'a [Light],
}

impl<'a> LightsView<'a> {
    pub fn new(items: &'a [Light]) -> Self {
        Self { items }
    }

    pub fn get(&self, id: LightId) -> Light {
        self.items[id.get() as usize]
    }

    pub fn contains(&self, id: LightId) -> bool {
        (id.get() as usize) < self.items.len()
    }

    /// Picks a light uniformly at random; the probability of picking any
    /// particular light is `1 / self.len()`.
    ///
    /// Returns [`LightId::NONE`] when there are no lights.
    pub fn sample_uniform(&self, wnoise: &mut WhiteNoise) -> LightId {
        if self.items.is_empty() {
            return LightId::NONE;
        }

        let id = (wnoise.sample() * self.items.len() as f32) as usize;

        LightId::new(id.min(self.items.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, Vec3};

    use super::*;

    #[test]
    fn sample_uniform() {
        let lights = [Light::point(Vec3::ZERO, Vec3::ONE, 1.0); 3];
        let target = LightsView::new(&lights);
        let mut wnoise = WhiteNoise::new(1234, uvec2(5, 7));
        let mut counts = [0; 3];

        for _ in 0..3000 {
            counts[target.sample_uniform(&mut wnoise).get() as usize] += 1;
        }

        for count in counts {
            assert!(count > 800 && count < 1200, "count = {count}");
        }

        assert!(LightsView::new(&[]).sample_uniform(&mut wnoise).is_none());
    }
}
