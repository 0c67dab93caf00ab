use fxhash::{FxHashMap, FxHashSet};
use glam::{UVec2, Vec4};
use log::debug;

use crate::{Channel, Error, Result, Texture};

/// Offset applied to secondary rays' origins, unless configured otherwise.
pub const DEFAULT_MIN_T: f32 = 0.001;

/// Per-pixel textures, addressed by channel.
///
/// Channels are requested up-front (by passes, during initialization) and
/// allocated once the screen size is known; a channel that hasn't been
/// requested, or that has been released, is unavailable.
#[derive(Debug)]
pub struct Resources {
    size: UVec2,
    min_t: f32,
    requested: FxHashSet<Channel>,
    textures: FxHashMap<Channel, Texture>,
}

impl Resources {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            min_t: DEFAULT_MIN_T,
            requested: Default::default(),
            textures: Default::default(),
        }
    }

    /// Marks given channel as required; allocates it right away if the
    /// screen size is already known.
    pub fn request(&mut self, channel: Channel) {
        if !self.requested.insert(channel) {
            return;
        }

        if self.size.x > 0 && self.size.y > 0 {
            self.textures.insert(channel, Self::create(channel, self.size));
        }
    }

    /// Same as [`Self::request()`], but takes the channel by its name.
    pub fn request_channel(&mut self, name: &str) -> Result<Channel> {
        let channel = name.parse()?;

        self.request(channel);

        Ok(channel)
    }

    /// (Re)allocates all requested channels for given screen size; all
    /// textures are cleared in the process.
    pub fn allocate(&mut self, size: UVec2) {
        debug!("Allocating resources; size={size:?}");

        self.size = size;

        self.textures = self
            .requested
            .iter()
            .map(|&channel| (channel, Self::create(channel, size)))
            .collect();
    }

    pub fn texture(&self, channel: Channel) -> Option<&Texture> {
        self.textures.get(&channel)
    }

    pub fn texture_mut(&mut self, channel: Channel) -> Option<&mut Texture> {
        self.textures.get_mut(&channel)
    }

    /// Returns given texture cleared with `clear` texels.
    pub fn cleared_texture(
        &mut self,
        channel: Channel,
        clear: &[Vec4],
    ) -> Option<&mut Texture> {
        let texture = self.textures.get_mut(&channel)?;

        texture.clear(clear);

        Some(texture)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.textures.contains_key(&channel)
    }

    /// Drops given channel; it becomes unavailable until requested again.
    pub fn release(&mut self, channel: Channel) -> Option<Texture> {
        self.requested.remove(&channel);
        self.textures.remove(&channel)
    }

    /// Temporarily moves given texture out, so that it can be written while
    /// other textures are being read; see [`Self::put()`].
    pub fn take(&mut self, channel: Channel) -> Result<Texture> {
        self.textures
            .remove(&channel)
            .ok_or(Error::ChannelUnavailable(channel))
    }

    pub fn put(&mut self, channel: Channel, texture: Texture) {
        self.textures.insert(channel, texture);
    }

    pub fn screen_size(&self) -> UVec2 {
        self.size
    }

    pub fn min_t(&self) -> f32 {
        self.min_t
    }

    pub fn set_min_t(&mut self, min_t: f32) {
        self.min_t = min_t;
    }

    fn create(channel: Channel, size: UVec2) -> Texture {
        let mut texture = Texture::new(size, channel.texels_per_pixel());

        texture.clear(&channel.clear_value());
        texture
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;
    use crate::gpu;

    #[test]
    fn lifecycle() {
        let mut target = Resources::new(UVec2::ZERO);

        target.request(Channel::ReservoirCurr);
        assert!(!target.contains(Channel::ReservoirCurr));

        target.allocate(uvec2(4, 4));
        assert!(target.contains(Channel::ReservoirCurr));
        assert!(target.texture(Channel::Output).is_none());

        let channel = target.request_channel("IndirectPrev").unwrap();

        assert_eq!(Channel::IndirectPrev, channel);
        assert_eq!(32, target.texture(channel).unwrap().data().len());

        target.release(Channel::ReservoirCurr);
        assert!(target.texture(Channel::ReservoirCurr).is_none());

        target.allocate(uvec2(2, 2));
        assert!(target.texture(Channel::ReservoirCurr).is_none());
    }

    #[test]
    fn reservoirs_start_empty() {
        let mut target = Resources::new(uvec2(2, 2));

        target.request(Channel::ReservoirPrev);

        let texture = target.texture(Channel::ReservoirPrev).unwrap();

        for idx in 0..4 {
            assert!(gpu::LightReservoir::read(texture.data(), idx).is_empty());
        }
    }

    #[test]
    fn take_and_put() {
        let mut target = Resources::new(uvec2(2, 2));

        target.request(Channel::Output);

        let texture = target.take(Channel::Output).unwrap();

        assert!(matches!(
            target.take(Channel::Output),
            Err(Error::ChannelUnavailable(Channel::Output))
        ));

        target.put(Channel::Output, texture);
        assert!(target.contains(Channel::Output));
    }
}
