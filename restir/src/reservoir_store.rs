use log::debug;

use crate::{Channel, Resources};

/// Set of reservoir channels owned by a pass.
///
/// Every channel is written by exactly one stage per frame; readers always
/// see a previously published generation.
#[derive(Clone, Debug, Default)]
pub struct ReservoirStore {
    channels: Vec<Channel>,
}

impl ReservoirStore {
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        let mut channels: Vec<_> = channels.into_iter().collect();

        channels.sort();
        channels.dedup();

        Self { channels }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn request(&self, resources: &mut Resources) {
        for &channel in &self.channels {
            debug!("Requesting reservoir channel: {channel}");

            resources.request(channel);
        }
    }

    /// Empties all reservoirs; called when the history becomes meaningless
    /// (e.g. after a scene change).
    pub fn reset(&self, resources: &mut Resources) {
        for &channel in &self.channels {
            resources.cleared_texture(channel, &channel.clear_value());
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, Vec4};

    use super::*;
    use crate::gpu;

    #[test]
    fn reset() {
        let mut resources = Resources::new(uvec2(2, 2));

        let target = ReservoirStore::new([
            Channel::ReservoirPrev,
            Channel::IndirectPrev,
            Channel::ReservoirPrev,
        ]);

        assert_eq!(2, target.channels().len());

        target.request(&mut resources);

        for channel in target.channels() {
            resources
                .texture_mut(*channel)
                .unwrap()
                .data_mut()
                .fill(Vec4::ONE);
        }

        target.reset(&mut resources);

        let reservoirs = resources.texture(Channel::ReservoirPrev).unwrap();
        let indirects = resources.texture(Channel::IndirectPrev).unwrap();

        for idx in 0..4 {
            let reservoir = gpu::LightReservoir::read(reservoirs.data(), idx);
            let indirect = gpu::IndirectReservoir::read(indirects.data(), idx);

            assert!(reservoir.is_empty());
            assert!(indirect.is_empty());
        }
    }
}
