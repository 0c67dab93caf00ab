use log::{debug, info};
use restir_shaders::init_light_plus_temporal::{vars, ENTRY_POINT};

use crate::pass::{check_binding, has_channels, submit};
use crate::{
    gpu, CameraMotionTracker, Channel, ConfigSchema, FrameContext, Pass,
    PassStatus, ReservoirStore, Resources, Result, Scene, ShaderVariables,
};

#[derive(Clone, Debug)]
pub struct InitLightPlusTemporalConfig {
    pub entry_point: &'static str,

    /// Starting value of the frame counter; must differ from other stages'
    /// seeds, so that their random streams stay independent.
    pub seed: u32,

    /// Maximum number of candidates a reservoir can inherit from the
    /// previous frame.
    pub max_history: u32,

    pub world_position: Channel,
    pub world_normal: Channel,
    pub material_diffuse: Channel,
    pub reservoir_prev: Channel,
    pub indirect_prev: Channel,
    pub reservoir_out: Channel,
    pub indirect_out: Channel,
}

impl InitLightPlusTemporalConfig {
    /// Layout where this stage feeds the shading stage directly.
    pub fn single_channel() -> Self {
        Self {
            reservoir_out: Channel::Reservoir,
            ..Default::default()
        }
    }
}

impl Default for InitLightPlusTemporalConfig {
    fn default() -> Self {
        Self {
            entry_point: ENTRY_POINT,
            seed: 0x1337,
            max_history: 20,
            world_position: Channel::WorldPosition,
            world_normal: Channel::WorldNormal,
            material_diffuse: Channel::MaterialDiffuse,
            reservoir_prev: Channel::ReservoirPrev,
            indirect_prev: Channel::IndirectPrev,
            reservoir_out: Channel::ReservoirCurr,
            indirect_out: Channel::IndirectOutput,
        }
    }
}

/// Draws fresh light (and bounce) candidates for each pixel and combines
/// them with the previous frame's reservoirs.
#[derive(Debug)]
pub struct InitLightPlusTemporalPass {
    config: InitLightPlusTemporalConfig,
    frame: gpu::Frame,
    tracker: CameraMotionTracker,
    store: ReservoirStore,

    /// When set, the next executed frame starts cold (without reusing the
    /// previous frame's reservoirs).
    init_light_per_pixel: bool,
}

impl InitLightPlusTemporalPass {
    pub fn new(config: InitLightPlusTemporalConfig) -> Self {
        info!("Creating pass: {}", config.entry_point);

        let store = ReservoirStore::new([
            config.reservoir_prev,
            config.indirect_prev,
            config.reservoir_out,
            config.indirect_out,
        ]);

        Self {
            frame: gpu::Frame::new(config.seed),
            config,
            tracker: Default::default(),
            store,
            init_light_per_pixel: true,
        }
    }

    pub fn config(&self) -> &InitLightPlusTemporalConfig {
        &self.config
    }

    pub fn frame(&self) -> gpu::Frame {
        self.frame
    }

    pub fn tracker(&self) -> &CameraMotionTracker {
        &self.tracker
    }

    pub fn init_light_per_pixel(&self) -> bool {
        self.init_light_per_pixel
    }

    /// Forces (or cancels) a cold start on the next executed frame.
    pub fn set_init_light_per_pixel(&mut self, value: bool) {
        self.init_light_per_pixel = value;
    }

    fn dispatch(&self, ctx: &mut FrameContext<'_>) -> PassStatus {
        let name = self.name();

        if !ctx.tracer.is_ready() {
            debug!("[{name}] Skipping: ray tracer is not ready");
            return PassStatus::Skipped;
        }

        let mut channels = vec![
            self.config.world_position,
            self.config.world_normal,
            self.config.material_diffuse,
            self.config.reservoir_prev,
            self.config.reservoir_out,
        ];

        if ctx.options.do_indirect_gi {
            channels.push(self.config.indirect_prev);
            channels.push(self.config.indirect_out);
        }

        if !has_channels(name, ctx.resources, channels) {
            return PassStatus::Skipped;
        }

        debug!(
            "[{name}] frame={:?}, cold_start={}",
            self.frame,
            self.init_light_per_pixel || !ctx.options.temporal_reuse
        );

        let mut vars = ShaderVariables::new()
            .with(vars::FRAME, self.frame.get())
            .with(vars::INIT_LIGHT, self.init_light_per_pixel)
            .with(vars::TEMPORAL_REUSE, ctx.options.temporal_reuse)
            .with(vars::DO_INDIRECT_GI, ctx.options.do_indirect_gi)
            .with(vars::DO_COS_SAMPLING, ctx.options.do_cos_sampling)
            .with(vars::DO_DIRECT_SHADOWS, ctx.options.do_direct_shadows)
            .with(vars::MAX_HISTORY, self.config.max_history)
            .with(vars::MIN_T, ctx.resources.min_t())
            .with(vars::WORLD_POSITION, self.config.world_position)
            .with(vars::WORLD_NORMAL, self.config.world_normal)
            .with(vars::MATERIAL_DIFFUSE, self.config.material_diffuse)
            .with(vars::RESERVOIR_PREV, self.config.reservoir_prev)
            .with(vars::RESERVOIR_OUT, self.config.reservoir_out);

        if ctx.options.do_indirect_gi {
            vars.set(vars::INDIRECT_PREV, self.config.indirect_prev);
            vars.set(vars::INDIRECT_OUT, self.config.indirect_out);
        }

        submit(name, ctx, self.config.entry_point, &vars)
    }
}

impl Default for InitLightPlusTemporalPass {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl Pass for InitLightPlusTemporalPass {
    fn name(&self) -> &'static str {
        "init_light_plus_temporal"
    }

    fn initialize(&mut self, resources: &mut Resources) -> Result<()> {
        let name = self.name();
        let config = &self.config;

        for channel in [config.reservoir_prev, config.reservoir_out] {
            check_binding(
                name,
                channel,
                channel.is_reservoir(),
                "a light-reservoir channel",
            )?;
        }

        for channel in [config.indirect_prev, config.indirect_out] {
            check_binding(
                name,
                channel,
                channel.is_indirect(),
                "an indirect-reservoir channel",
            )?;
        }

        for (input, output) in [
            (config.reservoir_prev, config.reservoir_out),
            (config.indirect_prev, config.indirect_out),
        ] {
            check_binding(
                name,
                output,
                input != output,
                "a channel different from the one being read",
            )?;
        }

        for channel in [
            config.world_position,
            config.world_normal,
            config.material_diffuse,
        ] {
            resources.request(channel);
        }

        self.store.request(resources);

        Ok(())
    }

    fn init_scene(&mut self, resources: &mut Resources, scene: Option<&Scene>) {
        self.tracker.reset(scene);
        self.store.reset(resources);
        self.init_light_per_pixel = true;
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> PassStatus {
        if self.tracker.has_moved(ctx.scene) {
            debug!("[{}] Camera has moved; starting cold", self.name());

            self.init_light_per_pixel = true;
        }

        self.tracker.advance(ctx.scene);

        let status = self.dispatch(ctx);

        if status.is_executed() {
            self.init_light_per_pixel = false;
        }

        self.frame = self.frame.next();

        status
    }

    fn describe_config(&self) -> ConfigSchema {
        ConfigSchema::default()
            .with("entry_point", self.config.entry_point)
            .with("seed", self.config.seed)
            .with("max_history", self.config.max_history)
            .with("init_light_per_pixel", self.init_light_per_pixel)
            .with("reservoir_prev", self.config.reservoir_prev)
            .with("reservoir_out", self.config.reservoir_out)
            .with("indirect_prev", self.config.indirect_prev)
            .with("indirect_out", self.config.indirect_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn invalid_bindings() {
        let mut resources = Resources::new(Default::default());

        let mut target = InitLightPlusTemporalPass::new(
            InitLightPlusTemporalConfig {
                reservoir_out: Channel::IndirectOutput,
                ..Default::default()
            },
        );

        assert!(matches!(
            target.initialize(&mut resources),
            Err(Error::InvalidBinding {
                channel: Channel::IndirectOutput,
                ..
            })
        ));

        let mut target = InitLightPlusTemporalPass::new(
            InitLightPlusTemporalConfig {
                reservoir_out: Channel::ReservoirPrev,
                ..Default::default()
            },
        );

        assert!(target.initialize(&mut resources).is_err());
    }

    #[test]
    fn describe_config() {
        let target = InitLightPlusTemporalPass::default();
        let schema = target.describe_config();

        assert_eq!(Some(0x1337u32.into()), schema.get("seed"));
        assert_eq!(Some(20u32.into()), schema.get("max_history"));
        assert_eq!(Some(true.into()), schema.get("init_light_per_pixel"));
    }
}
