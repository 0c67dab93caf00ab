use log::{debug, info};
use restir_shaders::update_reservoir_plus_shade::{vars, ENTRY_POINT};

use crate::pass::{check_binding, has_channels, submit};
use crate::{
    Channel, ConfigSchema, FrameContext, Pass, PassStatus, ReservoirStore,
    Resources, Result, Scene, ShaderVariables,
};

#[derive(Clone, Debug)]
pub struct UpdateReservoirPlusShadeConfig {
    pub entry_point: &'static str,
    pub world_position: Channel,
    pub world_normal: Channel,
    pub material_diffuse: Channel,
    pub reservoir_in: Channel,
    pub indirect_in: Channel,

    /// Where the consumed light reservoirs get published for the next
    /// frame; `None` disables temporal history.
    pub reservoir_out: Option<Channel>,

    /// Where the consumed indirect reservoirs get published for the next
    /// frame.
    pub indirect_out: Option<Channel>,

    pub output: Channel,
}

impl UpdateReservoirPlusShadeConfig {
    /// Layout where the init stage feeds this stage directly.
    pub fn single_channel() -> Self {
        Self {
            reservoir_in: Channel::Reservoir,
            ..Default::default()
        }
    }
}

impl Default for UpdateReservoirPlusShadeConfig {
    fn default() -> Self {
        Self {
            entry_point: ENTRY_POINT,
            world_position: Channel::WorldPosition,
            world_normal: Channel::WorldNormal,
            material_diffuse: Channel::MaterialDiffuse,
            reservoir_in: Channel::ReservoirSpatial,
            indirect_in: Channel::IndirectOutput,
            reservoir_out: Some(Channel::ReservoirPrev),
            indirect_out: Some(Channel::IndirectPrev),
            output: Channel::Output,
        }
    }
}

/// Shades each pixel using its resampled reservoirs and publishes them for
/// the next frame.
#[derive(Debug)]
pub struct UpdateReservoirPlusShadePass {
    config: UpdateReservoirPlusShadeConfig,
    store: ReservoirStore,
}

impl UpdateReservoirPlusShadePass {
    pub fn new(config: UpdateReservoirPlusShadeConfig) -> Self {
        info!("Creating pass: {}", config.entry_point);

        let store = ReservoirStore::new(
            [config.reservoir_out, config.indirect_out]
                .into_iter()
                .flatten(),
        );

        Self { config, store }
    }

    pub fn config(&self) -> &UpdateReservoirPlusShadeConfig {
        &self.config
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
            self.config.reservoir_in,
            self.config.output,
        ];

        channels.extend(self.store.channels());

        if ctx.options.do_indirect_gi {
            channels.push(self.config.indirect_in);
        }

        if !has_channels(name, ctx.resources, channels) {
            return PassStatus::Skipped;
        }

        let mut vars = ShaderVariables::new()
            .with(vars::DO_INDIRECT_GI, ctx.options.do_indirect_gi)
            .with(vars::DO_DIRECT_SHADOWS, ctx.options.do_direct_shadows)
            .with(vars::MIN_T, ctx.resources.min_t())
            .with(vars::WORLD_POSITION, self.config.world_position)
            .with(vars::WORLD_NORMAL, self.config.world_normal)
            .with(vars::MATERIAL_DIFFUSE, self.config.material_diffuse)
            .with(vars::RESERVOIR_IN, self.config.reservoir_in)
            .with(vars::OUTPUT, self.config.output);

        if ctx.options.do_indirect_gi {
            vars.set(vars::INDIRECT_IN, self.config.indirect_in);
        }

        if let Some(channel) = self.config.reservoir_out {
            vars.set(vars::RESERVOIR_OUT, channel);
        }

        if let Some(channel) = self.config.indirect_out {
            vars.set(vars::INDIRECT_OUT, channel);
        }

        submit(name, ctx, self.config.entry_point, &vars)
    }
}

impl Default for UpdateReservoirPlusShadePass {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl Pass for UpdateReservoirPlusShadePass {
    fn name(&self) -> &'static str {
        "update_reservoir_plus_shade"
    }

    fn initialize(&mut self, resources: &mut Resources) -> Result<()> {
        let name = self.name();
        let config = &self.config;

        check_binding(
            name,
            config.reservoir_in,
            config.reservoir_in.is_reservoir(),
            "a light-reservoir channel",
        )?;

        check_binding(
            name,
            config.indirect_in,
            config.indirect_in.is_indirect(),
            "an indirect-reservoir channel",
        )?;

        if let Some(channel) = config.reservoir_out {
            check_binding(
                name,
                channel,
                channel.is_reservoir() && channel != config.reservoir_in,
                "a light-reservoir channel different from the one being read",
            )?;
        }

        if let Some(channel) = config.indirect_out {
            check_binding(
                name,
                channel,
                channel.is_indirect() && channel != config.indirect_in,
                "an indirect-reservoir channel different from the one being \
                 read",
            )?;
        }

        check_binding(
            name,
            config.output,
            !config.output.is_reservoir() && !config.output.is_indirect(),
            "a color channel",
        )?;

        for channel in [
            config.world_position,
            config.world_normal,
            config.material_diffuse,
            config.reservoir_in,
            config.indirect_in,
            config.output,
        ] {
            resources.request(channel);
        }

        self.store.request(resources);

        Ok(())
    }

    fn init_scene(&mut self, resources: &mut Resources, _: Option<&Scene>) {
        self.store.reset(resources);
    }

    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> PassStatus {
        self.dispatch(ctx)
    }

    fn describe_config(&self) -> ConfigSchema {
        let mut schema = ConfigSchema::default()
            .with("entry_point", self.config.entry_point)
            .with("reservoir_in", self.config.reservoir_in)
            .with("indirect_in", self.config.indirect_in)
            .with("output", self.config.output);

        if let Some(channel) = self.config.reservoir_out {
            schema.push("reservoir_out", channel);
        }

        if let Some(channel) = self.config.indirect_out {
            schema.push("indirect_out", channel);
        }

        schema
    }
}
