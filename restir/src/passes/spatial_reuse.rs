use glam::Vec3;
use log::{debug, info};
use restir_shaders::spatial_reuse::{vars, ENTRY_POINT};

use crate::pass::{check_binding, has_channels, submit};
use crate::{
    gpu, Channel, ConfigSchema, FrameContext, Pass, PassStatus,
    ReservoirStore, Resources, Result, Scene, ShaderVariables,
};

#[derive(Clone, Debug)]
pub struct SpatialReuseConfig {
    pub entry_point: &'static str,

    /// Starting value of the frame counter; see
    /// [`crate::InitLightPlusTemporalConfig::seed`].
    pub seed: u32,

    /// Number of neighbours visited per pixel.
    pub samples: u32,

    /// Radius (in pixels) of the disk neighbours are picked from.
    pub radius: f32,

    /// Minimum cosine between normals of a pixel and its neighbour.
    pub normal_threshold: f32,

    /// Maximum difference of camera distance between a pixel and its
    /// neighbour, relative to the pixel's distance.
    pub depth_threshold: f32,

    pub world_position: Channel,
    pub world_normal: Channel,
    pub material_diffuse: Channel,
    pub reservoir_in: Channel,
    pub reservoir_out: Channel,
}

impl Default for SpatialReuseConfig {
    fn default() -> Self {
        Self {
            entry_point: ENTRY_POINT,
            seed: 0x7331,
            samples: 5,
            radius: 30.0,
            normal_threshold: 0.9,
            depth_threshold: 0.1,
            world_position: Channel::WorldPosition,
            world_normal: Channel::WorldNormal,
            material_diffuse: Channel::MaterialDiffuse,
            reservoir_in: Channel::ReservoirCurr,
            reservoir_out: Channel::ReservoirSpatial,
        }
    }
}

/// Combines each pixel's reservoir with reservoirs of its neighbours.
#[derive(Debug)]
pub struct SpatialReusePass {
    config: SpatialReuseConfig,
    frame: gpu::Frame,
    store: ReservoirStore,
}

impl SpatialReusePass {
    pub fn new(config: SpatialReuseConfig) -> Self {
        info!("Creating pass: {}", config.entry_point);

        Self {
            frame: gpu::Frame::new(config.seed),
            store: ReservoirStore::new([config.reservoir_out]),
            config,
        }
    }

    pub fn config(&self) -> &SpatialReuseConfig {
        &self.config
    }

    pub fn frame(&self) -> gpu::Frame {
        self.frame
    }

    fn dispatch(&self, ctx: &mut FrameContext<'_>) -> PassStatus {
        let name = self.name();

        if !ctx.tracer.is_ready() {
            debug!("[{name}] Skipping: ray tracer is not ready");
            return PassStatus::Skipped;
        }

        let channels = [
            self.config.world_position,
            self.config.world_normal,
            self.config.material_diffuse,
            self.config.reservoir_in,
            self.config.reservoir_out,
        ];

        if !has_channels(name, ctx.resources, channels) {
            return PassStatus::Skipped;
        }

        let camera_origin = ctx
            .scene
            .and_then(|scene| scene.camera)
            .map(|camera| camera.origin())
            .unwrap_or(Vec3::ZERO);

        let vars = ShaderVariables::new()
            .with(vars::FRAME, self.frame.get())
            .with(vars::SPATIAL_REUSE, ctx.options.spatial_reuse)
            .with(vars::SAMPLES, self.config.samples)
            .with(vars::RADIUS, self.config.radius)
            .with(vars::NORMAL_THRESHOLD, self.config.normal_threshold)
            .with(vars::DEPTH_THRESHOLD, self.config.depth_threshold)
            .with(vars::CAMERA_ORIGIN, camera_origin.extend(0.0))
            .with(vars::WORLD_POSITION, self.config.world_position)
            .with(vars::WORLD_NORMAL, self.config.world_normal)
            .with(vars::MATERIAL_DIFFUSE, self.config.material_diffuse)
            .with(vars::RESERVOIR_IN, self.config.reservoir_in)
            .with(vars::RESERVOIR_OUT, self.config.reservoir_out);

        submit(name, ctx, self.config.entry_point, &vars)
    }
}

impl Default for SpatialReusePass {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl Pass for SpatialReusePass {
    fn name(&self) -> &'static str {
        "spatial_reuse"
    }

    fn initialize(&mut self, resources: &mut Resources) -> Result<()> {
        let name = self.name();
        let config = &self.config;

        for channel in [config.reservoir_in, config.reservoir_out] {
            check_binding(
                name,
                channel,
                channel.is_reservoir(),
                "a light-reservoir channel",
            )?;
        }

        check_binding(
            name,
            config.reservoir_out,
            config.reservoir_in != config.reservoir_out,
            "a channel different from the one being read",
        )?;

        for channel in [
            config.world_position,
            config.world_normal,
            config.material_diffuse,
            config.reservoir_in,
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
        let status = self.dispatch(ctx);

        self.frame = self.frame.next();

        status
    }

    fn describe_config(&self) -> ConfigSchema {
        ConfigSchema::default()
            .with("entry_point", self.config.entry_point)
            .with("seed", self.config.seed)
            .with("samples", self.config.samples)
            .with("radius", self.config.radius)
            .with("normal_threshold", self.config.normal_threshold)
            .with("depth_threshold", self.config.depth_threshold)
            .with("reservoir_in", self.config.reservoir_in)
            .with("reservoir_out", self.config.reservoir_out)
    }
}
