use glam::UVec2;
use log::{debug, info};

use crate::{
    Camera, ConfigSchema, CpuRayTracer, FrameContext,
    InitLightPlusTemporalConfig, InitLightPlusTemporalPass, Options, Pass,
    PassStatus, RayTracer, Resources, Result, Scene, SpatialReusePass,
    Texture, UpdateReservoirPlusShadeConfig, UpdateReservoirPlusShadePass,
};

/// Sequences passes, once per frame.
///
/// The renderer owns the scene and the resources; passes only borrow them
/// while executing.
pub struct Renderer<T = CpuRayTracer> {
    tracer: T,
    resources: Resources,
    scene: Option<Scene>,
    options: Options,
    passes: Vec<Box<dyn Pass>>,
}

impl<T> Renderer<T>
where
    T: RayTracer,
{
    /// Creates the standard three-stage renderer: init + temporal reuse,
    /// spatial reuse, shading.
    pub fn new(tracer: T, size: UVec2) -> Result<Self> {
        Self::with_passes(
            tracer,
            size,
            vec![
                Box::<InitLightPlusTemporalPass>::default(),
                Box::<SpatialReusePass>::default(),
                Box::<UpdateReservoirPlusShadePass>::default(),
            ],
        )
    }

    /// Creates a two-stage renderer that skips spatial reuse, passing
    /// reservoirs through the single `Reservoir` channel.
    pub fn single_channel(tracer: T, size: UVec2) -> Result<Self> {
        Self::with_passes(
            tracer,
            size,
            vec![
                Box::new(InitLightPlusTemporalPass::new(
                    InitLightPlusTemporalConfig::single_channel(),
                )),
                Box::new(UpdateReservoirPlusShadePass::new(
                    UpdateReservoirPlusShadeConfig::single_channel(),
                )),
            ],
        )
    }

    pub fn with_passes(
        tracer: T,
        size: UVec2,
        mut passes: Vec<Box<dyn Pass>>,
    ) -> Result<Self> {
        info!("Initializing renderer; size={size:?}");

        let mut resources = Resources::new(size);

        for pass in &mut passes {
            debug!("Initializing pass: {}", pass.name());

            pass.initialize(&mut resources)?;
        }

        Ok(Self {
            tracer,
            resources,
            scene: None,
            options: Default::default(),
            passes,
        })
    }

    /// Replaces the scene, forgetting all of the temporal history.
    pub fn set_scene(&mut self, scene: Option<Scene>) {
        info!(
            "Changing scene; lights={}, triangles={}",
            scene.as_ref().map_or(0, |scene| scene.lights.len()),
            scene.as_ref().map_or(0, |scene| scene.triangles.len()),
        );

        self.tracer.set_scene(scene.as_ref());

        for pass in &mut self.passes {
            pass.init_scene(&mut self.resources, scene.as_ref());
        }

        self.scene = scene;
    }

    /// Updates the scene's camera; unlike [`Self::set_scene()`], keeps the
    /// history (camera motion is detected by the passes themselves).
    pub fn set_camera(&mut self, camera: Option<Camera>) {
        if let Some(scene) = &mut self.scene {
            scene.camera = camera;
        }
    }

    /// Reallocates all channels for given screen size.
    pub fn resize(&mut self, size: UVec2) {
        self.resources.allocate(size);

        for pass in &mut self.passes {
            pass.init_scene(&mut self.resources, self.scene.as_ref());
        }
    }

    /// Renders a single frame, returning what each pass did.
    pub fn render(&mut self) -> Vec<PassStatus> {
        let mut ctx = FrameContext {
            resources: &mut self.resources,
            tracer: &self.tracer,
            scene: self.scene.as_ref(),
            options: self.options,
        };

        self.passes
            .iter_mut()
            .map(|pass| pass.execute(&mut ctx))
            .collect()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn passes(&self) -> &[Box<dyn Pass>] {
        &self.passes
    }

    /// Returns the final image, if it's been allocated.
    pub fn output(&self) -> Option<&Texture> {
        self.resources.texture(crate::Channel::Output)
    }

    /// Lists the options and all passes' settings.
    pub fn describe_config(&self) -> ConfigSchema {
        let mut schema = self.options.describe();

        for pass in &self.passes {
            schema.extend(pass.describe_config());
        }

        schema
    }
}
