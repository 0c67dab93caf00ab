use derivative::Derivative;
use glam::{UVec2, Vec4};
use log::trace;
use rayon::prelude::*;
use restir_shaders::{
    init_light_plus_temporal, spatial_reuse, update_reservoir_plus_shade,
};

use crate::{
    gpu, utils, Channel, Error, RayTracer, Resources, Result, Scene,
    ShaderVariables, Texture,
};

/// [`RayTracer`] that runs the kernels on the CPU, in parallel across
/// pixels.
#[derive(Default, Derivative)]
#[derivative(Debug)]
pub struct CpuRayTracer {
    scene: Option<SceneData>,
}

#[derive(Default, Derivative)]
#[derivative(Debug)]
struct SceneData {
    #[derivative(Debug = "ignore")]
    lights: Vec<gpu::Light>,

    #[derivative(Debug = "ignore")]
    triangles: Vec<gpu::Triangle>,

    world: gpu::World,
}

impl CpuRayTracer {
    pub fn new() -> Self {
        Default::default()
    }

    fn init_light_plus_temporal(
        scene: &SceneData,
        resources: &mut Resources,
        size: UVec2,
        vars: &ShaderVariables,
    ) -> Result<()> {
        use init_light_plus_temporal::{main, vars as v, ENTRY_POINT};

        let vars = vars.reader(ENTRY_POINT);

        let params = gpu::InitLightPlusTemporalPassParams {
            frame: vars.u32(v::FRAME)?,
            init_light: vars.bool(v::INIT_LIGHT)? as u32,
            temporal_reuse: vars.bool(v::TEMPORAL_REUSE)? as u32,
            do_indirect_gi: vars.bool(v::DO_INDIRECT_GI)? as u32,
            do_cos_sampling: vars.bool(v::DO_COS_SAMPLING)? as u32,
            do_direct_shadows: vars.bool(v::DO_DIRECT_SHADOWS)? as u32,
            max_history: vars.u32(v::MAX_HISTORY)?,
            min_t: vars.f32(v::MIN_T)?,
        };

        let positions = vars.channel(v::WORLD_POSITION)?;
        let normals = vars.channel(v::WORLD_NORMAL)?;
        let diffuses = vars.channel(v::MATERIAL_DIFFUSE)?;
        let reservoir_prev = vars.channel(v::RESERVOIR_PREV)?;
        let indirect_prev = vars.channel_opt(v::INDIRECT_PREV)?;
        let reservoir_out = vars.channel(v::RESERVOIR_OUT)?;
        let indirect_out = vars.channel_opt(v::INDIRECT_OUT)?;

        let outputs: Vec<_> = [Some(reservoir_out), indirect_out]
            .into_iter()
            .flatten()
            .collect();

        with_outputs(resources, size, &outputs, |resources, outputs| {
            let screen = gpu::Screen::new(size);
            let positions = input(resources, positions, size)?;
            let normals = input(resources, normals, size)?;
            let diffuses = input(resources, diffuses, size)?;
            let reservoir_prev = input(resources, reservoir_prev, size)?;
            let indirect_prev = input_opt(resources, indirect_prev, size)?;

            let results = dispatch(size, |global_id| {
                main(
                    global_id,
                    &params,
                    screen,
                    &scene.world,
                    gpu::LightsView::new(&scene.lights),
                    gpu::TrianglesView::new(&scene.triangles),
                    positions,
                    normals,
                    diffuses,
                    reservoir_prev,
                    indirect_prev,
                )
            });

            outputs.write(reservoir_out, &results, |out| {
                out.reservoir.encode()
            });

            if let Some(indirect_out) = indirect_out {
                outputs.write(indirect_out, &results, |out| {
                    out.indirect.encode()
                });
            }

            Ok(())
        })
    }

    fn spatial_reuse(
        scene: &SceneData,
        resources: &mut Resources,
        size: UVec2,
        vars: &ShaderVariables,
    ) -> Result<()> {
        use spatial_reuse::{main, vars as v, ENTRY_POINT};

        let vars = vars.reader(ENTRY_POINT);

        let params = gpu::SpatialReusePassParams {
            camera_origin: vars.vec4(v::CAMERA_ORIGIN)?,
            frame: vars.u32(v::FRAME)?,
            spatial_reuse: vars.bool(v::SPATIAL_REUSE)? as u32,
            samples: vars.u32(v::SAMPLES)?,
            radius: vars.f32(v::RADIUS)?,
            normal_threshold: vars.f32(v::NORMAL_THRESHOLD)?,
            depth_threshold: vars.f32(v::DEPTH_THRESHOLD)?,
            _padding: Default::default(),
        };

        let positions = vars.channel(v::WORLD_POSITION)?;
        let normals = vars.channel(v::WORLD_NORMAL)?;
        let diffuses = vars.channel(v::MATERIAL_DIFFUSE)?;
        let reservoir_in = vars.channel(v::RESERVOIR_IN)?;
        let reservoir_out = vars.channel(v::RESERVOIR_OUT)?;

        with_outputs(resources, size, &[reservoir_out], |resources, outputs| {
            let screen = gpu::Screen::new(size);
            let positions = input(resources, positions, size)?;
            let normals = input(resources, normals, size)?;
            let diffuses = input(resources, diffuses, size)?;
            let reservoir_in = input(resources, reservoir_in, size)?;

            let results = dispatch(size, |global_id| {
                main(
                    global_id,
                    &params,
                    screen,
                    gpu::LightsView::new(&scene.lights),
                    positions,
                    normals,
                    diffuses,
                    reservoir_in,
                )
            });

            outputs.write(reservoir_out, &results, |out| {
                out.reservoir.encode()
            });

            Ok(())
        })
    }

    fn update_reservoir_plus_shade(
        scene: &SceneData,
        resources: &mut Resources,
        size: UVec2,
        vars: &ShaderVariables,
    ) -> Result<()> {
        use update_reservoir_plus_shade::{main, vars as v, ENTRY_POINT};

        let vars = vars.reader(ENTRY_POINT);

        let params = gpu::UpdateReservoirPlusShadePassParams {
            do_indirect_gi: vars.bool(v::DO_INDIRECT_GI)? as u32,
            do_direct_shadows: vars.bool(v::DO_DIRECT_SHADOWS)? as u32,
            min_t: vars.f32(v::MIN_T)?,
        };

        let positions = vars.channel(v::WORLD_POSITION)?;
        let normals = vars.channel(v::WORLD_NORMAL)?;
        let diffuses = vars.channel(v::MATERIAL_DIFFUSE)?;
        let reservoir_in = vars.channel(v::RESERVOIR_IN)?;
        let indirect_in = vars.channel_opt(v::INDIRECT_IN)?;
        let reservoir_out = vars.channel_opt(v::RESERVOIR_OUT)?;
        let indirect_out = vars.channel_opt(v::INDIRECT_OUT)?;
        let output = vars.channel(v::OUTPUT)?;

        let outputs: Vec<_> = [Some(output), reservoir_out, indirect_out]
            .into_iter()
            .flatten()
            .collect();

        with_outputs(resources, size, &outputs, |resources, outputs| {
            let screen = gpu::Screen::new(size);
            let positions = input(resources, positions, size)?;
            let normals = input(resources, normals, size)?;
            let diffuses = input(resources, diffuses, size)?;
            let reservoir_in = input(resources, reservoir_in, size)?;
            let indirect_in = input_opt(resources, indirect_in, size)?;

            let results = dispatch(size, |global_id| {
                main(
                    global_id,
                    &params,
                    screen,
                    gpu::LightsView::new(&scene.lights),
                    gpu::TrianglesView::new(&scene.triangles),
                    positions,
                    normals,
                    diffuses,
                    reservoir_in,
                    indirect_in,
                )
            });

            outputs.write(output, &results, |out| [out.color]);

            if let Some(reservoir_out) = reservoir_out {
                outputs.write(reservoir_out, &results, |out| {
                    out.reservoir.encode()
                });
            }

            if let Some(indirect_out) = indirect_out {
                outputs.write(indirect_out, &results, |out| {
                    out.indirect.encode()
                });
            }

            Ok(())
        })
    }
}

impl RayTracer for CpuRayTracer {
    fn set_scene(&mut self, scene: Option<&Scene>) {
        self.scene = scene.map(|scene| SceneData {
            lights: scene.serialize_lights(),
            triangles: scene.serialize_triangles(),
            world: scene.serialize_world(),
        });
    }

    fn is_ready(&self) -> bool {
        self.scene.is_some()
    }

    fn submit(
        &self,
        resources: &mut Resources,
        entry_point: &str,
        size: UVec2,
        vars: &ShaderVariables,
    ) -> Result<()> {
        trace!("Dispatching `{entry_point}`; size={size:?}");

        let empty;

        let scene = match &self.scene {
            Some(scene) => scene,
            None => {
                empty = SceneData::default();
                &empty
            }
        };

        utils::measure(entry_point, || match entry_point {
            init_light_plus_temporal::ENTRY_POINT => {
                Self::init_light_plus_temporal(scene, resources, size, vars)
            }

            spatial_reuse::ENTRY_POINT => {
                Self::spatial_reuse(scene, resources, size, vars)
            }

            update_reservoir_plus_shade::ENTRY_POINT => {
                Self::update_reservoir_plus_shade(scene, resources, size, vars)
            }

            _ => Err(Error::UnknownProgram(entry_point.to_string())),
        })
    }
}

/// Runs `kernel` for each pixel, in parallel.
fn dispatch<T>(size: UVec2, kernel: impl Fn(UVec2) -> T + Sync) -> Vec<T>
where
    T: Send,
{
    let screen = gpu::Screen::new(size);

    (0..(size.x * size.y) as usize)
        .into_par_iter()
        .map(|idx| kernel(screen.pos(idx)))
        .collect()
}

fn input(
    resources: &Resources,
    channel: Channel,
    size: UVec2,
) -> Result<&[Vec4]> {
    let texture = resources
        .texture(channel)
        .ok_or(Error::ChannelUnavailable(channel))?;

    check_layout(channel, texture, size)?;

    Ok(texture.data())
}

/// Unbound inputs are seen by kernels as empty slices.
fn input_opt(
    resources: &Resources,
    channel: Option<Channel>,
    size: UVec2,
) -> Result<&[Vec4]> {
    match channel {
        Some(channel) => input(resources, channel, size),
        None => Ok(&[]),
    }
}

fn check_layout(
    channel: Channel,
    texture: &Texture,
    size: UVec2,
) -> Result<()> {
    let expected = (size.x * size.y) as usize * channel.texels_per_pixel();
    let actual = texture.data().len();

    if expected == actual && texture.stride() == channel.texels_per_pixel() {
        Ok(())
    } else {
        Err(Error::ChannelLayout {
            channel,
            expected,
            actual,
        })
    }
}

/// Textures moved out of [`Resources`] for the duration of a dispatch.
struct Outputs {
    textures: Vec<(Channel, Texture)>,
}

impl Outputs {
    fn write<T, const N: usize>(
        &mut self,
        channel: Channel,
        results: &[T],
        encode: impl Fn(&T) -> [Vec4; N] + Sync,
    ) where
        T: Sync,
    {
        let Some((_, texture)) =
            self.textures.iter_mut().find(|(ch, _)| *ch == channel)
        else {
            return;
        };

        texture
            .data_mut()
            .par_chunks_mut(N)
            .zip(results.par_iter())
            .for_each(|(texels, result)| {
                texels.copy_from_slice(&encode(result));
            });
    }

    fn restore(self, resources: &mut Resources) {
        for (channel, texture) in self.textures {
            resources.put(channel, texture);
        }
    }
}

/// Moves given channels out of `resources`, runs `f` and puts them back,
/// regardless of whether `f` succeeded.
///
/// Since outputs are moved out, a program trying to read a channel it
/// writes fails with [`Error::ChannelUnavailable`].
fn with_outputs(
    resources: &mut Resources,
    size: UVec2,
    channels: &[Channel],
    f: impl FnOnce(&Resources, &mut Outputs) -> Result<()>,
) -> Result<()> {
    let mut outputs = Outputs {
        textures: Vec::with_capacity(channels.len()),
    };

    for &channel in channels {
        let texture = match resources.take(channel) {
            Ok(texture) => texture,
            Err(err) => {
                outputs.restore(resources);
                return Err(err);
            }
        };

        let layout = check_layout(channel, &texture, size);

        outputs.textures.push((channel, texture));

        if let Err(err) = layout {
            outputs.restore(resources);
            return Err(err);
        }
    }

    let result = f(resources, &mut outputs);

    outputs.restore(resources);
    result
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    fn resources() -> Resources {
        let mut resources = Resources::new(uvec2(2, 2));

        for channel in Channel::ALL {
            resources.request(channel);
        }

        resources
    }

    fn spatial_vars() -> ShaderVariables {
        use spatial_reuse::vars as v;

        ShaderVariables::new()
            .with(v::FRAME, 1u32)
            .with(v::SPATIAL_REUSE, false)
            .with(v::SAMPLES, 5u32)
            .with(v::RADIUS, 30.0f32)
            .with(v::NORMAL_THRESHOLD, 0.9f32)
            .with(v::DEPTH_THRESHOLD, 0.1f32)
            .with(v::CAMERA_ORIGIN, Vec4::ZERO)
            .with(v::WORLD_POSITION, Channel::WorldPosition)
            .with(v::WORLD_NORMAL, Channel::WorldNormal)
            .with(v::MATERIAL_DIFFUSE, Channel::MaterialDiffuse)
            .with(v::RESERVOIR_IN, Channel::ReservoirCurr)
            .with(v::RESERVOIR_OUT, Channel::ReservoirSpatial)
    }

    #[test]
    fn unknown_program() {
        let target = CpuRayTracer::new();

        let result = target.submit(
            &mut resources(),
            "path_tracing",
            uvec2(2, 2),
            &ShaderVariables::new(),
        );

        assert!(matches!(
            result,
            Err(Error::UnknownProgram(name)) if name == "path_tracing"
        ));
    }

    #[test]
    fn passthrough() {
        let target = CpuRayTracer::new();
        let mut resources = resources();

        resources
            .texture_mut(Channel::ReservoirCurr)
            .unwrap()
            .data_mut()
            .fill(Vec4::new(1.0, 2.0, 3.0, 4.0));

        target
            .submit(
                &mut resources,
                spatial_reuse::ENTRY_POINT,
                uvec2(2, 2),
                &spatial_vars(),
            )
            .unwrap();

        assert_eq!(
            resources.texture(Channel::ReservoirCurr).unwrap().as_bytes(),
            resources.texture(Channel::ReservoirSpatial).unwrap().as_bytes(),
        );
    }

    #[test]
    fn missing_variable() {
        let target = CpuRayTracer::new();
        let mut vars = spatial_vars();

        vars.remove(spatial_reuse::vars::RADIUS);

        let result = target.submit(
            &mut resources(),
            spatial_reuse::ENTRY_POINT,
            uvec2(2, 2),
            &vars,
        );

        assert!(matches!(
            result,
            Err(Error::MissingVariable { name, .. }) if name == "radius"
        ));
    }

    #[test]
    fn reading_own_output_fails() {
        let target = CpuRayTracer::new();
        let mut resources = resources();

        let vars = spatial_vars().with(
            spatial_reuse::vars::RESERVOIR_IN,
            Channel::ReservoirSpatial,
        );

        let result = target.submit(
            &mut resources,
            spatial_reuse::ENTRY_POINT,
            uvec2(2, 2),
            &vars,
        );

        assert!(matches!(
            result,
            Err(Error::ChannelUnavailable(Channel::ReservoirSpatial))
        ));

        // Outputs get restored even if the dispatch fails
        assert!(resources.contains(Channel::ReservoirSpatial));
    }

    #[test]
    fn layout_mismatch() {
        let target = CpuRayTracer::new();
        let mut resources = resources();

        let result = target.submit(
            &mut resources,
            spatial_reuse::ENTRY_POINT,
            uvec2(4, 4),
            &spatial_vars(),
        );

        assert!(matches!(
            result,
            Err(Error::ChannelLayout {
                expected: 16,
                actual: 4,
                ..
            })
        ));
    }
}
