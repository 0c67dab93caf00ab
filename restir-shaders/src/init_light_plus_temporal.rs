use core::f32::consts::PI;

use restir_gpu::prelude::*;

pub const ENTRY_POINT: &str = "init_light_plus_temporal";

pub mod vars {
    pub const FRAME: &str = "frame";
    pub const INIT_LIGHT: &str = "init_light";
    pub const TEMPORAL_REUSE: &str = "temporal_reuse";
    pub const DO_INDIRECT_GI: &str = "do_indirect_gi";
    pub const DO_COS_SAMPLING: &str = "do_cos_sampling";
    pub const DO_DIRECT_SHADOWS: &str = "do_direct_shadows";
    pub const MAX_HISTORY: &str = "max_history";
    pub const MIN_T: &str = "min_t";

    pub const WORLD_POSITION: &str = "world_position";
    pub const WORLD_NORMAL: &str = "world_normal";
    pub const MATERIAL_DIFFUSE: &str = "material_diffuse";
    pub const RESERVOIR_PREV: &str = "reservoir_prev";
    pub const INDIRECT_PREV: &str = "indirect_prev";
    pub const RESERVOIR_OUT: &str = "reservoir_out";
    pub const INDIRECT_OUT: &str = "indirect_out";
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Output {
    pub reservoir: LightReservoir,
    pub indirect: IndirectReservoir,
}

#[allow(clippy::too_many_arguments)]
pub fn main(
    global_id: UVec2,
    params: &InitLightPlusTemporalPassParams,
    screen: Screen,
    world: &World,
    lights: LightsView,
    triangles: TrianglesView,
    positions: &[Vec4],
    normals: &[Vec4],
    diffuses: &[Vec4],
    prev_reservoirs: &[Vec4],
    prev_indirect_reservoirs: &[Vec4],
) -> Output {
    let idx = screen.idx(global_id);
    let mut wnoise = WhiteNoise::new(params.frame, global_id);
    let surface = Surface::read(positions, normals, diffuses, idx);

    if surface.is_none() {
        return Output::default();
    }

    let reuse = params.temporal_reuse() && !params.init_light();

    // -------------------------------------------------------------------------

    let reservoir = {
        let mut reservoir = sample_light(
            &mut wnoise,
            params,
            lights,
            triangles,
            surface,
        );

        if reuse {
            let mut prev = LightReservoir::read(prev_reservoirs, idx).reservoir;

            prev.clamp_m(params.max_history);

            let p_curr = reservoir.sample.p_hat(lights, surface);
            let p_prev = prev.sample.p_hat(lights, surface);

            reservoir = Reservoir::combine(
                &reservoir,
                &prev,
                p_curr,
                p_prev,
                wnoise.sample(),
            );
        }

        LightReservoir::new(reservoir)
    };

    // -------------------------------------------------------------------------

    let indirect = if params.do_indirect_gi() {
        let mut indirect = sample_indirect(
            &mut wnoise,
            params,
            world,
            lights,
            triangles,
            surface,
        );

        if reuse {
            let mut prev = IndirectReservoir::read(prev_indirect_reservoirs, idx)
                .reservoir;

            prev.clamp_m(params.max_history);

            let p_curr = indirect.sample.p_hat(surface);
            let p_prev = prev.sample.p_hat(surface);

            indirect = Reservoir::combine(
                &indirect,
                &prev,
                p_curr,
                p_prev,
                wnoise.sample(),
            );
        }

        IndirectReservoir::new(indirect)
    } else {
        IndirectReservoir::default()
    };

    Output {
        reservoir,
        indirect,
    }
}

/// Draws a single light candidate (uniformly) and streams it into a fresh
/// reservoir.
fn sample_light(
    wnoise: &mut WhiteNoise,
    params: &InitLightPlusTemporalPassParams,
    lights: LightsView,
    triangles: TrianglesView,
    surface: Surface,
) -> Reservoir<LightSample> {
    let mut reservoir = Reservoir::default();

    if lights.is_empty() {
        return reservoir;
    }

    let light_id = lights.sample_uniform(wnoise);
    let sample = LightSample::new(light_id);
    let mut p_hat = sample.p_hat(lights, surface);

    if p_hat > 0.0
        && params.do_direct_shadows()
        && lights
            .get(light_id)
            .is_occluded(triangles, surface, params.min_t)
    {
        p_hat = 0.0;
    }

    let source_pdf = 1.0 / lights.len() as f32;

    reservoir.update(wnoise, sample, p_hat / source_pdf);
    reservoir.normalize(p_hat);
    reservoir
}

/// Traces a single bounce ray and streams its radiance into a fresh
/// reservoir.
fn sample_indirect(
    wnoise: &mut WhiteNoise,
    params: &InitLightPlusTemporalPassParams,
    world: &World,
    lights: LightsView,
    triangles: TrianglesView,
    surface: Surface,
) -> Reservoir<IndirectSample> {
    let (direction, source_pdf) = if params.do_cos_sampling() {
        let direction = wnoise.sample_cosine_hemisphere(surface.normal);

        (direction, surface.normal.dot(direction).max(0.0) / PI)
    } else {
        (wnoise.sample_hemisphere(surface.normal), 1.0 / (2.0 * PI))
    };

    let radiance = trace_bounce(
        wnoise, params, world, lights, triangles, surface, direction,
    );

    let sample = IndirectSample {
        direction,
        radiance,
    };

    let p_hat = sample.p_hat(surface);
    let mut reservoir = Reservoir::default();

    reservoir.update(wnoise, sample, p_hat / source_pdf);
    reservoir.normalize(p_hat);
    reservoir
}

/// Returns radiance arriving at `surface` from `direction`: light reflected
/// off the secondary hit (next-event estimation towards a single, uniformly
/// chosen light) or the environment, if the ray escapes.
fn trace_bounce(
    wnoise: &mut WhiteNoise,
    params: &InitLightPlusTemporalPassParams,
    world: &World,
    lights: LightsView,
    triangles: TrianglesView,
    surface: Surface,
    direction: Vec3,
) -> Vec3 {
    let ray = Ray::new(surface.ray_origin(params.min_t), direction);

    let Some(hit) = triangles.trace_nearest(ray) else {
        return world.environment();
    };

    if lights.is_empty() {
        return Vec3::ZERO;
    }

    let hit = hit.as_surface();
    let light = lights.get(lights.sample_uniform(wnoise));

    if light.is_occluded(triangles, hit, params.min_t) {
        return Vec3::ZERO;
    }

    light.contribution(hit) * lights.len() as f32
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    struct Fixture {
        lights: Vec<Light>,
        triangles: Vec<Triangle>,
        world: World,
        positions: Vec<Vec4>,
        normals: Vec<Vec4>,
        diffuses: Vec<Vec4>,
    }

    impl Fixture {
        /// A single pixel looking at a floor lit by a single point light.
        fn new() -> Self {
            Self {
                lights: vec![Light::point(vec3(0.0, 2.0, 0.0), Vec3::ONE, 4.0)],
                triangles: Default::default(),
                world: World {
                    environment: vec4(0.5, 0.5, 0.5, 0.0),
                },
                positions: vec![vec4(0.0, 0.0, 0.0, 1.0)],
                normals: vec![vec4(0.0, 1.0, 0.0, 0.0)],
                diffuses: vec![Vec4::ONE],
            }
        }

        fn run(
            &self,
            params: &InitLightPlusTemporalPassParams,
            prev_reservoirs: &[Vec4],
            prev_indirect_reservoirs: &[Vec4],
        ) -> Output {
            main(
                UVec2::ZERO,
                params,
                Screen::new(UVec2::ONE),
                &self.world,
                LightsView::new(&self.lights),
                TrianglesView::new(&self.triangles),
                &self.positions,
                &self.normals,
                &self.diffuses,
                prev_reservoirs,
                prev_indirect_reservoirs,
            )
        }
    }

    fn params() -> InitLightPlusTemporalPassParams {
        InitLightPlusTemporalPassParams {
            frame: 0x1337,
            init_light: 0,
            temporal_reuse: 1,
            do_indirect_gi: 0,
            do_cos_sampling: 1,
            do_direct_shadows: 1,
            max_history: 20,
            min_t: 0.001,
        }
    }

    fn prev(m: u32) -> [Vec4; 1] {
        let fixture = Fixture::new();
        let surface = Surface::new(
            fixture.positions[0],
            fixture.normals[0],
            fixture.diffuses[0],
        );

        let sample = LightSample::new(LightId::new(0));
        let p_hat = sample.p_hat(LightsView::new(&fixture.lights), surface);

        LightReservoir::new(Reservoir {
            sample,
            w_sum: p_hat * m as f32,
            m,
            w: 1.0,
        })
        .encode()
    }

    #[test]
    fn cold_start() {
        let target = Fixture::new();

        let params = InitLightPlusTemporalPassParams {
            init_light: 1,
            ..params()
        };

        let actual = target.run(&params, &prev(7), &[]).reservoir;

        assert_eq!(1, actual.m);
        assert_eq!(LightId::new(0), actual.sample.light_id);

        // Single light, so W = 1 / source_pdf = 1
        assert_relative_eq!(1.0, actual.w, epsilon = 0.0001);
    }

    #[test]
    fn warm_reuse() {
        let target = Fixture::new();
        let actual = target.run(&params(), &prev(7), &[]).reservoir;

        assert_eq!(8, actual.m);
        assert_relative_eq!(1.0, actual.w, epsilon = 0.0001);
    }

    #[test]
    fn history_is_capped() {
        let target = Fixture::new();
        let actual = target.run(&params(), &prev(50), &[]).reservoir;

        assert_eq!(21, actual.m);
    }

    #[test]
    fn temporal_reuse_disabled() {
        let target = Fixture::new();

        let params = InitLightPlusTemporalPassParams {
            temporal_reuse: 0,
            ..params()
        };

        let actual = target.run(&params, &prev(7), &[]).reservoir;

        assert_eq!(1, actual.m);
    }

    #[test]
    fn occluded_candidate() {
        let mut target = Fixture::new();

        target.triangles.push(Triangle::new(
            [
                vec3(-5.0, 1.0, -5.0),
                vec3(5.0, 1.0, -5.0),
                vec3(0.0, 1.0, 5.0),
            ],
            Vec3::ONE,
        ));

        let params = InitLightPlusTemporalPassParams {
            init_light: 1,
            ..params()
        };

        let actual = target.run(&params, &prev(1), &[]).reservoir;

        assert_eq!(1, actual.m);
        assert_eq!(0.0, actual.w_sum);
        assert_eq!(0.0, actual.w);
    }

    #[test]
    fn background() {
        let mut target = Fixture::new();

        target.positions[0] = Vec4::ZERO;

        let actual = target.run(&params(), &prev(7), &[]);

        assert_eq!(Output::default(), actual);
    }

    #[test]
    fn indirect_sees_environment() {
        let target = Fixture::new();

        let params = InitLightPlusTemporalPassParams {
            init_light: 1,
            do_indirect_gi: 1,
            ..params()
        };

        let actual = target.run(&params, &prev(1), &[]).indirect;

        assert_eq!(1, actual.m);
        assert_eq!(vec3(0.5, 0.5, 0.5), actual.sample.radiance);
        assert!(actual.sample.direction.dot(Vec3::Y) >= 0.0);
        assert!(actual.w >= 0.0);
    }

    #[test]
    fn indirect_disabled() {
        let target = Fixture::new();
        let actual = target.run(&params(), &prev(1), &[]).indirect;

        assert_eq!(IndirectReservoir::default(), actual);
    }
}
