use restir_gpu::prelude::*;

pub const ENTRY_POINT: &str = "update_reservoir_plus_shade";

pub mod vars {
    pub const DO_INDIRECT_GI: &str = "do_indirect_gi";
    pub const DO_DIRECT_SHADOWS: &str = "do_direct_shadows";
    pub const MIN_T: &str = "min_t";

    pub const WORLD_POSITION: &str = "world_position";
    pub const WORLD_NORMAL: &str = "world_normal";
    pub const MATERIAL_DIFFUSE: &str = "material_diffuse";
    pub const RESERVOIR_IN: &str = "reservoir_in";
    pub const INDIRECT_IN: &str = "indirect_in";
    pub const RESERVOIR_OUT: &str = "reservoir_out";
    pub const INDIRECT_OUT: &str = "indirect_out";
    pub const OUTPUT: &str = "output";
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Output {
    /// Final radiance of the pixel.
    pub color: Vec4,

    /// Light reservoir published for the next frame's temporal reuse.
    pub reservoir: LightReservoir,

    /// Indirect reservoir published for the next frame's temporal reuse.
    pub indirect: IndirectReservoir,
}

#[allow(clippy::too_many_arguments)]
pub fn main(
    global_id: UVec2,
    params: &UpdateReservoirPlusShadePassParams,
    screen: Screen,
    lights: LightsView,
    triangles: TrianglesView,
    positions: &[Vec4],
    normals: &[Vec4],
    diffuses: &[Vec4],
    reservoirs: &[Vec4],
    indirect_reservoirs: &[Vec4],
) -> Output {
    let idx = screen.idx(global_id);
    let surface = Surface::read(positions, normals, diffuses, idx);

    if surface.is_none() {
        return Output {
            color: diffuses[idx],
            ..Default::default()
        };
    }

    let mut color = Vec3::ZERO;

    // -------------------------------------------------------------------------

    let mut reservoir = LightReservoir::read(reservoirs, idx);

    if reservoir.w > 0.0 && reservoir.sample.is_valid(lights) {
        let light = lights.get(reservoir.sample.light_id);

        if params.do_direct_shadows()
            && light.is_occluded(triangles, surface, params.min_t)
        {
            reservoir.w = 0.0;
        } else {
            color += light.contribution(surface) * reservoir.w;
        }
    }

    // -------------------------------------------------------------------------

    let indirect = if params.do_indirect_gi() {
        let indirect = IndirectReservoir::read(indirect_reservoirs, idx);

        color += indirect.sample.contribution(surface) * indirect.w;
        indirect
    } else {
        IndirectReservoir::default()
    };

    Output {
        color: color.extend(1.0),
        reservoir,
        indirect,
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    struct Fixture {
        lights: Vec<Light>,
        triangles: Vec<Triangle>,
        positions: Vec<Vec4>,
        normals: Vec<Vec4>,
        diffuses: Vec<Vec4>,
        reservoirs: Vec<Vec4>,
        indirect_reservoirs: Vec<Vec4>,
    }

    impl Fixture {
        fn new() -> Self {
            let reservoir = LightReservoir::new(Reservoir {
                sample: LightSample::new(LightId::new(0)),
                w_sum: 2.0,
                m: 4,
                w: 2.0,
            });

            let indirect = IndirectReservoir::new(Reservoir {
                sample: IndirectSample {
                    direction: Vec3::Y,
                    radiance: Vec3::ONE,
                },
                w_sum: 1.0,
                m: 1,
                w: PI,
            });

            Self {
                lights: vec![Light::point(vec3(0.0, 2.0, 0.0), Vec3::ONE, 4.0)],
                triangles: Default::default(),
                positions: vec![vec4(0.0, 0.0, 0.0, 1.0)],
                normals: vec![vec4(0.0, 1.0, 0.0, 0.0)],
                diffuses: vec![Vec4::ONE],
                reservoirs: reservoir.encode().to_vec(),
                indirect_reservoirs: indirect.encode().to_vec(),
            }
        }

        fn add_blocker(&mut self) {
            self.triangles.push(Triangle::new(
                [
                    vec3(-5.0, 1.0, -5.0),
                    vec3(5.0, 1.0, -5.0),
                    vec3(0.0, 1.0, 5.0),
                ],
                Vec3::ONE,
            ));
        }

        fn run(&self, params: &UpdateReservoirPlusShadePassParams) -> Output {
            main(
                UVec2::ZERO,
                params,
                Screen::new(UVec2::ONE),
                LightsView::new(&self.lights),
                TrianglesView::new(&self.triangles),
                &self.positions,
                &self.normals,
                &self.diffuses,
                &self.reservoirs,
                &self.indirect_reservoirs,
            )
        }
    }

    fn params() -> UpdateReservoirPlusShadePassParams {
        UpdateReservoirPlusShadePassParams {
            do_indirect_gi: 0,
            do_direct_shadows: 1,
            min_t: 0.001,
        }
    }

    #[test]
    fn direct() {
        let target = Fixture::new();
        let actual = target.run(&params());

        // contribution = 1/pi, W = 2
        assert_relative_eq!(2.0 / PI, actual.color.x, epsilon = 0.0001);
        assert_relative_eq!(1.0, actual.color.w);
        assert_relative_eq!(2.0, actual.reservoir.w);
        assert_eq!(4, actual.reservoir.m);
        assert_eq!(IndirectReservoir::default(), actual.indirect);
    }

    #[test]
    fn occluded() {
        let mut target = Fixture::new();

        target.add_blocker();

        let actual = target.run(&params());

        assert_eq!(Vec3::ZERO, actual.color.xyz());
        assert_eq!(0.0, actual.reservoir.w);
        assert_eq!(4, actual.reservoir.m);
    }

    #[test]
    fn occlusion_ignored_without_shadows() {
        let mut target = Fixture::new();

        target.add_blocker();

        let params = UpdateReservoirPlusShadePassParams {
            do_direct_shadows: 0,
            ..params()
        };

        let actual = target.run(&params);

        assert_relative_eq!(2.0 / PI, actual.color.x, epsilon = 0.0001);
        assert_relative_eq!(2.0, actual.reservoir.w);
    }

    #[test]
    fn indirect() {
        let mut target = Fixture::new();

        target.lights.clear();

        let params = UpdateReservoirPlusShadePassParams {
            do_indirect_gi: 1,
            ..params()
        };

        let actual = target.run(&params);

        // diffuse / pi * radiance * cos * W = 1
        assert_relative_eq!(1.0, actual.color.x, epsilon = 0.001);
        assert_eq!(1, actual.indirect.m);
    }

    #[test]
    fn background() {
        let mut target = Fixture::new();

        target.positions[0] = Vec4::ZERO;
        target.diffuses[0] = vec4(0.1, 0.2, 0.3, 1.0);

        let actual = target.run(&params());

        assert_eq!(vec4(0.1, 0.2, 0.3, 1.0), actual.color);
        assert!(actual.reservoir.is_empty());
        assert!(actual.indirect.is_empty());
    }
}
