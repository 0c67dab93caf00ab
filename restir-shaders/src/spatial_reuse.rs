use restir_gpu::prelude::*;

pub const ENTRY_POINT: &str = "spatial_reuse";

pub mod vars {
    pub const FRAME: &str = "frame";
    pub const SPATIAL_REUSE: &str = "spatial_reuse";
    pub const SAMPLES: &str = "samples";
    pub const RADIUS: &str = "radius";
    pub const NORMAL_THRESHOLD: &str = "normal_threshold";
    pub const DEPTH_THRESHOLD: &str = "depth_threshold";
    pub const CAMERA_ORIGIN: &str = "camera_origin";

    pub const WORLD_POSITION: &str = "world_position";
    pub const WORLD_NORMAL: &str = "world_normal";
    pub const MATERIAL_DIFFUSE: &str = "material_diffuse";
    pub const RESERVOIR_IN: &str = "reservoir_in";
    pub const RESERVOIR_OUT: &str = "reservoir_out";
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Output {
    pub reservoir: LightReservoir,
}

#[allow(clippy::too_many_arguments)]
pub fn main(
    global_id: UVec2,
    params: &SpatialReusePassParams,
    screen: Screen,
    lights: LightsView,
    positions: &[Vec4],
    normals: &[Vec4],
    diffuses: &[Vec4],
    reservoirs: &[Vec4],
) -> Output {
    let idx = screen.idx(global_id);
    let input = LightReservoir::read(reservoirs, idx);

    if !params.spatial_reuse() {
        return Output { reservoir: input };
    }

    let surface = Surface::read(positions, normals, diffuses, idx);

    if surface.is_none() {
        return Output { reservoir: input };
    }

    // -------------------------------------------------------------------------

    let mut wnoise = WhiteNoise::new(params.frame, global_id);
    let mut reservoir = input.reservoir;
    let mut p_hat = reservoir.sample.p_hat(lights, surface);
    let depth = surface.depth(params.camera_origin());

    for _ in 0..params.samples {
        let rhs_pos = screen.clamp(
            (global_id.as_vec2() + wnoise.sample_disk() * params.radius)
                .as_ivec2(),
        );

        if rhs_pos == global_id {
            continue;
        }

        let rhs_idx = screen.idx(rhs_pos);
        let rhs_surface = Surface::read(positions, normals, diffuses, rhs_idx);

        if rhs_surface.is_none()
            || surface.normal.dot(rhs_surface.normal) < params.normal_threshold
            || (rhs_surface.depth(params.camera_origin()) - depth).abs()
                > params.depth_threshold * depth
        {
            continue;
        }

        // The neighbour's candidate gets re-evaluated at our surface; reusing
        // its stored weight would bias the estimator.
        let rhs = LightReservoir::read(reservoirs, rhs_idx).reservoir;
        let rhs_p_hat = rhs.sample.p_hat(lights, surface);

        reservoir = Reservoir::combine(
            &reservoir,
            &rhs,
            p_hat,
            rhs_p_hat,
            wnoise.sample(),
        );

        p_hat = reservoir.sample.p_hat(lights, surface);
    }

    Output {
        reservoir: LightReservoir::new(reservoir),
    }
}
