use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct InitLightPlusTemporalPassParams {
    pub frame: u32,
    pub init_light: u32,
    pub temporal_reuse: u32,
    pub do_indirect_gi: u32,
    pub do_cos_sampling: u32,
    pub do_direct_shadows: u32,
    pub max_history: u32,
    pub min_t: f32,
}

impl InitLightPlusTemporalPassParams {
    /// Whether the per-pixel light sample should be drawn anew (e.g. because
    /// the camera has moved).
    pub fn init_light(&self) -> bool {
        self.init_light != 0
    }

    pub fn temporal_reuse(&self) -> bool {
        self.temporal_reuse != 0
    }

    pub fn do_indirect_gi(&self) -> bool {
        self.do_indirect_gi != 0
    }

    pub fn do_cos_sampling(&self) -> bool {
        self.do_cos_sampling != 0
    }

    pub fn do_direct_shadows(&self) -> bool {
        self.do_direct_shadows != 0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct SpatialReusePassParams {
    /// x,y,z - camera position in world space
    /// w - unused
    pub camera_origin: Vec4,
    pub frame: u32,
    pub spatial_reuse: u32,
    pub samples: u32,
    pub radius: f32,
    pub normal_threshold: f32,
    pub depth_threshold: f32,
    pub _padding: [u32; 2],
}

impl SpatialReusePassParams {
    pub fn camera_origin(&self) -> Vec3 {
        self.camera_origin.xyz()
    }

    pub fn spatial_reuse(&self) -> bool {
        self.spatial_reuse != 0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable, Debug)]
pub struct UpdateReservoirPlusShadePassParams {
    pub do_indirect_gi: u32,
    pub do_direct_shadows: u32,
    pub min_t: f32,
}

impl UpdateReservoirPlusShadePassParams {
    pub fn do_indirect_gi(&self) -> bool {
        self.do_indirect_gi != 0
    }

    pub fn do_direct_shadows(&self) -> bool {
        self.do_direct_shadows != 0
    }
}
