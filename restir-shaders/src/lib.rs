//! Per-pixel kernels of the three resampling stages.
//!
//! Each kernel is a pure function of a pixel's position and the stage's
//! bindings; it returns what should get stored for that pixel instead of
//! writing into shared buffers, so that no pixel can observe a sibling's
//! in-progress result.

pub mod init_light_plus_temporal;
pub mod spatial_reuse;
pub mod update_reservoir_plus_shade;
