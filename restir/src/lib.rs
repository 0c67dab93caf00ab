//! Spatiotemporal reservoir resampling (ReSTIR) of direct and one-bounce
//! indirect lighting.
//!
//! Each frame runs three stages over the G-buffer: drawing fresh candidates
//! combined with the previous frame's reservoirs, combining reservoirs of
//! neighbouring pixels, and shading with the resampled reservoirs.

mod buffers;
mod camera;
mod camera_tracker;
mod channel;
mod error;
mod light;
mod options;
mod pass;
mod passes;
mod ray_tracer;
mod renderer;
mod reservoir_store;
mod resources;
mod scene;
mod shader_variables;
mod triangle;
mod utils;

pub use restir_gpu as gpu;

pub use self::buffers::*;
pub use self::camera::*;
pub use self::camera_tracker::*;
pub use self::channel::*;
pub use self::error::*;
pub use self::light::*;
pub use self::options::*;
pub use self::pass::{FrameContext, Pass, PassStatus};
pub use self::passes::*;
pub use self::ray_tracer::*;
pub use self::renderer::*;
pub use self::reservoir_store::*;
pub use self::resources::*;
pub use self::scene::*;
pub use self::shader_variables::*;
pub use self::triangle::*;
