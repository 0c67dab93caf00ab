//! Common structs, algorithms etc. shared by ReSTIR's kernels and its host.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod frame;
mod light;
mod lights;
mod noise;
mod normal;
mod passes;
mod ray;
mod reservoir;
mod screen;
mod surface;
mod triangle;
mod triangles;
mod utils;
mod world;

pub use self::frame::*;
pub use self::light::*;
pub use self::lights::*;
pub use self::noise::*;
pub use self::normal::*;
pub use self::passes::*;
pub use self::ray::*;
pub use self::reservoir::*;
pub use self::screen::*;
pub use self::surface::*;
pub use self::triangle::*;
pub use self::triangles::*;
pub use self::utils::*;
pub use self::world::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Smallest value treated as non-zero when dividing by squared lengths.
pub const RESTIR_EPSILON: f32 = 0.000001;
