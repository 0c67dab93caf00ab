mod cpu;

use glam::UVec2;

pub use self::cpu::*;
use crate::{Resources, Result, Scene, ShaderVariables};

/// Ray-dispatch capability: runs a named per-pixel program over a 2D grid
/// and blocks until it's done.
pub trait RayTracer {
    /// Uploads given scene; `None` unloads the current one.
    fn set_scene(&mut self, scene: Option<&Scene>);

    /// Returns whether programs can be submitted (e.g. whether a scene has
    /// been uploaded).
    fn is_ready(&self) -> bool;

    /// Runs program `entry_point` over `size` pixels.
    ///
    /// Programs read and write channels through names set in `vars`; all of
    /// the writes are visible once this function returns.
    fn submit(
        &self,
        resources: &mut Resources,
        entry_point: &str,
        size: UVec2,
        vars: &ShaderVariables,
    ) -> Result<()>;
}
