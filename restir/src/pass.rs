use log::{debug, warn};

use crate::{
    Channel, ConfigSchema, Error, Options, RayTracer, Resources, Result,
    Scene, ShaderVariables,
};

/// Everything a pass can touch while executing a frame; borrowed for the
/// duration of that frame only.
pub struct FrameContext<'a> {
    pub resources: &'a mut Resources,
    pub tracer: &'a dyn RayTracer,
    pub scene: Option<&'a Scene>,
    pub options: Options,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassStatus {
    Executed,

    /// Some resource was missing (or the dispatch failed); buffers retain
    /// their previous contents.
    Skipped,
}

impl PassStatus {
    pub fn is_executed(self) -> bool {
        self == Self::Executed
    }
}

pub trait Pass {
    fn name(&self) -> &'static str;

    /// Validates the pass' configuration and requests the channels it needs.
    fn initialize(&mut self, resources: &mut Resources) -> Result<()>;

    /// Called when the scene gets replaced; forgets all the history.
    fn init_scene(&mut self, resources: &mut Resources, scene: Option<&Scene>);

    /// Runs the pass for the current frame; never fails, at worst skips.
    fn execute(&mut self, ctx: &mut FrameContext<'_>) -> PassStatus;

    fn describe_config(&self) -> ConfigSchema;
}

/// Returns whether all given channels are present, logging the first missing
/// one.
pub(crate) fn has_channels(
    pass: &str,
    resources: &Resources,
    channels: impl IntoIterator<Item = Channel>,
) -> bool {
    for channel in channels {
        if !resources.contains(channel) {
            debug!("[{pass}] Skipping: channel {channel} is not available");
            return false;
        }
    }

    true
}

/// Submits a program, downgrading errors to a skipped pass.
pub(crate) fn submit(
    pass: &str,
    ctx: &mut FrameContext<'_>,
    entry_point: &str,
    vars: &ShaderVariables,
) -> PassStatus {
    let size = ctx.resources.screen_size();

    match ctx.tracer.submit(ctx.resources, entry_point, size, vars) {
        Ok(()) => PassStatus::Executed,

        Err(err) => {
            warn!("[{pass}] Dispatch failed: {err}");
            PassStatus::Skipped
        }
    }
}

/// Ensures `channel` belongs to the expected family.
pub(crate) fn check_binding(
    pass: &'static str,
    channel: Channel,
    is_valid: bool,
    expected: &'static str,
) -> Result<()> {
    if is_valid {
        Ok(())
    } else {
        Err(Error::InvalidBinding {
            pass,
            channel,
            expected,
        })
    }
}
