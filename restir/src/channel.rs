use std::fmt;
use std::str::FromStr;

use glam::Vec4;

use crate::{gpu, Error};

/// Named per-pixel texture shared between the stages and the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// G-buffer: world-space position; `w == 0` marks a background pixel.
    WorldPosition,

    /// G-buffer: world-space normal.
    WorldNormal,

    /// G-buffer: diffuse albedo (or background color, for misses).
    MaterialDiffuse,

    ReservoirPrev,
    ReservoirCurr,
    ReservoirSpatial,

    /// Single-channel variant, for layouts that skip spatial reuse.
    Reservoir,

    IndirectOutput,
    IndirectPrev,

    /// Final radiance.
    Output,
}

impl Channel {
    pub const ALL: [Self; 10] = [
        Self::WorldPosition,
        Self::WorldNormal,
        Self::MaterialDiffuse,
        Self::ReservoirPrev,
        Self::ReservoirCurr,
        Self::ReservoirSpatial,
        Self::Reservoir,
        Self::IndirectOutput,
        Self::IndirectPrev,
        Self::Output,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::WorldPosition => "WorldPosition",
            Self::WorldNormal => "WorldNormal",
            Self::MaterialDiffuse => "MaterialDiffuse",
            Self::ReservoirPrev => "ReservoirPrev",
            Self::ReservoirCurr => "ReservoirCurr",
            Self::ReservoirSpatial => "ReservoirSpatial",
            Self::Reservoir => "Reservoir",
            Self::IndirectOutput => "IndirectOutput",
            Self::IndirectPrev => "IndirectPrev",
            Self::Output => "Output",
        }
    }

    /// Returns whether this channel holds light reservoirs.
    pub fn is_reservoir(self) -> bool {
        matches!(
            self,
            Self::ReservoirPrev
                | Self::ReservoirCurr
                | Self::ReservoirSpatial
                | Self::Reservoir
        )
    }

    /// Returns whether this channel holds indirect reservoirs.
    pub fn is_indirect(self) -> bool {
        matches!(self, Self::IndirectOutput | Self::IndirectPrev)
    }

    pub fn texels_per_pixel(self) -> usize {
        if self.is_reservoir() {
            gpu::LightReservoir::STRIDE
        } else if self.is_indirect() {
            gpu::IndirectReservoir::STRIDE
        } else {
            1
        }
    }

    /// Returns texels of a single pixel in its cleared state: an empty
    /// reservoir for reservoir channels, zero otherwise.
    pub fn clear_value(self) -> Vec<Vec4> {
        if self.is_reservoir() {
            gpu::LightReservoir::default().encode().to_vec()
        } else if self.is_indirect() {
            gpu::IndirectReservoir::default().encode().to_vec()
        } else {
            vec![Vec4::ZERO; self.texels_per_pixel()]
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.name() == s)
            .ok_or_else(|| Error::UnknownChannel(s.to_string()))
    }
}
