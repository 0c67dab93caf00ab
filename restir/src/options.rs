use std::fmt;

use crate::{Channel, Error, Result};

/// Per-frame toggles; the renderer snapshots them once per frame, so
/// changing them mid-frame has no effect until the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub temporal_reuse: bool,
    pub spatial_reuse: bool,
    pub do_indirect_gi: bool,
    pub do_cos_sampling: bool,
    pub do_direct_shadows: bool,
}

impl Options {
    pub const NAMES: [&'static str; 5] = [
        "temporal_reuse",
        "spatial_reuse",
        "do_indirect_gi",
        "do_cos_sampling",
        "do_direct_shadows",
    ];

    pub fn get(&self, name: &str) -> Result<bool> {
        Ok(*self.field(name)?)
    }

    pub fn set(&mut self, name: &str, value: bool) -> Result<()> {
        *self.field_mut(name)? = value;

        Ok(())
    }

    pub fn describe(&self) -> ConfigSchema {
        let mut schema = ConfigSchema::default();

        for name in Self::NAMES {
            if let Ok(value) = self.get(name) {
                schema.push(name, value);
            }
        }

        schema
    }

    fn field(&self, name: &str) -> Result<&bool> {
        Ok(match name {
            "temporal_reuse" => &self.temporal_reuse,
            "spatial_reuse" => &self.spatial_reuse,
            "do_indirect_gi" => &self.do_indirect_gi,
            "do_cos_sampling" => &self.do_cos_sampling,
            "do_direct_shadows" => &self.do_direct_shadows,
            _ => return Err(Error::UnknownOption(name.to_string())),
        })
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut bool> {
        Ok(match name {
            "temporal_reuse" => &mut self.temporal_reuse,
            "spatial_reuse" => &mut self.spatial_reuse,
            "do_indirect_gi" => &mut self.do_indirect_gi,
            "do_cos_sampling" => &mut self.do_cos_sampling,
            "do_direct_shadows" => &mut self.do_direct_shadows,
            _ => return Err(Error::UnknownOption(name.to_string())),
        })
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            temporal_reuse: true,
            spatial_reuse: true,
            do_indirect_gi: true,
            do_cos_sampling: true,
            do_direct_shadows: true,
        }
    }
}

/// List of the settings a pass reads, along with their current values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigSchema {
    pub options: Vec<ConfigOption>,
}

impl ConfigSchema {
    pub fn push(&mut self, name: &'static str, value: impl Into<ConfigValue>) {
        self.options.push(ConfigOption {
            name,
            value: value.into(),
        });
    }

    pub fn with(
        mut self,
        name: &'static str,
        value: impl Into<ConfigValue>,
    ) -> Self {
        self.push(name, value);
        self
    }

    pub fn extend(&mut self, other: ConfigSchema) {
        self.options.extend(other.options);
    }

    pub fn get(&self, name: &str) -> Option<ConfigValue> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfigOption {
    pub name: &'static str,
    pub value: ConfigValue,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    U32(u32),
    F32(f32),
    Channel(Channel),
    Str(&'static str),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<Channel> for ConfigValue {
    fn from(value: Channel) -> Self {
        Self::Channel(value)
    }
}

impl From<&'static str> for ConfigValue {
    fn from(value: &'static str) -> Self {
        Self::Str(value)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::U32(value) => write!(f, "{value}"),
            Self::F32(value) => write!(f, "{value}"),
            Self::Channel(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_by_name() {
        let mut target = Options::default();

        target.set("spatial_reuse", false).unwrap();

        assert!(!target.spatial_reuse);
        assert!(!target.get("spatial_reuse").unwrap());

        assert!(matches!(
            target.set("spatialReuse", false),
            Err(Error::UnknownOption(name)) if name == "spatialReuse"
        ));
    }

    #[test]
    fn describe() {
        let target = Options {
            do_indirect_gi: false,
            ..Default::default()
        };

        let schema = target.describe();

        assert_eq!(5, schema.options.len());
        assert_eq!(
            Some(ConfigValue::Bool(false)),
            schema.get("do_indirect_gi")
        );
        assert_eq!(Some(ConfigValue::Bool(true)), schema.get("temporal_reuse"));
    }
}
