use fxhash::FxHashMap;
use glam::Vec4;

use crate::{Channel, Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShaderValue {
    Bool(bool),
    U32(u32),
    F32(f32),
    Vec4(Vec4),
    Channel(Channel),
}

impl From<bool> for ShaderValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for ShaderValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<f32> for ShaderValue {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<Vec4> for ShaderValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Channel> for ShaderValue {
    fn from(value: Channel) -> Self {
        Self::Channel(value)
    }
}

/// Named values visible to a dispatched program.
#[derive(Clone, Debug, Default)]
pub struct ShaderVariables {
    items: FxHashMap<String, ShaderValue>,
}

impl ShaderVariables {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<ShaderValue>) {
        self.items.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<ShaderValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<ShaderValue> {
        self.items.get(name).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<ShaderValue> {
        self.items.remove(name)
    }

    /// Returns a typed view of these variables; errors reported by the
    /// reader mention given program.
    pub fn reader<'a>(&'a self, program: &'a str) -> ShaderVariablesReader<'a> {
        ShaderVariablesReader {
            program,
            vars: self,
        }
    }
}

pub struct ShaderVariablesReader<'a> {
    program: &'a str,
    vars: &'a ShaderVariables,
}

impl ShaderVariablesReader<'_> {
    pub fn bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            ShaderValue::Bool(value) => Ok(value),
            _ => Err(self.invalid(name, "a bool")),
        }
    }

    pub fn u32(&self, name: &str) -> Result<u32> {
        match self.get(name)? {
            ShaderValue::U32(value) => Ok(value),
            _ => Err(self.invalid(name, "an u32")),
        }
    }

    pub fn f32(&self, name: &str) -> Result<f32> {
        match self.get(name)? {
            ShaderValue::F32(value) => Ok(value),
            _ => Err(self.invalid(name, "a f32")),
        }
    }

    pub fn vec4(&self, name: &str) -> Result<Vec4> {
        match self.get(name)? {
            ShaderValue::Vec4(value) => Ok(value),
            _ => Err(self.invalid(name, "a vec4")),
        }
    }

    pub fn channel(&self, name: &str) -> Result<Channel> {
        match self.get(name)? {
            ShaderValue::Channel(value) => Ok(value),
            _ => Err(self.invalid(name, "a channel")),
        }
    }

    /// Like [`Self::channel()`], but treats an unset variable as "not bound".
    pub fn channel_opt(&self, name: &str) -> Result<Option<Channel>> {
        if self.vars.get(name).is_none() {
            return Ok(None);
        }

        self.channel(name).map(Some)
    }

    fn get(&self, name: &str) -> Result<ShaderValue> {
        self.vars.get(name).ok_or_else(|| Error::MissingVariable {
            program: self.program.to_string(),
            name: name.to_string(),
        })
    }

    fn invalid(&self, name: &str, expected: &'static str) -> Error {
        Error::InvalidVariable {
            program: self.program.to_string(),
            name: name.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader() {
        let target = ShaderVariables::new()
            .with("frame", 3u32)
            .with("radius", 30.0f32)
            .with("output", Channel::Output);

        let reader = target.reader("test");

        assert_eq!(3, reader.u32("frame").unwrap());
        assert_eq!(30.0, reader.f32("radius").unwrap());
        assert_eq!(Channel::Output, reader.channel("output").unwrap());
        assert_eq!(None, reader.channel_opt("indirect").unwrap());

        assert!(matches!(
            reader.bool("frame"),
            Err(Error::InvalidVariable { name, .. }) if name == "frame"
        ));

        assert!(matches!(
            reader.bool("missing"),
            Err(Error::MissingVariable { program, .. }) if program == "test"
        ));
    }
}
