use thiserror::Error;

use crate::Channel;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("unknown program: {0}")]
    UnknownProgram(String),

    #[error("program `{program}` requires variable `{name}`, which is unset")]
    MissingVariable { program: String, name: String },

    #[error("program `{program}` expects variable `{name}` to be {expected}")]
    InvalidVariable {
        program: String,
        name: String,
        expected: &'static str,
    },

    #[error("pass `{pass}` cannot bind {channel}: expected {expected}")]
    InvalidBinding {
        pass: &'static str,
        channel: Channel,
        expected: &'static str,
    },

    #[error("channel {0} is not available")]
    ChannelUnavailable(Channel),

    #[error("channel {channel} has {actual} texels, expected {expected}")]
    ChannelLayout {
        channel: Channel,
        expected: usize,
        actual: usize,
    },
}
