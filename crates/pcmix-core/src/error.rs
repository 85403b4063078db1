//! Error types shared across pcmix crates

use std::io;

use thiserror::Error;

/// Top-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the mixer, the volume processor and output sinks.
#[derive(Error, Debug)]
pub enum AudioError {
    /// A submitted buffer is longer than the mixer's configured capacity.
    #[error("Submitted {len} bytes but mixer capacity is {capacity} bytes")]
    BufferOverrun { len: usize, capacity: usize },
    /// The drain target cannot hold the cycle's mixed bytes.
    #[error("Output buffer holds {available} bytes but {needed} are needed")]
    OutputTooSmall { needed: usize, available: usize },
    #[error("Unsupported sample width: {0} bits")]
    UnsupportedSampleWidth(u16),
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u16),
    /// The output sink cannot accept a write right now.
    #[error("Audio sink unavailable: {0}")]
    SinkUnavailable(String),
    #[error("Audio device error: {0}")]
    Device(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration loading and saving errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("No configuration directory on this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, Error>;
