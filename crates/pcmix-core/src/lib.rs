//! Core support for the pcmix mixer: configuration, error types and logging.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{AudioError, ConfigError, Error, Result};
