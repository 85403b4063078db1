//! PCM accumulation mixer for pcmix
//!
//! Sums many signed linear PCM streams with per-channel gain, pulls
//! overflowing mixes back into range and hands the bytes to an output sink.

pub mod backend;
pub mod codec;
pub mod format;
pub mod level;
pub mod mixer;
pub mod output;
pub mod volume;

pub use backend::{AudioSink, CpalSink, FileSink, NullSink};
pub use format::{ByteOrder, PcmFormat, SampleWidth};
pub use mixer::{Accumulator, MixCycle, Mixer};
pub use output::{OutputDriver, OutputState, Source};
pub use volume::{apply_volume, Gain};
