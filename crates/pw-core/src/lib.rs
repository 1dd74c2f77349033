/// Configuration, shared types and errors for pic2wav.
///
/// This crate holds everything the sampler, the synthesizer and the exporter
/// agree on: the synthesis configuration, the decoded pixel buffer and the
/// brightness grid the synthesizer consumes.

pub mod config;
pub mod error;
pub mod frame;
pub mod grid;

pub use config::{SynthConfig, ZeroRowPolicy};
pub use error::CoreError;
pub use frame::FrameBuffer;
pub use grid::{BrightnessGrid, RowEnergy};
