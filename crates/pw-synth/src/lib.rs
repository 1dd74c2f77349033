// Additive synthesis of PCM audio from brightness grids.

pub mod error;
pub mod quantize;
pub mod spectrum;
pub mod synthesizer;
pub mod window;

pub use error::SynthError;
pub use synthesizer::{SampleSequence, Synthesizer};
