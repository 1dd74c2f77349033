/// Image loading and brightness sampling for pic2wav.

pub mod image;
pub mod sampler;
