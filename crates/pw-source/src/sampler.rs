use std::path::Path;

use anyhow::Result;
use pw_core::config::SynthConfig;
use pw_core::error::CoreError;
use pw_core::frame::FrameBuffer;
use pw_core::grid::{BrightnessGrid, RowEnergy};

use crate::image::load_image;

/// Maximum value of an 8-bit channel.
const CHANNEL_MAX: f32 = 255.0;

/// Turn a decoded frame into a brightness grid and its row sums.
///
/// The frame must be exactly `resolution`×`resolution`; a mismatch on either
/// axis is rejected before anything is sampled. Brightness is the red channel
/// divided by 255.
///
/// # Errors
/// Returns [`CoreError::UnsupportedResolution`] when the frame is not square
/// at the configured resolution.
///
/// # Example
/// ```
/// use pw_core::config::SynthConfig;
/// use pw_core::frame::FrameBuffer;
/// use pw_source::sampler::sample_frame;
///
/// let config = SynthConfig { resolution: 4, ..SynthConfig::default() };
/// let mut frame = FrameBuffer::new(4, 4);
/// frame.data[0] = 255; // red of (0, 0)
/// let (grid, energy) = sample_frame(&frame, &config).unwrap();
/// assert_eq!(grid.get(0, 0), 1.0);
/// assert_eq!(energy.get(0), 1.0);
///
/// let wide = FrameBuffer::new(5, 4);
/// assert!(sample_frame(&wide, &config).is_err());
/// ```
pub fn sample_frame(
    frame: &FrameBuffer,
    config: &SynthConfig,
) -> Result<(BrightnessGrid, RowEnergy), CoreError> {
    let required = config.resolution;
    if frame.width != required || frame.height != required {
        return Err(CoreError::UnsupportedResolution {
            width: frame.width,
            height: frame.height,
            required,
        });
    }

    let resolution = required as usize;
    let mut values = Vec::with_capacity(resolution * resolution);
    for y in 0..frame.height {
        values.extend(frame.reds(y).map(|r| f32::from(r) / CHANNEL_MAX));
    }

    let grid = BrightnessGrid::from_vec(resolution, values)?;
    let energy = grid.row_energy();
    Ok((grid, energy))
}

/// Image Sampler: loads image files and samples them for one configuration.
///
/// # Example
/// ```no_run
/// use pw_core::config::SynthConfig;
/// use pw_source::sampler::ImageSampler;
/// use std::path::Path;
///
/// let sampler = ImageSampler::new(SynthConfig::default());
/// let (grid, energy) = sampler.sample_file(Path::new("line.png")).unwrap();
/// ```
pub struct ImageSampler {
    config: SynthConfig,
}

impl ImageSampler {
    /// Create a sampler for `config`.
    #[must_use]
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    /// Sample an already decoded frame.
    ///
    /// # Errors
    /// See [`sample_frame`].
    pub fn sample(&self, frame: &FrameBuffer) -> Result<(BrightnessGrid, RowEnergy), CoreError> {
        sample_frame(frame, &self.config)
    }

    /// Load `path` and sample it.
    ///
    /// # Errors
    /// Returns an error if the image cannot be decoded, or a
    /// [`CoreError::UnsupportedResolution`] (downcastable) if its size is wrong.
    pub fn sample_file(&self, path: &Path) -> Result<(BrightnessGrid, RowEnergy)> {
        let frame = load_image(path)?;
        let sampled = self.sample(&frame)?;
        log::debug!(
            "{} : {} lignes noires",
            path.display(),
            sampled.1.silent_rows().len()
        );
        Ok(sampled)
    }
}
