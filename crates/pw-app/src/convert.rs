use std::path::Path;

use anyhow::{Context, Result};
use pw_core::config::SynthConfig;
use pw_source::sampler::ImageSampler;
use pw_synth::spectrum::row_frequencies;
use pw_synth::synthesizer::Synthesizer;

/// What one conversion produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub samples: usize,
    pub silent_rows: usize,
    pub peak: u16,
}

/// Image → WAVE driver, built once and reused for every input.
pub struct Converter {
    sampler: ImageSampler,
    synth: Synthesizer,
    report: bool,
}

impl Converter {
    /// # Errors
    /// Returns an error if `config` does not validate.
    pub fn new(config: SynthConfig, report: bool) -> Result<Self> {
        let synth = Synthesizer::new(config.clone()).context("Configuration de synthèse invalide")?;
        Ok(Self {
            sampler: ImageSampler::new(config),
            synth,
            report,
        })
    }

    /// Sample `input`, synthesize it and write `output`.
    ///
    /// The output file is only created once synthesis has succeeded, so a
    /// rejected image leaves nothing behind.
    ///
    /// # Errors
    /// Returns an error if the image cannot be read, has the wrong size, has a
    /// black row under the `Error` policy, or if the WAVE cannot be written.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<Summary> {
        log::info!("Conversion : {} → {}", input.display(), output.display());
        let config = self.synth.config();

        let (grid, energy) = self.sampler.sample_file(input)?;
        let samples = self
            .synth
            .synthesize(&grid, &energy)
            .with_context(|| format!("Synthèse de {}", input.display()))?;

        if self.report {
            self.log_report(&samples);
        }

        pw_export::wav::export_wav(output, &samples, config)?;

        Ok(Summary {
            samples: samples.len(),
            silent_rows: energy.silent_rows().len(),
            peak: samples.peak(),
        })
    }

    fn log_report(&self, samples: &pw_synth::SampleSequence) {
        let config = self.synth.config();
        for (row, freq) in row_frequencies(samples, config.sample_rate)
            .into_iter()
            .enumerate()
        {
            match freq {
                Some(hz) => log::info!("ligne {row:>4} : {hz:>8.1} Hz"),
                None => log::info!("ligne {row:>4} : silence"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(resolution: u32) -> SynthConfig {
        SynthConfig {
            resolution,
            ..SynthConfig::default()
        }
    }

    fn save_column(path: &Path, size: u32, column: u32) {
        image::GrayImage::from_fn(size, size, |x, _| {
            image::Luma([if x == column { 255 } else { 0 }])
        })
        .save(path)
        .unwrap();
    }

    #[test]
    fn converts_png_to_wav() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("line.png");
        let output = dir.path().join("line.wav");
        save_column(&input, 16, 5);

        let converter = Converter::new(config(16), true).unwrap();
        let summary = converter.convert(&input, &output).unwrap();

        assert_eq!(summary.samples, 1600 * 16);
        assert_eq!(summary.silent_rows, 0);
        assert!(summary.peak > 30_000);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes.len(), 44 + 1600 * 16 * 2);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn wrong_size_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.png");
        let output = dir.path().join("wide.wav");
        image::GrayImage::from_pixel(32, 16, image::Luma([200]))
            .save(&input)
            .unwrap();

        let converter = Converter::new(config(16), false).unwrap();
        let err = converter.convert(&input, &output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<pw_core::CoreError>(),
            Some(pw_core::CoreError::UnsupportedResolution { width: 32, height: 16, required: 16 })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn black_row_error_policy_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("black.png");
        let output = dir.path().join("black.wav");
        image::GrayImage::from_pixel(8, 8, image::Luma([0]))
            .save(&input)
            .unwrap();

        let strict = SynthConfig {
            zero_row: pw_core::config::ZeroRowPolicy::Error,
            ..config(8)
        };
        assert!(Converter::new(strict, false).unwrap().convert(&input, &output).is_err());
        assert!(!output.exists());

        let summary = Converter::new(config(8), false)
            .unwrap()
            .convert(&input, &output)
            .unwrap();
        assert_eq!(summary.silent_rows, 8);
        assert_eq!(summary.peak, 0);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let converter = Converter::new(config(16), false).unwrap();
        assert!(converter
            .convert(&dir.path().join("absent.png"), &dir.path().join("absent.wav"))
            .is_err());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let bad = SynthConfig {
            channels: 2,
            ..SynthConfig::default()
        };
        assert!(Converter::new(bad, false).is_err());
    }
}
