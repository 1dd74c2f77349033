use std::f64::consts::TAU;
use std::time::Instant;

use pw_core::config::{SynthConfig, ZeroRowPolicy};
use pw_core::grid::{BrightnessGrid, RowEnergy};
use rayon::prelude::*;

use crate::error::SynthError;
use crate::quantize::quantize;
use crate::window::GaussianWindow;

/// Signed 16-bit PCM samples of a whole image, row after row.
///
/// # Example
/// ```
/// use pw_synth::synthesizer::SampleSequence;
/// let seq = SampleSequence::new(vec![1, 2, 3, 4, 5, 6], 3);
/// assert_eq!(seq.len(), 6);
/// assert_eq!(seq.row(1), &[4, 5, 6]);
/// assert_eq!(seq.rows().count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSequence {
    samples: Vec<i16>,
    samples_per_line: usize,
}

impl SampleSequence {
    /// Wrap `samples`, grouped in rows of `samples_per_line`.
    #[must_use]
    pub fn new(samples: Vec<i16>, samples_per_line: usize) -> Self {
        Self {
            samples,
            samples_per_line,
        }
    }

    /// Total number of samples.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` if no sample was produced.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples of one image row.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[i16] {
        let start = row * self.samples_per_line;
        &self.samples[start..start + self.samples_per_line]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[i16]> {
        self.samples.chunks_exact(self.samples_per_line.max(1))
    }

    /// Samples per image row.
    #[must_use]
    pub fn samples_per_line(&self) -> usize {
        self.samples_per_line
    }

    /// All samples in playback order.
    #[must_use]
    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    /// Largest absolute sample value.
    #[must_use]
    pub fn peak(&self) -> u16 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Take the samples out.
    #[must_use]
    pub fn into_vec(self) -> Vec<i16> {
        self.samples
    }
}

/// Waveform Synthesizer: brightness grid → PCM samples.
///
/// Each image row is held for `samples_per_line` samples. Within a row, every
/// column `c` drives a sinusoid at `c × max_frequency / resolution` Hz whose
/// amplitude is the pixel brightness. The sum is divided by the row energy,
/// faded with a Gaussian window and quantized to `i16`. Time runs continuously
/// across rows.
///
/// Samples never depend on each other, so rows are rendered in parallel on
/// disjoint slices of the output.
///
/// # Example
/// ```
/// use pw_core::config::SynthConfig;
/// use pw_core::grid::BrightnessGrid;
/// use pw_synth::synthesizer::Synthesizer;
///
/// let config = SynthConfig { resolution: 8, ..SynthConfig::default() };
/// let synth = Synthesizer::new(config).unwrap();
/// let grid = BrightnessGrid::from_fn(8, |_, col| if col == 3 { 1.0 } else { 0.0 });
/// let samples = synth.synthesize(&grid, &grid.row_energy()).unwrap();
/// assert_eq!(samples.len(), 1600 * 8);
/// ```
pub struct Synthesizer {
    config: SynthConfig,
    samples_per_line: usize,
    window: GaussianWindow,
    /// Angular frequency 2π·f(c) of each column.
    omegas: Vec<f64>,
    sample_rate: f64,
}

impl Synthesizer {
    /// Precompute the window and the column frequencies for `config`.
    ///
    /// # Errors
    /// Returns [`SynthError::Config`] if `config` does not validate.
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        config.validate()?;

        let samples_per_line = config.samples_per_line();
        let window = GaussianWindow::new(samples_per_line, config.gauss_var);
        let omegas = (0..config.resolution as usize)
            .map(|col| TAU * config.bin_frequency(col))
            .collect();
        let sample_rate = f64::from(config.sample_rate);

        log::debug!(
            "Synthétiseur : {} échantillons/ligne, {:.1} Hz max, {} échantillons au total",
            samples_per_line,
            config.max_frequency(),
            config.num_samples()
        );

        Ok(Self {
            config,
            samples_per_line,
            window,
            omegas,
            sample_rate,
        })
    }

    /// Configuration this synthesizer was built for.
    #[must_use]
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Samples emitted per image row.
    #[must_use]
    pub fn samples_per_line(&self) -> usize {
        self.samples_per_line
    }

    /// The Gaussian fade applied within each row.
    #[must_use]
    pub fn window(&self) -> &GaussianWindow {
        &self.window
    }

    /// Render the whole image.
    ///
    /// # Errors
    /// Returns [`SynthError::ShapeMismatch`] if the grid or energy size differ
    /// from the configured resolution, and [`SynthError::DegenerateRow`] for a
    /// black row under [`ZeroRowPolicy::Error`].
    pub fn synthesize(
        &self,
        grid: &BrightnessGrid,
        energy: &RowEnergy,
    ) -> Result<SampleSequence, SynthError> {
        self.check_shape(grid, energy)?;

        let silent = energy.silent_rows();
        if let Some(&row) = silent.first() {
            if self.config.zero_row == ZeroRowPolicy::Error {
                return Err(SynthError::DegenerateRow { row });
            }
            log::debug!("{} ligne(s) noire(s) rendue(s) en silence", silent.len());
        }

        let start = Instant::now();
        let mut samples = vec![0i16; self.config.num_samples()];
        samples
            .par_chunks_mut(self.samples_per_line)
            .enumerate()
            .for_each(|(row, out)| self.render_row(row, grid.row(row), energy.get(row), out));

        log::debug!(
            "{} échantillons synthétisés en {:.2?}",
            samples.len(),
            start.elapsed()
        );
        Ok(SampleSequence::new(samples, self.samples_per_line))
    }

    /// Compute the single sample at global index `index`.
    ///
    /// Gives the same value as `synthesize(..).as_slice()[index]`.
    ///
    /// # Errors
    /// Same as [`Synthesizer::synthesize`].
    ///
    /// # Panics
    /// Panics if `index >= config.num_samples()`.
    pub fn sample_at(
        &self,
        grid: &BrightnessGrid,
        energy: &RowEnergy,
        index: usize,
    ) -> Result<i16, SynthError> {
        self.check_shape(grid, energy)?;
        let row = index / self.samples_per_line;
        let k = index % self.samples_per_line;
        let row_energy = energy.get(row);
        if row_energy <= 0.0 {
            return match self.config.zero_row {
                ZeroRowPolicy::Silence => Ok(0),
                ZeroRowPolicy::Error => Err(SynthError::DegenerateRow { row }),
            };
        }
        Ok(self.sample(grid.row(row), f64::from(row_energy), index, k))
    }

    fn check_shape(&self, grid: &BrightnessGrid, energy: &RowEnergy) -> Result<(), SynthError> {
        let expected = self.omegas.len();
        if grid.resolution() != expected || energy.len() != expected {
            return Err(SynthError::ShapeMismatch {
                expected,
                actual: grid.resolution(),
                energy_rows: energy.len(),
            });
        }
        Ok(())
    }

    fn render_row(&self, row: usize, brightness: &[f32], energy: f32, out: &mut [i16]) {
        if energy <= 0.0 {
            out.fill(0);
            return;
        }
        let energy = f64::from(energy);
        let base = row * self.samples_per_line;
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.sample(brightness, energy, base + k, k);
        }
    }

    /// Additive synthesis, normalization, fade and quantization of one sample.
    #[inline]
    fn sample(&self, brightness: &[f32], energy: f64, index: usize, k: usize) -> i16 {
        let t = index as f64 / self.sample_rate;
        let raw: f64 = self
            .omegas
            .iter()
            .zip(brightness)
            .filter(|&(_, &amplitude)| amplitude != 0.0)
            .map(|(&omega, &amplitude)| (omega * t).sin() * f64::from(amplitude))
            .sum();
        quantize(raw / energy * self.window.factor(k))
    }
}
