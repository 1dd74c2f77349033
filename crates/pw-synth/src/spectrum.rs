use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use crate::synthesizer::SampleSequence;

/// Symmetric Hann taper of `len` points.
fn hann(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    let last = (len - 1) as f64;
    (0..len)
        .map(|i| (0.5 - 0.5 * (std::f64::consts::TAU * i as f64 / last).cos()) as f32)
        .collect()
}

/// Spectrum probe for one row of rendered audio.
///
/// Hann-tapered real FFT over a fixed number of samples. The dominant bin of
/// a row should land on the frequency of the row's brightest column.
///
/// # Example
/// ```
/// use pw_synth::spectrum::FftPipeline;
/// let mut fft = FftPipeline::new(256);
/// assert_eq!(fft.fft_size(), 256);
/// assert_eq!(fft.magnitudes(&[0.0; 256]).len(), 129); // N/2 + 1
/// ```
pub struct FftPipeline {
    plan: Arc<dyn RealToComplex<f32>>,
    taper: Vec<f32>,
    frame: Vec<f32>,
    bins: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl FftPipeline {
    /// Plan a forward FFT over `size` samples.
    ///
    /// # Panics
    /// Panics if `size` is 0.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "taille FFT nulle");
        let plan = RealFftPlanner::<f32>::new().plan_fft_forward(size);
        let bins = plan.make_output_vec();
        Self {
            taper: hann(size),
            frame: plan.make_input_vec(),
            magnitudes: vec![0.0; bins.len()],
            scratch: plan.make_scratch_vec(),
            bins,
            plan,
        }
    }

    /// Normalized magnitude of each of the N/2 + 1 bins of `samples`.
    ///
    /// Short input is zero-padded and samples past the FFT size are ignored.
    pub fn magnitudes(&mut self, samples: &[f32]) -> &[f32] {
        self.frame.fill(0.0);
        for ((slot, &x), &w) in self.frame.iter_mut().zip(samples).zip(&self.taper) {
            *slot = x * w;
        }

        let scale = 1.0 / self.taper.len() as f32;
        match self
            .plan
            .process_with_scratch(&mut self.frame, &mut self.bins, &mut self.scratch)
        {
            Ok(()) => {
                for (m, c) in self.magnitudes.iter_mut().zip(&self.bins) {
                    *m = c.norm() * scale;
                }
            }
            Err(e) => {
                log::warn!("FFT impossible : {e}");
                self.magnitudes.fill(0.0);
            }
        }
        &self.magnitudes
    }

    /// Centre frequency of `bin`, in Hz.
    #[must_use]
    pub fn bin_frequency(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size() as f32
    }

    /// Frequency of the strongest non-DC bin, or `None` for silence.
    ///
    /// # Example
    /// ```
    /// use pw_synth::spectrum::FftPipeline;
    /// let mut fft = FftPipeline::new(480);
    /// // 1 kHz sine at 48 kHz: exactly 10 periods in the window.
    /// let tone: Vec<f32> = (0..480)
    ///     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48_000.0).sin())
    ///     .collect();
    /// assert_eq!(fft.dominant_frequency(&tone, 48_000), Some(1000.0));
    /// assert_eq!(fft.dominant_frequency(&[0.0; 480], 48_000), None);
    /// ```
    pub fn dominant_frequency(&mut self, samples: &[f32], sample_rate: u32) -> Option<f32> {
        let (bin, peak) = self
            .magnitudes(samples)
            .iter()
            .copied()
            .enumerate()
            .skip(1)
            .fold((0, 0.0f32), |best, (i, m)| if m > best.1 { (i, m) } else { best });
        (peak > f32::EPSILON).then(|| self.bin_frequency(bin, sample_rate))
    }

    /// FFT window size.
    #[must_use]
    pub fn fft_size(&self) -> usize {
        self.taper.len()
    }
}

/// Convert 16-bit PCM to f32 in [-1, 1).
#[must_use]
pub fn pcm_to_f32(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| f32::from(s) / 32_768.0)
        .collect()
}

/// Dominant frequency of every row of `samples`, in row order.
#[must_use]
pub fn row_frequencies(samples: &SampleSequence, sample_rate: u32) -> Vec<Option<f32>> {
    if samples.samples_per_line() == 0 {
        return Vec::new();
    }
    let mut fft = FftPipeline::new(samples.samples_per_line());
    samples
        .rows()
        .map(|row| fft.dominant_frequency(&pcm_to_f32(row), sample_rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_conversion_scale() {
        assert_eq!(pcm_to_f32(&[0, i16::MIN, 16_384]), vec![0.0, -1.0, 0.5]);
    }

    #[test]
    fn row_frequencies_per_row() {
        let spl = 480;
        let mut samples = Vec::with_capacity(spl * 3);
        for freq in [500.0f32, 0.0, 3000.0] {
            samples.extend((0..spl).map(|i| {
                let x = (2.0 * std::f32::consts::PI * freq * i as f32 / 48_000.0).sin();
                (x * 20_000.0) as i16
            }));
        }
        let seq = SampleSequence::new(samples, spl);
        let freqs = row_frequencies(&seq, 48_000);
        assert_eq!(freqs, vec![Some(500.0), None, Some(3000.0)]);
    }

    #[test]
    fn zero_padding_keeps_length() {
        let mut fft = FftPipeline::new(64);
        assert_eq!(fft.magnitudes(&[1.0; 10]).len(), 33);
        assert_eq!(fft.magnitudes(&[1.0; 100]).len(), 33);
    }

    #[test]
    fn hann_taper_shape() {
        let w = hann(5);
        assert!(w[0].abs() < 1e-7 && w[4].abs() < 1e-7);
        assert!((w[2] - 1.0).abs() < 1e-7);
        assert_eq!(hann(1), vec![1.0]);
    }
}
