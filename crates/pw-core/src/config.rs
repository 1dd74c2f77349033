use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What the synthesizer does with a row whose brightness sums to zero.
///
/// # Example
/// ```
/// use pw_core::config::ZeroRowPolicy;
/// assert_eq!(ZeroRowPolicy::default(), ZeroRowPolicy::Silence);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ZeroRowPolicy {
    /// Skip normalization and emit all-zero samples for the row.
    #[default]
    Silence,
    /// Refuse to synthesize the image.
    Error,
}

/// Paramètres de synthèse image → PCM.
///
/// The defaults reproduce the reference tuning: 256×256 images, 48 kHz mono
/// 16-bit output, two 60 fps display frames per image row, 70% of Nyquist
/// mapped across the columns.
///
/// # Example
/// ```
/// use pw_core::config::SynthConfig;
/// let config = SynthConfig::default();
/// assert_eq!(config.samples_per_line(), 1600);
/// assert_eq!(config.num_samples(), 409_600);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SynthConfig {
    // === Sortie PCM ===
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Output channels. Only mono is supported.
    pub channels: u16,
    /// Bytes per sample. Only 16-bit PCM is supported.
    pub bytes_per_sample: u16,

    // === Image ===
    /// Required width and height of the input image, in pixels.
    pub resolution: u32,

    // === Timing ===
    /// Display frame rate the line duration is expressed in.
    pub display_fps: f64,
    /// Display frames spent on one image row.
    pub frames_per_line: f64,

    // === Spectre ===
    /// Fraction of the Nyquist frequency reached by the last column.
    pub max_frequency_ratio: f64,
    /// Gaussian fade variance factor.
    pub gauss_var: f64,
    /// Behaviour on fully black rows.
    pub zero_row: ZeroRowPolicy,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 1,
            bytes_per_sample: 2,
            resolution: 256,
            display_fps: 60.0,
            frames_per_line: 2.0,
            max_frequency_ratio: 0.7,
            gauss_var: 4.0,
            zero_row: ZeroRowPolicy::Silence,
        }
    }
}

impl SynthConfig {
    /// Duration of one image row in seconds.
    #[must_use]
    pub fn seconds_per_line(&self) -> f64 {
        self.frames_per_line / self.display_fps
    }

    /// Samples emitted for one image row, rounded to nearest.
    #[must_use]
    pub fn samples_per_line(&self) -> usize {
        (self.seconds_per_line() * f64::from(self.sample_rate) + 0.5) as usize
    }

    /// Total samples produced for a whole image.
    #[must_use]
    pub fn num_samples(&self) -> usize {
        self.samples_per_line() * self.resolution as usize
    }

    /// Half the sample rate.
    #[must_use]
    pub fn nyquist(&self) -> f64 {
        f64::from(self.sample_rate) / 2.0
    }

    /// Frequency reached at column `resolution`, in Hz.
    #[must_use]
    pub fn max_frequency(&self) -> f64 {
        self.nyquist() * self.max_frequency_ratio
    }

    /// Frequency of the sinusoid driven by column `col`.
    ///
    /// # Example
    /// ```
    /// use pw_core::config::SynthConfig;
    /// let config = SynthConfig::default();
    /// assert_eq!(config.bin_frequency(0), 0.0);
    /// assert!((config.bin_frequency(64) - 4200.0).abs() < 1e-3);
    /// ```
    #[must_use]
    pub fn bin_frequency(&self, col: usize) -> f64 {
        col as f64 * (self.max_frequency() / f64::from(self.resolution))
    }

    /// Size in bytes of the PCM payload.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.num_samples() * usize::from(self.bytes_per_sample) * usize::from(self.channels)
    }

    /// Reject configurations the synthesizer cannot honour.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.sample_rate == 0 {
            return Err(CoreError::Config("sample_rate doit être > 0".into()));
        }
        if self.channels != 1 {
            return Err(CoreError::Config(format!(
                "channels = {} : seule la sortie mono est supportée",
                self.channels
            )));
        }
        if self.bytes_per_sample != 2 {
            return Err(CoreError::Config(format!(
                "bytes_per_sample = {} : seul le PCM 16 bits est supporté",
                self.bytes_per_sample
            )));
        }
        if self.resolution == 0 {
            return Err(CoreError::Config("resolution doit être > 0".into()));
        }
        if !(self.display_fps.is_finite() && self.display_fps > 0.0) {
            return Err(CoreError::Config(format!(
                "display_fps invalide : {}",
                self.display_fps
            )));
        }
        if !(self.frames_per_line.is_finite() && self.frames_per_line > 0.0) {
            return Err(CoreError::Config(format!(
                "frames_per_line invalide : {}",
                self.frames_per_line
            )));
        }
        if self.samples_per_line() < 2 {
            return Err(CoreError::Config(format!(
                "une ligne doit durer au moins 2 échantillons (actuellement {})",
                self.samples_per_line()
            )));
        }
        if !(self.max_frequency_ratio > 0.0 && self.max_frequency_ratio <= 1.0) {
            return Err(CoreError::Config(format!(
                "max_frequency_ratio hors de ]0, 1] : {}",
                self.max_frequency_ratio
            )));
        }
        if !(self.gauss_var.is_finite() && self.gauss_var >= 0.0) {
            return Err(CoreError::Config(format!(
                "gauss_var invalide : {}",
                self.gauss_var
            )));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    synth: Option<SynthSection>,
    output: Option<OutputSection>,
}

/// Synthesis section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SynthSection {
    resolution: Option<u32>,
    display_fps: Option<f64>,
    frames_per_line: Option<f64>,
    max_frequency_ratio: Option<f64>,
    gauss_var: Option<f64>,
    zero_row: Option<ZeroRowPolicy>,
}

/// Output section of the TOML config, all fields optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    sample_rate: Option<u32>,
    channels: Option<u16>,
    bytes_per_sample: Option<u16>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema, or if the
/// merged configuration fails [`SynthConfig::validate`].
///
/// # Example
/// ```
/// use pw_core::config::parse_config;
/// let config = parse_config("[synth]\ngauss_var = 2.0\n").unwrap();
/// assert_eq!(config.gauss_var, 2.0);
/// assert_eq!(config.resolution, 256);
/// ```
pub fn parse_config(content: &str) -> Result<SynthConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = SynthConfig::default();

    if let Some(s) = file.synth {
        if let Some(v) = s.resolution {
            config.resolution = v;
        }
        if let Some(v) = s.display_fps {
            config.display_fps = v;
        }
        if let Some(v) = s.frames_per_line {
            config.frames_per_line = v;
        }
        if let Some(v) = s.max_frequency_ratio {
            config.max_frequency_ratio = v;
        }
        if let Some(v) = s.gauss_var {
            config.gauss_var = v;
        }
        if let Some(v) = s.zero_row {
            config.zero_row = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.sample_rate {
            config.sample_rate = v;
        }
        if let Some(v) = o.channels {
            config.channels = v;
        }
        if let Some(v) = o.bytes_per_sample {
            config.bytes_per_sample = v;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use pw_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("pic2wav.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SynthConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let config =
        parse_config(&content).with_context(|| format!("Configuration {}", path.display()))?;
    log::debug!("Configuration chargée depuis {} : {config:?}", path.display());
    Ok(config)
}
