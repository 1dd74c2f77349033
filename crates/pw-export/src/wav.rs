use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pw_core::config::SynthConfig;
use pw_synth::synthesizer::SampleSequence;

/// Size of the canonical RIFF + `fmt ` + `data` header for 16-bit PCM.
pub const HEADER_LEN: u64 = 44;

/// WAVE format description for `config`: linear PCM, signed integers.
///
/// # Example
/// ```
/// use pw_core::config::SynthConfig;
/// use pw_export::wav::wav_spec;
/// let spec = wav_spec(&SynthConfig::default());
/// assert_eq!(spec.channels, 1);
/// assert_eq!(spec.sample_rate, 48_000);
/// assert_eq!(spec.bits_per_sample, 16);
/// ```
#[must_use]
pub fn wav_spec(config: &SynthConfig) -> hound::WavSpec {
    hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: config.bytes_per_sample * 8,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Byte length of the file written for one image with `config`.
///
/// # Example
/// ```
/// use pw_core::config::SynthConfig;
/// use pw_export::wav::expected_file_len;
/// assert_eq!(expected_file_len(&SynthConfig::default()), 44 + 409_600 * 2);
/// ```
#[must_use]
pub fn expected_file_len(config: &SynthConfig) -> u64 {
    HEADER_LEN + config.data_len() as u64
}

/// Écrit des échantillons PCM 16 bits dans un conteneur WAVE.
///
/// The header is patched with the final sizes on [`WavExporter::finish`],
/// which also refuses to finalize a container holding fewer or more samples
/// than the configuration implies.
///
/// A file opened with [`WavExporter::create`] is removed if the exporter is
/// dropped, or fails, before `finish` succeeds.
pub struct WavExporter<W: Write + Seek> {
    writer: Option<hound::WavWriter<W>>,
    /// File to remove unless finalized.
    path: Option<PathBuf>,
    written: usize,
    expected: usize,
}

impl WavExporter<BufWriter<File>> {
    /// Crée le fichier WAVE de sortie.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier ne peut être créé.
    pub fn create(path: &Path, config: &SynthConfig) -> Result<Self> {
        let writer = hound::WavWriter::create(path, wav_spec(config))
            .with_context(|| format!("Impossible de créer {}", path.display()))?;
        Ok(Self {
            writer: Some(writer),
            path: Some(path.to_path_buf()),
            written: 0,
            expected: config.num_samples(),
        })
    }
}

impl<W: Write + Seek> WavExporter<W> {
    /// Write the WAVE header to `inner` and prepare for samples.
    ///
    /// # Errors
    /// Returns an error if the header cannot be written.
    pub fn new(inner: W, config: &SynthConfig) -> Result<Self> {
        let writer = hound::WavWriter::new(inner, wav_spec(config))
            .context("Impossible d'écrire l'en-tête WAVE")?;
        Ok(Self {
            writer: Some(writer),
            path: None,
            written: 0,
            expected: config.num_samples(),
        })
    }

    /// Append samples in playback order.
    ///
    /// # Errors
    /// Retourne une erreur I/O si l'écriture échoue.
    pub fn write_samples(&mut self, samples: &[i16]) -> Result<()> {
        let writer = self.writer.as_mut().context("Exporteur déjà finalisé")?;
        for &s in samples {
            writer.write_sample(s)?;
        }
        self.written += samples.len();
        Ok(())
    }

    /// Number of samples written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Patch the header sizes and flush.
    ///
    /// # Errors
    /// Returns an error if the sample count differs from the expected one, or
    /// if flushing fails. The output file is removed in both cases.
    pub fn finish(mut self) -> Result<()> {
        if self.written != self.expected {
            anyhow::bail!(
                "Conteneur incomplet : {} échantillons écrits, {} attendus",
                self.written,
                self.expected
            );
        }
        self.writer
            .take()
            .context("Exporteur déjà finalisé")?
            .finalize()
            .context("Échec de la finalisation du WAVE")?;
        self.path = None;
        Ok(())
    }
}

impl<W: Write + Seek> Drop for WavExporter<W> {
    fn drop(&mut self) {
        // Close the handle before unlinking; hound patches the header on drop.
        drop(self.writer.take());
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => log::warn!("WAVE incomplet supprimé : {}", path.display()),
                Err(e) => log::error!("Impossible de supprimer {} : {e}", path.display()),
            }
        }
    }
}

/// Write `samples` to a WAVE file at `path`.
///
/// The sample count is checked before the file is created, so a mismatched
/// sequence leaves nothing on disk.
///
/// # Errors
/// Returns an error if the count does not match `config` or on I/O failure.
///
/// # Example
/// ```no_run
/// use pw_core::config::SynthConfig;
/// use pw_export::wav::export_wav;
/// use pw_synth::synthesizer::SampleSequence;
/// use std::path::Path;
///
/// let config = SynthConfig::default();
/// let samples = SampleSequence::new(vec![0; config.num_samples()], config.samples_per_line());
/// export_wav(Path::new("line.wav"), &samples, &config).unwrap();
/// ```
pub fn export_wav(path: &Path, samples: &SampleSequence, config: &SynthConfig) -> Result<()> {
    check_len(samples, config)?;
    let mut exporter = WavExporter::create(path, config)?;
    exporter
        .write_samples(samples.as_slice())
        .with_context(|| format!("Écriture de {}", path.display()))?;
    exporter.finish()?;
    log::info!(
        "WAVE écrit : {} ({} échantillons, {} Hz)",
        path.display(),
        samples.len(),
        config.sample_rate
    );
    Ok(())
}

/// Encode `samples` as an in-memory WAVE file.
///
/// # Errors
/// Returns an error if the count does not match `config`.
///
/// # Example
/// ```
/// use pw_core::config::SynthConfig;
/// use pw_export::wav::{encode_wav, expected_file_len};
/// use pw_synth::synthesizer::SampleSequence;
///
/// let config = SynthConfig { resolution: 2, ..SynthConfig::default() };
/// let samples = SampleSequence::new(vec![0; config.num_samples()], config.samples_per_line());
/// let bytes = encode_wav(&samples, &config).unwrap();
/// assert_eq!(bytes.len() as u64, expected_file_len(&config));
/// assert_eq!(&bytes[0..4], b"RIFF");
/// ```
pub fn encode_wav(samples: &SampleSequence, config: &SynthConfig) -> Result<Vec<u8>> {
    check_len(samples, config)?;
    let mut cursor = Cursor::new(Vec::with_capacity(
        usize::try_from(expected_file_len(config)).unwrap_or(0),
    ));
    let mut exporter = WavExporter::new(&mut cursor, config)?;
    exporter.write_samples(samples.as_slice())?;
    exporter.finish()?;
    Ok(cursor.into_inner())
}

fn check_len(samples: &SampleSequence, config: &SynthConfig) -> Result<()> {
    if samples.len() != config.num_samples() {
        anyhow::bail!(
            "{} échantillons fournis, la configuration en attend {}",
            samples.len(),
            config.num_samples()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn ramp(config: &SynthConfig) -> SampleSequence {
        let samples = (0..config.num_samples())
            .map(|i| (i % 65_536) as i16)
            .collect();
        SampleSequence::new(samples, config.samples_per_line())
    }

    #[test]
    fn header_matches_canonical_layout() {
        let config = SynthConfig::default();
        let bytes = encode_wav(&ramp(&config), &config).unwrap();
        let num_samples = 409_600u32;

        assert_eq!(bytes.len() as u64, 44 + u64::from(num_samples) * 2);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4), 36 + num_samples * 2);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16); // PCM fmt chunk size
        assert_eq!(u16_at(&bytes, 20), 1); // linear PCM
        assert_eq!(u16_at(&bytes, 22), 1); // mono
        assert_eq!(u32_at(&bytes, 24), 48_000);
        assert_eq!(u32_at(&bytes, 28), 48_000 * 2); // byte rate
        assert_eq!(u16_at(&bytes, 32), 2); // block align
        assert_eq!(u16_at(&bytes, 34), 16); // bits per sample
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), num_samples * 2);
    }

    #[test]
    fn samples_are_little_endian_in_order() {
        let config = SynthConfig {
            resolution: 1,
            ..SynthConfig::default()
        };
        let mut samples = vec![0i16; config.num_samples()];
        samples[0] = 0x0102;
        samples[1] = -2;
        samples[1599] = i16::MIN;
        let seq = SampleSequence::new(samples, config.samples_per_line());
        let bytes = encode_wav(&seq, &config).unwrap();
        assert_eq!(&bytes[44..48], &[0x02, 0x01, 0xFE, 0xFF]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0x00, 0x80]);
    }

    #[test]
    fn file_is_readable_by_hound() {
        let config = SynthConfig {
            resolution: 4,
            ..SynthConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.wav");
        let seq = ramp(&config);
        export_wav(&path, &seq, &config).unwrap();

        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            expected_file_len(&config)
        );
        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec(), wav_spec(&config));
        let read: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(read.as_slice(), seq.as_slice());
    }

    #[test]
    fn wrong_length_writes_nothing() {
        let config = SynthConfig {
            resolution: 4,
            ..SynthConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.wav");
        let seq = SampleSequence::new(vec![0; 10], 5);
        assert!(export_wav(&path, &seq, &config).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn finish_rejects_truncated_stream() {
        let config = SynthConfig {
            resolution: 2,
            ..SynthConfig::default()
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut exporter = WavExporter::new(&mut cursor, &config).unwrap();
        exporter.write_samples(&[1, 2, 3]).unwrap();
        assert_eq!(exporter.written(), 3);
        assert!(exporter.finish().is_err());
    }

    #[test]
    fn short_file_is_removed_on_finish_error() {
        let config = SynthConfig {
            resolution: 4,
            ..SynthConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.wav");
        let mut exporter = WavExporter::create(&path, &config).unwrap();
        exporter.write_samples(&[1; 100]).unwrap();
        assert!(path.exists());
        assert!(exporter.finish().is_err());
        assert!(!path.exists());
    }

    #[test]
    fn abandoned_exporter_leaves_no_file() {
        let config = SynthConfig {
            resolution: 4,
            ..SynthConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abandoned.wav");
        {
            let mut exporter = WavExporter::create(&path, &config).unwrap();
            exporter.write_samples(&[7; 1600]).unwrap();
        }
        assert!(!path.exists());
    }

    #[test]
    fn finished_file_is_kept() {
        let config = SynthConfig {
            resolution: 2,
            ..SynthConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.wav");
        let mut exporter = WavExporter::create(&path, &config).unwrap();
        exporter.write_samples(&vec![0; config.num_samples()]).unwrap();
        exporter.finish().unwrap();
        assert_eq!(
            std::fs::metadata(&path).unwrap().len(),
            expected_file_len(&config)
        );
    }
}
