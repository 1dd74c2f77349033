use std::path::{Path, PathBuf};

use clap::Parser;

/// pic2wav: renders images as oscilloscope-friendly PCM audio.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Images d'entrée (PNG, JPEG, BMP, GIF), carrées à la résolution configurée.
    #[arg(default_value = "line.png")]
    pub inputs: Vec<PathBuf>,

    /// Fichier WAVE de sortie. Uniquement avec une seule entrée.
    /// Défaut : l'entrée avec l'extension .wav.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : pic2wav.toml.
    #[arg(short, long, default_value = "pic2wav.toml")]
    pub config: PathBuf,

    /// Journaliser la fréquence dominante de chaque ligne synthétisée.
    #[arg(long, default_value_t = false)]
    pub report: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// One image to convert and where its audio goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Cli {
    /// Pair every input with its output path.
    ///
    /// # Errors
    /// Returns an error if `--output` is combined with several inputs.
    pub fn jobs(&self) -> anyhow::Result<Vec<Job>> {
        match (&self.output, self.inputs.as_slice()) {
            (Some(output), [input]) => Ok(vec![Job {
                input: input.clone(),
                output: output.clone(),
            }]),
            (Some(_), inputs) => anyhow::bail!(
                "--output n'accepte qu'une seule entrée ({} fournies).",
                inputs.len()
            ),
            (None, inputs) => Ok(inputs
                .iter()
                .map(|input| Job {
                    input: input.clone(),
                    output: default_output(input),
                })
                .collect()),
        }
    }
}

/// `line.png` → `line.wav`, next to the input.
#[must_use]
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("wav")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pic2wav").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.inputs, vec![PathBuf::from("line.png")]);
        assert_eq!(cli.config, PathBuf::from("pic2wav.toml"));
        assert_eq!(cli.log_level, "info");
        assert!(!cli.report);
        assert_eq!(
            cli.jobs().unwrap(),
            vec![Job {
                input: PathBuf::from("line.png"),
                output: PathBuf::from("line.wav"),
            }]
        );
    }

    #[test]
    fn each_input_gets_its_own_wav() {
        let cli = parse(&["a.png", "img/b.bmp"]);
        let outputs: Vec<_> = cli.jobs().unwrap().into_iter().map(|j| j.output).collect();
        assert_eq!(
            outputs,
            vec![PathBuf::from("a.wav"), PathBuf::from("img/b.wav")]
        );
    }

    #[test]
    fn explicit_output_for_single_input() {
        let cli = parse(&["scope.png", "-o", "out/scope.wav", "--report"]);
        assert!(cli.report);
        assert_eq!(cli.jobs().unwrap()[0].output, PathBuf::from("out/scope.wav"));
    }

    #[test]
    fn output_with_several_inputs_is_refused() {
        let cli = parse(&["a.png", "b.png", "--output", "x.wav"]);
        assert!(cli.jobs().is_err());
    }
}
