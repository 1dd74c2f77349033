use anyhow::Result;
use clap::Parser;
use pw_core::config::SynthConfig;

pub mod cli;
pub mod convert;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    // 3. Associer entrées et sorties
    let jobs = cli.jobs()?;

    // 4. Charger la config
    let config = resolve_config(&cli)?;
    let converter = convert::Converter::new(config, cli.report)?;

    // 5. Convertir chaque image indépendamment
    let mut failed = 0usize;
    for job in &jobs {
        match converter.convert(&job.input, &job.output) {
            Ok(summary) => log::info!(
                "{} : {} échantillons, crête {}, {} ligne(s) noire(s)",
                job.output.display(),
                summary.samples,
                summary.peak,
                summary.silent_rows
            ),
            Err(e) => {
                log::error!("{} : {e:#}", job.input.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed}/{} conversion(s) en échec.", jobs.len());
    }
    Ok(())
}

fn resolve_config(cli: &cli::Cli) -> Result<SynthConfig> {
    if cli.config.exists() {
        pw_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SynthConfig::default())
    }
}
