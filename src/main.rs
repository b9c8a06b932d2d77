//! Command-line entry point: `morphfield [OPTIONS] <SLIDES>...`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use morphfield::{Reveal, RevealConfig, RevealError};

/// Reveal images as a swarm of 3D particles.
#[derive(Parser, Debug)]
#[command(name = "morphfield", version, about)]
struct Cli {
    /// Slide images, shown in order. Dark (red channel 0) pixels become particles.
    #[arg(required_unless_present = "write_config")]
    slides: Vec<PathBuf>,

    /// Load settings from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from the small-canvas preset instead of the defaults
    #[arg(long, conflicts_with = "config")]
    compact: bool,

    /// Seed for reproducible placement
    #[arg(long)]
    seed: Option<u64>,

    /// Advance to the next slide every N seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    auto_advance: Option<u64>,

    /// Write the effective settings to a JSON file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RevealError> {
    let mut config = match &cli.config {
        Some(path) => RevealConfig::load(path)?,
        None if cli.compact => RevealConfig::compact(),
        None => RevealConfig::default(),
    };
    if let Some(secs) = cli.auto_advance {
        config = config.with_auto_advance((secs > 0).then(|| Duration::from_secs(secs)));
    }

    if let Some(path) = &cli.write_config {
        config.validate()?;
        config.save(path)?;
        log::info!("settings written to {}", path.display());
        return Ok(());
    }

    let mut reveal = Reveal::new().with_config(config);
    if let Some(seed) = cli.seed {
        reveal = reveal.with_seed(seed);
    }
    for path in &cli.slides {
        reveal = reveal.with_slide_file(path)?;
    }
    log::info!("starting with {} slide(s)", reveal.slide_count());

    reveal.run()
}
