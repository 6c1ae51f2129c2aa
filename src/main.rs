// src/main.rs - Replays recorded landmark frames through a jump session
use anyhow::{Context, Result};
use clap::Parser;
use jump_tracker::data::{JumpLog, SessionExporter};
use jump_tracker::source::LandmarkReader;
use jump_tracker::{Config, Session};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Measure jump heights from a landmark stream (one JSON frame per line)
#[derive(Parser, Debug)]
#[command(name = "jump_tracker", version, about)]
struct Args {
    /// Landmark file, or `-` for stdin
    input: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "jump_tracker.toml")]
    config: PathBuf,

    /// User height in cm (overrides the config)
    #[arg(long)]
    height_cm: Option<f64>,

    /// Do not append jump heights to the log file
    #[arg(long)]
    no_save: bool,

    /// Jump height log file (overrides the config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export frames.csv and jumps.csv into the configured output directory
    #[arg(long)]
    export: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config);
    if let Some(height) = args.height_cm {
        config.session.known_height_cm = height;
    }
    if args.no_save {
        config.session.save_heights = false;
    }
    if let Some(path) = args.log_file {
        config.session.jump_log_path = path;
    }
    config.validate().context("invalid settings")?;

    let input: Box<dyn BufRead> = if args.input.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input.display()))?;
        Box::new(BufReader::new(file))
    };

    info!(
        known_height_cm = config.session.known_height_cm,
        save_heights = config.session.save_heights,
        "session started"
    );

    let jump_log = config.session.save_heights.then(|| JumpLog::new(&config.session.jump_log_path));
    let mut exporter = args
        .export
        .then(|| SessionExporter::new(&config.export.output_dir, None));
    let mut session = Session::new(&config);

    for frame in LandmarkReader::new(input) {
        let observation = frame.context("Failed to read landmark frame")?;
        let outcome = session.process_frame(observation.as_ref(), Instant::now());

        if let (Some(record), Some(log)) = (outcome.jump, jump_log.as_ref()) {
            if let Err(e) = log.append(&record) {
                warn!(path = %log.path().display(), error = %e, "failed to save jump height");
            }
        }
        if let Some(exporter) = exporter.as_mut() {
            exporter.add_frame(&outcome);
        }
    }

    if !session.calibration().is_calibrated() {
        warn!(frames = session.frame_count(), "never calibrated, no T-pose found");
    }

    let display = session.display(Instant::now());
    info!(
        frames = session.frame_count(),
        jumps = session.history().len(),
        "session finished"
    );
    for line in display.top_lines() {
        println!("{}", line);
    }

    if let Some(exporter) = exporter {
        let dir = exporter.export_csv().context("Failed to export session")?;
        info!(dir = %dir.display(), "session exported");
    }

    Ok(())
}
