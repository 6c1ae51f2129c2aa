// src/bin/live.rs - Live camera window
use anyhow::Result;
use clap::Parser;
use eframe::egui;
use jump_tracker::app::JumpTrackerApp;
use jump_tracker::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Measure jump heights live from the webcam
#[derive(Parser, Debug)]
#[command(name = "jump_tracker_live", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "jump_tracker.toml")]
    config: PathBuf,

    /// User height in cm (overrides the config)
    #[arg(long)]
    height_cm: Option<f64>,

    /// Do not append jump heights to the log file
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config);
    if let Some(height) = args.height_cm {
        config.session.known_height_cm = height;
    }
    if args.no_save {
        config.session.save_heights = false;
    }
    config.validate()?;

    match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
        Ok(cameras) => {
            for (i, camera) in cameras.iter().enumerate() {
                tracing::debug!(index = i, name = %camera.human_name(), "camera found");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to query cameras"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.camera.width as f32, config.camera.height as f32 + 48.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Jump Tracker",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(create_visuals());
            Box::new(JumpTrackerApp::new(cc, config))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Error running application: {}", e))
}

fn create_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();

    visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(30, 30, 35);
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(45, 45, 52);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(70, 130, 240);
    visuals.window_rounding = egui::Rounding::same(12.0);

    visuals
}
