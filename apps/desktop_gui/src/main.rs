use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{BlitzWatchApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "blitzwatch-gui", about = "BlitzWatch Predictor desktop form")]
struct Args {
    /// Base URL of the prediction service; overrides config and environment.
    #[arg(long)]
    backend_url: Option<String>,
    /// Settings file (default: ./blitzwatch.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let startup = StartupConfig::resolve(args.config.as_deref(), args.backend_url.as_deref());

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(startup.settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("BlitzWatch Predictor")
            .with_inner_size([960.0, 900.0])
            .with_min_inner_size([640.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "BlitzWatch Predictor",
        options,
        Box::new(move |_cc| Ok(Box::new(BlitzWatchApp::new(cmd_tx, ui_rx, startup)))),
    )
}
