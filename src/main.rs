mod app;
mod cli;
mod color;
mod config;
mod data;
mod reactive;
mod render;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use app::PenguinDashApp;
use clap::Parser;
use eframe::egui;

use crate::cli::Cli;
use crate::config::DEFAULT_DATA_PATH;
use crate::data::loader::load_file;
use crate::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = config::resolve(cli.preset, cli.config.as_deref()).context("loading configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // No view can render without data, so a load failure ends the process.
    let path = cli
        .data
        .or_else(|| config.data.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let dataset = match load_file(&path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            return Err(e.context(format!("loading dataset {}", path.display())));
        }
    };
    if dataset.is_empty() {
        log::warn!("{} contains no records; every chart will be empty", path.display());
    }
    log::info!(
        "Loaded {} penguins from {} ({:?})",
        dataset.len(),
        path.display(),
        dataset.species_counts()
    );

    let title = config.title.clone();
    let state = AppState::new(config, Arc::new(dataset)).context("building dashboard state")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PenguinDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
