// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use eframe::egui;
use egui_phosphor::Variant;

use attachstage::config::HostConfig;
use attachstage::{logging, ui};

fn main() -> Result<()> {
    logging::init_tracing()?;

    let config = HostConfig::load(std::env::args_os().nth(1).map(PathBuf::from))?;
    tracing::info!(
        allowed_types = %config.policy.allowed_types,
        max_files = config.policy.max_files,
        max_file_size_bytes = config.policy.max_file_size_bytes,
        "starting attachment stager"
    );

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 560.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "attachstage",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(ui::StagerApp::new(&config)))
        }),
    )
    .map_err(|err| anyhow!("Failed to run the UI: {err}"))
}
