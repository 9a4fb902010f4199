// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod app;
mod config;
mod map;
mod publish;
mod ui;

use clap::{Parser, Subcommand};
use eframe::egui;
use log::{error, info};

use app::DashboardApp;
use config::AppConfig;

/// Remote-sensing dashboard for city-level LST and NDVI rasters
#[derive(Debug, Parser)]
#[command(name = "landwatch-desktop", version, about)]
struct Cli {
    /// Print the configuration file path and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Publish processed GeoTIFFs to GeoServer
    Publish(publish::PublishArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    let config = AppConfig::load().unwrap_or_else(|e| {
        error!("Failed to load configuration, using defaults: {e}");
        AppConfig::default()
    });

    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Some(Command::Publish(args)) => runtime.block_on(publish::run(args, &config)),
        None => run_dashboard(config, &runtime),
    }
}

fn run_dashboard(config: AppConfig, runtime: &tokio::runtime::Runtime) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Landwatch Desktop...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("Landwatch 遥感监测"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "Landwatch Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, handle)))),
    )?;
    Ok(())
}
