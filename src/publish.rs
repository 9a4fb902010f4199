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

//! `publish` subcommand: push processed rasters to GeoServer.

use std::path::PathBuf;

use clap::Args;
use landwatch_core::geoserver::{self, BatchPlan, GeoServerCredentials, GeoServerPublisher};
use log::{info, warn};

use crate::config::{AppConfig, PASSWORD_ENV};

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Directory scanned recursively for LST/NDVI GeoTIFFs
    #[arg(long)]
    pub root: PathBuf,

    /// Target workspace (defaults to the configured one)
    #[arg(long)]
    pub workspace: Option<String>,

    /// GeoServer base URL (defaults to the configured one)
    #[arg(long)]
    pub url: Option<String>,

    /// REST user (defaults to the configured one)
    #[arg(long)]
    pub username: Option<String>,

    /// Keep existing layers instead of emptying the workspace first
    #[arg(long)]
    pub keep_existing: bool,

    /// Only list what would be published
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: PublishArgs, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = args.workspace.unwrap_or_else(|| config.workspace.clone());
    let plan = BatchPlan::scan(&args.root);

    if plan.is_empty() {
        warn!("No LST/NDVI rasters found under {}", args.root.display());
        return Ok(());
    }

    if args.dry_run {
        for target in plan.targets() {
            println!("{workspace}:{}  <-  {}", target.layer_name(), target.path.display());
        }
        return Ok(());
    }

    let password = config
        .resolve_password()
        .ok_or_else(|| format!("no GeoServer password: set {PASSWORD_ENV} or geoserver_password in the config"))?;

    let credentials = GeoServerCredentials {
        url: args.url.unwrap_or_else(|| config.geoserver_url.clone()),
        username: args.username.unwrap_or_else(|| config.geoserver_username.clone()),
        password,
    };

    let publisher = GeoServerPublisher::connect(credentials).await?;
    let report = geoserver::batch_publish(&publisher, &plan, &workspace, !args.keep_existing).await?;

    info!("Done: {report:?}");
    if report.failed > 0 {
        return Err(format!("{} rasters failed to publish", report.failed).into());
    }
    Ok(())
}
