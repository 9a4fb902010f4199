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

//! Application configuration management.
//!
//! Settings are persisted as TOML through confy. Every field has a serde
//! default so older or partial config files keep loading.

use std::path::PathBuf;
use std::time::Duration;

use landwatch_core::wms::{DEFAULT_NDVI_YEAR, DEFAULT_WORKSPACE};
use landwatch_core::{City, DataType, Timeline, WmsSettings};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::map::BasemapStyle;

const APP_NAME: &str = "landwatch-desktop";

/// Environment variable overriding the stored GeoServer password.
pub const PASSWORD_ENV: &str = "GEOSERVER_PASSWORD";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// GeoServer base URL (without workspace)
    #[serde(default = "default_geoserver_url")]
    pub geoserver_url: String,

    /// Workspace holding the LST/NDVI layers
    #[serde(default = "default_workspace")]
    pub workspace: String,

    /// Acquisition year of the published NDVI composites
    #[serde(default = "default_ndvi_year")]
    pub ndvi_year: u16,

    /// Aggregate land-use area endpoint, queried with `?year=`
    #[serde(default = "default_area_data_url")]
    pub area_data_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Year label of each timeline entry (一月份, 二月份, 三月份)
    #[serde(default = "default_timeline_years")]
    pub timeline_years: [String; 3],

    /// City code selected on startup
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default)]
    pub default_data_type: DataType,

    /// Overlay opacity (0.0 - 1.0)
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: f32,

    #[serde(default)]
    pub basemap: BasemapStyle,

    #[serde(default = "default_center_lat")]
    pub map_center_lat: f64,

    #[serde(default = "default_center_lon")]
    pub map_center_lon: f64,

    /// Directory containing `legend/<year>年土地利用图例.jpg`
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,

    /// Side panel width in pixels
    #[serde(default = "default_panel_width")]
    pub panel_width: f32,

    /// GeoServer REST user for publishing
    #[serde(default = "default_username")]
    pub geoserver_username: String,

    /// GeoServer REST password (optional, env var takes precedence)
    #[serde(default)]
    pub geoserver_password: Option<String>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_geoserver_url() -> String {
    "http://localhost:8080/geoserver".to_string()
}

fn default_workspace() -> String {
    DEFAULT_WORKSPACE.to_string()
}

fn default_ndvi_year() -> u16 {
    DEFAULT_NDVI_YEAR
}

fn default_area_data_url() -> String {
    "http://localhost:5000/api/land_area".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_timeline_years() -> [String; 3] {
    ["2000".to_string(), "2010".to_string(), "2020".to_string()]
}

fn default_city() -> String {
    City::Fuzhoushi.code().to_string()
}

fn default_overlay_opacity() -> f32 {
    0.8
}

// Centre of Fujian province
fn default_center_lat() -> f64 {
    26.08
}

fn default_center_lon() -> f64 {
    117.98
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_panel_width() -> f32 {
    320.0
}

fn default_username() -> String {
    "admin".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            geoserver_url: default_geoserver_url(),
            workspace: default_workspace(),
            ndvi_year: default_ndvi_year(),
            area_data_url: default_area_data_url(),
            request_timeout_secs: default_request_timeout_secs(),
            timeline_years: default_timeline_years(),
            default_city: default_city(),
            default_data_type: DataType::default(),
            overlay_opacity: default_overlay_opacity(),
            basemap: BasemapStyle::default(),
            map_center_lat: default_center_lat(),
            map_center_lon: default_center_lon(),
            asset_dir: default_asset_dir(),
            panel_width: default_panel_width(),
            geoserver_username: default_username(),
            geoserver_password: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }

    #[must_use]
    pub fn wms_settings(&self) -> WmsSettings {
        WmsSettings {
            geoserver_url: self.geoserver_url.clone(),
            workspace: self.workspace.clone(),
            ndvi_year: self.ndvi_year,
        }
    }

    #[must_use]
    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.timeline_years.clone())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Startup city, falling back to the first table entry for unknown codes
    #[must_use]
    pub fn startup_city(&self) -> City {
        City::from_code(&self.default_city).unwrap_or_else(|e| {
            warn!("{e} in config, using {}", City::ALL[0].code());
            City::ALL[0]
        })
    }

    /// Resolve the GeoServer password from environment variable or config
    #[must_use]
    pub fn resolve_password(&self) -> Option<String> {
        resolve_password(std::env::var(PASSWORD_ENV).ok(), self.geoserver_password.as_deref())
    }
}

fn resolve_password(env_value: Option<String>, config_value: Option<&str>) -> Option<String> {
    env_value
        .filter(|p| !p.is_empty())
        .or_else(|| config_value.map(str::to_string).filter(|p| !p.is_empty()))
}
