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

//! WMS overlay description and GeoServer layer naming.
//!
//! Layer names follow the convention the publishing pipeline uses when it
//! registers rasters (see [`crate::geoserver::naming`]):
//!
//! - LST monthly means: `<ws>:LST_<city>_month<m>_vis`
//! - NDVI monthly composites: `<ws>:NDVI_<city>_<yyyy><mm>01.tif_raw`
//!
//! The NDVI year is a setting of its own. It is not taken from the timeline
//! year label.

use reqwest::Url;

use crate::catalog::DataType;
use crate::selection::Selection;

/// WMS protocol version requested from GeoServer.
pub const WMS_VERSION: &str = "1.1.1";

/// Server type hint handed to the map engine.
pub const SERVER_TYPE: &str = "geoserver";

/// Default workspace holding the published rasters.
pub const DEFAULT_WORKSPACE: &str = "remote_sensing";

/// Acquisition year of the NDVI composites on the server.
pub const DEFAULT_NDVI_YEAR: u16 = 2024;

/// Half the width of the EPSG:3857 world square in metres.
const WEB_MERCATOR_HALF_EXTENT: f64 = 20_037_508.342_789_244;

/// Static WMS parameters shared by every overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsSettings {
    /// GeoServer base URL, e.g. `http://localhost:8080/geoserver`.
    pub geoserver_url: String,
    pub workspace: String,
    pub ndvi_year: u16,
}

impl WmsSettings {
    /// Workspace-scoped WMS endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/{}/wms", self.geoserver_url.trim_end_matches('/'), self.workspace)
    }

    /// Qualified layer name for a selection.
    #[must_use]
    pub fn layer_name(&self, selection: &Selection) -> String {
        let city = selection.city.code();
        let month = selection.month.index();
        match selection.data_type {
            DataType::Ndvi => format!(
                "{}:NDVI_{city}_{}{month:02}01.tif_raw",
                self.workspace, self.ndvi_year
            ),
            DataType::Lst => format!("{}:LST_{city}_month{month}_vis", self.workspace),
        }
    }

    /// Overlay description for a selection.
    #[must_use]
    pub fn overlay_for(&self, selection: &Selection) -> WmsOverlay {
        WmsOverlay {
            endpoint: self.endpoint(),
            layers: self.layer_name(selection),
            styles: String::new(),
            version: WMS_VERSION,
            tiled: true,
            server_type: SERVER_TYPE,
        }
    }
}

impl Default for WmsSettings {
    fn default() -> Self {
        Self {
            geoserver_url: "http://localhost:8080/geoserver".to_string(),
            workspace: DEFAULT_WORKSPACE.to_string(),
            ndvi_year: DEFAULT_NDVI_YEAR,
        }
    }
}

/// A WMS-backed raster layer as handed to the map engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsOverlay {
    pub endpoint: String,
    pub layers: String,
    pub styles: String,
    pub version: &'static str,
    pub tiled: bool,
    pub server_type: &'static str,
}

impl WmsOverlay {
    /// GetMap URL for a bounding box in EPSG:3857.
    ///
    /// An endpoint that does not parse as an absolute URL is concatenated
    /// as-is; its tiles then fail to load in the map.
    #[must_use]
    pub fn get_map_url(&self, bbox: [f64; 4], width: u32, height: u32) -> String {
        let bbox = format!("{},{},{},{}", bbox[0], bbox[1], bbox[2], bbox[3]);
        let width = width.to_string();
        let height = height.to_string();
        let tiled = self.tiled.to_string();
        let params = [
            ("SERVICE", "WMS"),
            ("VERSION", self.version),
            ("REQUEST", "GetMap"),
            ("LAYERS", self.layers.as_str()),
            ("STYLES", self.styles.as_str()),
            ("SRS", "EPSG:3857"),
            ("BBOX", bbox.as_str()),
            ("WIDTH", width.as_str()),
            ("HEIGHT", height.as_str()),
            ("FORMAT", "image/png"),
            ("TRANSPARENT", "true"),
            ("TILED", tiled.as_str()),
        ];

        match Url::parse_with_params(&self.endpoint, &params) {
            Ok(url) => url.to_string(),
            Err(_) => {
                let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("{}?{}", self.endpoint, query.join("&"))
            }
        }
    }
}

/// EPSG:3857 bounding box `[minx, miny, maxx, maxy]` of a slippy-map tile.
#[must_use]
pub fn tile_bbox_3857(x: u32, y: u32, zoom: u8) -> [f64; 4] {
    let tiles = f64::from(1_u32 << zoom);
    let size = 2.0 * WEB_MERCATOR_HALF_EXTENT / tiles;
    let min_x = -WEB_MERCATOR_HALF_EXTENT + f64::from(x) * size;
    let max_y = WEB_MERCATOR_HALF_EXTENT - f64::from(y) * size;
    [min_x, max_y - size, min_x + size, max_y]
}

/// Static legend image for a land-use year.
#[must_use]
pub fn legend_path(year_label: &str) -> String {
    format!("/legend/{year_label}年土地利用图例.jpg")
}
