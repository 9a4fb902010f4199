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

//! WMS GetMap tile source implementation.

use landwatch_core::wms::tile_bbox_3857;
use landwatch_core::WmsOverlay;
use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

const TILE_SIZE: u32 = 256;

/// Tile source requesting one tiled GetMap per slippy-map tile
#[derive(Debug, Clone)]
pub struct WmsTileSource {
    overlay: WmsOverlay,
}

impl WmsTileSource {
    pub fn new(overlay: WmsOverlay) -> Self {
        Self { overlay }
    }
}

impl TileSource for WmsTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        let bbox = tile_bbox_3857(tile_id.x, tile_id.y, tile_id.zoom);
        self.overlay.get_map_url(bbox, TILE_SIZE, TILE_SIZE)
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "MODIS MOD11A2 / MOD13A3, NASA LP DAAC",
            url: "https://lpdaac.usgs.gov/",
            logo_light: None,
            logo_dark: None,
        }
    }
}
