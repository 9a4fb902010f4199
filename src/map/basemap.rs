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

//! Basemap tile sources.

use serde::{Deserialize, Serialize};
use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

/// Basemap flavours selectable in the config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BasemapStyle {
    /// Carto Positron, keeps colour-mapped rasters readable
    #[default]
    CartoLight,
    CartoDark,
    OpenStreetMap,
}

/// Tile source for the configured basemap
/// Carto styles use subdomain load balancing across a-d.basemaps.cartocdn.com
#[derive(Debug, Clone, Copy)]
pub struct BasemapSource {
    style: BasemapStyle,
}

impl BasemapSource {
    pub fn new(style: BasemapStyle) -> Self {
        Self { style }
    }
}

impl TileSource for BasemapSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        let carto = |variant: &str| {
            let subdomain = ['a', 'b', 'c', 'd'][((tile_id.x + tile_id.y) % 4) as usize];
            format!(
                "https://{}.basemaps.cartocdn.com/{}/{}/{}/{}.png",
                subdomain, variant, tile_id.zoom, tile_id.x, tile_id.y
            )
        };

        match self.style {
            BasemapStyle::CartoLight => carto("light_all"),
            BasemapStyle::CartoDark => carto("dark_all"),
            BasemapStyle::OpenStreetMap => format!(
                "https://tile.openstreetmap.org/{}/{}/{}.png",
                tile_id.zoom, tile_id.x, tile_id.y
            ),
        }
    }

    fn attribution(&self) -> Attribution {
        match self.style {
            BasemapStyle::CartoLight | BasemapStyle::CartoDark => Attribution {
                text: "© OpenStreetMap contributors, © CARTO",
                url: "https://carto.com/attributions",
                logo_light: None,
                logo_dark: None,
            },
            BasemapStyle::OpenStreetMap => Attribution {
                text: "© OpenStreetMap contributors",
                url: "https://www.openstreetmap.org/copyright",
                logo_light: None,
                logo_dark: None,
            },
        }
    }
}
