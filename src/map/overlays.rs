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

//! Single-slot overlay host backed by walkers HTTP tiles.

use std::fmt;
use std::path::PathBuf;

use landwatch_core::{OverlayError, OverlayHost, WmsOverlay};
use log::debug;
use walkers::{HttpOptions, HttpTiles};

use super::WmsTileSource;

struct ActiveOverlay {
    id: u64,
    layer: String,
    tiles: HttpTiles,
}

/// Holds at most one WMS overlay layer for the map widget
pub struct MapOverlays {
    ctx: egui::Context,
    cache_root: PathBuf,
    active: Option<ActiveOverlay>,
    next_id: u64,
}

impl fmt::Debug for MapOverlays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOverlays")
            .field("cache_root", &self.cache_root)
            .field("active", &self.active.as_ref().map(|a| (a.id, &a.layer)))
            .finish_non_exhaustive()
    }
}

impl MapOverlays {
    pub fn new(ctx: egui::Context) -> Self {
        let cache_root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("landwatch-desktop")
            .join("wms");

        Self {
            ctx,
            cache_root,
            active: None,
            next_id: 0,
        }
    }

    /// Tiles of the attached overlay, for layering onto the map widget
    pub fn tiles_mut(&mut self) -> Option<&mut HttpTiles> {
        self.active.as_mut().map(|a| &mut a.tiles)
    }

    /// Name of the attached layer
    pub fn active_layer(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.layer.as_str())
    }

    fn cache_dir_for(&self, layer: &str) -> PathBuf {
        let sanitized: String = layer
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '.' { c } else { '_' })
            .collect();
        self.cache_root.join(sanitized)
    }
}

impl OverlayHost for MapOverlays {
    type Handle = u64;

    fn attach(&mut self, overlay: &WmsOverlay) -> Result<u64, OverlayError> {
        if self.active.is_some() {
            return Err(OverlayError::SlotOccupied);
        }

        let http_options = HttpOptions {
            cache: Some(self.cache_dir_for(&overlay.layers)),
            ..Default::default()
        };
        let source = WmsTileSource::new(overlay.clone());
        let tiles = HttpTiles::with_options(source, http_options, self.ctx.clone());

        self.next_id += 1;
        debug!("Attached overlay #{} ({})", self.next_id, overlay.layers);
        self.active = Some(ActiveOverlay {
            id: self.next_id,
            layer: overlay.layers.clone(),
            tiles,
        });
        self.ctx.request_repaint();
        Ok(self.next_id)
    }

    fn detach(&mut self, handle: &u64) -> Result<(), OverlayError> {
        match self.active.take() {
            Some(active) if active.id == *handle => {
                debug!("Detached overlay #{} ({})", active.id, active.layer);
                Ok(())
            }
            other => {
                self.active = other;
                Err(OverlayError::UnknownHandle(handle.to_string()))
            }
        }
    }
}
