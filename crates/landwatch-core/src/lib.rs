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

//! Core logic of the Landwatch remote-sensing dashboard.
//!
//! The dashboard shows one GeoServer WMS raster (land surface temperature
//! or NDVI) for a selected city and month on top of a basemap, next to a
//! bar chart of land-use areas for the selected timeline year. This crate
//! holds everything that does not touch the GUI:
//!
//! - **Catalog**: the fixed city, month and data type tables
//! - **Controller**: selection state, overlay swapping and chart requests
//! - **WMS**: layer naming and GetMap URL construction
//! - **Source**: the aggregate area endpoint
//! - **Pipeline**: band arithmetic, palette and file naming of the rasters
//! - **GeoServer**: batch publishing of the processed rasters
//!
//! # Example
//!
//! ```
//! use landwatch_core::{City, DataType, Timeline, WmsSettings};
//! use landwatch_core::selection::Selection;
//!
//! let wms = WmsSettings::default();
//! let selection = Selection::new(DataType::Lst, City::Longyanshi, &Timeline::default());
//! assert_eq!(wms.layer_name(&selection), "remote_sensing:LST_longyanshi_month1_vis");
//! ```

pub mod catalog;
pub mod chart;
pub mod controller;
pub mod geoserver;
pub mod overlay;
pub mod pipeline;
pub mod selection;
pub mod source;
pub mod wms;

#[cfg(test)]
mod stub_server;

pub use catalog::{City, DataType, Month};
pub use chart::{AreaRecord, ChartError, ChartOption, ChartStatus};
pub use controller::{ChartOutcome, ChartRequest, ControllerError, TimelineActivation, ViewController, ViewEvent};
pub use overlay::{OverlayError, OverlayHost};
pub use selection::{Selection, SelectionError, Timeline};
pub use source::{fetch_unless_cancelled, AreaDataSource, FetchError, HttpAreaSource};
pub use wms::{WmsOverlay, WmsSettings};
