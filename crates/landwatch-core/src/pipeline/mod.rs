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

//! Raster preparation for the published overlays.
//!
//! MODIS products arrive as per-tile GeoTIFFs: MOD11A2 8-day land surface
//! temperature (day and night bands plus QC) and MOD13A3 monthly NDVI.
//! Before publishing, each band is converted to physical units, masked by
//! quality, averaged, clipped per region and written twice: once raw and
//! once as a palette-indexed `_vis` raster.
//!
//! This module holds the band arithmetic, the palette and the output
//! naming. Raster I/O and clipping against region boundaries are done by
//! GDAL tooling outside this crate.

pub mod colormap;
pub mod dates;
pub mod lst;
pub mod output;

use thiserror::Error;

pub use colormap::{jet_colormap, Rgba};
pub use dates::{parse_julian_date, parse_ndvi_date};
pub use lst::{day_night_mean, mask_lst_with_qc, scale_for_display, value_range, DisplayScale};
pub use output::{qc_file_for, Product, RasterOutput};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("no YYYYDDD date in file name: {0}")]
    InvalidDate(String),

    #[error("band sizes differ: {left} vs {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("invalid display range {min}..{max}")]
    InvalidRange { min: f32, max: f32 },
}
