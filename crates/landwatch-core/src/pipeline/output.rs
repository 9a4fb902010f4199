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

//! File names of prepared rasters.
//!
//! The publisher reads data type, date and rendition back out of these
//! names, so they must stay in step with [`crate::geoserver::naming`].

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::geoserver::{RegionLevel, Rendition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    /// Monthly mean land surface temperature, month 1..=12.
    LstMonthly { month: u8 },
    /// NDVI composite for one acquisition date.
    Ndvi { date: NaiveDate },
}

/// One clipped raster for a region, before the rendition is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOutput {
    pub level: RegionLevel,
    /// Romanised region name, e.g. `longyanshi`.
    pub region: String,
    pub product: Product,
}

impl RasterOutput {
    #[must_use]
    pub fn file_name(&self, rendition: Rendition) -> String {
        let suffix = match rendition {
            Rendition::Vis => "_vis",
            Rendition::Raw => "",
        };
        match self.product {
            Product::LstMonthly { month } => format!("{}_Tep_month{month}{suffix}.tif", self.region),
            Product::Ndvi { date } => format!("{}_NDVI_{}{suffix}.tif", self.region, date.format("%Y%m%d")),
        }
    }

    /// Path under the output root: `<level>/<region>/<file>`, or just the
    /// file for national rasters.
    #[must_use]
    pub fn relative_path(&self, rendition: Rendition) -> PathBuf {
        match self.level {
            RegionLevel::Unknown => PathBuf::from(self.file_name(rendition)),
            level => Path::new(level.as_str())
                .join(&self.region)
                .join(self.file_name(rendition)),
        }
    }
}

/// QC band paired with an LST band: `LST_Day_2024009.tif` → `QC_Day_2024009.tif`.
#[must_use]
pub fn qc_file_for(lst_file: &str) -> Option<String> {
    let stem = lst_file.strip_prefix("LST_")?.strip_suffix(".tif")?;
    let (band, date_tag) = stem.rsplit_once('_')?;
    Some(format!("QC_{band}_{date_tag}.tif"))
}
