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

//! Naming of published rasters.
//!
//! The processing pipeline writes files such as
//! `city/longyanshi/longyanshi_Tep_month2_vis.tif` (LST monthly mean) and
//! `city/longyanshi/longyanshi_NDVI_20240201.tif` (NDVI composite). Store,
//! layer and title names are derived from the file name alone, so the
//! layer names the dashboard requests can be computed without asking the
//! server.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::DataType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("cannot parse raster file name: {0}")]
    UnparsableName(String),

    #[error("no LST/NDVI marker in file name: {0}")]
    UnknownDataType(String),
}

/// Visualised (colour-mapped) or raw raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rendition {
    Vis,
    Raw,
}

impl Rendition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vis => "vis",
            Self::Raw => "raw",
        }
    }

    const fn title_suffix(self) -> &'static str {
        match self {
            Self::Vis => "可视化",
            Self::Raw => "原始数据",
        }
    }
}

/// Administrative level, taken from the directory the raster lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLevel {
    Province,
    City,
    Unknown,
}

impl RegionLevel {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let path = path.to_string_lossy();
        if path.contains("province") {
            Self::Province
        } else if path.contains("city") {
            Self::City
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Province => "province",
            Self::City => "city",
            Self::Unknown => "unknown",
        }
    }
}

/// Data type encoded in a raster file name.
#[must_use]
pub fn detect_data_type(file_name: &str) -> Option<DataType> {
    if file_name.contains("_Tep_") {
        Some(DataType::Lst)
    } else if file_name.contains("_NDVI_") {
        Some(DataType::Ndvi)
    } else {
        None
    }
}

#[must_use]
pub fn detect_rendition(file_name: &str) -> Rendition {
    if file_name.contains("_vis") {
        Rendition::Vis
    } else {
        Rendition::Raw
    }
}

/// Acquisition dates in pipeline output all fall in the 2020s.
fn is_date_part(part: &str) -> bool {
    part.starts_with("202")
}

/// Everything needed to publish one raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub path: PathBuf,
    pub data_type: DataType,
    pub rendition: Rendition,
    pub region: String,
    pub level: RegionLevel,
    /// `yyyymmdd[.tif]` for NDVI, `month<m>` for LST, `unknown_date` otherwise.
    pub date_info: String,
}

impl PublishTarget {
    pub fn from_path(path: &Path) -> Result<Self, NamingError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| NamingError::UnparsableName(path.display().to_string()))?;

        let data_type =
            detect_data_type(&file_name).ok_or_else(|| NamingError::UnknownDataType(file_name.clone()))?;

        let parts: Vec<&str> = file_name.split('_').collect();
        if parts.len() < 3 {
            return Err(NamingError::UnparsableName(file_name));
        }

        let date_info = parts
            .iter()
            .find(|p| is_date_part(p) || p.starts_with("month"))
            .map_or_else(|| "unknown_date".to_string(), |p| (*p).to_string());

        Ok(Self {
            path: path.to_path_buf(),
            data_type,
            rendition: detect_rendition(&file_name),
            region: parts[0].to_string(),
            level: RegionLevel::from_path(path),
            date_info,
        })
    }

    #[must_use]
    pub fn store_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_store",
            self.region,
            self.level.as_str(),
            self.data_type.as_str(),
            self.date_info,
            self.rendition.as_str()
        )
    }

    /// Layer name without the workspace prefix.
    #[must_use]
    pub fn layer_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.data_type.as_str(),
            self.region,
            self.date_info,
            self.rendition.as_str()
        )
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "{} {} {} {}",
            self.data_type.display_name(),
            self.region,
            self.date_info,
            self.rendition.title_suffix()
        )
    }

    /// Coverage name GeoServer assigns from the file (stem without extension).
    #[must_use]
    pub fn native_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
