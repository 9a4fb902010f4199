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

//! Fixed lookup tables: data types, cities and timeline months.
//!
//! Every table is a closed enum so that selections coming from the UI can
//! only name entries that exist. String codes and labels are resolved at the
//! boundary through [`City::from_code`] and [`Month::from_label`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionError;

/// Raster product shown in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    /// Land surface temperature (MOD11A2 monthly means).
    #[default]
    #[serde(rename = "LST")]
    Lst,
    /// Normalized difference vegetation index (MOD13A3).
    #[serde(rename = "NDVI")]
    Ndvi,
}

impl DataType {
    pub const ALL: [Self; 2] = [Self::Lst, Self::Ndvi];

    /// Prefix used in published layer names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lst => "LST",
            Self::Ndvi => "NDVI",
        }
    }

    /// Human-readable name for the selector.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Lst => "地表温度",
            Self::Ndvi => "植被指数",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefecture-level cities with published rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Fuzhoushi,
    Xiamenshi,
    Putianshi,
    Sanmingshi,
    Quanzhoushi,
    Zhangzhoushi,
    Nanpingshi,
    Longyanshi,
    Ningdeshi,
}

impl City {
    pub const ALL: [Self; 9] = [
        Self::Fuzhoushi,
        Self::Xiamenshi,
        Self::Putianshi,
        Self::Sanmingshi,
        Self::Quanzhoushi,
        Self::Zhangzhoushi,
        Self::Nanpingshi,
        Self::Longyanshi,
        Self::Ningdeshi,
    ];

    /// Code used in raster file names and layer names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fuzhoushi => "fuzhoushi",
            Self::Xiamenshi => "xiamenshi",
            Self::Putianshi => "putianshi",
            Self::Sanmingshi => "sanmingshi",
            Self::Quanzhoushi => "quanzhoushi",
            Self::Zhangzhoushi => "zhangzhoushi",
            Self::Nanpingshi => "nanpingshi",
            Self::Longyanshi => "longyanshi",
            Self::Ningdeshi => "ningdeshi",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Fuzhoushi => "福州市",
            Self::Xiamenshi => "厦门市",
            Self::Putianshi => "莆田市",
            Self::Sanmingshi => "三明市",
            Self::Quanzhoushi => "泉州市",
            Self::Zhangzhoushi => "漳州市",
            Self::Nanpingshi => "南平市",
            Self::Longyanshi => "龙岩市",
            Self::Ningdeshi => "宁德市",
        }
    }

    /// Resolve a city code coming from the UI or config.
    pub fn from_code(code: &str) -> Result<Self, SelectionError> {
        Self::ALL
            .into_iter()
            .find(|city| city.code() == code)
            .ok_or_else(|| SelectionError::UnknownCity(code.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Entries of the timeline control, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
}

impl Month {
    pub const ALL: [Self; 3] = [Self::January, Self::February, Self::March];

    /// 1-based position in the timeline.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Label shown on (and emitted by) the timeline control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::January => "一月份",
            Self::February => "二月份",
            Self::March => "三月份",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, SelectionError> {
        Self::ALL
            .into_iter()
            .find(|month| month.label() == label)
            .ok_or_else(|| SelectionError::UnknownTimelineLabel(label.to_string()))
    }

    /// Position in zero-based arrays such as the timeline year table.
    #[must_use]
    pub const fn offset(self) -> usize {
        self as usize - 1
    }
}
