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

//! Land-use area chart model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("area for '{land_type}' is not a number: {value:?}")]
    InvalidArea { land_type: String, value: String },
}

/// One row of the aggregate area response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRecord {
    /// Area as sent by the backend, a decimal number in a string.
    #[serde(rename = "面积")]
    pub area: String,

    #[serde(rename = "土地类型")]
    pub land_type: String,
}

/// Title, y-axis categories and series values of the bar chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOption {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<f64>,
}

impl ChartOption {
    /// Replace title, categories and series from a response.
    ///
    /// Nothing is changed if any area fails to parse.
    pub fn apply_records(&mut self, year_label: &str, records: &[AreaRecord]) -> Result<(), ChartError> {
        let series = records
            .iter()
            .map(|r| {
                r.area.trim().parse::<f64>().ok().ok_or_else(|| ChartError::InvalidArea {
                    land_type: r.land_type.clone(),
                    value: r.area.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.title = chart_title(year_label);
        self.categories = records.iter().map(|r| r.land_type.clone()).collect();
        self.series = series;
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[must_use]
pub fn chart_title(year_label: &str) -> String {
    format!("{year_label}年土地利用类型面积")
}

/// Whether the chart currently has data to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChartStatus {
    #[default]
    Idle,
    Loading { token: u64 },
    Ready,
    Unavailable { reason: String },
}
