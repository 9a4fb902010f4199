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

//! Selection state owned by the view controller.

use thiserror::Error;

use crate::catalog::{City, DataType, Month};

/// Rejections for selection input coming from the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown city code: {0}")]
    UnknownCity(String),

    #[error("unknown timeline label: {0}")]
    UnknownTimelineLabel(String),
}

/// Year labels attached to each timeline entry.
///
/// The chart query and the legend image are keyed by these labels, the
/// overlay layer by the month index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    years: [String; 3],
}

impl Timeline {
    #[must_use]
    pub fn new(years: [String; 3]) -> Self {
        Self { years }
    }

    #[must_use]
    pub fn year_for(&self, month: Month) -> &str {
        &self.years[month.offset()]
    }

    /// Timeline entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = (Month, &str)> + '_ {
        Month::ALL.into_iter().map(move |m| (m, self.year_for(m)))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(["2000".to_string(), "2010".to_string(), "2020".to_string()])
    }
}

/// Current data type, city and period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub data_type: DataType,
    pub city: City,
    pub month: Month,
    pub year_label: String,
}

impl Selection {
    /// Selection at the first timeline entry.
    #[must_use]
    pub fn new(data_type: DataType, city: City, timeline: &Timeline) -> Self {
        Self {
            data_type,
            city,
            month: Month::January,
            year_label: timeline.year_for(Month::January).to_string(),
        }
    }

    #[must_use]
    pub fn city_display_name(&self) -> &'static str {
        self.city.display_name()
    }
}
