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

//! Acquisition dates embedded in MODIS file names.

use std::path::Path;

use chrono::NaiveDate;

use super::PipelineError;

fn base_name(file: &str) -> &str {
    Path::new(file).file_name().and_then(|n| n.to_str()).unwrap_or(file)
}

/// Decode a `YYYYDDD` tag (year + day of year).
fn decode_year_day(tag: &str, file: &str) -> Result<NaiveDate, PipelineError> {
    let invalid = || PipelineError::InvalidDate(file.to_string());
    if tag.len() < 5 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = tag[..4].parse().ok().ok_or_else(invalid)?;
    let day_of_year: u32 = tag[4..].parse().ok().ok_or_else(invalid)?;
    NaiveDate::from_yo_opt(year, day_of_year).ok_or_else(invalid)
}

/// Date of an LST band such as `LST_Day_2024009.tif` (last `_` part).
pub fn parse_julian_date(file: &str) -> Result<NaiveDate, PipelineError> {
    let name = base_name(file);
    let tag = name
        .rsplit('_')
        .next()
        .and_then(|last| last.split('.').next())
        .unwrap_or_default();
    decode_year_day(tag, file)
}

/// Date of an NDVI composite such as `scaled_2024032_NDVI.tif` (second `_` part).
pub fn parse_ndvi_date(file: &str) -> Result<NaiveDate, PipelineError> {
    let name = base_name(file);
    let tag = name.split('_').nth(1).unwrap_or_default();
    decode_year_day(tag, file)
}
