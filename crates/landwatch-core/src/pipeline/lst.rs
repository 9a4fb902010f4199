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

//! Band arithmetic on flattened rasters. `NaN` marks nodata throughout.

use super::PipelineError;

/// MOD11A2 LST digital number to kelvin.
pub const SCALE_FACTOR: f32 = 0.02;
pub const KELVIN_OFFSET: f32 = 273.15;
/// Mandatory QA bits; any non-zero value means the pixel is not good quality.
pub const QC_QUALITY_MASK: u8 = 0b0000_0011;

fn same_len(left: usize, right: usize) -> Result<(), PipelineError> {
    if left == right {
        Ok(())
    } else {
        Err(PipelineError::ShapeMismatch { left, right })
    }
}

/// Convert LST digital numbers to °C, dropping pixels whose QC flags them.
pub fn mask_lst_with_qc(lst: &[u16], qc: &[u8]) -> Result<Vec<f32>, PipelineError> {
    same_len(lst.len(), qc.len())?;
    Ok(lst
        .iter()
        .zip(qc)
        .map(|(&dn, &flags)| {
            if flags & QC_QUALITY_MASK == 0 {
                f32::from(dn) * SCALE_FACTOR - KELVIN_OFFSET
            } else {
                f32::NAN
            }
        })
        .collect())
}

/// Per-pixel mean of the day and night bands, ignoring nodata.
///
/// Returns `None` when either band is entirely nodata; such dates are
/// left out of the monthly average.
pub fn day_night_mean(day: &[f32], night: &[f32]) -> Result<Option<Vec<f32>>, PipelineError> {
    same_len(day.len(), night.len())?;
    if day.iter().all(|v| v.is_nan()) || night.iter().all(|v| v.is_nan()) {
        return Ok(None);
    }

    Ok(Some(
        day.iter()
            .zip(night)
            .map(|(&d, &n)| match (d.is_nan(), n.is_nan()) {
                (false, false) => (d + n) / 2.0,
                (false, true) => d,
                (true, false) => n,
                (true, true) => f32::NAN,
            })
            .collect(),
    ))
}

/// Minimum and maximum over valid pixels.
#[must_use]
pub fn value_range(data: &[f32]) -> Option<(f32, f32)> {
    data.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Tags written next to a `_vis` raster so values can be recovered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    pub scale_factor: f32,
    pub add_offset: f32,
    pub actual_range: (f32, f32),
}

/// Scale values into palette indices `1..=255`, leaving 0 for nodata.
///
/// All regions of one product share `vmin..vmax` so colours compare
/// across the map.
pub fn scale_for_display(data: &[f32], vmin: f32, vmax: f32) -> Result<(Vec<u8>, DisplayScale), PipelineError> {
    let range = vmax - vmin;
    if range.is_nan() || range <= 0.0 {
        return Err(PipelineError::InvalidRange { min: vmin, max: vmax });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "clamped to 1..=255")]
    let indices = data
        .iter()
        .map(|&v| {
            if v.is_nan() {
                0
            } else {
                (1.0 + (v - vmin) / range * 254.0).clamp(1.0, 255.0) as u8
            }
        })
        .collect();

    Ok((
        indices,
        DisplayScale {
            scale_factor: range / 255.0,
            add_offset: vmin,
            actual_range: (vmin, vmax),
        },
    ))
}
