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

//! 256-entry "jet" palette embedded in `_vis` rasters.

pub type Rgba = [u8; 4];

/// Jet control points `(position, intensity)` per channel.
const RED: &[(f64, f64)] = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const GREEN: &[(f64, f64)] = &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)];
const BLUE: &[(f64, f64)] = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is within 0..=1")]
fn channel(points: &[(f64, f64)], x: f64) -> u8 {
    let value = points
        .windows(2)
        .find(|w| x <= w[1].0)
        .map_or(points[points.len() - 1].1, |w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            y0 + (x - x0) / (x1 - x0) * (y1 - y0)
        });

    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Palette with index 0 fully transparent (nodata) and 1..=255 opaque.
#[must_use]
pub fn jet_colormap() -> [Rgba; 256] {
    let mut palette = [[0; 4]; 256];
    for (entry, i) in palette.iter_mut().zip(0..=u8::MAX).skip(1) {
        let x = f64::from(i) / 255.0;
        *entry = [channel(RED, x), channel(GREEN, x), channel(BLUE, x), 255];
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodata_is_transparent() {
        assert_eq!(jet_colormap()[0], [0, 0, 0, 0]);
    }

    #[test]
    fn test_jet_endpoints_and_middle() {
        let palette = jet_colormap();

        assert_eq!(palette[1], [0, 0, 132, 255]);
        assert_eq!(palette[255], [127, 0, 0, 255]);
        assert_eq!(palette[128][1..], [255, 121, 255]);
        assert!(palette[1..].iter().all(|c| c[3] == 255));
    }
}
