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

//! Land-use legend image.

use std::path::{Path, PathBuf};

use eframe::egui;

/// Map the legend's site path onto the local asset directory
pub fn resolve(asset_dir: &Path, legend_path: &str) -> PathBuf {
    asset_dir.join(legend_path.trim_start_matches('/'))
}

pub fn show(ui: &mut egui::Ui, asset_dir: &Path, legend_path: &str) {
    let file = resolve(asset_dir, legend_path);
    ui.label(egui::RichText::new("图例").strong());

    if file.is_file() {
        let uri = format!("file://{}", file.display());
        ui.add(egui::Image::new(uri).max_width(ui.available_width()).maintain_aspect_ratio(true));
    } else {
        ui.label(egui::RichText::new(format!("缺少图例: {}", file.display())).small().weak());
    }
}
