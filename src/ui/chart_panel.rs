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

//! Land-use area bar chart.

use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};
use landwatch_core::{ChartOption, ChartStatus};

/// Axis label for a category index, empty between categories
fn category_label(categories: &[String], value: f64) -> String {
    if value < 0.0 || value.fract().abs() > f64::EPSILON {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "checked non-negative integer")]
    let index = value as usize;
    categories.get(index).cloned().unwrap_or_default()
}

pub fn show(ui: &mut egui::Ui, chart: &ChartOption, status: &ChartStatus) {
    let title = if chart.title.is_empty() { "土地利用类型面积" } else { chart.title.as_str() };
    ui.heading(title);

    match status {
        ChartStatus::Idle => {
            ui.label("尚未加载数据");
            return;
        }
        ChartStatus::Loading { .. } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("加载中…");
            });
        }
        ChartStatus::Unavailable { reason } => {
            ui.colored_label(egui::Color32::from_rgb(220, 80, 80), "数据不可用");
            ui.label(egui::RichText::new(reason).small().weak());
            return;
        }
        ChartStatus::Ready => {}
    }

    if chart.is_empty() {
        return;
    }

    let bars: Vec<Bar> = chart
        .series
        .iter()
        .zip(&chart.categories)
        .enumerate()
        .map(|(i, (value, category))| Bar::new(i as f64, *value).name(category))
        .collect();
    let bar_chart = BarChart::new("面积", bars)
        .horizontal()
        .color(egui::Color32::from_rgb(84, 160, 120));

    let categories = chart.categories.clone();
    Plot::new("land_use_chart")
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .y_axis_formatter(move |mark, _range| category_label(&categories, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(bar_chart));
}
