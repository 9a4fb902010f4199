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

//! Data type, city and timeline selectors.

use eframe::egui;
use landwatch_core::{City, DataType, Selection, Timeline, ViewEvent};

/// Draw the selectors and return the events the user triggered this frame
pub fn show(ui: &mut egui::Ui, selection: &Selection, timeline: &Timeline) -> Vec<ViewEvent> {
    let mut events = Vec::new();

    ui.label(egui::RichText::new("数据类型").strong());
    ui.horizontal(|ui| {
        for data_type in DataType::ALL {
            let text = format!("{} {}", data_type.as_str(), data_type.display_name());
            if ui.radio(selection.data_type == data_type, text).clicked() && selection.data_type != data_type {
                events.push(ViewEvent::SetDataType(data_type));
            }
        }
    });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("城市").strong());
    egui::ComboBox::from_id_salt("city_selector")
        .selected_text(selection.city_display_name())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for city in City::ALL {
                let selected = city == selection.city;
                if ui.selectable_label(selected, city.display_name()).clicked() && !selected {
                    events.push(ViewEvent::SelectCity(city.code().to_string()));
                }
            }
        });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("时间轴").strong());
    for (month, year) in timeline.entries() {
        let selected = month == selection.month;
        let text = format!("{}  ({year})", month.label());
        if ui.selectable_label(selected, text).clicked() {
            events.push(ViewEvent::ActivateTimeline(month.label().to_string()));
        }
    }

    events
}
