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

//! Main dashboard window.

use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

use eframe::egui;
use landwatch_core::{
    fetch_unless_cancelled, AreaRecord, ChartOutcome, ChartRequest, FetchError, HttpAreaSource, ViewController,
    ViewEvent,
};
use log::{error, info, warn};
use tokio::runtime::Handle;
use walkers::{lon_lat, HttpTiles, Map, MapMemory, Position};

use crate::config::AppConfig;
use crate::map::{BasemapSource, MapOverlays};
use crate::ui::{chart_panel, legend, selection_panel};

/// Zoom level showing all of Fujian province
const INITIAL_ZOOM: f64 = 7.0;

type ChartResult = (ChartRequest, Result<Vec<AreaRecord>, FetchError>);

pub struct DashboardApp {
    config: AppConfig,
    controller: ViewController<MapOverlays>,
    basemap: HttpTiles,
    map_memory: MapMemory,
    center: Position,
    source: Option<Arc<HttpAreaSource>>,
    runtime: Handle,
    results_tx: mpsc::Sender<ChartResult>,
    results_rx: mpsc::Receiver<ChartResult>,
    last_error: Option<String>,
}

impl std::fmt::Debug for DashboardApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardApp")
            .field("controller", &self.controller)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Register `fonts/cjk.ttf` from the asset directory as a fallback font.
/// egui's bundled fonts carry no Chinese glyphs.
fn install_cjk_font(ctx: &egui::Context, asset_dir: &Path) {
    let path = asset_dir.join("fonts").join("cjk.ttf");
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("No CJK font at {} ({e}), Chinese labels will not render", path.display());
            return;
        }
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_string(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("cjk".to_string());
    }
    ctx.set_fonts(fonts);
}

/// Post a finished fetch to the UI thread. False once the app has gone.
fn send_chart_result(tx: &mpsc::Sender<ChartResult>, result: ChartResult) -> bool {
    if tx.send(result).is_ok() {
        true
    } else {
        warn!("Chart result channel closed, dropping response");
        false
    }
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: Handle) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        install_cjk_font(&cc.egui_ctx, &config.asset_dir);

        let ctx = cc.egui_ctx.clone();
        let mut controller = ViewController::new(
            MapOverlays::new(ctx.clone()),
            config.wms_settings(),
            config.timeline(),
            config.default_data_type,
            config.startup_city(),
        );

        let mut last_error = None;
        if let Err(e) = controller.refresh_overlay() {
            last_error = Some(e.to_string());
        }

        let source = match HttpAreaSource::new(config.area_data_url.clone(), config.request_timeout()) {
            Ok(source) => Some(Arc::new(source)),
            Err(e) => {
                error!("Cannot create area data client: {e}");
                None
            }
        };

        let (results_tx, results_rx) = mpsc::channel();
        let basemap = HttpTiles::new(BasemapSource::new(config.basemap), ctx);
        let mut map_memory = MapMemory::default();
        if let Err(e) = map_memory.set_zoom(INITIAL_ZOOM) {
            warn!("Cannot set initial zoom: {e:?}");
        }

        let mut app = Self {
            center: lon_lat(config.map_center_lon, config.map_center_lat),
            config,
            controller,
            basemap,
            map_memory,
            source,
            runtime,
            results_tx,
            results_rx,
            last_error,
        };

        let year_label = app.controller.selection().year_label.clone();
        let request = app.controller.begin_chart_load(&year_label);
        app.spawn_chart_fetch(request, &cc.egui_ctx);
        app
    }

    /// Run a chart request in the background and post the result back
    fn spawn_chart_fetch(&self, request: ChartRequest, ctx: &egui::Context) {
        let tx = self.results_tx.clone();
        let ctx = ctx.clone();

        let Some(source) = self.source.clone() else {
            let result = Err(FetchError::Other("area data client unavailable".to_string()));
            send_chart_result(&tx, (request, result));
            return;
        };

        info!("Loading chart data for {} (request {})", request.year_label, request.token);
        self.runtime.spawn(async move {
            let Some(result) = fetch_unless_cancelled(&*source, &request.year_label, &request.cancel).await else {
                return;
            };
            if send_chart_result(&tx, (request, result)) {
                ctx.request_repaint();
            }
        });
    }

    fn drain_chart_results(&mut self) {
        while let Ok((request, result)) = self.results_rx.try_recv() {
            match self.controller.complete_chart_load(&request, result) {
                ChartOutcome::Applied => info!("Chart updated for {}", request.year_label),
                ChartOutcome::Unavailable(reason) => {
                    self.last_error = Some(format!("{}: {reason}", request.year_label));
                }
                ChartOutcome::Stale => {}
            }
        }
    }

    fn apply_events(&mut self, ctx: &egui::Context, events: Vec<ViewEvent>) {
        for event in events {
            match self.controller.dispatch(event) {
                Ok(Some(activation)) => {
                    self.last_error = activation.overlay_error.map(|e| e.to_string());
                    self.spawn_chart_fetch(activation.request, ctx);
                }
                Ok(None) => self.last_error = None,
                Err(e) => self.last_error = Some(e.to_string()),
            }
        }
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let layer = self.controller.host().active_layer().unwrap_or("—");
            ui.label(egui::RichText::new(format!("图层: {layer}")).monospace().small());

            if let Some(ref err) = self.last_error {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
                });
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_chart_results();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.draw_status_bar(ui));

        let mut events = Vec::new();
        egui::SidePanel::left("controls")
            .default_width(self.config.panel_width)
            .resizable(true)
            .show(ctx, |ui| {
                let selection = self.controller.selection();
                ui.heading(format!("{} · {}", selection.city_display_name(), selection.data_type.display_name()));
                ui.separator();
                events = selection_panel::show(ui, selection, self.controller.timeline());
                ui.separator();
                legend::show(ui, &self.config.asset_dir, &self.controller.legend_path());
            });

        egui::SidePanel::right("chart")
            .default_width(self.config.panel_width)
            .resizable(true)
            .show(ctx, |ui| {
                chart_panel::show(ui, self.controller.chart(), self.controller.chart_status());
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let opacity = self.config.overlay_opacity.clamp(0.0, 1.0);
                let mut map = Map::new(Some(&mut self.basemap), &mut self.map_memory, self.center);
                if let Some(tiles) = self.controller.host_mut().tiles_mut() {
                    map = map.with_layer(tiles, opacity);
                }
                ui.add(map);
            });

        self.apply_events(ctx, events);
    }
}
