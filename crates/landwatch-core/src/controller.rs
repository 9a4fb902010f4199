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

//! View controller for the map + chart panel.
//!
//! The controller is the single owner of the selection. UI widgets never
//! mutate it directly: they emit a [`ViewEvent`] which [`ViewController::dispatch`]
//! applies, re-deriving the overlay layer and, on timeline changes, issuing
//! a chart request.
//!
//! Chart requests are tagged with a monotonically increasing token. Only
//! the most recently issued request may update the chart; a response for an
//! older token is dropped no matter when it arrives.

use log::{debug, error, info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::catalog::{City, DataType, Month};
use crate::chart::{AreaRecord, ChartOption, ChartStatus};
use crate::overlay::{OverlayError, OverlayHost};
use crate::selection::{Selection, SelectionError, Timeline};
use crate::source::{AreaDataSource, FetchError};
use crate::wms::{self, WmsSettings};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// User actions the panel can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SetDataType(DataType),
    SelectCity(String),
    ActivateTimeline(String),
}

/// An issued chart fetch.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub token: u64,
    pub year_label: String,
    /// Fired when a newer request supersedes this one.
    pub cancel: CancellationToken,
}

/// Result of moving the timeline.
#[derive(Debug)]
pub struct TimelineActivation {
    pub request: ChartRequest,
    /// Set when the overlay could not be swapped. The chart request is
    /// issued regardless so the chart keeps following the selection.
    pub overlay_error: Option<OverlayError>,
}

/// What happened to a completed chart fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Applied,
    Unavailable(String),
    /// A newer request was issued; the response was discarded.
    Stale,
}

pub struct ViewController<H: OverlayHost> {
    selection: Selection,
    timeline: Timeline,
    wms: WmsSettings,
    host: H,
    active_layer: Option<H::Handle>,
    chart: ChartOption,
    chart_status: ChartStatus,
    latest_request: Option<ChartRequest>,
    next_token: u64,
}

impl<H: OverlayHost> std::fmt::Debug for ViewController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("selection", &self.selection)
            .field("active_layer", &self.active_layer)
            .field("chart_status", &self.chart_status)
            .finish_non_exhaustive()
    }
}

impl<H: OverlayHost> ViewController<H> {
    /// Create a controller. No overlay is attached until the first refresh.
    pub fn new(host: H, wms: WmsSettings, timeline: Timeline, data_type: DataType, city: City) -> Self {
        let selection = Selection::new(data_type, city, &timeline);
        Self {
            selection,
            timeline,
            wms,
            host,
            active_layer: None,
            chart: ChartOption::default(),
            chart_status: ChartStatus::Idle,
            latest_request: None,
            next_token: 0,
        }
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn chart(&self) -> &ChartOption {
        &self.chart
    }

    #[must_use]
    pub fn chart_status(&self) -> &ChartStatus {
        &self.chart_status
    }

    #[must_use]
    pub fn active_layer(&self) -> Option<&H::Handle> {
        self.active_layer.as_ref()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Apply a UI event. Returns the timeline activation, if the event
    /// issued a chart request.
    pub fn dispatch(&mut self, event: ViewEvent) -> Result<Option<TimelineActivation>, ControllerError> {
        debug!("Dispatching {event:?}");
        match event {
            ViewEvent::SetDataType(data_type) => {
                self.set_data_type(data_type)?;
                Ok(None)
            }
            ViewEvent::SelectCity(code) => {
                self.select_city(&code)?;
                Ok(None)
            }
            ViewEvent::ActivateTimeline(label) => Ok(Some(self.on_timeline_activate(&label)?)),
        }
    }

    pub fn set_data_type(&mut self, data_type: DataType) -> Result<(), OverlayError> {
        self.selection.data_type = data_type;
        self.refresh_overlay()
    }

    /// Select a city by code. Unknown codes leave the selection untouched.
    pub fn select_city(&mut self, code: &str) -> Result<(), ControllerError> {
        let city = City::from_code(code).inspect_err(|e| warn!("Ignoring city selection: {e}"))?;
        self.selection.city = city;
        info!("Selected city {} ({})", city.display_name(), city.code());
        self.refresh_overlay()?;
        Ok(())
    }

    #[must_use]
    pub fn derive_layer_name(&self) -> String {
        self.wms.layer_name(&self.selection)
    }

    #[must_use]
    pub fn legend_path(&self) -> String {
        wms::legend_path(&self.selection.year_label)
    }

    /// Swap the map overlay for one matching the current selection.
    ///
    /// If the old layer cannot be detached it stays recorded as active and
    /// no new layer is attached. A handle the map no longer knows is
    /// treated as already detached.
    pub fn refresh_overlay(&mut self) -> Result<(), OverlayError> {
        if let Some(handle) = self.active_layer.take() {
            match self.host.detach(&handle) {
                Ok(()) => {}
                Err(OverlayError::UnknownHandle(_)) => {
                    warn!("Overlay {handle:?} was already removed from the map");
                }
                Err(e) => {
                    error!("Failed to detach overlay {handle:?}: {e}");
                    self.active_layer = Some(handle);
                    return Err(e);
                }
            }
        }

        let overlay = self.wms.overlay_for(&self.selection);
        match self.host.attach(&overlay) {
            Ok(handle) => {
                info!("Overlay layer set to {}", overlay.layers);
                self.active_layer = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("Failed to attach overlay {}: {e}", overlay.layers);
                Err(e)
            }
        }
    }

    /// Move the timeline to the entry labelled `label`.
    ///
    /// Updates the period, refreshes the overlay and issues a chart request
    /// for the entry's year. Unknown labels are rejected before any state
    /// changes. An overlay failure does not stop the chart request.
    pub fn on_timeline_activate(&mut self, label: &str) -> Result<TimelineActivation, SelectionError> {
        let month = Month::from_label(label).inspect_err(|e| warn!("Ignoring timeline activation: {e}"))?;
        self.selection.month = month;
        self.selection.year_label = self.timeline.year_for(month).to_string();

        let overlay_error = self.refresh_overlay().err();
        let year_label = self.selection.year_label.clone();
        Ok(TimelineActivation {
            request: self.begin_chart_load(&year_label),
            overlay_error,
        })
    }

    /// Issue a new chart request, superseding any request in flight.
    pub fn begin_chart_load(&mut self, year_label: &str) -> ChartRequest {
        if let Some(previous) = self.latest_request.take() {
            previous.cancel.cancel();
        }

        self.next_token += 1;
        let request = ChartRequest {
            token: self.next_token,
            year_label: year_label.to_string(),
            cancel: CancellationToken::new(),
        };
        self.chart_status = ChartStatus::Loading { token: request.token };
        self.latest_request = Some(request.clone());
        request
    }

    /// Feed back the result of a chart request.
    pub fn complete_chart_load(
        &mut self,
        request: &ChartRequest,
        result: Result<Vec<AreaRecord>, FetchError>,
    ) -> ChartOutcome {
        let is_latest = self
            .latest_request
            .as_ref()
            .is_some_and(|latest| latest.token == request.token);
        if !is_latest {
            debug!("Discarding chart response for {} (token {})", request.year_label, request.token);
            return ChartOutcome::Stale;
        }
        self.latest_request = None;

        let applied = result
            .map_err(|e| e.to_string())
            .and_then(|records| {
                self.chart
                    .apply_records(&request.year_label, &records)
                    .map_err(|e| e.to_string())
            });

        match applied {
            Ok(()) => {
                self.chart_status = ChartStatus::Ready;
                ChartOutcome::Applied
            }
            Err(reason) => {
                warn!("Chart data for {} unavailable: {reason}", request.year_label);
                self.chart_status = ChartStatus::Unavailable { reason: reason.clone() };
                ChartOutcome::Unavailable(reason)
            }
        }
    }

    /// Fetch and apply chart data for `year_label`.
    pub async fn load_chart_data<S>(&mut self, source: &S, year_label: &str) -> ChartOutcome
    where
        S: AreaDataSource + ?Sized,
    {
        let request = self.begin_chart_load(year_label);
        let result = source.fetch_areas(&request.year_label).await;
        self.complete_chart_load(&request, result)
    }

    /// Timeline activation followed by the chart fetch it issues.
    ///
    /// The chart is updated even when the overlay swap failed; that failure
    /// is returned once the fetch has been applied.
    pub async fn activate_timeline<S>(&mut self, label: &str, source: &S) -> Result<ChartOutcome, ControllerError>
    where
        S: AreaDataSource + ?Sized,
    {
        let TimelineActivation { request, overlay_error } = self.on_timeline_activate(label)?;
        let result = source.fetch_areas(&request.year_label).await;
        let outcome = self.complete_chart_load(&request, result);
        match overlay_error {
            Some(e) => Err(e.into()),
            None => Ok(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::testing::{HostEvent, RecordingHost};
    use crate::source::testing::StaticSource;

    fn controller() -> ViewController<RecordingHost> {
        ViewController::new(
            RecordingHost::default(),
            WmsSettings::default(),
            Timeline::default(),
            DataType::Lst,
            City::Fuzhoushi,
        )
    }

    #[test]
    fn test_refresh_twice_leaves_one_layer() {
        let mut c = controller();
        c.refresh_overlay().unwrap();
        c.refresh_overlay().unwrap();

        assert_eq!(c.host().attached.len(), 1);
        assert_eq!(c.active_layer(), Some(&2));
        assert_eq!(
            c.host().events,
            vec![
                HostEvent::Attached(1, "remote_sensing:LST_fuzhoushi_month1_vis".to_string()),
                HostEvent::Detached(1),
                HostEvent::Attached(2, "remote_sensing:LST_fuzhoushi_month1_vis".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_city_updates_layer() {
        let mut c = controller();
        c.select_city("longyanshi").unwrap();

        assert_eq!(c.selection().city_display_name(), "龙岩市");
        assert_eq!(c.derive_layer_name(), "remote_sensing:LST_longyanshi_month1_vis");
        assert_eq!(
            c.host().events.last(),
            Some(&HostEvent::Attached(1, "remote_sensing:LST_longyanshi_month1_vis".to_string()))
        );
    }

    #[test]
    fn test_unknown_city_is_a_no_op() {
        let mut c = controller();
        c.refresh_overlay().unwrap();
        let before = c.selection().clone();

        let err = c.select_city("atlantis").unwrap_err();
        assert!(matches!(err, ControllerError::Selection(SelectionError::UnknownCity(_))));
        assert_eq!(c.selection(), &before);
        assert_eq!(c.host().events.len(), 1);
    }

    #[test]
    fn test_set_data_type_switches_template() {
        let mut c = controller();
        c.set_data_type(DataType::Ndvi).unwrap();
        assert_eq!(c.derive_layer_name(), "remote_sensing:NDVI_fuzhoushi_20240101.tif_raw");
        assert_eq!(c.host().attached.len(), 1);
    }

    #[test]
    fn test_timeline_activation() {
        let mut c = controller();
        let activation = c.on_timeline_activate("二月份").unwrap();
        let request = activation.request;

        assert!(activation.overlay_error.is_none());
        assert_eq!(c.selection().month.index(), 2);
        assert_eq!(c.selection().year_label, "2010");
        assert_eq!(request.year_label, "2010");
        assert_eq!(c.derive_layer_name(), "remote_sensing:LST_fuzhoushi_month2_vis");
        assert_eq!(c.chart_status(), &ChartStatus::Loading { token: request.token });

        c.on_timeline_activate("一月份").unwrap();
        assert_eq!(c.selection().month.index(), 1);
        assert_eq!(c.legend_path(), "/legend/2000年土地利用图例.jpg");
    }

    #[test]
    fn test_unknown_timeline_label_rejected() {
        let mut c = controller();
        c.on_timeline_activate("三月份").unwrap();
        let before = c.selection().clone();
        let events = c.host().events.len();

        let err = c.on_timeline_activate("十三月").unwrap_err();
        assert_eq!(err, SelectionError::UnknownTimelineLabel("十三月".to_string()));
        assert_eq!(c.selection(), &before);
        assert_eq!(c.host().events.len(), events);
    }

    #[test]
    fn test_attach_failure_leaves_no_active_layer() {
        let mut c = controller();
        c.refresh_overlay().unwrap();
        c.host_mut().fail_attach = true;

        assert!(c.refresh_overlay().is_err());
        assert!(c.active_layer().is_none());
        assert!(c.host().attached.is_empty());
    }

    #[test]
    fn test_detach_failure_keeps_old_layer() {
        let mut c = controller();
        c.refresh_overlay().unwrap();
        c.host_mut().fail_detach = true;

        assert!(matches!(c.refresh_overlay(), Err(OverlayError::Rejected { .. })));
        assert_eq!(c.active_layer(), Some(&1));
        assert_eq!(c.host().attached, vec![1]);
        assert_eq!(c.host().events.len(), 1);

        c.host_mut().fail_detach = false;
        c.refresh_overlay().unwrap();
        assert_eq!(c.active_layer(), Some(&2));
        assert_eq!(c.host().attached, vec![2]);
    }

    #[test]
    fn test_layer_removed_behind_controller_is_replaced() {
        let mut c = controller();
        c.refresh_overlay().unwrap();
        c.host_mut().detach(&1).unwrap();

        c.refresh_overlay().unwrap();
        assert_eq!(c.active_layer(), Some(&2));
        assert_eq!(c.host().attached, vec![2]);
    }

    #[test]
    fn test_timeline_attach_failure_still_requests_chart() {
        let mut c = controller();
        let first = c.begin_chart_load("2000");
        let rows = vec![AreaRecord { area: "1".into(), land_type: "forest".into() }];
        assert_eq!(c.complete_chart_load(&first, Ok(rows)), ChartOutcome::Applied);
        c.host_mut().fail_attach = true;

        let activation = c.on_timeline_activate("三月份").unwrap();
        assert!(matches!(activation.overlay_error, Some(OverlayError::Rejected { .. })));
        assert_eq!(activation.request.year_label, "2020");
        assert_eq!(c.selection().year_label, "2020");
        assert_eq!(c.legend_path(), "/legend/2020年土地利用图例.jpg");
        assert_eq!(c.chart_status(), &ChartStatus::Loading { token: activation.request.token });
        assert!(c.active_layer().is_none());

        let rows = vec![AreaRecord { area: "4".into(), land_type: "water".into() }];
        assert_eq!(c.complete_chart_load(&activation.request, Ok(rows)), ChartOutcome::Applied);
        assert_eq!(c.chart().title, "2020年土地利用类型面积");
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut c = controller();
        assert!(c.dispatch(ViewEvent::SetDataType(DataType::Ndvi)).unwrap().is_none());
        assert!(c.dispatch(ViewEvent::SelectCity("ningdeshi".into())).unwrap().is_none());
        let activation = c.dispatch(ViewEvent::ActivateTimeline("三月份".into())).unwrap();

        assert_eq!(activation.map(|a| a.request.year_label), Some("2020".to_string()));
        assert_eq!(c.derive_layer_name(), "remote_sensing:NDVI_ningdeshi_20240301.tif_raw");
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut c = controller();
        let first = c.begin_chart_load("2000");
        let second = c.begin_chart_load("2010");
        assert!(first.cancel.is_cancelled());

        let newer = vec![AreaRecord { area: "7".into(), land_type: "urban".into() }];
        let older = vec![AreaRecord { area: "1".into(), land_type: "forest".into() }];

        assert_eq!(c.complete_chart_load(&second, Ok(newer)), ChartOutcome::Applied);
        assert_eq!(c.complete_chart_load(&first, Ok(older)), ChartOutcome::Stale);

        assert_eq!(c.chart().title, "2010年土地利用类型面积");
        assert_eq!(c.chart().categories, vec!["urban"]);
        assert_eq!(c.chart_status(), &ChartStatus::Ready);
    }

    #[test]
    fn test_stale_response_before_latest_is_ignored() {
        let mut c = controller();
        let first = c.begin_chart_load("2000");
        let second = c.begin_chart_load("2010");

        let older = vec![AreaRecord { area: "1".into(), land_type: "forest".into() }];
        assert_eq!(c.complete_chart_load(&first, Ok(older)), ChartOutcome::Stale);
        assert_eq!(c.chart_status(), &ChartStatus::Loading { token: second.token });
        assert!(c.chart().is_empty());
    }

    #[test]
    fn test_fetch_failure_marks_unavailable() {
        let mut c = controller();
        let request = c.begin_chart_load("2000");
        let outcome = c.complete_chart_load(&request, Err(FetchError::Other("offline".into())));

        assert_eq!(outcome, ChartOutcome::Unavailable("offline".to_string()));
        assert_eq!(c.chart_status(), &ChartStatus::Unavailable { reason: "offline".to_string() });
        assert!(c.chart().is_empty());
    }

    #[tokio::test]
    async fn test_load_chart_data() {
        let source = StaticSource::default().with("2000", 0, &[("12.5", "forest"), ("3.0", "water")]);
        let mut c = controller();

        assert_eq!(c.load_chart_data(&source, "2000").await, ChartOutcome::Applied);
        assert_eq!(c.chart().series, vec![12.5, 3.0]);
        assert_eq!(c.chart().categories, vec!["forest", "water"]);
    }

    #[tokio::test]
    async fn test_activate_timeline_fetches_year() {
        let source = StaticSource::default().with("2010", 0, &[("5", "farmland")]);
        let mut c = controller();

        let outcome = c.activate_timeline("二月份", &source).await.unwrap();
        assert_eq!(outcome, ChartOutcome::Applied);
        assert_eq!(c.chart().title, "2010年土地利用类型面积");
        assert_eq!(c.selection().month, Month::February);
    }

    #[tokio::test]
    async fn test_activate_timeline_reports_overlay_failure_after_chart() {
        let source = StaticSource::default().with("2010", 0, &[("5", "farmland")]);
        let mut c = controller();
        c.host_mut().fail_attach = true;

        let err = c.activate_timeline("二月份", &source).await.unwrap_err();
        assert!(matches!(err, ControllerError::Overlay(OverlayError::Rejected { .. })));
        assert_eq!(c.chart().title, "2010年土地利用类型面积");
        assert_eq!(c.chart_status(), &ChartStatus::Ready);
    }

    #[tokio::test]
    async fn test_missing_year_is_unavailable() {
        let source = StaticSource::default();
        let mut c = controller();

        let outcome = c.activate_timeline("三月份", &source).await.unwrap();
        assert!(matches!(outcome, ChartOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_out_of_order_completion() {
        let source = StaticSource::default()
            .with("2000", 50, &[("1", "forest")])
            .with("2010", 0, &[("2", "water")]);
        let mut c = controller();

        let first = c.begin_chart_load("2000");
        let second = c.begin_chart_load("2010");

        // Run both fetches concurrently; the 2010 response lands first
        let (r_first, r_second) = tokio::join!(
            source.fetch_areas(&first.year_label),
            source.fetch_areas(&second.year_label),
        );
        assert_eq!(c.complete_chart_load(&second, r_second), ChartOutcome::Applied);
        assert_eq!(c.complete_chart_load(&first, r_first), ChartOutcome::Stale);

        assert_eq!(c.chart().series, vec![2.0]);
        assert_eq!(c.chart().title, "2010年土地利用类型面积");
    }
}
