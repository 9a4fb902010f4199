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

//! Publishing processed rasters to GeoServer.
//!
//! The overlay layers the dashboard requests are created here: every
//! GeoTIFF under a root directory is classified by its file name, then
//! registered as a coverage store plus layer in one workspace.

pub mod naming;
pub mod publisher;

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use walkdir::WalkDir;

pub use naming::{NamingError, PublishTarget, RegionLevel, Rendition};
pub use publisher::{GeoServerCredentials, GeoServerPublisher, PublishError, PublishOutcome};

use crate::catalog::DataType;

/// Rasters found under a root directory, in publishing order.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub lst_vis: Vec<PublishTarget>,
    pub lst_raw: Vec<PublishTarget>,
    pub ndvi_vis: Vec<PublishTarget>,
    pub ndvi_raw: Vec<PublishTarget>,
    /// `.tif` files whose name carries no data type marker.
    pub unknown: Vec<PathBuf>,
    /// Files with a marker whose name could not be parsed further.
    pub unparsable: Vec<PathBuf>,
}

impl BatchPlan {
    /// Recursively scan `root` for `.tif` files.
    #[must_use]
    pub fn scan(root: &Path) -> Self {
        let mut plan = Self::default();

        let files = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tif"));

        for entry in files {
            match PublishTarget::from_path(entry.path()) {
                Ok(target) => plan.push(target),
                Err(NamingError::UnknownDataType(_)) => plan.unknown.push(entry.into_path()),
                Err(e) => {
                    warn!("{e}, skipping");
                    plan.unparsable.push(entry.into_path());
                }
            }
        }

        info!(
            "Found LST vis: {}, LST raw: {}, NDVI vis: {}, NDVI raw: {}",
            plan.lst_vis.len(),
            plan.lst_raw.len(),
            plan.ndvi_vis.len(),
            plan.ndvi_raw.len()
        );
        if !plan.unknown.is_empty() {
            warn!("{} TIF files have no recognisable data type", plan.unknown.len());
        }
        plan
    }

    fn push(&mut self, target: PublishTarget) {
        let bucket = match (target.data_type, target.rendition) {
            (DataType::Lst, Rendition::Vis) => &mut self.lst_vis,
            (DataType::Lst, Rendition::Raw) => &mut self.lst_raw,
            (DataType::Ndvi, Rendition::Vis) => &mut self.ndvi_vis,
            (DataType::Ndvi, Rendition::Raw) => &mut self.ndvi_raw,
        };
        bucket.push(target);
    }

    /// Targets in publishing order: LST vis, LST raw, NDVI vis, NDVI raw.
    pub fn targets(&self) -> impl Iterator<Item = &PublishTarget> {
        self.lst_vis
            .iter()
            .chain(&self.lst_raw)
            .chain(&self.ndvi_vis)
            .chain(&self.ndvi_raw)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lst_vis.len() + self.lst_raw.len() + self.ndvi_vis.len() + self.ndvi_raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts from a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Publish every raster of `plan` into `workspace`.
///
/// Creates the workspace if needed and, with `clean_first`, empties it
/// before publishing. Per-file failures are counted, not returned.
pub async fn batch_publish(
    publisher: &GeoServerPublisher,
    plan: &BatchPlan,
    workspace: &str,
    clean_first: bool,
) -> Result<BatchReport, PublishError> {
    publisher.create_workspace(workspace).await?;
    if clean_first {
        publisher.clean_workspace(workspace).await?;
    }

    let mut report = BatchReport {
        skipped: plan.unknown.len() + plan.unparsable.len(),
        ..BatchReport::default()
    };

    let total = plan.len();
    for (i, target) in plan.targets().enumerate() {
        info!("[{}/{total}] {}", i + 1, target.path.display());
        match publisher.publish(workspace, target).await {
            Ok(PublishOutcome::Created) => report.created += 1,
            Ok(PublishOutcome::AlreadyExists) => report.existing += 1,
            Err(e) => {
                error!("Publishing {} failed: {e}", target.path.display());
                report.failed += 1;
            }
        }
    }

    info!(
        "Batch publish finished: {} created, {} existing, {} failed, {} skipped",
        report.created, report.existing, report.failed, report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_server::StubServer;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_scan_groups_in_publishing_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "ndvi/city/fuzhoushi/fuzhoushi_NDVI_20240101.tif");
        touch(root, "ndvi/city/fuzhoushi/fuzhoushi_NDVI_20240101_vis.tif");
        touch(root, "lst/city/fuzhoushi/fuzhoushi_Tep_month1.tif");
        touch(root, "lst/city/fuzhoushi/fuzhoushi_Tep_month1_vis.tif");
        touch(root, "lst/plots/china_month1.tif");
        touch(root, "lst/city/fuzhoushi/notes.txt");

        let plan = BatchPlan::scan(root);

        assert_eq!(plan.len(), 4);
        assert_eq!(plan.unknown.len(), 1);
        let layers: Vec<String> = plan.targets().map(PublishTarget::layer_name).collect();
        assert_eq!(
            layers,
            vec![
                "LST_fuzhoushi_month1_vis",
                "LST_fuzhoushi_month1.tif_raw",
                "NDVI_fuzhoushi_20240101_vis",
                "NDVI_fuzhoushi_20240101.tif_raw",
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_publish_counts_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "city/fuzhoushi/fuzhoushi_Tep_month1_vis.tif");
        touch(root, "city/xiamenshi/xiamenshi_Tep_month1_vis.tif");
        touch(root, "city/putianshi/putianshi_Tep_month1.tif");
        touch(root, "plots/china_month1.tif");
        let plan = BatchPlan::scan(root);

        let server = StubServer::start(&[
            ("GET /web/", 200, "ok"),
            ("GET /rest/workspaces/remote_sensing", 200, "{}"),
            ("GET /rest/layers/remote_sensing:LST_fuzhoushi_month1_vis", 200, "{}"),
            ("POST /rest/workspaces/remote_sensing/coveragestores", 201, ""),
            (
                "POST /rest/workspaces/remote_sensing/coveragestores/xiamenshi_city_LST_month1_vis_store/coverages",
                201,
                "",
            ),
        ])
        .await;
        let publisher = GeoServerPublisher::connect(GeoServerCredentials {
            url: server.url.clone(),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
        })
        .await
        .unwrap();

        let report = batch_publish(&publisher, &plan, "remote_sensing", false).await.unwrap();
        assert_eq!(
            report,
            BatchReport {
                created: 1,
                existing: 1,
                failed: 1,
                skipped: 1,
            }
        );
        assert!(!server.lines().iter().any(|line| line.ends_with("layers.json")));
    }

    #[tokio::test]
    async fn test_batch_publish_stops_without_workspace() {
        let server = StubServer::start(&[("GET /web/", 200, "ok")]).await;
        let publisher = GeoServerPublisher::connect(GeoServerCredentials {
            url: server.url.clone(),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
        })
        .await
        .unwrap();

        let result = batch_publish(&publisher, &BatchPlan::default(), "remote_sensing", true).await;
        assert!(matches!(result, Err(PublishError::Rejected { .. })));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let plan = BatchPlan::scan(dir.path());
        assert!(plan.is_empty());
        assert!(plan.unknown.is_empty());
    }
}
