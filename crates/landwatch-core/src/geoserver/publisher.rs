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

//! GeoServer REST client for publishing GeoTIFF coverages.

use std::path::Path;
use std::time::Duration;

use log::{error, info, warn};
use quick_xml::escape::escape;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::naming::PublishTarget;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GeoServer unreachable at {url}: HTTP {status}")]
    Unreachable { url: String, status: StatusCode },

    #[error("{action} failed: HTTP {status} - {body}")]
    Rejected { action: String, status: StatusCode, body: String },

    #[error("cannot resolve raster path {0}")]
    Path(#[from] std::io::Error),
}

/// Result of publishing a single raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    AlreadyExists,
}

/// Connection settings for the REST API.
#[derive(Debug, Clone)]
pub struct GeoServerCredentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// Authenticated REST session against one GeoServer instance.
#[derive(Debug, Clone)]
pub struct GeoServerPublisher {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct NamedItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LayerList {
    #[serde(default, deserialize_with = "object_or_empty")]
    layers: Option<LayerEntries>,
}

#[derive(Debug, Deserialize)]
struct LayerEntries {
    #[serde(default)]
    layer: Vec<NamedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreList {
    #[serde(default, deserialize_with = "object_or_empty")]
    coverage_stores: Option<StoreEntries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreEntries {
    #[serde(default)]
    coverage_store: Vec<NamedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupList {
    #[serde(default, deserialize_with = "object_or_empty")]
    layer_groups: Option<GroupEntries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupEntries {
    #[serde(default)]
    layer_group: Vec<NamedItem>,
}

/// GeoServer lists are an object when populated and `""` when empty.
fn object_or_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl GeoServerPublisher {
    /// Open a session and verify the server answers.
    pub async fn connect(credentials: GeoServerCredentials) -> Result<Self, PublishError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        let publisher = Self {
            client,
            base_url: credentials.url.trim_end_matches('/').to_string(),
            username: credentials.username,
            password: credentials.password,
        };
        publisher.test_connection().await?;
        Ok(publisher)
    }

    async fn test_connection(&self) -> Result<(), PublishError> {
        let url = format!("{}/web/", self.base_url);
        let response = self.get(&url).timeout(Duration::from_secs(10)).send().await?;
        if response.status() == StatusCode::OK {
            info!("Connected to GeoServer at {}", self.base_url);
            Ok(())
        } else {
            Err(PublishError::Unreachable { url, status: response.status() })
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).basic_auth(&self.username, Some(&self.password))
    }

    fn post_xml(&self, url: &str, body: String) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, "application/xml")
            .body(body)
    }

    fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.delete(url).basic_auth(&self.username, Some(&self.password))
    }

    async fn exists(&self, path: &str) -> Result<bool, PublishError> {
        let response = self.get(&format!("{}{path}", self.base_url)).send().await?;
        Ok(response.status() == StatusCode::OK)
    }

    async fn expect_status(
        response: reqwest::Response,
        accepted: &[StatusCode],
        action: String,
    ) -> Result<(), PublishError> {
        let status = response.status();
        if accepted.contains(&status) {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Rejected { action, status, body })
        }
    }

    pub async fn workspace_exists(&self, workspace: &str) -> Result<bool, PublishError> {
        self.exists(&format!("/rest/workspaces/{workspace}")).await
    }

    pub async fn create_workspace(&self, workspace: &str) -> Result<(), PublishError> {
        if self.workspace_exists(workspace).await? {
            info!("Workspace {workspace} already exists");
            return Ok(());
        }

        let body = format!("<workspace><name>{}</name></workspace>", escape(workspace));
        let response = self
            .post_xml(&format!("{}/rest/workspaces", self.base_url), body)
            .send()
            .await?;
        Self::expect_status(response, &[StatusCode::CREATED], format!("create workspace {workspace}")).await?;
        info!("Created workspace {workspace}");
        Ok(())
    }

    pub async fn coverage_store_exists(&self, workspace: &str, store: &str) -> Result<bool, PublishError> {
        self.exists(&format!("/rest/workspaces/{workspace}/coveragestores/{store}"))
            .await
    }

    /// Register a GeoTIFF file as a coverage store, reusing an existing one.
    pub async fn create_geotiff_store(&self, workspace: &str, store: &str, file: &Path) -> Result<(), PublishError> {
        if self.coverage_store_exists(workspace, store).await? {
            info!("Store {store} already exists, reusing it");
            return Ok(());
        }

        let absolute = std::path::absolute(file)?;
        let body = format!(
            "<coverageStore>\
               <name>{}</name>\
               <type>GeoTIFF</type>\
               <enabled>true</enabled>\
               <workspace>{}</workspace>\
               <url>file:{}</url>\
             </coverageStore>",
            escape(store),
            escape(workspace),
            escape(&absolute.to_string_lossy()),
        );
        let response = self
            .post_xml(&format!("{}/rest/workspaces/{workspace}/coveragestores", self.base_url), body)
            .send()
            .await?;
        Self::expect_status(response, &[StatusCode::CREATED], format!("create GeoTIFF store {store}")).await?;
        info!("Created GeoTIFF store {store}");
        Ok(())
    }

    /// Publish one raster as a layer in `workspace`.
    pub async fn publish(&self, workspace: &str, target: &PublishTarget) -> Result<PublishOutcome, PublishError> {
        let layer = target.layer_name();
        if self.exists(&format!("/rest/layers/{workspace}:{layer}")).await? {
            info!("Layer {layer} already exists");
            return Ok(PublishOutcome::AlreadyExists);
        }

        let store = target.store_name();
        self.create_geotiff_store(workspace, &store, &target.path).await?;

        info!("Publishing {} as {layer} (native name {})", target.path.display(), target.native_name());
        let body = format!(
            "<coverage>\
               <name>{}</name>\
               <nativeName>{}</nativeName>\
               <title>{}</title>\
               <enabled>true</enabled>\
             </coverage>",
            escape(&layer),
            escape(&target.native_name()),
            escape(&target.title()),
        );
        let response = self
            .post_xml(
                &format!("{}/rest/workspaces/{workspace}/coveragestores/{store}/coverages", self.base_url),
                body,
            )
            .send()
            .await?;
        Self::expect_status(response, &[StatusCode::OK, StatusCode::CREATED], format!("publish layer {layer}")).await?;
        info!("Published layer {layer}");
        Ok(PublishOutcome::Created)
    }

    /// Remove every layer, coverage store and layer group of `workspace`.
    ///
    /// Individual delete failures are logged and skipped.
    pub async fn clean_workspace(&self, workspace: &str) -> Result<(), PublishError> {
        info!("Cleaning workspace {workspace}");
        let prefix = format!("{workspace}:");

        let response = self.get(&format!("{}/rest/layers.json", self.base_url)).send().await?;
        if response.status() == StatusCode::OK {
            let list: LayerList = response.json().await?;
            for layer in list.layers.map(|l| l.layer).unwrap_or_default() {
                if layer.name.starts_with(&prefix) {
                    info!("Deleting layer {}", layer.name);
                    self.delete_logged(&format!("{}/rest/layers/{}", self.base_url, layer.name)).await;
                }
            }
        }

        let response = self
            .get(&format!("{}/rest/workspaces/{workspace}/coveragestores.json", self.base_url))
            .send()
            .await?;
        if response.status() == StatusCode::OK {
            let list: StoreList = response.json().await?;
            for store in list.coverage_stores.map(|s| s.coverage_store).unwrap_or_default() {
                info!("Deleting store {}", store.name);
                self.delete_logged(&format!(
                    "{}/rest/workspaces/{workspace}/coveragestores/{}?recurse=true",
                    self.base_url, store.name
                ))
                .await;
            }
        }

        let response = self
            .get(&format!("{}/rest/workspaces/{workspace}/layergroups.json", self.base_url))
            .send()
            .await?;
        if response.status() == StatusCode::OK {
            let list: GroupList = response.json().await?;
            for group in list.layer_groups.map(|g| g.layer_group).unwrap_or_default() {
                info!("Deleting layer group {}", group.name);
                self.delete_logged(&format!(
                    "{}/rest/workspaces/{workspace}/layergroups/{}",
                    self.base_url, group.name
                ))
                .await;
            }
        }

        info!("Workspace {workspace} cleaned");
        Ok(())
    }

    async fn delete_logged(&self, url: &str) {
        match self.delete(url).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => warn!("DELETE {url} returned HTTP {}", response.status()),
            Err(e) => error!("DELETE {url} failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_server::StubServer;

    const WS: &str = "remote_sensing";

    async fn session(routes: &[(&str, u16, &str)]) -> (StubServer, GeoServerPublisher) {
        let mut routes = routes.to_vec();
        routes.push(("GET /web/", 200, "ok"));
        let server = StubServer::start(&routes).await;
        let publisher = GeoServerPublisher::connect(GeoServerCredentials {
            url: format!("{}/", server.url),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
        })
        .await
        .unwrap();
        (server, publisher)
    }

    fn lst_target(root: &Path) -> PublishTarget {
        PublishTarget::from_path(&root.join("city/fuzhoushi/fuzhoushi_Tep_month1_vis.tif")).unwrap()
    }

    #[test]
    fn test_layer_list_parsing() {
        let json = r#"{"layers":{"layer":[{"name":"remote_sensing:LST_a_month1_vis","href":"x"}]}}"#;
        let list: LayerList = serde_json::from_str(json).unwrap();
        assert_eq!(list.layers.unwrap().layer[0].name, "remote_sensing:LST_a_month1_vis");

        let empty: StoreList = serde_json::from_str(r#"{"coverageStores":""}"#).unwrap();
        assert!(empty.coverage_stores.is_none());

        let missing: GroupList = serde_json::from_str("{}").unwrap();
        assert!(missing.layer_groups.is_none());
    }

    #[test]
    fn test_group_list_parsing() {
        let json = r#"{"layerGroups":{"layerGroup":[{"name":"monthly"}]}}"#;
        let list: GroupList = serde_json::from_str(json).unwrap();
        assert_eq!(list.layer_groups.unwrap().layer_group[0].name, "monthly");
    }

    #[tokio::test]
    async fn test_connect_requires_web_ui() {
        let server = StubServer::start(&[]).await;
        let err = GeoServerPublisher::connect(GeoServerCredentials {
            url: server.url.clone(),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::Unreachable { status: StatusCode::NOT_FOUND, .. }));
        assert_eq!(server.lines(), vec!["GET /web/"]);
    }

    #[tokio::test]
    async fn test_create_workspace_posts_when_missing() {
        let (server, publisher) = session(&[("POST /rest/workspaces", 201, "")]).await;

        publisher.create_workspace(WS).await.unwrap();
        assert_eq!(
            server.lines(),
            vec!["GET /web/", "GET /rest/workspaces/remote_sensing", "POST /rest/workspaces"]
        );
        assert_eq!(
            server.body_of("POST /rest/workspaces").as_deref(),
            Some("<workspace><name>remote_sensing</name></workspace>")
        );
    }

    #[tokio::test]
    async fn test_create_workspace_reuses_existing() {
        let (server, publisher) = session(&[("GET /rest/workspaces/remote_sensing", 200, "{}")]).await;

        publisher.create_workspace(WS).await.unwrap();
        assert!(!server.lines().iter().any(|line| line.starts_with("POST")));
    }

    #[tokio::test]
    async fn test_create_workspace_rejected() {
        let (_server, publisher) = session(&[("POST /rest/workspaces", 500, "boom")]).await;

        let err = publisher.create_workspace(WS).await.unwrap_err();
        assert!(matches!(
            err,
            PublishError::Rejected { status: StatusCode::INTERNAL_SERVER_ERROR, ref body, .. } if body == "boom"
        ));
    }

    #[tokio::test]
    async fn test_publish_skips_existing_layer() {
        let (server, publisher) =
            session(&[("GET /rest/layers/remote_sensing:LST_fuzhoushi_month1_vis", 200, "{}")]).await;
        let target = lst_target(Path::new("/data"));

        assert_eq!(publisher.publish(WS, &target).await.unwrap(), PublishOutcome::AlreadyExists);
        assert!(!server.lines().iter().any(|line| line.starts_with("POST")));
    }

    #[tokio::test]
    async fn test_publish_creates_store_and_coverage() {
        let (server, publisher) = session(&[
            ("POST /rest/workspaces/remote_sensing/coveragestores", 201, ""),
            (
                "POST /rest/workspaces/remote_sensing/coveragestores/fuzhoushi_city_LST_month1_vis_store/coverages",
                200,
                "",
            ),
        ])
        .await;
        let target = lst_target(Path::new("/data"));

        assert_eq!(publisher.publish(WS, &target).await.unwrap(), PublishOutcome::Created);
        assert_eq!(
            server.lines()[1..],
            [
                "GET /rest/layers/remote_sensing:LST_fuzhoushi_month1_vis",
                "GET /rest/workspaces/remote_sensing/coveragestores/fuzhoushi_city_LST_month1_vis_store",
                "POST /rest/workspaces/remote_sensing/coveragestores",
                "POST /rest/workspaces/remote_sensing/coveragestores/fuzhoushi_city_LST_month1_vis_store/coverages",
            ]
        );

        let store = server.body_of("POST /rest/workspaces/remote_sensing/coveragestores").unwrap();
        assert!(store.contains("<name>fuzhoushi_city_LST_month1_vis_store</name>"));
        assert!(store.contains("<type>GeoTIFF</type>"));
        assert!(store.contains("<url>file:/data/city/fuzhoushi/fuzhoushi_Tep_month1_vis.tif</url>"));

        let coverage = server
            .body_of("POST /rest/workspaces/remote_sensing/coveragestores/fuzhoushi_city_LST_month1_vis_store/coverages")
            .unwrap();
        assert!(coverage.contains("<name>LST_fuzhoushi_month1_vis</name>"));
        assert!(coverage.contains("<nativeName>fuzhoushi_Tep_month1_vis</nativeName>"));
        assert!(coverage.contains("<title>地表温度 fuzhoushi month1 可视化</title>"));
    }

    #[tokio::test]
    async fn test_publish_fails_when_coverage_rejected() {
        let (_server, publisher) = session(&[("POST /rest/workspaces/remote_sensing/coveragestores", 201, "")]).await;
        let target = lst_target(Path::new("/data"));

        let err = publisher.publish(WS, &target).await.unwrap_err();
        assert!(matches!(err, PublishError::Rejected { status: StatusCode::NOT_FOUND, .. }));
    }

    #[tokio::test]
    async fn test_clean_workspace_deletes_only_its_own_items() {
        let layers = r#"{"layers":{"layer":[
            {"name":"remote_sensing:LST_a_month1_vis"},
            {"name":"other:LST_a_month1_vis"}
        ]}}"#;
        let stores = r#"{"coverageStores":{"coverageStore":[{"name":"a_city_LST_month1_vis_store"}]}}"#;
        let (server, publisher) = session(&[
            ("GET /rest/layers.json", 200, layers),
            ("GET /rest/workspaces/remote_sensing/coveragestores.json", 200, stores),
            ("GET /rest/workspaces/remote_sensing/layergroups.json", 200, r#"{"layerGroups":""}"#),
            ("DELETE /rest/layers/remote_sensing:LST_a_month1_vis", 200, ""),
        ])
        .await;

        publisher.clean_workspace(WS).await.unwrap();
        let deletes: Vec<String> = server
            .lines()
            .into_iter()
            .filter(|line| line.starts_with("DELETE"))
            .collect();
        assert_eq!(
            deletes,
            vec![
                "DELETE /rest/layers/remote_sensing:LST_a_month1_vis",
                "DELETE /rest/workspaces/remote_sensing/coveragestores/a_city_LST_month1_vis_store?recurse=true",
            ]
        );
    }
}
