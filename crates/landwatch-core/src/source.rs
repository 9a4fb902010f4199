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

//! Aggregate land-use area data source.

use std::future::Future;
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::chart::AreaRecord;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Other(String),
}

/// Backend returning land-use areas for a year label.
pub trait AreaDataSource {
    fn fetch_areas(
        &self,
        year_label: &str,
    ) -> impl Future<Output = Result<Vec<AreaRecord>, FetchError>> + Send;
}

/// JSON-over-HTTP area endpoint, queried as `GET <url>?year=<label>`.
#[derive(Debug, Clone)]
pub struct HttpAreaSource {
    client: reqwest::Client,
    url: String,
}

impl HttpAreaSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AreaDataSource for HttpAreaSource {
    async fn fetch_areas(&self, year_label: &str) -> Result<Vec<AreaRecord>, FetchError> {
        debug!("Fetching land-use areas for {year_label} from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[("year", year_label)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.json::<Vec<AreaRecord>>().await?)
    }
}

/// Run a fetch, giving up early once `cancel` fires.
///
/// Returns `None` when cancelled.
pub async fn fetch_unless_cancelled<S>(
    source: &S,
    year_label: &str,
    cancel: &CancellationToken,
) -> Option<Result<Vec<AreaRecord>, FetchError>>
where
    S: AreaDataSource + ?Sized,
{
    tokio::select! {
        () = cancel.cancelled() => None,
        result = source.fetch_areas(year_label) => Some(result),
    }
}
