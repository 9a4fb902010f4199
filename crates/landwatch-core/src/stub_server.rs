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

//! Local HTTP server with canned responses, for exercising the HTTP clients.
//!
//! Routes are keyed by request line (`"GET /rest/workspaces/ws"`, query
//! included). Anything unrouted answers 404. Every request is recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

type Routes = Arc<HashMap<String, (StatusCode, String)>>;
type Log = Arc<Mutex<Vec<RecordedRequest>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub line: String,
    pub body: String,
}

#[derive(Debug)]
pub struct StubServer {
    pub url: String,
    requests: Log,
}

async fn respond(
    State((routes, requests)): State<(Routes, Log)>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    let line = format!("{method} {target}");
    let response = routes
        .get(&line)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()));
    requests.lock().unwrap().push(RecordedRequest { line, body });
    response
}

impl StubServer {
    /// Serve `(request line, status, body)` routes on an ephemeral port.
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let routes: Routes = Arc::new(
            routes
                .iter()
                .map(|(line, status, body)| {
                    ((*line).to_string(), (StatusCode::from_u16(*status).unwrap(), (*body).to_string()))
                })
                .collect(),
        );
        let requests: Log = Arc::default();

        let app = Router::new()
            .fallback(respond)
            .with_state((routes, Arc::clone(&requests)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, requests }
    }

    /// Request lines in arrival order.
    pub fn lines(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|r| r.line.clone()).collect()
    }

    /// Body of the first request with this request line.
    pub fn body_of(&self, line: &str) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.line == line)
            .map(|r| r.body.clone())
    }
}
