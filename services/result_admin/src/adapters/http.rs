//! services/result_admin/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `RemoteDataClient` port from the `core` crate. It talks JSON to the result
//! management backend with `reqwest` and maps every failure onto `PortError`.

use async_trait::async_trait;
use reqwest::StatusCode;
use result_admin_core::ports::{ApiRequest, Method, PortError, PortResult, RemoteDataClient};
use serde_json::Value;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RemoteDataClient` over HTTP.
pub struct HttpDataClient {
    client: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
}

impl HttpDataClient {
    /// Creates a new `HttpDataClient`. Every request shares `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PortResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer: RwLock::new(None),
        })
    }

    fn token(&self) -> Option<String> {
        self.bearer.read().ok().and_then(|guard| guard.clone())
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// The human-readable reason in an error body: `message`, then `error`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "error"]
                .iter()
                .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_default()
}

//=========================================================================================
// `RemoteDataClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl RemoteDataClient for HttpDataClient {
    async fn send(&self, request: ApiRequest) -> PortResult<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{:?} {} {:?}", request.method, url, request.query);

        let mut builder = self.client.request(Self::method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            PortError::Transport(e.to_string())
        })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&text);
            // A bare 401 means the credential expired; a 401 with a reason
            // (a rejected login) keeps the backend's text for the banner.
            if status == StatusCode::UNAUTHORIZED && message.trim().is_empty() {
                return Err(PortError::Unauthorized);
            }
            return Err(PortError::Api {
                status: status.as_u16(),
                message,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| PortError::Decode(e.to_string()))?;
        if json.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(PortError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        Ok(json)
    }

    fn set_bearer(&self, token: Option<String>) {
        if let Ok(mut guard) = self.bearer.write() {
            *guard = token;
        }
    }
}
